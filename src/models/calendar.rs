//! Calendar window model.
//!
//! Maps a start/end date to an ordered sequence of day indices and the
//! academic year to its 13 rotation blocks.
//!
//! # Day Model
//! Days are addressed by a 0-based `index` into the scheduling window.
//! Human-facing text uses the 1-based day number (`index + 1`).
//!
//! # Block Model
//! The academic year starts at a configured date and is cut into
//! [`BLOCK_COUNT`] blocks of `block_length_days` each. The final block
//! absorbs the days left over at the end of the year.

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::RosterError;

/// Number of rotation blocks in an academic year.
pub const BLOCK_COUNT: usize = 13;

/// One day of the scheduling window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarDay {
    /// Position in the window (0-based).
    pub index: u32,
    /// Calendar date.
    pub date: NaiveDate,
    /// Day of week.
    pub weekday: Weekday,
    /// Whether the date is a configured major holiday.
    pub is_holiday: bool,
}

impl CalendarDay {
    /// 1-based day number used in reports.
    #[inline]
    pub fn number(&self) -> u32 {
        self.index + 1
    }

    /// Whether the day falls on one of the given weekend weekdays.
    pub fn is_weekend(&self, weekend_days: &[Weekday]) -> bool {
        weekend_days.contains(&self.weekday)
    }

    /// Short label, e.g. `Day 5 (2026-07-05)`.
    pub fn label(&self) -> String {
        format!("Day {} ({})", self.number(), self.date)
    }
}

/// An ordered, immutable scheduling window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Calendar {
    /// First date (inclusive).
    pub start: NaiveDate,
    /// Last date (inclusive).
    pub end: NaiveDate,
    days: Vec<CalendarDay>,
}

/// Builds the calendar for `[start, end]`.
///
/// # Errors
/// [`RosterError::InvalidRange`] when `end` precedes `start`.
pub fn build_calendar(
    start: NaiveDate,
    end: NaiveDate,
    holidays: &BTreeSet<NaiveDate>,
) -> Result<Calendar, RosterError> {
    if end < start {
        return Err(RosterError::InvalidRange { start, end });
    }

    let days = start
        .iter_days()
        .take_while(|d| *d <= end)
        .enumerate()
        .map(|(i, date)| CalendarDay {
            index: i as u32,
            date,
            weekday: date.weekday(),
            is_holiday: holidays.contains(&date),
        })
        .collect();

    Ok(Calendar { start, end, days })
}

impl Calendar {
    /// All days in ascending order.
    pub fn days(&self) -> &[CalendarDay] {
        &self.days
    }

    /// Number of days (inclusive count).
    pub fn len(&self) -> usize {
        self.days.len()
    }

    /// Whether the window has no days. Never true for a built calendar.
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Day by index.
    pub fn day(&self, index: u32) -> Option<&CalendarDay> {
        self.days.get(index as usize)
    }

    /// Day for a date, if inside the window.
    pub fn day_of(&self, date: NaiveDate) -> Option<&CalendarDay> {
        if date < self.start || date > self.end {
            return None;
        }
        self.day((date - self.start).num_days() as u32)
    }

    /// Major holidays inside the window.
    pub fn holidays(&self) -> impl Iterator<Item = &CalendarDay> {
        self.days.iter().filter(|d| d.is_holiday)
    }
}

/// Maps dates to rotation blocks of one academic year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockCalendar {
    /// First day of block 1.
    pub year_start: NaiveDate,
    /// Nominal block length in days.
    pub block_length_days: u32,
}

impl BlockCalendar {
    /// Creates a block calendar.
    pub fn new(year_start: NaiveDate, block_length_days: u32) -> Self {
        Self {
            year_start,
            block_length_days,
        }
    }

    /// Exclusive end of the academic year.
    pub fn year_end(&self) -> NaiveDate {
        self.year_start
            .with_year(self.year_start.year() + 1)
            .unwrap_or_else(|| self.year_start + chrono::Days::new(365))
    }

    /// 0-based block index for a date, or `None` outside the academic year.
    pub fn block_of(&self, date: NaiveDate) -> Option<usize> {
        if date < self.year_start || date >= self.year_end() || self.block_length_days == 0 {
            return None;
        }
        let offset = (date - self.year_start).num_days() as usize;
        Some((offset / self.block_length_days as usize).min(BLOCK_COUNT - 1))
    }

    /// First date of a block.
    pub fn block_start(&self, block: usize) -> NaiveDate {
        self.year_start + chrono::Days::new((block as u64) * self.block_length_days as u64)
    }
}

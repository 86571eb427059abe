//! Constraint configuration.
//!
//! The caller-supplied rule set for one scheduling request. Every field has
//! a default, so a TOML file only needs the rules it changes.
//!
//! # Examples
//!
//! ```
//! use u_roster::config::RosterConfig;
//!
//! let config = RosterConfig::from_toml_str(r#"
//!     min_home_headcount = 4
//!     min_senior_headcount = 1
//!     max_consecutive_call_days = 2
//!     holidays = ["2026-12-25", "2027-01-01"]
//!
//!     [timing_windows]
//!     early = [1, 3]
//! "#).unwrap();
//!
//! assert_eq!(config.min_home_headcount, 4);
//! assert_eq!(config.timing_windows.early, (1, 3));
//! assert_eq!(config.timing_windows.late, (10, 13));
//! ```
//!
//! Dates are quoted ISO-8601 strings.

use std::collections::BTreeSet;
use std::path::Path;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{ActivityKind, BlockCalendar, SlotRole, TimingWindows, BLOCK_COUNT};

/// Configuration error.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid TOML for [`RosterConfig`].
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// The parsed values break a config rule; see [`RosterConfig::problems`].
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// How major holidays are shared between holiday groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HolidayGroupPolicy {
    /// Prefer the group that has covered fewer holidays so far.
    #[default]
    Alternate,
    /// Holidays are ranked like any other day.
    Ignore,
}

/// What a chief's reserved day excludes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChiefReservedPolicy {
    /// No call of any kind on reserved days.
    #[default]
    Exclusive,
    /// Backup remains allowed on reserved days.
    BackupCompatible,
}

/// The enumerated rule set for one scheduling request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterConfig {
    /// First day of block 1. `None` = the latest July 1 on or before the window start.
    pub academic_year_start: Option<NaiveDate>,
    /// Nominal block length in days.
    pub block_length_days: u32,
    /// Derive daily on-service status from the rotation plan.
    pub apply_rotation_plan: bool,
    /// Minimum trainees on the home service per block.
    pub min_home_headcount: usize,
    /// Minimum senior trainees on the home service per block.
    pub min_senior_headcount: usize,
    /// Lowest post-graduate year counted as senior.
    pub senior_min_pgy: u8,
    /// Longest allowed run of consecutive call days.
    pub max_consecutive_call_days: u32,
    /// Allow people with a double-call allowance to take two calls in a day.
    pub allow_double_call: bool,
    /// Holiday-group split policy.
    pub holiday_policy: HolidayGroupPolicy,
    /// Chief reserved-day policy.
    pub chief_policy: ChiefReservedPolicy,
    /// Off-service timing windows.
    pub timing_windows: TimingWindows,
    /// Trainee slots on weekdays, in fill order.
    pub weekday_slots: Vec<ActivityKind>,
    /// Trainee slots on weekend days and holidays, in fill order.
    pub weekend_slots: Vec<ActivityKind>,
    /// Staff slots filled every day after trainee slots.
    pub staff_slots: Vec<ActivityKind>,
    /// Weekdays treated as weekend.
    pub weekend_days: Vec<Weekday>,
    /// Major holidays.
    pub holidays: BTreeSet<NaiveDate>,
    /// Dates of program-wide academic events.
    pub academic_event_dates: BTreeSet<NaiveDate>,
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            academic_year_start: None,
            block_length_days: 28,
            apply_rotation_plan: true,
            min_home_headcount: 0,
            min_senior_headcount: 0,
            senior_min_pgy: 4,
            max_consecutive_call_days: 2,
            allow_double_call: false,
            holiday_policy: HolidayGroupPolicy::default(),
            chief_policy: ChiefReservedPolicy::default(),
            timing_windows: TimingWindows::default(),
            weekday_slots: vec![
                ActivityKind::DayCall,
                ActivityKind::NightCall,
                ActivityKind::Backup,
            ],
            weekend_slots: vec![ActivityKind::WeekendCall, ActivityKind::Backup],
            staff_slots: vec![ActivityKind::CranialStaffCall, ActivityKind::SpineStaffCall],
            weekend_days: vec![Weekday::Sat, Weekday::Sun],
            holidays: BTreeSet::new(),
            academic_event_dates: BTreeSet::new(),
        }
    }
}

impl RosterConfig {
    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Loads configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Builder: sets the per-block minimum home headcount.
    pub fn with_min_home_headcount(mut self, n: usize) -> Self {
        self.min_home_headcount = n;
        self
    }

    /// Builder: sets the per-block minimum senior headcount.
    pub fn with_min_senior_headcount(mut self, n: usize) -> Self {
        self.min_senior_headcount = n;
        self
    }

    /// Builder: sets the consecutive call limit.
    pub fn with_max_consecutive_call_days(mut self, n: u32) -> Self {
        self.max_consecutive_call_days = n;
        self
    }

    /// Builder: enables double call.
    pub fn with_double_call(mut self) -> Self {
        self.allow_double_call = true;
        self
    }

    /// Builder: adds a major holiday.
    pub fn with_holiday(mut self, date: NaiveDate) -> Self {
        self.holidays.insert(date);
        self
    }

    /// Builder: sets the trainee slot lists.
    pub fn with_slots(mut self, weekday: Vec<ActivityKind>, weekend: Vec<ActivityKind>) -> Self {
        self.weekday_slots = weekday;
        self.weekend_slots = weekend;
        self
    }

    /// Builder: sets the staff slot list.
    pub fn with_staff_slots(mut self, slots: Vec<ActivityKind>) -> Self {
        self.staff_slots = slots;
        self
    }

    /// Builder: sets the chief policy.
    pub fn with_chief_policy(mut self, policy: ChiefReservedPolicy) -> Self {
        self.chief_policy = policy;
        self
    }

    /// Builder: sets the academic year start.
    pub fn with_academic_year_start(mut self, date: NaiveDate) -> Self {
        self.academic_year_start = Some(date);
        self
    }

    /// Block calendar for a window starting at `window_start`.
    pub fn block_calendar(&self, window_start: NaiveDate) -> BlockCalendar {
        let year_start = self.academic_year_start.unwrap_or_else(|| {
            let year = if window_start.month() >= 7 {
                window_start.year()
            } else {
                window_start.year() - 1
            };
            NaiveDate::from_ymd_opt(year, 7, 1).unwrap_or(window_start)
        });
        BlockCalendar::new(year_start, self.block_length_days)
    }

    /// Whether a date is a weekend day.
    pub fn is_weekend(&self, weekday: Weekday) -> bool {
        self.weekend_days.contains(&weekday)
    }

    /// Internal contradictions, one message each.
    pub fn problems(&self) -> Vec<String> {
        let mut out = Vec::new();

        if self.block_length_days == 0 {
            out.push("block_length_days must be positive".to_string());
        } else if self.block_length_days as usize * BLOCK_COUNT > 366 {
            out.push(format!(
                "{BLOCK_COUNT} blocks of {} days exceed one year",
                self.block_length_days
            ));
        }
        if !(1..=7).contains(&self.senior_min_pgy) {
            out.push(format!(
                "senior_min_pgy must be within 1..=7 (got {})",
                self.senior_min_pgy
            ));
        }
        if self.max_consecutive_call_days == 0 {
            out.push("max_consecutive_call_days must be positive".to_string());
        }

        let windows = [
            ("early", self.timing_windows.early),
            ("mid", self.timing_windows.mid),
            ("late", self.timing_windows.late),
        ];
        for (name, (lo, hi)) in windows {
            if lo == 0 || hi as usize > BLOCK_COUNT || lo > hi {
                out.push(format!(
                    "timing window '{name}' must satisfy 1 <= start <= end <= {BLOCK_COUNT} (got {lo}..={hi})"
                ));
            }
        }

        let trainee_lists = [
            ("weekday_slots", &self.weekday_slots),
            ("weekend_slots", &self.weekend_slots),
        ];
        for (name, slots) in trainee_lists {
            for kind in slots {
                if kind.slot_role() != Some(SlotRole::Trainee) {
                    out.push(format!("{name} may only hold resident call slots (got {kind})"));
                }
            }
        }
        if self.weekday_slots.contains(&ActivityKind::WeekendCall) {
            out.push(format!(
                "weekday_slots may not hold {}",
                ActivityKind::WeekendCall
            ));
        }
        for kind in &self.staff_slots {
            if !matches!(kind.slot_role(), Some(SlotRole::Staff(_))) {
                out.push(format!("staff_slots may only hold staff call slots (got {kind})"));
            }
        }

        out
    }

    /// Checks internal consistency.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let problems = self.problems();
        if problems.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Invalid(problems.join("; ")))
        }
    }
}

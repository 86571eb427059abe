//! Evaluation context for eligibility and fairness rules.
//!
//! [`RunningCounters`] is the only mutable state of a scheduling run. It is
//! created per invocation, threaded through the day loop, and dropped with
//! the run, so concurrent invocations never share it.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;

use crate::config::RosterConfig;
use crate::models::{ActivityKind, CalendarDay, Person, Roster, ServiceAssignment};

/// A person considered for one slot.
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    /// Roster position (final tie-breaker).
    pub position: usize,
    /// The person.
    pub person: &'a Person,
    /// Service held on the slot's day.
    pub service: &'a ServiceAssignment,
}

/// The slot being filled and the state of the run so far.
#[derive(Debug, Clone, Copy)]
pub struct SlotContext<'a> {
    /// Day being scheduled.
    pub day: &'a CalendarDay,
    /// Slot kind.
    pub kind: ActivityKind,
    /// Whether the day is a weekend day or holiday.
    pub is_weekend: bool,
    /// Rule set.
    pub config: &'a RosterConfig,
    /// Committed counters.
    pub counters: &'a RunningCounters,
}

/// Per-person counters for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonCounters {
    /// Calls taken while on the home service.
    pub home_calls: u32,
    /// Calls taken while on a call-eligible rotation.
    pub off_service_calls: u32,
    /// Backup slots taken.
    pub backups: u32,
    /// Cumulative weekend calls, seeded from the roster.
    pub weekend_calls: u32,
    /// Holidays covered as primary call.
    pub holiday_calls: u32,
    /// Double-call days left.
    pub double_calls_remaining: u32,
    /// Double-call days used in this run.
    pub double_calls_used: u32,
    /// Day offsets (relative to the window start) with a non-backup call.
    pub call_days: BTreeSet<i64>,
    /// Window days already holding a call from the roster's history.
    pub booked_days: BTreeSet<u32>,
    /// Call slots held on the current day.
    pub calls_today: u8,
}

impl PersonCounters {
    /// Non-backup calls in the window.
    #[inline]
    pub fn window_calls(&self) -> u32 {
        self.home_calls + self.off_service_calls
    }
}

/// Result of committing one call slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommitOutcome {
    /// The commit consumed a double-call allowance.
    pub double_call: bool,
    /// The commit counted as the day's holiday coverage.
    pub holiday_coverage: bool,
}

/// Running fairness counters for one scheduling run.
#[derive(Debug, Clone, Default)]
pub struct RunningCounters {
    people: Vec<PersonCounters>,
    holiday_groups: BTreeMap<String, u32>,
    current_day: u32,
    senior_on_call_today: bool,
    holiday_covered_today: bool,
}

impl RunningCounters {
    /// Seeds counters from the roster for a window with no end date.
    ///
    /// See [`RunningCounters::for_window`].
    pub fn new(roster: &Roster, window_start: NaiveDate) -> Self {
        Self::for_window(roster, window_start, NaiveDate::MAX)
    }

    /// Seeds counters from the roster for `[window_start, window_end]`.
    ///
    /// Prior weekend calls and call dates before the window shape recency and
    /// consecutive-call checks but never count against window caps. Call
    /// dates inside the window are already taken: they occupy that day's
    /// call allowance and count against the home call cap.
    pub fn for_window(roster: &Roster, window_start: NaiveDate, window_end: NaiveDate) -> Self {
        let people = roster
            .people
            .iter()
            .map(|p| {
                let booked_days: BTreeSet<u32> = p
                    .call_history
                    .range(window_start..)
                    .take_while(|d| **d <= window_end)
                    .map(|d| (*d - window_start).num_days() as u32)
                    .collect();
                let call_days = p
                    .call_history
                    .range(..window_start)
                    .map(|d| (*d - window_start).num_days())
                    .chain(booked_days.iter().map(|d| *d as i64))
                    .collect();
                PersonCounters {
                    home_calls: booked_days.len() as u32,
                    weekend_calls: p.weekend_calls,
                    double_calls_remaining: p.double_call_allowance,
                    call_days,
                    booked_days,
                    ..PersonCounters::default()
                }
            })
            .collect();

        let holiday_groups = roster
            .people
            .iter()
            .filter_map(|p| p.holiday_group.clone())
            .map(|g| (g, 0))
            .collect();

        Self {
            people,
            holiday_groups,
            ..Self::default()
        }
    }

    /// Starts a new day: clears same-day state, keeping calls booked for it.
    pub fn begin_day(&mut self, day: u32) {
        self.current_day = day;
        self.senior_on_call_today = false;
        self.holiday_covered_today = false;
        for c in &mut self.people {
            c.calls_today = u8::from(c.booked_days.contains(&day));
        }
    }

    /// Day currently being scheduled.
    pub fn current_day(&self) -> u32 {
        self.current_day
    }

    /// Counters for a roster position.
    pub fn person(&self, position: usize) -> Option<&PersonCounters> {
        self.people.get(position)
    }

    /// Call slots a person holds today.
    pub fn calls_today(&self, position: usize) -> u8 {
        self.people.get(position).map_or(0, |c| c.calls_today)
    }

    /// Whether a senior trainee already holds a call slot today.
    pub fn senior_on_call_today(&self) -> bool {
        self.senior_on_call_today
    }

    /// Length of the run of call days ending the day before `day`.
    pub fn consecutive_before(&self, position: usize, day: u32) -> u32 {
        let Some(c) = self.people.get(position) else {
            return 0;
        };
        let mut streak = 0;
        let mut d = day as i64 - 1;
        while c.call_days.contains(&d) {
            streak += 1;
            d -= 1;
        }
        streak
    }

    /// Length of the run of call days starting the day after `day`.
    pub fn consecutive_after(&self, position: usize, day: u32) -> u32 {
        let Some(c) = self.people.get(position) else {
            return 0;
        };
        let mut streak = 0;
        let mut d = day as i64 + 1;
        while c.call_days.contains(&d) {
            streak += 1;
            d += 1;
        }
        streak
    }

    /// Days since the person's last non-backup call before `day`.
    pub fn days_since_last_call(&self, position: usize, day: u32) -> Option<i64> {
        let c = self.people.get(position)?;
        c.call_days
            .range(..day as i64)
            .next_back()
            .map(|last| day as i64 - last)
    }

    /// Holidays covered so far by a holiday group.
    pub fn holiday_group_count(&self, group: &str) -> u32 {
        self.holiday_groups.get(group).copied().unwrap_or(0)
    }

    /// Holiday coverage per group.
    pub fn holiday_groups(&self) -> &BTreeMap<String, u32> {
        &self.holiday_groups
    }

    /// All per-person counters in roster order.
    pub fn people(&self) -> &[PersonCounters] {
        &self.people
    }

    /// Records a committed call slot.
    pub fn commit(&mut self, candidate: &Candidate<'_>, slot: &SlotCommit) -> CommitOutcome {
        let mut outcome = CommitOutcome {
            double_call: false,
            holiday_coverage: false,
        };
        let Some(c) = self.people.get_mut(candidate.position) else {
            return outcome;
        };

        if c.calls_today >= 1 {
            c.double_calls_remaining = c.double_calls_remaining.saturating_sub(1);
            c.double_calls_used += 1;
            outcome.double_call = true;
        }
        c.calls_today += 1;

        if slot.kind.is_backup() {
            c.backups += 1;
        } else {
            if candidate.service.is_home() {
                c.home_calls += 1;
            } else {
                c.off_service_calls += 1;
            }
            c.call_days.insert(slot.day as i64);
            if slot.is_weekend {
                c.weekend_calls += 1;
            }
        }

        let person = candidate.person;
        if person.is_trainee() {
            if person.is_senior(slot.senior_min_pgy) {
                self.senior_on_call_today = true;
            }
            if slot.is_holiday && !slot.kind.is_backup() && !self.holiday_covered_today {
                self.holiday_covered_today = true;
                outcome.holiday_coverage = true;
                c.holiday_calls += 1;
                if let Some(group) = &person.holiday_group {
                    *self.holiday_groups.entry(group.clone()).or_insert(0) += 1;
                }
            }
        }

        outcome
    }
}

/// Slot facts needed to commit a call.
#[derive(Debug, Clone, Copy)]
pub struct SlotCommit {
    /// Day index.
    pub day: u32,
    /// Slot kind.
    pub kind: ActivityKind,
    /// Weekend day or holiday.
    pub is_weekend: bool,
    /// Major holiday.
    pub is_holiday: bool,
    /// Senior threshold.
    pub senior_min_pgy: u8,
}

impl SlotCommit {
    /// Commit facts for a slot context.
    pub fn from_slot(slot: &SlotContext<'_>) -> Self {
        Self {
            day: slot.day.index,
            kind: slot.kind,
            is_weekend: slot.is_weekend,
            is_holiday: slot.day.is_holiday,
            senior_min_pgy: slot.config.senior_min_pgy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 7, d).unwrap()
    }

    fn roster() -> Roster {
        Roster::new(vec![
            Person::trainee("J", 2)
                .with_holiday_group("A")
                .with_double_calls(1)
                .with_weekend_calls(3)
                .with_call_on(NaiveDate::from_ymd_opt(2026, 6, 30).unwrap())
                .with_call_on(date(5)),
            Person::trainee("S", 5).with_holiday_group("B"),
        ])
    }

    fn commit(kind: ActivityKind, day: u32, weekend: bool, holiday: bool) -> SlotCommit {
        SlotCommit {
            day,
            kind,
            is_weekend: weekend,
            is_holiday: holiday,
            senior_min_pgy: 4,
        }
    }

    #[test]
    fn test_seeding() {
        let r = roster();
        let c = RunningCounters::new(&r, date(1));
        let j = c.person(0).unwrap();
        assert_eq!(j.weekend_calls, 3);
        assert_eq!(j.double_calls_remaining, 1);
        // History before the window shapes recency; July 5 is already booked.
        assert_eq!(j.call_days.iter().copied().collect::<Vec<_>>(), vec![-1, 4]);
        assert_eq!(j.booked_days.iter().copied().collect::<Vec<_>>(), vec![4]);
        assert_eq!(j.home_calls, 1);
        assert_eq!(c.holiday_group_count("A"), 0);
        assert_eq!(c.holiday_groups().len(), 2);
        assert_eq!(c.consecutive_before(0, 0), 1);
        assert_eq!(c.days_since_last_call(0, 3), Some(4));
        assert_eq!(c.days_since_last_call(1, 3), None);
    }

    #[test]
    fn test_commit_double_call() {
        let r = roster();
        let mut c = RunningCounters::new(&r, date(1));
        let home = ServiceAssignment::Home;
        let cand = Candidate {
            position: 0,
            person: &r.people[0],
            service: &home,
        };
        c.begin_day(0);
        let first = c.commit(&cand, &commit(ActivityKind::DayCall, 0, false, false));
        assert!(!first.double_call);
        let second = c.commit(&cand, &commit(ActivityKind::Backup, 0, false, false));
        assert!(second.double_call);

        let j = c.person(0).unwrap();
        assert_eq!(j.home_calls, 2); // booked July 5 plus today's Day Call
        assert_eq!(j.backups, 1);
        assert_eq!(j.double_calls_remaining, 0);
        assert_eq!(j.double_calls_used, 1);
        assert_eq!(c.calls_today(0), 2);

        c.begin_day(1);
        assert_eq!(c.calls_today(0), 0);
        assert_eq!(c.consecutive_before(0, 1), 2); // day -1 and day 0
    }

    #[test]
    fn test_commit_off_service_and_weekend() {
        let r = roster();
        let mut c = RunningCounters::new(&r, date(1));
        let away = ServiceAssignment::OffService {
            service: "ICU".into(),
            call_eligible: true,
        };
        let cand = Candidate {
            position: 1,
            person: &r.people[1],
            service: &away,
        };
        c.begin_day(3);
        c.commit(&cand, &commit(ActivityKind::WeekendCall, 3, true, false));
        let s = c.person(1).unwrap();
        assert_eq!(s.off_service_calls, 1);
        assert_eq!(s.home_calls, 0);
        assert_eq!(s.weekend_calls, 1);
        assert!(c.senior_on_call_today());
    }

    #[test]
    fn test_holiday_coverage_counts_once_per_day() {
        let r = roster();
        let mut c = RunningCounters::new(&r, date(1));
        let home = ServiceAssignment::Home;
        let j = Candidate {
            position: 0,
            person: &r.people[0],
            service: &home,
        };
        let s = Candidate {
            position: 1,
            person: &r.people[1],
            service: &home,
        };
        c.begin_day(2);
        let backup = c.commit(&s, &commit(ActivityKind::Backup, 2, true, true));
        assert!(!backup.holiday_coverage);
        let primary = c.commit(&j, &commit(ActivityKind::WeekendCall, 2, true, true));
        assert!(primary.holiday_coverage);
        let night = c.commit(&s, &commit(ActivityKind::NightCall, 2, true, true));
        assert!(!night.holiday_coverage);

        assert_eq!(c.holiday_group_count("A"), 1);
        assert_eq!(c.holiday_group_count("B"), 0);
    }

    #[test]
    fn test_booked_call_occupies_its_day() {
        let r = roster();
        let mut c = RunningCounters::new(&r, date(1));
        c.begin_day(3);
        assert_eq!(c.calls_today(0), 0);
        c.begin_day(4);
        assert_eq!(c.calls_today(0), 1);
        assert_eq!(c.calls_today(1), 0);
        assert_eq!(c.consecutive_after(0, 3), 1);
        assert_eq!(c.consecutive_after(0, 4), 0);
    }

    #[test]
    fn test_history_after_window_ignored() {
        let r = roster();
        let c = RunningCounters::for_window(&r, date(1), date(3));
        let j = c.person(0).unwrap();
        assert!(j.booked_days.is_empty());
        assert_eq!(j.home_calls, 0);
        assert_eq!(j.call_days.iter().copied().collect::<Vec<_>>(), vec![-1]);
    }
}

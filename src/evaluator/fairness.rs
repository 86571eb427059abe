//! Built-in fairness rules.
//!
//! # Default Precedence
//!
//! [`ConstraintEvaluator::standard`] compares candidates rule by rule and
//! only consults the next rule on a tie:
//!
//! 1. **SAME_DAY_LOAD**: people not yet on call today first, so double
//!    calls are a last resort.
//! 2. **HOLIDAY_GROUP**: on major holidays, the group that has covered
//!    fewer holidays first.
//! 3. **CALL_LOAD**: fewer calls of the same family (call vs. backup) first.
//! 4. **WEEKEND_LOAD**: on weekends and holidays, fewer weekend calls first.
//! 5. **CALL_RECENCY**: longest rest since the last call first.
//!
//! Remaining ties fall to roster position.
//!
//! # Score Convention
//! All rules return lower scores for preferred candidates.
//!
//! [`ConstraintEvaluator::standard`]: super::ConstraintEvaluator::standard

use super::{Candidate, FairnessRule, RuleScore, SlotContext};
use crate::config::HolidayGroupPolicy;

/// Score for people without a holiday group: ranked after every tagged group.
const UNTAGGED_GROUP_SCORE: RuleScore = 1.0e6;

/// Rest credited to people with no recorded call.
const NEVER_CALLED_DAYS: i64 = 10_000;

/// Calls already held today.
#[derive(Debug, Clone, Copy)]
pub struct SameDayLoad;

impl FairnessRule for SameDayLoad {
    fn name(&self) -> &'static str {
        "SAME_DAY_LOAD"
    }

    fn evaluate(&self, candidate: &Candidate<'_>, slot: &SlotContext<'_>) -> RuleScore {
        slot.counters.calls_today(candidate.position) as RuleScore
    }

    fn description(&self) -> &'static str {
        "Prefer people not yet on call today"
    }
}

/// Holidays covered by the candidate's holiday group.
///
/// Zero on ordinary days and when the policy is `Ignore`.
#[derive(Debug, Clone, Copy)]
pub struct HolidayGroupBalance;

impl FairnessRule for HolidayGroupBalance {
    fn name(&self) -> &'static str {
        "HOLIDAY_GROUP"
    }

    fn evaluate(&self, candidate: &Candidate<'_>, slot: &SlotContext<'_>) -> RuleScore {
        if !slot.day.is_holiday || slot.config.holiday_policy == HolidayGroupPolicy::Ignore {
            return 0.0;
        }
        match &candidate.person.holiday_group {
            Some(group) => slot.counters.holiday_group_count(group) as RuleScore,
            None => UNTAGGED_GROUP_SCORE,
        }
    }

    fn description(&self) -> &'static str {
        "Alternate major holidays between holiday groups"
    }
}

/// Running call count: backups for backup slots, other calls otherwise.
#[derive(Debug, Clone, Copy)]
pub struct CallLoad;

impl FairnessRule for CallLoad {
    fn name(&self) -> &'static str {
        "CALL_LOAD"
    }

    fn evaluate(&self, candidate: &Candidate<'_>, slot: &SlotContext<'_>) -> RuleScore {
        let Some(c) = slot.counters.person(candidate.position) else {
            return 0.0;
        };
        if slot.kind.is_backup() {
            c.backups as RuleScore
        } else {
            c.window_calls() as RuleScore
        }
    }

    fn description(&self) -> &'static str {
        "Fewest calls in the window"
    }
}

/// Cumulative weekend calls, applied on weekend days and holidays only.
#[derive(Debug, Clone, Copy)]
pub struct WeekendLoad;

impl FairnessRule for WeekendLoad {
    fn name(&self) -> &'static str {
        "WEEKEND_LOAD"
    }

    fn evaluate(&self, candidate: &Candidate<'_>, slot: &SlotContext<'_>) -> RuleScore {
        if !slot.is_weekend {
            return 0.0;
        }
        slot.counters
            .person(candidate.position)
            .map_or(0.0, |c| c.weekend_calls as RuleScore)
    }

    fn description(&self) -> &'static str {
        "Fewest weekend calls"
    }
}

/// Negated days since the last call.
#[derive(Debug, Clone, Copy)]
pub struct CallRecency;

impl FairnessRule for CallRecency {
    fn name(&self) -> &'static str {
        "CALL_RECENCY"
    }

    fn evaluate(&self, candidate: &Candidate<'_>, slot: &SlotContext<'_>) -> RuleScore {
        let rest = slot
            .counters
            .days_since_last_call(candidate.position, slot.day.index)
            .unwrap_or(NEVER_CALLED_DAYS);
        -(rest as RuleScore)
    }

    fn description(&self) -> &'static str {
        "Longest rest since last call"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RosterConfig;
    use crate::evaluator::{RunningCounters, SlotCommit};
    use crate::models::{ActivityKind, CalendarDay, Person, Roster, ServiceAssignment};
    use chrono::{Datelike, NaiveDate};

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 7, d).unwrap()
    }

    fn day(index: u32, is_holiday: bool) -> CalendarDay {
        let date = date(index + 1);
        CalendarDay {
            index,
            date,
            weekday: date.weekday(),
            is_holiday,
        }
    }

    struct Fixture {
        roster: Roster,
        config: RosterConfig,
        counters: RunningCounters,
        home: ServiceAssignment,
    }

    impl Fixture {
        fn new(people: Vec<Person>) -> Self {
            let roster = Roster::new(people);
            let counters = RunningCounters::new(&roster, date(1));
            Self {
                roster,
                config: RosterConfig::default(),
                counters,
                home: ServiceAssignment::Home,
            }
        }

        fn score<R: FairnessRule>(
            &self,
            rule: R,
            pos: usize,
            kind: ActivityKind,
            d: &CalendarDay,
        ) -> RuleScore {
            let candidate = Candidate {
                position: pos,
                person: &self.roster.people[pos],
                service: &self.home,
            };
            let slot = SlotContext {
                day: d,
                kind,
                is_weekend: d.is_holiday || self.config.is_weekend(d.weekday),
                config: &self.config,
                counters: &self.counters,
            };
            rule.evaluate(&candidate, &slot)
        }

        fn commit(&mut self, pos: usize, kind: ActivityKind, d: &CalendarDay) {
            let candidate = Candidate {
                position: pos,
                person: &self.roster.people[pos],
                service: &self.home,
            };
            let slot = SlotCommit {
                day: d.index,
                kind,
                is_weekend: false,
                is_holiday: d.is_holiday,
                senior_min_pgy: 4,
            };
            self.counters.commit(&candidate, &slot);
        }
    }

    #[test]
    fn test_call_load_separates_backup() {
        let mut f = Fixture::new(vec![Person::trainee("A", 3), Person::trainee("B", 3)]);
        let d0 = day(0, false);
        f.counters.begin_day(0);
        f.commit(0, ActivityKind::DayCall, &d0);
        f.commit(1, ActivityKind::Backup, &d0);

        assert_eq!(f.score(SameDayLoad, 0, ActivityKind::NightCall, &d0), 1.0);

        let d1 = day(1, false);
        f.counters.begin_day(1);
        assert_eq!(f.score(CallLoad, 0, ActivityKind::NightCall, &d1), 1.0);
        assert_eq!(f.score(CallLoad, 1, ActivityKind::NightCall, &d1), 0.0);
        assert_eq!(f.score(CallLoad, 1, ActivityKind::Backup, &d1), 1.0);
        assert_eq!(f.score(SameDayLoad, 0, ActivityKind::NightCall, &d1), 0.0);
    }

    #[test]
    fn test_holiday_group_balance() {
        let mut f = Fixture::new(vec![
            Person::trainee("A", 3).with_holiday_group("A"),
            Person::trainee("B", 3).with_holiday_group("B"),
            Person::trainee("N", 3),
        ]);
        let xmas = day(3, true);
        f.counters.begin_day(3);
        f.commit(0, ActivityKind::WeekendCall, &xmas);

        let ny = day(10, true);
        let a = f.score(HolidayGroupBalance, 0, ActivityKind::WeekendCall, &ny);
        let b = f.score(HolidayGroupBalance, 1, ActivityKind::WeekendCall, &ny);
        let n = f.score(HolidayGroupBalance, 2, ActivityKind::WeekendCall, &ny);
        assert!(b < a);
        assert!(a < n);

        // Ordinary days and the Ignore policy do not rank by group.
        let ordinary = day(11, false);
        assert_eq!(f.score(HolidayGroupBalance, 0, ActivityKind::DayCall, &ordinary), 0.0);
        f.config.holiday_policy = HolidayGroupPolicy::Ignore;
        assert_eq!(f.score(HolidayGroupBalance, 0, ActivityKind::WeekendCall, &ny), 0.0);
    }

    #[test]
    fn test_weekend_load_only_on_weekends() {
        let f = Fixture::new(vec![Person::trainee("A", 3).with_weekend_calls(4)]);
        let saturday = day(3, false); // 2026-07-04
        let monday = day(5, false);
        assert_eq!(f.score(WeekendLoad, 0, ActivityKind::WeekendCall, &saturday), 4.0);
        assert_eq!(f.score(WeekendLoad, 0, ActivityKind::DayCall, &monday), 0.0);
    }

    #[test]
    fn test_recency_prefers_rested() {
        let june_30 = NaiveDate::from_ymd_opt(2026, 6, 30).unwrap();
        let f = Fixture::new(vec![
            Person::trainee("Recent", 3).with_call_on(june_30),
            Person::trainee("Never", 3),
        ]);
        let d = day(2, false);
        let recent = f.score(CallRecency, 0, ActivityKind::DayCall, &d);
        let never = f.score(CallRecency, 1, ActivityKind::DayCall, &d);
        assert_eq!(recent, -3.0);
        assert!(never < recent);
    }
}

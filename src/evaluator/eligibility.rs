//! Built-in eligibility rules.
//!
//! Listed in the order [`ConstraintEvaluator::standard`] evaluates them:
//!
//! | Rule | Blocks when |
//! |------|-------------|
//! | ROLE | slot role does not match (trainee vs. tagged staff) |
//! | ON_SERVICE | off service on a rotation without call |
//! | NOT_ON_VACATION | the date is blocked |
//! | WITHIN_CALL_CAP | home or off-service cap reached (not for backup) |
//! | DAILY_CALL_LIMIT | already on call today, no double call left |
//! | CONSECUTIVE_CALLS | the run of call days hits the limit (not for backup) |
//! | SENIOR_SUPERVISION | PGY-1 without solo permission and no senior on call |
//! | BACKUP_CAPABLE | backup slot and the person may not back up |
//! | CHIEF_RESERVED | chief's reserved day (backup allowed under `BackupCompatible`) |
//!
//! [`ConstraintEvaluator::standard`]: super::ConstraintEvaluator::standard

use super::{Candidate, Eligibility, EligibilityRule, IneligibleReason, SlotContext};
use crate::config::ChiefReservedPolicy;
use crate::models::{ActivityKind, SlotRole};

/// Slot role must match the person.
#[derive(Debug, Clone, Copy)]
pub struct RoleMatchesSlot;

impl EligibilityRule for RoleMatchesSlot {
    fn name(&self) -> &'static str {
        "ROLE"
    }

    fn check(&self, candidate: &Candidate<'_>, slot: &SlotContext<'_>) -> Eligibility {
        let person = candidate.person;
        match slot.kind.slot_role() {
            Some(SlotRole::Trainee) => {
                Eligibility::unless(!person.is_trainee(), IneligibleReason::RoleMismatch)
            }
            Some(SlotRole::Staff(specialty)) => {
                if !person.is_staff() {
                    Eligibility::Ineligible(IneligibleReason::RoleMismatch)
                } else {
                    Eligibility::unless(
                        !person.has_specialty(specialty),
                        IneligibleReason::MissingSpecialty(specialty),
                    )
                }
            }
            None => Eligibility::Ineligible(IneligibleReason::RoleMismatch),
        }
    }

    fn description(&self) -> &'static str {
        "Slot role matches person"
    }
}

/// On service, or on a call-eligible rotation.
#[derive(Debug, Clone, Copy)]
pub struct OnService;

impl EligibilityRule for OnService {
    fn name(&self) -> &'static str {
        "ON_SERVICE"
    }

    fn check(&self, candidate: &Candidate<'_>, _slot: &SlotContext<'_>) -> Eligibility {
        Eligibility::unless(
            !candidate.service.permits_call(),
            IneligibleReason::OffService,
        )
    }

    fn description(&self) -> &'static str {
        "On service or call-eligible rotation"
    }
}

/// Not a blocked vacation day.
#[derive(Debug, Clone, Copy)]
pub struct NotOnVacation;

impl EligibilityRule for NotOnVacation {
    fn name(&self) -> &'static str {
        "NOT_ON_VACATION"
    }

    fn check(&self, candidate: &Candidate<'_>, slot: &SlotContext<'_>) -> Eligibility {
        Eligibility::unless(
            candidate.person.is_on_vacation(slot.day.date),
            IneligibleReason::Vacation,
        )
    }

    fn description(&self) -> &'static str {
        "Not on vacation"
    }
}

/// Call cap for the current service context. Backup is exempt.
#[derive(Debug, Clone, Copy)]
pub struct WithinCallCap;

impl EligibilityRule for WithinCallCap {
    fn name(&self) -> &'static str {
        "WITHIN_CALL_CAP"
    }

    fn check(&self, candidate: &Candidate<'_>, slot: &SlotContext<'_>) -> Eligibility {
        if slot.kind.is_backup() {
            return Eligibility::Eligible;
        }
        let Some(c) = slot.counters.person(candidate.position) else {
            return Eligibility::Eligible;
        };
        let person = candidate.person;
        let reached = if candidate.service.is_home() {
            c.home_calls >= person.home_call_cap
        } else {
            c.off_service_calls >= person.off_service_call_cap
        };
        Eligibility::unless(reached, IneligibleReason::CallCapReached)
    }

    fn description(&self) -> &'static str {
        "Within home or off-service call cap"
    }
}

/// One call per day, or two while a double-call allowance remains.
#[derive(Debug, Clone, Copy)]
pub struct DailyCallLimit;

impl EligibilityRule for DailyCallLimit {
    fn name(&self) -> &'static str {
        "DAILY_CALL_LIMIT"
    }

    fn check(&self, candidate: &Candidate<'_>, slot: &SlotContext<'_>) -> Eligibility {
        let today = slot.counters.calls_today(candidate.position);
        let allowed = match today {
            0 => true,
            1 => {
                slot.config.allow_double_call
                    && slot
                        .counters
                        .person(candidate.position)
                        .is_some_and(|c| c.double_calls_remaining > 0)
            }
            _ => false,
        };
        Eligibility::unless(!allowed, IneligibleReason::DailyCallLimit)
    }

    fn description(&self) -> &'static str {
        "At most one call per day unless a double call remains"
    }
}

/// Consecutive call days stay within the configured limit. Backup is exempt.
#[derive(Debug, Clone, Copy)]
pub struct ConsecutiveCallLimit;

impl EligibilityRule for ConsecutiveCallLimit {
    fn name(&self) -> &'static str {
        "CONSECUTIVE_CALLS"
    }

    fn check(&self, candidate: &Candidate<'_>, slot: &SlotContext<'_>) -> Eligibility {
        if slot.kind.is_backup() {
            return Eligibility::Eligible;
        }
        let (position, day) = (candidate.position, slot.day.index);
        // Booked calls later in the window extend the run forward.
        let run = slot.counters.consecutive_before(position, day)
            + 1
            + slot.counters.consecutive_after(position, day);
        Eligibility::unless(
            run > slot.config.max_consecutive_call_days,
            IneligibleReason::ConsecutiveCallLimit,
        )
    }

    fn description(&self) -> &'static str {
        "Maximum consecutive call days"
    }
}

/// First-year trainees need a senior already on call that day.
#[derive(Debug, Clone, Copy)]
pub struct SeniorSupervision;

impl EligibilityRule for SeniorSupervision {
    fn name(&self) -> &'static str {
        "SENIOR_SUPERVISION"
    }

    fn check(&self, candidate: &Candidate<'_>, slot: &SlotContext<'_>) -> Eligibility {
        let person = candidate.person;
        let needs_senior = person.is_pgy1()
            && !person.allow_solo_pgy1_call
            && !slot.counters.senior_on_call_today();
        Eligibility::unless(needs_senior, IneligibleReason::SeniorSupervisionRequired)
    }

    fn description(&self) -> &'static str {
        "PGY-1 call requires a co-assigned senior"
    }
}

/// Backup slots require `can_be_backup`.
#[derive(Debug, Clone, Copy)]
pub struct BackupCapable;

impl EligibilityRule for BackupCapable {
    fn name(&self) -> &'static str {
        "BACKUP_CAPABLE"
    }

    fn check(&self, candidate: &Candidate<'_>, slot: &SlotContext<'_>) -> Eligibility {
        Eligibility::unless(
            slot.kind == ActivityKind::Backup && !candidate.person.can_be_backup,
            IneligibleReason::NotBackupCapable,
        )
    }

    fn description(&self) -> &'static str {
        "Backup requires backup eligibility"
    }
}

/// Chief reserved days take precedence over call.
#[derive(Debug, Clone, Copy)]
pub struct ChiefReservedDay;

impl EligibilityRule for ChiefReservedDay {
    fn name(&self) -> &'static str {
        "CHIEF_RESERVED"
    }

    fn check(&self, candidate: &Candidate<'_>, slot: &SlotContext<'_>) -> Eligibility {
        if !candidate.person.is_chief_reserved(slot.day.date) {
            return Eligibility::Eligible;
        }
        let compatible = slot.kind.is_backup()
            && slot.config.chief_policy == ChiefReservedPolicy::BackupCompatible;
        Eligibility::unless(!compatible, IneligibleReason::ChiefReservedDay)
    }

    fn description(&self) -> &'static str {
        "Chief reserved days exclude call"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RosterConfig;
    use crate::evaluator::{RunningCounters, SlotCommit};
    use crate::models::{CalendarDay, Person, Roster, ServiceAssignment, StaffSpecialty};
    use chrono::NaiveDate;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 7, d).unwrap()
    }

    fn day(index: u32) -> CalendarDay {
        let date = date(index + 1);
        CalendarDay {
            index,
            date,
            weekday: chrono::Datelike::weekday(&date),
            is_holiday: false,
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

        fn check<R: EligibilityRule>(
            &self,
            rule: R,
            pos: usize,
            kind: ActivityKind,
            d: &CalendarDay,
        ) -> Eligibility {
            self.check_with(rule, pos, kind, d, &self.home)
        }

        fn check_with<R: EligibilityRule>(
            &self,
            rule: R,
            pos: usize,
            kind: ActivityKind,
            d: &CalendarDay,
            service: &ServiceAssignment,
        ) -> Eligibility {
            let candidate = Candidate {
                position: pos,
                person: &self.roster.people[pos],
                service,
            };
            let slot = SlotContext {
                day: d,
                kind,
                is_weekend: false,
                config: &self.config,
                counters: &self.counters,
            };
            rule.check(&candidate, &slot)
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
                is_holiday: false,
                senior_min_pgy: self.config.senior_min_pgy,
            };
            self.counters.commit(&candidate, &slot);
        }
    }

    #[test]
    fn test_role_matches_slot() {
        let f = Fixture::new(vec![
            Person::trainee("R", 3),
            Person::staff("C").with_specialty(StaffSpecialty::Cranial),
        ]);
        let d = day(0);
        assert!(f.check(RoleMatchesSlot, 0, ActivityKind::DayCall, &d).is_eligible());
        assert_eq!(
            f.check(RoleMatchesSlot, 1, ActivityKind::DayCall, &d),
            Eligibility::Ineligible(IneligibleReason::RoleMismatch)
        );
        assert!(f
            .check(RoleMatchesSlot, 1, ActivityKind::CranialStaffCall, &d)
            .is_eligible());
        assert_eq!(
            f.check(RoleMatchesSlot, 1, ActivityKind::SpineStaffCall, &d),
            Eligibility::Ineligible(IneligibleReason::MissingSpecialty(StaffSpecialty::Spine))
        );
        assert_eq!(
            f.check(RoleMatchesSlot, 0, ActivityKind::SpineStaffCall, &d),
            Eligibility::Ineligible(IneligibleReason::RoleMismatch)
        );
    }

    #[test]
    fn test_on_service() {
        let f = Fixture::new(vec![Person::trainee("R", 3)]);
        let d = day(0);
        let no_call = ServiceAssignment::OffService {
            service: "Neurology".into(),
            call_eligible: false,
        };
        let with_call = ServiceAssignment::OffService {
            service: "ICU".into(),
            call_eligible: true,
        };
        assert!(f.check(OnService, 0, ActivityKind::DayCall, &d).is_eligible());
        assert_eq!(
            f.check_with(OnService, 0, ActivityKind::DayCall, &d, &no_call),
            Eligibility::Ineligible(IneligibleReason::OffService)
        );
        assert!(f
            .check_with(OnService, 0, ActivityKind::DayCall, &d, &with_call)
            .is_eligible());
    }

    #[test]
    fn test_not_on_vacation() {
        let f = Fixture::new(vec![
            Person::trainee("R", 3).with_vacation_range(date(10), date(15))
        ]);
        assert_eq!(
            f.check(NotOnVacation, 0, ActivityKind::Backup, &day(11)),
            Eligibility::Ineligible(IneligibleReason::Vacation)
        );
        assert!(f.check(NotOnVacation, 0, ActivityKind::Backup, &day(15)).is_eligible());
    }

    #[test]
    fn test_call_cap_home_and_backup_exempt() {
        let mut f = Fixture::new(vec![Person::trainee("R", 3).with_home_call_cap(1)]);
        let d0 = day(0);
        let d3 = day(3);
        f.counters.begin_day(0);
        f.commit(0, ActivityKind::DayCall, &d0);
        f.counters.begin_day(3);
        assert_eq!(
            f.check(WithinCallCap, 0, ActivityKind::NightCall, &d3),
            Eligibility::Ineligible(IneligibleReason::CallCapReached)
        );
        assert!(f.check(WithinCallCap, 0, ActivityKind::Backup, &d3).is_eligible());
    }

    #[test]
    fn test_call_cap_off_service() {
        let f = Fixture::new(vec![Person::trainee("R", 3).off_service(true, 0)]);
        let away = ServiceAssignment::OffService {
            service: "ICU".into(),
            call_eligible: true,
        };
        assert_eq!(
            f.check_with(WithinCallCap, 0, ActivityKind::DayCall, &day(0), &away),
            Eligibility::Ineligible(IneligibleReason::CallCapReached)
        );
    }

    #[test]
    fn test_daily_call_limit_and_double_call() {
        let mut f = Fixture::new(vec![
            Person::trainee("D", 3).with_double_calls(1),
            Person::trainee("N", 3),
        ]);
        let d = day(0);
        f.counters.begin_day(0);
        f.commit(0, ActivityKind::DayCall, &d);
        f.commit(1, ActivityKind::DayCall, &d);

        // Double call disabled in config.
        assert!(!f.check(DailyCallLimit, 0, ActivityKind::Backup, &d).is_eligible());

        f.config.allow_double_call = true;
        assert!(f.check(DailyCallLimit, 0, ActivityKind::Backup, &d).is_eligible());
        assert_eq!(
            f.check(DailyCallLimit, 1, ActivityKind::Backup, &d),
            Eligibility::Ineligible(IneligibleReason::DailyCallLimit)
        );

        f.commit(0, ActivityKind::Backup, &d);
        assert!(!f.check(DailyCallLimit, 0, ActivityKind::NightCall, &d).is_eligible());
    }

    #[test]
    fn test_consecutive_limit() {
        let mut f = Fixture::new(vec![Person::trainee("R", 3)]);
        f.config.max_consecutive_call_days = 2;
        for i in 0..2 {
            let d = day(i);
            f.counters.begin_day(i);
            f.commit(0, ActivityKind::NightCall, &d);
        }
        let d2 = day(2);
        f.counters.begin_day(2);
        assert_eq!(
            f.check(ConsecutiveCallLimit, 0, ActivityKind::DayCall, &d2),
            Eligibility::Ineligible(IneligibleReason::ConsecutiveCallLimit)
        );
        assert!(f
            .check(ConsecutiveCallLimit, 0, ActivityKind::Backup, &d2)
            .is_eligible());
        assert!(f
            .check(ConsecutiveCallLimit, 0, ActivityKind::DayCall, &day(3))
            .is_eligible());
    }

    #[test]
    fn test_booked_calls_count() {
        // July 3 and 4 were assigned before this run.
        let mut f = Fixture::new(vec![Person::trainee("R", 3)
            .with_call_on(date(3))
            .with_call_on(date(4))]);
        f.config.max_consecutive_call_days = 2;

        f.counters.begin_day(2);
        assert_eq!(
            f.check(DailyCallLimit, 0, ActivityKind::NightCall, &day(2)),
            Eligibility::Ineligible(IneligibleReason::DailyCallLimit)
        );

        f.counters.begin_day(1);
        assert!(f.check(DailyCallLimit, 0, ActivityKind::DayCall, &day(1)).is_eligible());
        assert_eq!(
            f.check(ConsecutiveCallLimit, 0, ActivityKind::DayCall, &day(1)),
            Eligibility::Ineligible(IneligibleReason::ConsecutiveCallLimit)
        );
        assert!(f
            .check(ConsecutiveCallLimit, 0, ActivityKind::DayCall, &day(0))
            .is_eligible());
    }

    #[test]
    fn test_senior_supervision() {
        let mut f = Fixture::new(vec![
            Person::trainee("I", 1),
            Person::trainee("Solo", 1).with_solo_call(),
            Person::trainee("S", 5),
        ]);
        let d = day(0);
        f.counters.begin_day(0);
        assert_eq!(
            f.check(SeniorSupervision, 0, ActivityKind::DayCall, &d),
            Eligibility::Ineligible(IneligibleReason::SeniorSupervisionRequired)
        );
        assert!(f.check(SeniorSupervision, 1, ActivityKind::DayCall, &d).is_eligible());
        assert!(f.check(SeniorSupervision, 2, ActivityKind::DayCall, &d).is_eligible());

        f.commit(2, ActivityKind::DayCall, &d);
        assert!(f.check(SeniorSupervision, 0, ActivityKind::NightCall, &d).is_eligible());
    }

    #[test]
    fn test_backup_capable() {
        let f = Fixture::new(vec![Person::trainee("R", 3).with_backup(false)]);
        let d = day(0);
        assert_eq!(
            f.check(BackupCapable, 0, ActivityKind::Backup, &d),
            Eligibility::Ineligible(IneligibleReason::NotBackupCapable)
        );
        assert!(f.check(BackupCapable, 0, ActivityKind::DayCall, &d).is_eligible());
    }

    #[test]
    fn test_chief_reserved_policies() {
        let mut f = Fixture::new(vec![Person::trainee("C", 6).as_chief([date(2)])]);
        let reserved = day(1);
        assert_eq!(
            f.check(ChiefReservedDay, 0, ActivityKind::DayCall, &reserved),
            Eligibility::Ineligible(IneligibleReason::ChiefReservedDay)
        );
        assert!(!f
            .check(ChiefReservedDay, 0, ActivityKind::Backup, &reserved)
            .is_eligible());

        f.config.chief_policy = ChiefReservedPolicy::BackupCompatible;
        assert!(f
            .check(ChiefReservedDay, 0, ActivityKind::Backup, &reserved)
            .is_eligible());
        assert!(!f
            .check(ChiefReservedDay, 0, ActivityKind::NightCall, &reserved)
            .is_eligible());
        assert!(f
            .check(ChiefReservedDay, 0, ActivityKind::NightCall, &day(2))
            .is_eligible());
    }
}

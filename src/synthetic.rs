//! Seeded synthetic rosters.
//!
//! Generates plausible programs for benchmarks, demos and property-style
//! tests. The same seed always yields the same roster.
//!
//! # Shape
//!
//! - Trainees `R1..Rn` with PGY 1..=7, alternating holiday groups `A`/`B`,
//!   a home call cap of 6..=10, a few prior weekend calls, one vacation
//!   week and, for about a third of them, one off-service rotation.
//! - Staff `S1..Sm` alternating cranial and spine coverage; about half
//!   cover both.

use chrono::{Days, NaiveDate};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::models::{Person, RotationRequest, Roster, StaffSpecialty, TimingPreference};

const SERVICES: [&str; 4] = ["Neurology", "ICU", "Research", "Trauma"];
const TIMINGS: [TimingPreference; 4] = [
    TimingPreference::Early,
    TimingPreference::Mid,
    TimingPreference::Late,
    TimingPreference::Any,
];

/// Builds a roster from a seed.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use u_roster::synthetic::synthetic_roster;
///
/// let year = NaiveDate::from_ymd_opt(2026, 7, 1).unwrap();
/// let roster = synthetic_roster(42, year, 10, 3);
/// assert_eq!(roster.trainees().count(), 10);
/// assert_eq!(roster.staff().count(), 3);
/// ```
pub fn synthetic_roster(seed: u64, year_start: NaiveDate, trainees: usize, staff: usize) -> Roster {
    let mut rng = SmallRng::seed_from_u64(seed);
    random_roster(&mut rng, year_start, trainees, staff)
}

/// Builds a roster from any random source.
pub fn random_roster<R: Rng>(
    rng: &mut R,
    year_start: NaiveDate,
    trainees: usize,
    staff: usize,
) -> Roster {
    let mut people = Vec::with_capacity(trainees + staff);

    for i in 0..trainees {
        let mut p = Person::trainee(format!("R{}", i + 1), rng.random_range(1..=7))
            .with_holiday_group(if i % 2 == 0 { "A" } else { "B" })
            .with_home_call_cap(rng.random_range(6..=10))
            .with_weekend_calls(rng.random_range(0..=4));

        if let Some(from) = year_start.checked_add_days(Days::new(rng.random_range(0..350))) {
            let to = from.checked_add_days(Days::new(4)).unwrap_or(from);
            p = p.with_vacation_range(from, to);
        }
        if rng.random_bool(0.5) {
            if let Some(last) = year_start.checked_sub_days(Days::new(rng.random_range(1..=7))) {
                p = p.with_call_on(last);
            }
        }
        if rng.random_bool(0.35) {
            let service = SERVICES[rng.random_range(0..SERVICES.len())];
            let timing = TIMINGS[rng.random_range(0..TIMINGS.len())];
            let mut request =
                RotationRequest::new(service, rng.random_range(1..=3)).with_timing(timing);
            if rng.random_bool(0.3) {
                request = request.call_eligible();
                p = p.with_off_service_call_cap(rng.random_range(2..=4));
            }
            p = p.with_rotation(request);
        }
        people.push(p);
    }

    for i in 0..staff {
        let primary = if i % 2 == 0 {
            StaffSpecialty::Cranial
        } else {
            StaffSpecialty::Spine
        };
        let mut s = Person::staff(format!("S{}", i + 1)).with_specialty(primary);
        if rng.random_bool(0.5) {
            s = s
                .with_specialty(StaffSpecialty::Cranial)
                .with_specialty(StaffSpecialty::Spine);
        }
        people.push(s);
    }

    Roster::new(people)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RosterConfig;
    use crate::scheduler::{RosterRequest, RosterScheduler};
    use crate::validation::validate_request;

    fn year() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 7, 1).unwrap()
    }

    #[test]
    fn test_same_seed_same_roster() {
        let a = serde_json::to_string(&synthetic_roster(42, year(), 12, 4)).unwrap();
        let b = serde_json::to_string(&synthetic_roster(42, year(), 12, 4)).unwrap();
        let c = serde_json::to_string(&synthetic_roster(43, year(), 12, 4)).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_shape() {
        let roster = synthetic_roster(7, year(), 9, 2);
        assert_eq!(roster.len(), 11);
        for p in roster.trainees() {
            assert!(p.vacation_days.len() <= 5);
            assert!(p.rotations.len() <= 1);
            assert!(p.holiday_group.is_some());
        }
        assert!(roster.find("S1").unwrap().has_specialty(StaffSpecialty::Cranial));
        assert!(roster.find("S2").unwrap().has_specialty(StaffSpecialty::Spine));
    }

    #[test]
    fn test_valid_and_schedulable() {
        let roster = synthetic_roster(11, year(), 10, 2);
        assert!(validate_request(&roster, &RosterConfig::default()).is_ok());

        let end = NaiveDate::from_ymd_opt(2026, 9, 30).unwrap();
        let result = RosterScheduler::new()
            .schedule(&RosterRequest::new(roster, year(), end))
            .unwrap();
        assert_eq!(result.calendar.len(), 92);
        assert_eq!(result.rotation_plan.assignments.len(), 10);
        assert!(result.fairness.fill_rate > 0.0);
    }
}

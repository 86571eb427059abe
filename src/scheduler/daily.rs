//! Daily assignment engine.
//!
//! # Algorithm
//!
//! 1. Walk the window day by day in ascending order.
//! 2. Resolve each person's service for the day (rotation plan or roster flag).
//! 3. Give every person one base activity (vacation, off service, academic
//!    event, clinic, or on service).
//! 4. Fill the day's resident slots, then its staff slots, in listed order.
//!    For each slot: keep eligible candidates, rank them by fairness cost,
//!    commit the cheapest and update the running counters immediately.
//! 5. A slot with no eligible candidate becomes a day-scoped violation.
//!
//! Greedy and single-pass: no commitment is ever revisited.
//!
//! # Complexity
//! O(d * s * p * r) where d=days, s=slots/day, p=people, r=rules.

use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use crate::config::RosterConfig;
use crate::evaluator::{
    Candidate, ConstraintEvaluator, Eligibility, IneligibleReason, RunningCounters, SlotCommit,
    SlotContext,
};
use crate::models::{
    ActivityKind, Assignment, BlockCalendar, Calendar, CalendarDay, Person, Roster, RotationPlan,
    Schedule, ServiceAssignment, SlotRole, Violation, UNPLANNED_SERVICE,
};

/// Result of the day loop.
#[derive(Debug, Clone)]
pub struct DailyOutcome {
    /// Base activities, committed calls and day-scoped violations.
    pub schedule: Schedule,
    /// Counters at the end of the window.
    pub counters: RunningCounters,
}

/// Assigns call slots day by day.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use u_roster::config::RosterConfig;
/// use u_roster::models::{build_calendar, ActivityKind, Person, Roster};
/// use u_roster::scheduler::DailyAssignmentEngine;
///
/// let roster = Roster::new(vec![
///     Person::trainee("R1", 2),
///     Person::trainee("R2", 4),
///     Person::trainee("R3", 5),
/// ]);
/// let monday = NaiveDate::from_ymd_opt(2026, 7, 6).unwrap();
/// let calendar = build_calendar(monday, monday, &Default::default()).unwrap();
///
/// // Residents only: no staff call slots.
/// let config = RosterConfig::default().with_staff_slots(vec![]);
/// let outcome = DailyAssignmentEngine::new().assign(&roster, &calendar, &config, None);
/// assert!(outcome.schedule.holder_of(0, ActivityKind::DayCall).is_some());
/// assert!(outcome.schedule.violations.is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct DailyAssignmentEngine {
    evaluator: ConstraintEvaluator,
}

impl DailyAssignmentEngine {
    /// Creates an engine with the standard rule set.
    pub fn new() -> Self {
        Self {
            evaluator: ConstraintEvaluator::standard(),
        }
    }

    /// Sets a custom evaluator.
    pub fn with_evaluator(mut self, evaluator: ConstraintEvaluator) -> Self {
        self.evaluator = evaluator;
        self
    }

    /// The evaluator in use.
    pub fn evaluator(&self) -> &ConstraintEvaluator {
        &self.evaluator
    }

    /// Runs the day loop.
    ///
    /// `plan` supplies per-block service when `config.apply_rotation_plan`
    /// is set and the date falls inside the plan's academic year; otherwise
    /// each person's roster `on_service` flag applies.
    pub fn assign(
        &self,
        roster: &Roster,
        calendar: &Calendar,
        config: &RosterConfig,
        plan: Option<&RotationPlan>,
    ) -> DailyOutcome {
        let mut schedule = Schedule::new();
        let mut counters = RunningCounters::for_window(roster, calendar.start, calendar.end);
        let blocks = config.block_calendar(calendar.start);
        let plan = plan.filter(|_| config.apply_rotation_plan);

        for day in calendar.days() {
            counters.begin_day(day.index);

            let services: Vec<ServiceAssignment> = roster
                .people
                .iter()
                .map(|p| service_on(p, day, plan, &blocks))
                .collect();

            for (person, service) in roster.people.iter().zip(&services) {
                let kind = base_activity(person, service, day, config);
                schedule.add_assignment(Assignment::new(&person.id, day.index, day.date, kind));
            }

            let is_weekend = day.is_holiday || config.is_weekend(day.weekday);
            let trainee_slots = if is_weekend {
                &config.weekend_slots
            } else {
                &config.weekday_slots
            };

            let today = Today {
                roster,
                services: &services,
                day,
                is_weekend,
                config,
            };
            for &kind in trainee_slots.iter().chain(&config.staff_slots) {
                self.fill_slot(&today, kind, &mut counters, &mut schedule);
            }
        }

        info!(
            days = calendar.len(),
            people = roster.len(),
            calls = schedule.assignments.iter().filter(|a| a.is_call()).count(),
            unfilled = schedule.violations.len(),
            "daily assignment complete"
        );

        DailyOutcome { schedule, counters }
    }

    fn fill_slot(
        &self,
        today: &Today<'_>,
        kind: ActivityKind,
        counters: &mut RunningCounters,
        schedule: &mut Schedule,
    ) {
        let Today {
            roster,
            services,
            day,
            is_weekend,
            config,
        } = *today;

        let (chosen, rejections) = {
            let slot = SlotContext {
                day,
                kind,
                is_weekend,
                config,
                counters: &*counters,
            };

            let mut rejections: BTreeMap<IneligibleReason, usize> = BTreeMap::new();
            let mut eligible = Vec::new();
            for (position, (person, service)) in roster.people.iter().zip(services).enumerate() {
                let candidate = Candidate {
                    position,
                    person,
                    service,
                };
                match self.evaluator.is_eligible(&candidate, &slot) {
                    Eligibility::Eligible => eligible.push(candidate),
                    Eligibility::Ineligible(reason) => *rejections.entry(reason).or_insert(0) += 1,
                }
            }

            let chosen = self
                .evaluator
                .select_best(&eligible, &slot)
                .map(|i| (eligible[i].position, SlotCommit::from_slot(&slot)));
            (chosen, rejections)
        };

        match chosen {
            Some((position, commit)) => {
                let person = &roster.people[position];
                let candidate = Candidate {
                    position,
                    person,
                    service: &services[position],
                };
                let outcome = counters.commit(&candidate, &commit);
                debug!(
                    day = day.number(),
                    slot = %kind,
                    person = %person.id,
                    double_call = outcome.double_call,
                    holiday = outcome.holiday_coverage,
                    "slot filled"
                );
                schedule.add_assignment(Assignment::new(&person.id, day.index, day.date, kind));
            }
            None => {
                let role = match kind.slot_role() {
                    Some(SlotRole::Staff(_)) => "staff",
                    _ => "resident",
                };
                let violation = Violation::unfilled_slot(
                    day.index,
                    day.date,
                    kind,
                    format!("no eligible {role} for {kind}"),
                );
                warn!(rejections = %tally(&rejections), "{violation}");
                schedule.add_violation(violation);
            }
        }
    }
}

/// Per-day inputs shared by every slot of the day.
#[derive(Clone, Copy)]
struct Today<'a> {
    roster: &'a Roster,
    services: &'a [ServiceAssignment],
    day: &'a CalendarDay,
    is_weekend: bool,
    config: &'a RosterConfig,
}

/// Service a person holds on a day.
fn service_on(
    person: &Person,
    day: &CalendarDay,
    plan: Option<&RotationPlan>,
    blocks: &BlockCalendar,
) -> ServiceAssignment {
    if person.is_staff() {
        return ServiceAssignment::Home;
    }
    let planned = plan.and_then(|plan| {
        blocks
            .block_of(day.date)
            .and_then(|b| plan.service_for(&person.id, b))
    });
    match planned {
        Some(service) => service.clone(),
        None if person.on_service => ServiceAssignment::Home,
        None => ServiceAssignment::OffService {
            service: UNPLANNED_SERVICE.to_string(),
            call_eligible: person.off_service_call_eligible,
        },
    }
}

/// The one non-call activity for a person-day, highest priority first.
fn base_activity(
    person: &Person,
    service: &ServiceAssignment,
    day: &CalendarDay,
    config: &RosterConfig,
) -> ActivityKind {
    if person.is_on_vacation(day.date) {
        ActivityKind::Vacation
    } else if !service.is_home() {
        ActivityKind::OffService
    } else if config.academic_event_dates.contains(&day.date) {
        ActivityKind::AcademicEvent
    } else if person.clinic_days.contains(&day.weekday) {
        ActivityKind::Clinic
    } else {
        ActivityKind::OnService
    }
}

/// Renders a rejection tally, e.g. `vacation: 1, call cap: 2`.
fn tally(rejections: &BTreeMap<IneligibleReason, usize>) -> String {
    rejections
        .iter()
        .map(|(reason, n)| format!("{reason}: {n}"))
        .collect::<Vec<_>>()
        .join(", ")
}

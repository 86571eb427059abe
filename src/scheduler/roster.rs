//! End-to-end roster scheduling.
//!
//! # Pipeline
//!
//! 1. Reject empty rosters, inverted windows and invalid requests.
//! 2. Build the calendar.
//! 3. Plan the 13 rotation blocks.
//! 4. Assign days, reading on-service status from the plan.
//! 5. Merge day and block violations.
//! 6. Compute fairness KPIs.
//!
//! Every invocation owns its counters; a scheduler can be shared across
//! threads and called concurrently.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use super::{
    BlockRotationPlanner, DailyAssignmentEngine, FairnessKpi, ViolationReporter, ViolationSummary,
};
use crate::config::RosterConfig;
use crate::error::RosterError;
use crate::evaluator::ConstraintEvaluator;
use crate::models::{
    build_calendar, ActivityKind, Assignment, Calendar, Roster, RotationPlan, Schedule,
    ServiceAssignment, Violation,
};
use crate::validation::validate_request;

/// Input container for one scheduling invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterRequest {
    /// People to schedule.
    pub roster: Roster,
    /// First day of the window (inclusive).
    pub start: NaiveDate,
    /// Last day of the window (inclusive).
    pub end: NaiveDate,
    /// Rule set.
    pub config: RosterConfig,
}

impl RosterRequest {
    /// Creates a request with the default configuration.
    pub fn new(roster: Roster, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            roster,
            start,
            end,
            config: RosterConfig::default(),
        }
    }

    /// Sets the configuration.
    pub fn with_config(mut self, config: RosterConfig) -> Self {
        self.config = config;
        self
    }
}

/// The result of one invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterSchedule {
    /// The scheduled window.
    pub calendar: Calendar,
    /// Assignments, with every day and block violation in report order.
    pub schedule: Schedule,
    /// Per-person, per-block services.
    pub rotation_plan: RotationPlan,
    /// Fairness indicators.
    pub fairness: FairnessKpi,
}

impl RosterSchedule {
    /// All assignments in commit order.
    pub fn assignments(&self) -> &[Assignment] {
        &self.schedule.assignments
    }

    /// Violations, day-scoped first, then block-scoped.
    pub fn violations(&self) -> &[Violation] {
        &self.schedule.violations
    }

    /// Whether nothing was violated.
    pub fn is_valid(&self) -> bool {
        self.schedule.is_valid()
    }

    /// A person's assignments in day order.
    pub fn activities_for(&self, person_id: &str) -> Vec<&Assignment> {
        self.schedule.activities_for(person_id)
    }

    /// A person's activities on one day.
    pub fn activities_on(&self, person_id: &str, day: u32) -> Vec<ActivityKind> {
        self.schedule.activities_on(person_id, day)
    }

    /// Person → per-day activity lists over the whole window.
    pub fn activity_grid(&self) -> BTreeMap<String, Vec<Vec<ActivityKind>>> {
        self.schedule.activity_grid(self.calendar.len())
    }

    /// Service a trainee holds in a block.
    pub fn service_in(&self, person_id: &str, block: usize) -> Option<&ServiceAssignment> {
        self.rotation_plan.service_for(person_id, block)
    }

    /// Violation counts by kind.
    pub fn summary(&self) -> ViolationSummary {
        ViolationReporter::summarize(self.violations())
    }
}

/// Plans rotations and assigns call for a roster.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use u_roster::config::RosterConfig;
/// use u_roster::models::{ActivityKind, Person, Roster};
/// use u_roster::scheduler::{RosterRequest, RosterScheduler};
///
/// let roster = Roster::new(vec![
///     Person::trainee("R1", 2),
///     Person::trainee("R2", 3),
///     Person::trainee("R3", 4),
///     Person::trainee("R4", 5),
/// ]);
/// let start = NaiveDate::from_ymd_opt(2026, 7, 1).unwrap();
/// let end = NaiveDate::from_ymd_opt(2026, 7, 14).unwrap();
/// let request = RosterRequest::new(roster, start, end)
///     .with_config(RosterConfig::default().with_staff_slots(vec![]));
///
/// let result = RosterScheduler::new().schedule(&request).unwrap();
/// assert_eq!(result.calendar.len(), 14);
/// assert!(result.is_valid());
/// assert!(result.schedule.holder_of(0, ActivityKind::DayCall).is_some());
/// ```
#[derive(Debug, Clone, Default)]
pub struct RosterScheduler {
    planner: BlockRotationPlanner,
    daily: DailyAssignmentEngine,
}

impl RosterScheduler {
    /// Creates a scheduler with the standard rule set.
    pub fn new() -> Self {
        Self {
            planner: BlockRotationPlanner::new(),
            daily: DailyAssignmentEngine::new(),
        }
    }

    /// Sets a custom evaluator for the day loop.
    pub fn with_evaluator(mut self, evaluator: ConstraintEvaluator) -> Self {
        self.daily = self.daily.with_evaluator(evaluator);
        self
    }

    /// Runs the full pipeline.
    ///
    /// # Errors
    /// - [`RosterError::EmptyRoster`] when the roster has no people.
    /// - [`RosterError::InvalidRange`] when `end` precedes `start`.
    /// - [`RosterError::Validation`] with every structural problem found.
    ///
    /// Unfillable slots and headcount shortfalls are not errors; they are
    /// returned as violations.
    #[instrument(
        skip_all,
        fields(people = request.roster.len(), start = %request.start, end = %request.end)
    )]
    pub fn schedule(&self, request: &RosterRequest) -> Result<RosterSchedule, RosterError> {
        let RosterRequest {
            roster,
            start,
            end,
            config,
        } = request;

        if roster.is_empty() {
            return Err(RosterError::EmptyRoster);
        }
        let calendar = build_calendar(*start, *end, &config.holidays)?;
        validate_request(roster, config).map_err(RosterError::Validation)?;

        let rotation = self.planner.plan(roster, config);
        let daily = self
            .daily
            .assign(roster, &calendar, config, Some(&rotation.plan));

        let fairness = FairnessKpi::calculate(roster, &daily.schedule, &daily.counters);
        let violations = ViolationReporter::merge(daily.schedule.violations, rotation.violations);
        let schedule = Schedule {
            assignments: daily.schedule.assignments,
            violations,
        };

        info!(
            days = calendar.len(),
            assignments = schedule.assignment_count(),
            violations = schedule.violations.len(),
            fill_rate = fairness.fill_rate,
            "roster scheduled"
        );

        Ok(RosterSchedule {
            calendar,
            schedule,
            rotation_plan: rotation.plan,
            fairness,
        })
    }
}

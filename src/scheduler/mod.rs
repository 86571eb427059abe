//! Assignment engines, the end-to-end scheduler and fairness KPIs.
//!
//! # Algorithm
//!
//! Both engines are greedy and deterministic. They are not optimal, but
//! every decision is explainable from the rule order alone.
//!
//! - [`BlockRotationPlanner`] places off-service rotations into the 13
//!   academic blocks, most constrained requests first, preferring runs that
//!   stay inside the timing window and keep the home service staffed.
//! - [`DailyAssignmentEngine`] walks the calendar day by day and fills each
//!   call slot with the fairest eligible person.
//! - [`RosterScheduler`] chains the two and merges their violations through
//!   [`ViolationReporter`].
//!
//! # KPI
//!
//! [`FairnessKpi`] computes call spread, weekend spread, holiday coverage
//! and fill rate for a finished schedule.
//!
//! # References
//!
//! - Cheang et al. (2003), "Nurse rostering problems: a bibliographic survey"
//! - Burke et al. (2004), "The state of the art of nurse rostering"

mod daily;
mod kpi;
mod report;
mod roster;
mod rotation;

pub use daily::{DailyAssignmentEngine, DailyOutcome};
pub use kpi::{FairnessKpi, PersonLoad};
pub use report::{ViolationReporter, ViolationSummary};
pub use roster::{RosterRequest, RosterSchedule, RosterScheduler};
pub use rotation::{BlockRotationPlanner, RotationOutcome};

//! Roster scheduling domain models.
//!
//! Provides the data types for one scheduling request (roster, calendar
//! window) and its results (activity schedule, rotation plan, violations).
//!
//! # Domain Mappings
//!
//! | u-roster | Residency program |
//! |----------|-------------------|
//! | Person | Resident / Attending |
//! | CalendarDay | Date in the call window |
//! | Assignment | Call shift, clinic, vacation day |
//! | RotationPlan | Yearly block schedule |

mod activity;
mod calendar;
mod person;
mod rotation;
mod schedule;

pub use activity::{ActivityKind, Assignment, SlotRole};
pub use calendar::{build_calendar, BlockCalendar, Calendar, CalendarDay, BLOCK_COUNT};
pub use person::{Person, RotationRequest, Roster, Seniority, StaffSpecialty};
pub use rotation::{
    RotationPlan, RotationRun, ServiceAssignment, TimingPreference, TimingWindows,
    UNPLANNED_SERVICE,
};
pub use schedule::{Schedule, Violation, ViolationKind, ViolationScope};

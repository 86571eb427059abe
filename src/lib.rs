//! Residency roster scheduling.
//!
//! Plans a year of off-service rotations, assigns daily call, backup and
//! staff coverage across a date window, and reports every rule that could
//! not be satisfied.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Calendar`, `Person`, `Roster`,
//!   `RotationPlan`, `Assignment`, `Schedule`, `Violation`
//! - **`config`**: `RosterConfig`, the enumerated rule set (TOML-loadable)
//! - **`evaluator`**: Eligibility predicates and fairness ranking rules
//! - **`scheduler`**: Block rotation planner, daily assignment engine,
//!   violation reporter, fairness KPIs and the end-to-end `RosterScheduler`
//! - **`validation`**: Input integrity checks (duplicate IDs, seniority,
//!   rotation lengths, contradictory configuration)
//! - **`synthetic`**: Seeded roster generator for demos and benchmarks
//!
//! # Quick start
//!
//! ```
//! use chrono::NaiveDate;
//! use u_roster::{Person, Roster, RosterConfig, RosterRequest, RosterScheduler};
//!
//! let roster = Roster::new(vec![
//!     Person::trainee("R1", 2),
//!     Person::trainee("R2", 3),
//!     Person::trainee("R3", 4),
//!     Person::trainee("R4", 5),
//! ]);
//! let start = NaiveDate::from_ymd_opt(2026, 7, 1).unwrap();
//! let end = NaiveDate::from_ymd_opt(2026, 7, 7).unwrap();
//! let config = RosterConfig::default().with_staff_slots(vec![]);
//!
//! let result = RosterScheduler::new()
//!     .schedule(&RosterRequest::new(roster, start, end).with_config(config))
//!     .unwrap();
//! for line in u_roster::ViolationReporter::warning_lines(result.violations()) {
//!     println!("{line}");
//! }
//! ```
//!
//! # References
//!
//! - Burke et al. (2004), "The state of the art of nurse rostering"
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems"

pub mod config;
pub mod error;
pub mod evaluator;
pub mod models;
pub mod scheduler;
pub mod synthetic;
pub mod validation;

pub use config::RosterConfig;
pub use error::RosterError;
pub use models::{Person, Roster};
pub use scheduler::{RosterRequest, RosterSchedule, RosterScheduler, ViolationReporter};

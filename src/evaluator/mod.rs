//! Constraint evaluator: eligibility predicates and fairness ranking.
//!
//! Answers two questions for a candidate and a slot:
//! - **is this legal?**: an ordered list of [`EligibilityRule`]s, first
//!   failure wins;
//! - **how fair is it?**: an ordered list of [`FairnessRule`]s whose scores
//!   rank otherwise-eligible candidates.
//!
//! Rules are data, not branches: the assignment loops only call
//! [`ConstraintEvaluator::is_eligible`] and [`ConstraintEvaluator::cost`].
//!
//! # Usage
//!
//! ```
//! use u_roster::evaluator::{eligibility, fairness, ConstraintEvaluator};
//!
//! let evaluator = ConstraintEvaluator::new()
//!     .with_eligibility_rule(eligibility::NotOnVacation)
//!     .with_eligibility_rule(eligibility::WithinCallCap)
//!     .with_fairness_rule(fairness::CallLoad)
//!     .with_fairness_rule(fairness::CallRecency);
//! assert_eq!(evaluator.eligibility_rule_names(), vec!["NOT_ON_VACATION", "WITHIN_CALL_CAP"]);
//! ```

mod context;
pub mod eligibility;
mod engine;
pub mod fairness;

pub use context::{
    Candidate, CommitOutcome, PersonCounters, RunningCounters, SlotCommit, SlotContext,
};
pub use engine::{ConstraintEvaluator, EvaluationMode, FairnessCost};

use std::fmt::{self, Debug};

use crate::models::StaffSpecialty;

/// Score returned by a fairness rule.
///
/// Lower scores = preferred candidate.
pub type RuleScore = f64;

/// Why a candidate cannot take a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IneligibleReason {
    /// Slot is for trainees and the person is staff, or vice versa.
    RoleMismatch,
    /// Staff member lacks the slot's specialty tag.
    MissingSpecialty(StaffSpecialty),
    /// Off service on a rotation that does not permit call.
    OffService,
    /// Blocked vacation day.
    Vacation,
    /// Home or off-service call cap reached.
    CallCapReached,
    /// Already at the per-day call limit.
    DailyCallLimit,
    /// Would exceed the consecutive call limit.
    ConsecutiveCallLimit,
    /// First-year trainee with no senior on call.
    SeniorSupervisionRequired,
    /// Not allowed to serve as backup.
    NotBackupCapable,
    /// Chief's reserved day.
    ChiefReservedDay,
}

impl IneligibleReason {
    /// Short label for rejection tallies.
    pub fn label(&self) -> &'static str {
        match self {
            Self::RoleMismatch => "role",
            Self::MissingSpecialty(_) => "specialty",
            Self::OffService => "off service",
            Self::Vacation => "vacation",
            Self::CallCapReached => "call cap",
            Self::DailyCallLimit => "already on call",
            Self::ConsecutiveCallLimit => "consecutive calls",
            Self::SeniorSupervisionRequired => "needs senior",
            Self::NotBackupCapable => "not backup",
            Self::ChiefReservedDay => "chief day",
        }
    }
}

impl fmt::Display for IneligibleReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Outcome of an eligibility check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eligibility {
    /// The candidate may take the slot.
    Eligible,
    /// The candidate may not take the slot.
    Ineligible(IneligibleReason),
}

impl Eligibility {
    /// Whether the candidate is eligible.
    #[inline]
    pub fn is_eligible(&self) -> bool {
        matches!(self, Self::Eligible)
    }

    /// `Ineligible(reason)` when `blocked`, else `Eligible`.
    #[inline]
    pub fn unless(blocked: bool, reason: IneligibleReason) -> Self {
        if blocked {
            Self::Ineligible(reason)
        } else {
            Self::Eligible
        }
    }
}

/// A hard eligibility predicate.
pub trait EligibilityRule: Send + Sync + Debug {
    /// Rule name (e.g., "ON_SERVICE").
    fn name(&self) -> &'static str;

    /// Checks whether the candidate may take the slot.
    fn check(&self, candidate: &Candidate<'_>, slot: &SlotContext<'_>) -> Eligibility;

    /// Rule description.
    fn description(&self) -> &'static str {
        self.name()
    }
}

/// A soft fairness criterion.
///
/// # Score Convention
/// **Lower score = preferred.** Rules return smaller values for candidates
/// who should take the slot first.
pub trait FairnessRule: Send + Sync + Debug {
    /// Rule name (e.g., "CALL_LOAD").
    fn name(&self) -> &'static str;

    /// Scores the candidate for the slot.
    fn evaluate(&self, candidate: &Candidate<'_>, slot: &SlotContext<'_>) -> RuleScore;

    /// Rule description.
    fn description(&self) -> &'static str {
        self.name()
    }
}

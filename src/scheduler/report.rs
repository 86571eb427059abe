//! Violation reporting.
//!
//! Merges day-scoped and block-scoped violations into one ordered list:
//! day violations first by day index, then block violations by block index.
//! The sort is stable, so violations sharing a scope keep their detection
//! order. Nothing is deduplicated.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::{ActivityKind, Violation, ViolationKind};

/// Violation counts by kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViolationSummary {
    /// All violations.
    pub total: usize,
    /// Unfilled call slots, per slot kind.
    pub unfilled_slots: BTreeMap<ActivityKind, usize>,
    /// Blocks below the home headcount minimum.
    pub home_headcount: usize,
    /// Blocks below the senior headcount minimum.
    pub senior_headcount: usize,
    /// Rotations with no legal placement.
    pub unplaceable_rotations: usize,
    /// Domain-specific violations.
    pub custom: usize,
}

impl ViolationSummary {
    /// Whether nothing was violated.
    pub fn is_clean(&self) -> bool {
        self.total == 0
    }

    /// Total unfilled slots across kinds.
    pub fn unfilled_total(&self) -> usize {
        self.unfilled_slots.values().sum()
    }
}

/// Orders and summarizes violations.
#[derive(Debug, Clone, Copy, Default)]
pub struct ViolationReporter;

impl ViolationReporter {
    /// Concatenates daily then rotation violations and sorts by scope.
    pub fn merge(daily: Vec<Violation>, rotation: Vec<Violation>) -> Vec<Violation> {
        let mut all = daily;
        all.extend(rotation);
        all.sort_by(Violation::cmp_scope);
        all
    }

    /// Counts violations by kind.
    pub fn summarize(violations: &[Violation]) -> ViolationSummary {
        let mut summary = ViolationSummary {
            total: violations.len(),
            ..ViolationSummary::default()
        };
        for v in violations {
            match &v.kind {
                ViolationKind::UnfilledSlot(kind) => {
                    *summary.unfilled_slots.entry(*kind).or_insert(0) += 1;
                }
                ViolationKind::HomeHeadcount => summary.home_headcount += 1,
                ViolationKind::SeniorHeadcount => summary.senior_headcount += 1,
                ViolationKind::RotationUnplaceable => summary.unplaceable_rotations += 1,
                ViolationKind::Custom(_) => summary.custom += 1,
            }
        }
        summary
    }

    /// One warning line per violation, in list order.
    pub fn warning_lines(violations: &[Violation]) -> Vec<String> {
        violations.iter().map(|v| format!("WARNING: {v}")).collect()
    }
}

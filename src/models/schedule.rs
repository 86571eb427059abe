//! Schedule (solution) model.
//!
//! A schedule is the complete set of activity assignments for one window,
//! together with every constraint the engine could not satisfy.
//! Violations are recorded, never fatal.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{ActivityKind, Assignment};

/// A day-indexed activity schedule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    /// Committed assignments, in commit order.
    pub assignments: Vec<Assignment>,
    /// Constraint violations detected while building the schedule.
    pub violations: Vec<Violation>,
}

/// Where a violation applies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViolationScope {
    /// One day of the window.
    Day {
        /// Day index (0-based).
        index: u32,
        /// Calendar date.
        date: NaiveDate,
    },
    /// One rotation block.
    Block {
        /// Block index (0-based).
        index: usize,
    },
}

impl ViolationScope {
    /// Sort key: day violations first, then blocks, each by index.
    fn sort_key(&self) -> (u8, u64) {
        match self {
            Self::Day { index, .. } => (0, *index as u64),
            Self::Block { index } => (1, *index as u64),
        }
    }
}

impl fmt::Display for ViolationScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Day { index, date } => write!(f, "Day {} ({date})", index + 1),
            Self::Block { index } => write!(f, "Block {}", index + 1),
        }
    }
}

/// Rule that a violation breaks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViolationKind {
    /// A required call slot had no eligible candidate.
    UnfilledSlot(ActivityKind),
    /// Home-service headcount below the minimum.
    HomeHeadcount,
    /// Senior headcount below the minimum.
    SeniorHeadcount,
    /// A mandatory rotation found no legal contiguous run.
    RotationUnplaceable,
    /// Domain-specific violation.
    Custom(String),
}

/// A constraint violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Day or block the violation applies to.
    pub scope: ViolationScope,
    /// Broken rule.
    pub kind: ViolationKind,
    /// Human-readable description, prefixed with the scope.
    pub message: String,
}

impl Violation {
    fn new(scope: ViolationScope, kind: ViolationKind, detail: impl fmt::Display) -> Self {
        let message = format!("{scope}: {detail}");
        Self {
            scope,
            kind,
            message,
        }
    }

    /// A required slot left empty.
    pub fn unfilled_slot(
        index: u32,
        date: NaiveDate,
        kind: ActivityKind,
        detail: impl fmt::Display,
    ) -> Self {
        Self::new(
            ViolationScope::Day { index, date },
            ViolationKind::UnfilledSlot(kind),
            detail,
        )
    }

    /// Too few people on the home service in a block.
    pub fn home_headcount(block: usize, required: usize, actual: usize) -> Self {
        Self::new(
            ViolationScope::Block { index: block },
            ViolationKind::HomeHeadcount,
            format!("fewer than {required} on service ({actual})"),
        )
    }

    /// Too few seniors on the home service in a block.
    pub fn senior_headcount(block: usize, required: usize, actual: usize) -> Self {
        Self::new(
            ViolationScope::Block { index: block },
            ViolationKind::SeniorHeadcount,
            format!("fewer than {required} seniors on service ({actual})"),
        )
    }

    /// A rotation with no legal placement.
    pub fn rotation_unplaceable(block: usize, detail: impl fmt::Display) -> Self {
        Self::new(
            ViolationScope::Block { index: block },
            ViolationKind::RotationUnplaceable,
            detail,
        )
    }

    /// Ordering by scope only; used for stable report sorting.
    pub fn cmp_scope(&self, other: &Self) -> Ordering {
        self.scope.sort_key().cmp(&other.scope.sort_key())
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl Schedule {
    /// Creates an empty schedule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an assignment.
    pub fn add_assignment(&mut self, assignment: Assignment) {
        self.assignments.push(assignment);
    }

    /// Adds a violation.
    pub fn add_violation(&mut self, violation: Violation) {
        self.violations.push(violation);
    }

    /// Whether the schedule has no violations.
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    /// Number of assignments.
    pub fn assignment_count(&self) -> usize {
        self.assignments.len()
    }

    /// All assignments for a person, in day order.
    pub fn activities_for(&self, person_id: &str) -> Vec<&Assignment> {
        let mut out: Vec<&Assignment> = self
            .assignments
            .iter()
            .filter(|a| a.person_id == person_id)
            .collect();
        out.sort_by_key(|a| a.day);
        out
    }

    /// Activities of a person on one day.
    pub fn activities_on(&self, person_id: &str, day: u32) -> Vec<ActivityKind> {
        self.assignments
            .iter()
            .filter(|a| a.person_id == person_id && a.day == day)
            .map(|a| a.kind)
            .collect()
    }

    /// Call assignments for a day, in commit order.
    pub fn calls_on(&self, day: u32) -> Vec<&Assignment> {
        self.assignments
            .iter()
            .filter(|a| a.day == day && a.is_call())
            .collect()
    }

    /// Who holds a call slot on a day.
    pub fn holder_of(&self, day: u32, kind: ActivityKind) -> Option<&str> {
        self.assignments
            .iter()
            .find(|a| a.day == day && a.kind == kind)
            .map(|a| a.person_id.as_str())
    }

    /// Person → day-indexed activity lists over `days` days.
    pub fn activity_grid(&self, days: usize) -> BTreeMap<String, Vec<Vec<ActivityKind>>> {
        let mut grid: BTreeMap<String, Vec<Vec<ActivityKind>>> = BTreeMap::new();
        for a in &self.assignments {
            let row = grid
                .entry(a.person_id.clone())
                .or_insert_with(|| vec![Vec::new(); days]);
            if let Some(cell) = row.get_mut(a.day as usize) {
                cell.push(a.kind);
            }
        }
        grid
    }

    /// Number of call slots a person holds.
    pub fn call_count(&self, person_id: &str) -> usize {
        self.assignments
            .iter()
            .filter(|a| a.person_id == person_id && a.is_call())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 7, d).unwrap()
    }

    fn sample_schedule() -> Schedule {
        let mut s = Schedule::new();
        s.add_assignment(Assignment::new("R1", 0, date(1), ActivityKind::OnService));
        s.add_assignment(Assignment::new("R1", 0, date(1), ActivityKind::DayCall));
        s.add_assignment(Assignment::new("R2", 0, date(1), ActivityKind::NightCall));
        s.add_assignment(Assignment::new("R1", 1, date(2), ActivityKind::Vacation));
        s
    }

    #[test]
    fn test_queries() {
        let s = sample_schedule();
        assert_eq!(s.assignment_count(), 4);
        assert_eq!(s.activities_for("R1").len(), 3);
        assert_eq!(
            s.activities_on("R1", 0),
            vec![ActivityKind::OnService, ActivityKind::DayCall]
        );
        assert_eq!(s.calls_on(0).len(), 2);
        assert_eq!(s.holder_of(0, ActivityKind::NightCall), Some("R2"));
        assert_eq!(s.holder_of(1, ActivityKind::NightCall), None);
        assert_eq!(s.call_count("R1"), 1);
    }

    #[test]
    fn test_activity_grid() {
        let s = sample_schedule();
        let grid = s.activity_grid(2);
        assert_eq!(grid["R1"][1], vec![ActivityKind::Vacation]);
        assert!(grid["R2"][1].is_empty());
    }

    #[test]
    fn test_violation_messages() {
        let v = Violation::unfilled_slot(
            4,
            date(5),
            ActivityKind::NightCall,
            "no eligible resident for Night Call",
        );
        assert_eq!(
            v.message,
            "Day 5 (2026-07-05): no eligible resident for Night Call"
        );
        assert_eq!(v.kind, ViolationKind::UnfilledSlot(ActivityKind::NightCall));

        let h = Violation::home_headcount(2, 4, 3);
        assert_eq!(h.message, "Block 3: fewer than 4 on service (3)");
        assert_eq!(h.scope, ViolationScope::Block { index: 2 });
    }

    #[test]
    fn test_scope_ordering() {
        let day9 = Violation::unfilled_slot(9, date(10), ActivityKind::Backup, "x");
        let block0 = Violation::home_headcount(0, 2, 1);
        let day1 = Violation::unfilled_slot(1, date(2), ActivityKind::Backup, "x");
        assert_eq!(day1.cmp_scope(&day9), Ordering::Less);
        assert_eq!(day9.cmp_scope(&block0), Ordering::Less);
    }

    #[test]
    fn test_validity() {
        let mut s = sample_schedule();
        assert!(s.is_valid());
        s.add_violation(Violation::senior_headcount(0, 1, 0));
        assert!(!s.is_valid());
    }
}

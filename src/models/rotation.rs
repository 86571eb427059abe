//! Block rotation model.
//!
//! The academic year is cut into 13 blocks. Every trainee holds exactly one
//! service per block: the home service or a named off-service rotation.
//! Block numbers in text are 1-based; indices in code are 0-based.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::BLOCK_COUNT;

/// Service name for trainees marked off service outside any planned rotation.
pub const UNPLANNED_SERVICE: &str = "Off service";

/// Requested placement window for an off-service rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimingPreference {
    /// Early in the year.
    Early,
    /// Middle of the year.
    Mid,
    /// Late in the year.
    Late,
    /// No preference.
    #[default]
    Any,
}

/// 1-based inclusive block ranges for each timing preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingWindows {
    /// Early window, default blocks 1–4.
    pub early: (u8, u8),
    /// Mid window, default blocks 5–9.
    pub mid: (u8, u8),
    /// Late window, default blocks 10–13.
    pub late: (u8, u8),
}

impl Default for TimingWindows {
    fn default() -> Self {
        Self {
            early: (1, 4),
            mid: (5, 9),
            late: (10, 13),
        }
    }
}

impl TimingWindows {
    /// 1-based inclusive bounds for a preference.
    pub fn bounds(&self, timing: TimingPreference) -> (u8, u8) {
        match timing {
            TimingPreference::Early => self.early,
            TimingPreference::Mid => self.mid,
            TimingPreference::Late => self.late,
            TimingPreference::Any => (1, BLOCK_COUNT as u8),
        }
    }

    /// Whether a 0-based run `[start, start + len)` lies inside the window.
    pub fn contains_run(&self, timing: TimingPreference, start: usize, len: usize) -> bool {
        let (lo, hi) = self.bounds(timing);
        let first = start + 1;
        let last = start + len;
        first >= lo as usize && last <= hi as usize
    }

    /// Distance (in blocks) from a run start to the window start.
    pub fn distance(&self, timing: TimingPreference, start: usize) -> usize {
        let lo = self.bounds(timing).0 as usize;
        (start + 1).abs_diff(lo)
    }
}

/// Service held during one block.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ServiceAssignment {
    /// Home service.
    #[default]
    Home,
    /// External rotation.
    OffService {
        /// Service name.
        service: String,
        /// Whether home call is still permitted.
        call_eligible: bool,
    },
}

impl ServiceAssignment {
    /// Whether this is the home service.
    pub fn is_home(&self) -> bool {
        matches!(self, Self::Home)
    }

    /// Whether home call is permitted during this assignment.
    pub fn permits_call(&self) -> bool {
        match self {
            Self::Home => true,
            Self::OffService { call_eligible, .. } => *call_eligible,
        }
    }
}

/// A contiguous run of blocks on one off-service rotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotationRun {
    /// Service name.
    pub service: String,
    /// First block (0-based).
    pub start: usize,
    /// Number of blocks.
    pub len: usize,
}

impl RotationRun {
    /// Blocks covered by the run.
    pub fn blocks(&self) -> std::ops::Range<usize> {
        self.start..self.start + self.len
    }
}

/// Per-person, per-block service assignments for one academic year.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RotationPlan {
    /// Person id → one entry per block.
    pub assignments: BTreeMap<String, Vec<ServiceAssignment>>,
}

impl RotationPlan {
    /// Creates an empty plan.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a person with every block on the home service.
    pub fn add_person(&mut self, person_id: impl Into<String>) {
        self.assignments
            .insert(person_id.into(), vec![ServiceAssignment::Home; BLOCK_COUNT]);
    }

    /// Adds a person who is off service for the whole year.
    pub fn add_person_off_service(&mut self, person_id: impl Into<String>, call_eligible: bool) {
        let away = ServiceAssignment::OffService {
            service: UNPLANNED_SERVICE.to_string(),
            call_eligible,
        };
        self.assignments.insert(person_id.into(), vec![away; BLOCK_COUNT]);
    }

    /// Service held by a person in a block.
    pub fn service_for(&self, person_id: &str, block: usize) -> Option<&ServiceAssignment> {
        self.assignments.get(person_id).and_then(|b| b.get(block))
    }

    /// Whether a person's blocks in `[start, start + len)` are all home.
    pub fn is_free(&self, person_id: &str, start: usize, len: usize) -> bool {
        match self.assignments.get(person_id) {
            Some(blocks) => {
                start + len <= blocks.len()
                    && blocks[start..start + len]
                        .iter()
                        .all(ServiceAssignment::is_home)
            }
            None => false,
        }
    }

    /// Places a run; the caller checks [`Self::is_free`] first.
    pub fn place(&mut self, person_id: &str, run: &RotationRun, call_eligible: bool) {
        if let Some(blocks) = self.assignments.get_mut(person_id) {
            for b in run.blocks() {
                if let Some(slot) = blocks.get_mut(b) {
                    *slot = ServiceAssignment::OffService {
                        service: run.service.clone(),
                        call_eligible,
                    };
                }
            }
        }
    }

    /// People on the home service in a block.
    pub fn on_service_in(&self, block: usize) -> impl Iterator<Item = &str> {
        self.assignments
            .iter()
            .filter(move |(_, blocks)| blocks.get(block).is_some_and(ServiceAssignment::is_home))
            .map(|(id, _)| id.as_str())
    }

    /// Home-service headcount in a block.
    pub fn home_headcount(&self, block: usize) -> usize {
        self.on_service_in(block).count()
    }

    /// Contiguous off-service runs for a person, in block order.
    pub fn runs_for(&self, person_id: &str) -> Vec<RotationRun> {
        let mut runs: Vec<RotationRun> = Vec::new();
        let Some(blocks) = self.assignments.get(person_id) else {
            return runs;
        };
        for (b, assignment) in blocks.iter().enumerate() {
            let ServiceAssignment::OffService { service, .. } = assignment else {
                continue;
            };
            match runs.last_mut() {
                Some(last) if last.service == *service && last.start + last.len == b => {
                    last.len += 1;
                }
                _ => runs.push(RotationRun {
                    service: service.clone(),
                    start: b,
                    len: 1,
                }),
            }
        }
        runs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timing_windows_default() {
        let w = TimingWindows::default();
        assert_eq!(w.bounds(TimingPreference::Early), (1, 4));
        assert_eq!(w.bounds(TimingPreference::Any), (1, 13));
        assert!(w.contains_run(TimingPreference::Early, 0, 4));
        assert!(!w.contains_run(TimingPreference::Early, 2, 3)); // blocks 3..=5
        assert!(w.contains_run(TimingPreference::Late, 11, 2));
        assert_eq!(w.distance(TimingPreference::Mid, 2), 2);
    }

    #[test]
    fn test_plan_place_and_runs() {
        let mut plan = RotationPlan::new();
        plan.add_person("R1");
        let run = RotationRun {
            service: "Neurology".into(),
            start: 3,
            len: 2,
        };
        assert!(plan.is_free("R1", 3, 2));
        plan.place("R1", &run, false);

        assert!(!plan.is_free("R1", 4, 1));
        assert!(plan.is_free("R1", 5, 8));
        assert!(!plan.is_free("R1", 12, 2)); // past the year
        assert_eq!(plan.runs_for("R1"), vec![run]);
        assert_eq!(plan.home_headcount(3), 0);
        assert_eq!(plan.home_headcount(2), 1);
        assert!(!plan.service_for("R1", 3).unwrap().permits_call());
    }

    #[test]
    fn test_adjacent_runs_of_different_services() {
        let mut plan = RotationPlan::new();
        plan.add_person("R1");
        let a = RotationRun {
            service: "A".into(),
            start: 0,
            len: 2,
        };
        let b = RotationRun {
            service: "B".into(),
            start: 2,
            len: 1,
        };
        plan.place("R1", &a, true);
        plan.place("R1", &b, false);

        let runs = plan.runs_for("R1");
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].len, 2);
        assert_eq!(runs[1].service, "B");
        assert!(plan.service_for("R1", 1).unwrap().permits_call());
    }
}

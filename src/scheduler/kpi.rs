//! Fairness metrics (KPIs).
//!
//! Summarizes how evenly a finished schedule spreads call.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Calls | Non-backup call slots per person in the window |
//! | Weekend Calls | Calls on weekend days and holidays in the window |
//! | Backups | Backup slots per person |
//! | Double Calls | Days a person held two call slots |
//! | Holiday Coverage | Holidays covered per holiday group |
//! | Call Spread | max - min trainee calls |
//! | Fill Rate | Filled call slots / required call slots |

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::evaluator::RunningCounters;
use crate::models::{Roster, Schedule, ViolationKind};

/// One person's load in the window.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonLoad {
    /// Non-backup call slots.
    pub calls: u32,
    /// Weekend and holiday calls taken in the window.
    pub weekend_calls: u32,
    /// Backup slots.
    pub backups: u32,
    /// Double-call days.
    pub double_calls: u32,
    /// Holidays covered.
    pub holiday_calls: u32,
}

/// Schedule fairness indicators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FairnessKpi {
    /// Per-person load, keyed by person id.
    pub per_person: BTreeMap<String, PersonLoad>,
    /// Holidays covered per holiday group.
    pub holiday_groups: BTreeMap<String, u32>,
    /// Largest minus smallest trainee call count.
    pub call_spread: u32,
    /// Largest minus smallest trainee weekend call count.
    pub weekend_spread: u32,
    /// Fraction of required call slots that were filled (0.0..=1.0).
    pub fill_rate: f64,
}

impl FairnessKpi {
    /// Computes KPIs from a finished day loop.
    ///
    /// # Arguments
    /// * `roster` - The scheduled roster (for seeds and roles).
    /// * `schedule` - Committed assignments and their violations.
    /// * `counters` - Counters at the end of the window.
    pub fn calculate(roster: &Roster, schedule: &Schedule, counters: &RunningCounters) -> Self {
        let per_person: BTreeMap<String, PersonLoad> = roster
            .people
            .iter()
            .zip(counters.people())
            .map(|(p, c)| {
                let load = PersonLoad {
                    calls: c.window_calls(),
                    weekend_calls: c.weekend_calls.saturating_sub(p.weekend_calls),
                    backups: c.backups,
                    double_calls: c.double_calls_used,
                    holiday_calls: c.holiday_calls,
                };
                (p.id.clone(), load)
            })
            .collect();

        let trainee_loads: Vec<&PersonLoad> = roster
            .trainees()
            .filter_map(|p| per_person.get(&p.id))
            .collect();
        let call_spread = spread(&trainee_loads, |l| l.calls);
        let weekend_spread = spread(&trainee_loads, |l| l.weekend_calls);

        let filled = schedule.assignments.iter().filter(|a| a.is_call()).count();
        let unfilled = schedule
            .violations
            .iter()
            .filter(|v| matches!(v.kind, ViolationKind::UnfilledSlot(_)))
            .count();
        let fill_rate = if filled + unfilled == 0 {
            1.0
        } else {
            filled as f64 / (filled + unfilled) as f64
        };

        Self {
            per_person,
            holiday_groups: counters.holiday_groups().clone(),
            call_spread,
            weekend_spread,
            fill_rate,
        }
    }

    /// Whether the schedule meets the given fairness thresholds.
    pub fn meets_thresholds(&self, max_call_spread: u32, min_fill_rate: f64) -> bool {
        self.call_spread <= max_call_spread && self.fill_rate >= min_fill_rate
    }
}

/// Largest minus smallest value of `metric`; zero when empty.
fn spread(loads: &[&PersonLoad], metric: impl Fn(&PersonLoad) -> u32) -> u32 {
    let values = loads.iter().map(|l| metric(l));
    let max = values.clone().max().unwrap_or(0);
    let min = values.min().unwrap_or(0);
    max - min
}

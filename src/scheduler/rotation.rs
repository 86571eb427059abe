//! Block rotation planner.
//!
//! Places every trainee's off-service rotation requests into the 13-block
//! year, then checks per-block headcount minimums.
//!
//! # Algorithm
//!
//! 1. Seed the plan: every trainee on the home service for all blocks
//!    (trainees flagged off service hold an unplanned off-service year).
//! 2. Order requests: window-constrained before `Any`, longer before
//!    shorter, then roster position, then request order.
//! 3. For each request, enumerate contiguous free runs and keep the best by
//!    (inside the timing window, fewest new headcount shortfalls, smallest
//!    senior/junior parity deviation, distance to the window start).
//! 4. A request with no free run is reported as unplaceable.
//! 5. Check home and senior headcount per block.
//!
//! Greedy single pass: placements are never revisited.

use std::cmp::Reverse;
use std::collections::BTreeSet;

use tracing::{debug, info, warn};

use crate::config::RosterConfig;
use crate::models::{
    Person, Roster, RotationPlan, RotationRequest, RotationRun, TimingPreference, Violation,
    BLOCK_COUNT,
};

/// Result of rotation planning.
#[derive(Debug, Clone, PartialEq)]
pub struct RotationOutcome {
    /// Per-person, per-block services.
    pub plan: RotationPlan,
    /// Unplaceable rotations and headcount shortfalls.
    pub violations: Vec<Violation>,
}

/// Candidate ranking key; lower is better.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct RunScore {
    outside_window: bool,
    new_shortfalls: usize,
    parity: usize,
    distance: usize,
    start: usize,
}

/// Greedy 13-block rotation planner.
///
/// # Example
///
/// ```
/// use u_roster::config::RosterConfig;
/// use u_roster::models::{Person, Roster, RotationRequest, TimingPreference};
/// use u_roster::scheduler::BlockRotationPlanner;
///
/// let roster = Roster::new(vec![
///     Person::trainee("R1", 3).with_rotation(
///         RotationRequest::new("Neurology", 2).with_timing(TimingPreference::Late),
///     ),
///     Person::trainee("R2", 5),
/// ]);
/// let outcome = BlockRotationPlanner::new().plan(&roster, &RosterConfig::default());
///
/// let runs = outcome.plan.runs_for("R1");
/// assert_eq!(runs.len(), 1);
/// assert_eq!(runs[0].start, 9); // block 10
/// assert!(outcome.violations.is_empty());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockRotationPlanner;

impl BlockRotationPlanner {
    /// Creates a planner.
    pub fn new() -> Self {
        Self
    }

    /// Builds the rotation plan for a roster.
    pub fn plan(&self, roster: &Roster, config: &RosterConfig) -> RotationOutcome {
        let mut plan = RotationPlan::new();
        let mut violations = Vec::new();

        for p in roster.trainees() {
            if p.on_service {
                plan.add_person(&p.id);
            } else {
                plan.add_person_off_service(&p.id, p.off_service_call_eligible);
            }
        }

        let seniors: BTreeSet<&str> = roster
            .trainees()
            .filter(|p| p.is_senior(config.senior_min_pgy))
            .map(|p| p.id.as_str())
            .collect();

        for (person, request) in ordered_requests(roster) {
            let len = request.duration_blocks as usize;
            let best = (0..=BLOCK_COUNT.saturating_sub(len))
                .filter(|&start| len > 0 && plan.is_free(&person.id, start, len))
                .map(|start| score_run(&plan, &seniors, config, person, request, start))
                .min();

            match best {
                Some(score) => {
                    let run = RotationRun {
                        service: request.service.clone(),
                        start: score.start,
                        len,
                    };
                    debug!(
                        person = %person.id,
                        service = %run.service,
                        first_block = run.start + 1,
                        blocks = len,
                        in_window = !score.outside_window,
                        "rotation placed"
                    );
                    plan.place(&person.id, &run, request.call_eligible);
                }
                None => {
                    let first = config.timing_windows.bounds(request.timing).0 as usize;
                    let violation = Violation::rotation_unplaceable(
                        first.saturating_sub(1),
                        format!(
                            "no contiguous {len}-block run for {} ({})",
                            request.service, person.id
                        ),
                    );
                    warn!("{violation}");
                    violations.push(violation);
                }
            }
        }

        for block in 0..BLOCK_COUNT {
            let home = plan.home_headcount(block);
            if home < config.min_home_headcount {
                let violation = Violation::home_headcount(block, config.min_home_headcount, home);
                warn!("{violation}");
                violations.push(violation);
            }

            let senior_home = plan
                .on_service_in(block)
                .filter(|id| seniors.contains(id))
                .count();
            if senior_home < config.min_senior_headcount {
                let violation =
                    Violation::senior_headcount(block, config.min_senior_headcount, senior_home);
                warn!("{violation}");
                violations.push(violation);
            }
        }

        info!(
            trainees = plan.assignments.len(),
            violations = violations.len(),
            "rotation plan complete"
        );

        RotationOutcome { plan, violations }
    }
}

/// Requests in placement order.
fn ordered_requests(roster: &Roster) -> Vec<(&Person, &RotationRequest)> {
    let mut requests: Vec<(usize, usize, &Person, &RotationRequest)> = roster
        .people
        .iter()
        .enumerate()
        .filter(|(_, p)| p.is_trainee())
        .flat_map(|(pos, p)| {
            p.rotations
                .iter()
                .enumerate()
                .map(move |(i, r)| (pos, i, p, r))
        })
        .collect();

    requests.sort_by_key(|&(pos, i, _, r)| {
        (
            r.timing == TimingPreference::Any,
            Reverse(r.duration_blocks),
            pos,
            i,
        )
    });
    requests.into_iter().map(|(_, _, p, r)| (p, r)).collect()
}

/// Ranks placing `request` at `start`.
fn score_run(
    plan: &RotationPlan,
    seniors: &BTreeSet<&str>,
    config: &RosterConfig,
    person: &Person,
    request: &RotationRequest,
    start: usize,
) -> RunScore {
    let len = request.duration_blocks as usize;
    let run = start..start + len;
    let is_senior = seniors.contains(person.id.as_str());

    let mut new_shortfalls = 0;
    let mut parity = 0;
    for block in 0..BLOCK_COUNT {
        let (mut s, mut j) = plan.on_service_in(block).fold((0usize, 0usize), |(s, j), id| {
            if seniors.contains(id) {
                (s + 1, j)
            } else {
                (s, j + 1)
            }
        });

        if run.contains(&block) {
            let home = s + j;
            if config.min_home_headcount > 0 && home == config.min_home_headcount {
                new_shortfalls += 1;
            }
            if is_senior {
                if config.min_senior_headcount > 0 && s == config.min_senior_headcount {
                    new_shortfalls += 1;
                }
                s = s.saturating_sub(1);
            } else {
                j = j.saturating_sub(1);
            }
        }
        parity += s.abs_diff(j);
    }

    RunScore {
        outside_window: !config
            .timing_windows
            .contains_run(request.timing, start, len),
        new_shortfalls,
        parity,
        distance: config.timing_windows.distance(request.timing, start),
        start,
    }
}

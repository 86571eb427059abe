//! Constraint evaluator combining eligibility and fairness rules.
//!
//! Eligibility rules run in order and the first failure wins. Fairness
//! rules produce a cost vector compared lexicographically (sequential mode)
//! or summed with weights (weighted mode); roster position breaks the
//! remaining ties.
//!
//! # Reference
//! Haupt (1989), "A Survey of Priority Rule-Based Scheduling"

use std::cmp::Ordering;
use std::sync::Arc;

use super::{
    eligibility, fairness, Candidate, Eligibility, EligibilityRule, FairnessRule, RuleScore,
    SlotContext,
};

/// How fairness rules are combined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EvaluationMode {
    /// Compare rules in sequence; use the next rule only on ties.
    #[default]
    Sequential,
    /// Compare the weighted sum of all rule scores.
    Weighted,
}

#[derive(Clone)]
struct WeightedRule {
    rule: Arc<dyn FairnessRule>,
    weight: f64,
}

/// Comparable fairness cost of one candidate for one slot.
///
/// Ordered by `scores` (lexicographically) and then by roster `position`,
/// so two distinct candidates never compare equal.
#[derive(Debug, Clone)]
pub struct FairnessCost {
    /// Per-rule scores, or a single weighted sum.
    pub scores: Vec<RuleScore>,
    /// Roster position.
    pub position: usize,
}

impl Ord for FairnessCost {
    fn cmp(&self, other: &Self) -> Ordering {
        for (a, b) in self.scores.iter().zip(&other.scores) {
            match a.total_cmp(b) {
                Ordering::Equal => continue,
                unequal => return unequal,
            }
        }
        self.scores
            .len()
            .cmp(&other.scores.len())
            .then(self.position.cmp(&other.position))
    }
}

impl PartialOrd for FairnessCost {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for FairnessCost {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FairnessCost {}

/// Decides who may take a slot and who should take it.
///
/// # Example
/// ```
/// use u_roster::evaluator::{ConstraintEvaluator, EvaluationMode};
///
/// let evaluator = ConstraintEvaluator::standard();
/// assert_eq!(evaluator.eligibility_rule_names()[0], "ROLE");
/// assert_eq!(evaluator.fairness_rule_names()[0], "SAME_DAY_LOAD");
///
/// let blended = ConstraintEvaluator::standard().with_mode(EvaluationMode::Weighted);
/// assert_eq!(blended.mode(), EvaluationMode::Weighted);
/// ```
#[derive(Clone)]
pub struct ConstraintEvaluator {
    eligibility: Vec<Arc<dyn EligibilityRule>>,
    fairness: Vec<WeightedRule>,
    mode: EvaluationMode,
}

impl ConstraintEvaluator {
    /// Creates an evaluator with no rules.
    ///
    /// Every candidate is eligible and ties fall to roster position.
    pub fn new() -> Self {
        Self {
            eligibility: Vec::new(),
            fairness: Vec::new(),
            mode: EvaluationMode::Sequential,
        }
    }

    /// The built-in rule set in its default order.
    pub fn standard() -> Self {
        Self::new()
            .with_eligibility_rule(eligibility::RoleMatchesSlot)
            .with_eligibility_rule(eligibility::OnService)
            .with_eligibility_rule(eligibility::NotOnVacation)
            .with_eligibility_rule(eligibility::WithinCallCap)
            .with_eligibility_rule(eligibility::DailyCallLimit)
            .with_eligibility_rule(eligibility::ConsecutiveCallLimit)
            .with_eligibility_rule(eligibility::SeniorSupervision)
            .with_eligibility_rule(eligibility::BackupCapable)
            .with_eligibility_rule(eligibility::ChiefReservedDay)
            .with_fairness_rule(fairness::SameDayLoad)
            .with_fairness_rule(fairness::HolidayGroupBalance)
            .with_fairness_rule(fairness::CallLoad)
            .with_fairness_rule(fairness::WeekendLoad)
            .with_fairness_rule(fairness::CallRecency)
    }

    /// Appends an eligibility rule.
    pub fn with_eligibility_rule<R: EligibilityRule + 'static>(mut self, rule: R) -> Self {
        self.eligibility.push(Arc::new(rule));
        self
    }

    /// Appends a fairness rule (weight 1.0).
    pub fn with_fairness_rule<R: FairnessRule + 'static>(self, rule: R) -> Self {
        self.with_weighted_rule(rule, 1.0)
    }

    /// Appends a weighted fairness rule.
    ///
    /// Weights only matter in [`EvaluationMode::Weighted`].
    pub fn with_weighted_rule<R: FairnessRule + 'static>(mut self, rule: R, weight: f64) -> Self {
        self.fairness.push(WeightedRule {
            rule: Arc::new(rule),
            weight,
        });
        self
    }

    /// Sets the evaluation mode.
    pub fn with_mode(mut self, mode: EvaluationMode) -> Self {
        self.mode = mode;
        self
    }

    /// Current evaluation mode.
    pub fn mode(&self) -> EvaluationMode {
        self.mode
    }

    /// Eligibility rule names in evaluation order.
    pub fn eligibility_rule_names(&self) -> Vec<&'static str> {
        self.eligibility.iter().map(|r| r.name()).collect()
    }

    /// Fairness rule names in precedence order.
    pub fn fairness_rule_names(&self) -> Vec<&'static str> {
        self.fairness.iter().map(|wr| wr.rule.name()).collect()
    }

    /// Checks every eligibility rule; the first failure wins.
    pub fn is_eligible(&self, candidate: &Candidate<'_>, slot: &SlotContext<'_>) -> Eligibility {
        self.eligibility
            .iter()
            .map(|r| r.check(candidate, slot))
            .find(|e| !e.is_eligible())
            .unwrap_or(Eligibility::Eligible)
    }

    /// Raw per-rule scores, in precedence order.
    pub fn evaluate(&self, candidate: &Candidate<'_>, slot: &SlotContext<'_>) -> Vec<RuleScore> {
        self.fairness
            .iter()
            .map(|wr| wr.rule.evaluate(candidate, slot))
            .collect()
    }

    /// Fairness cost of a candidate. Lower is preferred.
    pub fn cost(&self, candidate: &Candidate<'_>, slot: &SlotContext<'_>) -> FairnessCost {
        let scores = match self.mode {
            EvaluationMode::Sequential => self.evaluate(candidate, slot),
            EvaluationMode::Weighted => vec![self
                .fairness
                .iter()
                .map(|wr| wr.rule.evaluate(candidate, slot) * wr.weight)
                .sum()],
        };
        FairnessCost {
            scores,
            position: candidate.position,
        }
    }

    /// Sorts candidates by cost (preferred first).
    ///
    /// Returns indices into `candidates`. Eligibility is not checked.
    pub fn rank(&self, candidates: &[Candidate<'_>], slot: &SlotContext<'_>) -> Vec<usize> {
        let mut costs: Vec<(FairnessCost, usize)> = candidates
            .iter()
            .enumerate()
            .map(|(i, c)| (self.cost(c, slot), i))
            .collect();
        costs.sort();
        costs.into_iter().map(|(_, i)| i).collect()
    }

    /// Index of the preferred candidate.
    pub fn select_best(
        &self,
        candidates: &[Candidate<'_>],
        slot: &SlotContext<'_>,
    ) -> Option<usize> {
        candidates
            .iter()
            .enumerate()
            .map(|(i, c)| (self.cost(c, slot), i))
            .min()
            .map(|(_, i)| i)
    }
}

impl Default for ConstraintEvaluator {
    fn default() -> Self {
        Self::standard()
    }
}

impl std::fmt::Debug for ConstraintEvaluator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConstraintEvaluator")
            .field("eligibility", &self.eligibility_rule_names())
            .field(
                "fairness",
                &self
                    .fairness
                    .iter()
                    .map(|wr| format!("{}(w={})", wr.rule.name(), wr.weight))
                    .collect::<Vec<_>>(),
            )
            .field("mode", &self.mode)
            .finish()
    }
}

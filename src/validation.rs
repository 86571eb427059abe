//! Input validation for scheduling requests.
//!
//! Checks structural integrity of the roster and configuration before
//! scheduling. Detects:
//! - Duplicate person IDs
//! - Seniority outside PGY 1..=7
//! - Rotation requests that can never fit a year, or that permit call
//!   with no off-service call cap
//! - Configuration that contradicts itself or the roster
//!   (e.g. a minimum headcount larger than the trainee count)
//!
//! Anything reported here is fatal to the invocation. Shortfalls that only
//! appear while scheduling are reported as violations instead.

use std::collections::HashSet;

use crate::config::RosterConfig;
use crate::models::{Roster, Seniority, BLOCK_COUNT};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two people share the same ID.
    DuplicateId,
    /// A trainee's post-graduate year is out of range.
    InvalidSeniority,
    /// A rotation request can never be placed.
    InvalidRotation,
    /// The configuration contradicts itself or the roster.
    ContradictoryConfig,
}

impl ValidationError {
    /// Creates a validation error.
    pub fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates a roster against a configuration.
///
/// Checks:
/// 1. No duplicate person IDs
/// 2. Every trainee has PGY 1..=7
/// 3. Every rotation lasts 1..=13 blocks, and a trainee's rotations fit the year together
/// 4. Staff carry no rotation requests
/// 5. The configuration is internally consistent
/// 6. Headcount minimums do not exceed the trainees (or seniors) available
/// 7. Anyone who may take call off service has a non-zero off-service call cap
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_request(roster: &Roster, config: &RosterConfig) -> ValidationResult {
    let mut errors = Vec::new();

    let mut ids = HashSet::new();
    for p in &roster.people {
        if !ids.insert(p.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate person ID: {}", p.id),
            ));
        }

        if let Seniority::Pgy(y) = p.seniority {
            if !(1..=7).contains(&y) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidSeniority,
                    format!("Person '{}' has PGY {y}; expected 1..=7", p.id),
                ));
            }
        }

        if p.is_staff() && !p.rotations.is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidRotation,
                format!("Staff '{}' cannot hold off-service rotations", p.id),
            ));
        }

        let mut total_blocks = 0usize;
        for r in &p.rotations {
            let len = r.duration_blocks as usize;
            total_blocks += len;
            if len == 0 || len > BLOCK_COUNT {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidRotation,
                    format!(
                        "Rotation '{}' for '{}' lasts {len} blocks; expected 1..={BLOCK_COUNT}",
                        r.service, p.id
                    ),
                ));
            }
        }
        let static_call = !p.on_service && p.off_service_call_eligible;
        let rotation_call = p.rotations.iter().any(|r| r.call_eligible);
        if (static_call || rotation_call) && p.off_service_call_cap == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidRotation,
                format!(
                    "'{}' may take call off service but has an off-service call cap of 0",
                    p.id
                ),
            ));
        }
        if total_blocks > BLOCK_COUNT {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidRotation,
                format!(
                    "Rotations for '{}' need {total_blocks} blocks; the year has {BLOCK_COUNT}",
                    p.id
                ),
            ));
        }
    }

    for problem in config.problems() {
        errors.push(ValidationError::new(
            ValidationErrorKind::ContradictoryConfig,
            problem,
        ));
    }

    let trainees = roster.trainees().count();
    if config.min_home_headcount > trainees {
        errors.push(ValidationError::new(
            ValidationErrorKind::ContradictoryConfig,
            format!(
                "min_home_headcount {} exceeds the {trainees} trainees on the roster",
                config.min_home_headcount
            ),
        ));
    }

    let seniors = roster
        .trainees()
        .filter(|p| p.is_senior(config.senior_min_pgy))
        .count();
    if config.min_senior_headcount > seniors {
        errors.push(ValidationError::new(
            ValidationErrorKind::ContradictoryConfig,
            format!(
                "min_senior_headcount {} exceeds the {seniors} senior trainees on the roster",
                config.min_senior_headcount
            ),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Person, RotationRequest};

    fn sample_roster() -> Roster {
        Roster::new(vec![
            Person::trainee("R1", 1),
            Person::trainee("R2", 3),
            Person::trainee("R5", 5).with_rotation(RotationRequest::new("Neurology", 2)),
            Person::staff("S1"),
        ])
    }

    #[test]
    fn test_valid_input() {
        let config = RosterConfig::default()
            .with_min_home_headcount(2)
            .with_min_senior_headcount(1);
        assert!(validate_request(&sample_roster(), &config).is_ok());
    }

    #[test]
    fn test_duplicate_person_id() {
        let roster = sample_roster().with_person(Person::trainee("R1", 2));
        let errors = validate_request(&roster, &RosterConfig::default()).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::DuplicateId && e.message.contains("R1")));
    }

    #[test]
    fn test_invalid_seniority() {
        let roster = Roster::new(vec![Person::trainee("R0", 0), Person::trainee("R9", 9)]);
        let errors = validate_request(&roster, &RosterConfig::default()).unwrap_err();
        assert_eq!(
            errors
                .iter()
                .filter(|e| e.kind == ValidationErrorKind::InvalidSeniority)
                .count(),
            2
        );
    }

    #[test]
    fn test_invalid_rotations() {
        let roster = Roster::new(vec![
            Person::trainee("R1", 2).with_rotation(RotationRequest::new("Zero", 0)),
            Person::trainee("R2", 2)
                .with_rotation(RotationRequest::new("A", 7))
                .with_rotation(RotationRequest::new("B", 7)),
            Person::staff("S1").with_rotation(RotationRequest::new("C", 1)),
        ]);
        let errors = validate_request(&roster, &RosterConfig::default()).unwrap_err();
        assert_eq!(
            errors
                .iter()
                .filter(|e| e.kind == ValidationErrorKind::InvalidRotation)
                .count(),
            3
        );
    }

    #[test]
    fn test_call_eligible_rotation_needs_cap() {
        let icu = RotationRequest::new("ICU", 1).call_eligible();
        let roster = Roster::new(vec![
            Person::trainee("R1", 3).with_rotation(icu.clone()),
            Person::trainee("R2", 3).off_service(true, 0),
            Person::trainee("R3", 3)
                .with_rotation(icu)
                .with_off_service_call_cap(2),
        ]);
        let errors = validate_request(&roster, &RosterConfig::default()).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors[0].message.starts_with("'R1'"));
        assert!(errors[1].message.starts_with("'R2'"));
    }

    #[test]
    fn test_headcount_exceeds_roster() {
        let config = RosterConfig::default()
            .with_min_home_headcount(4)
            .with_min_senior_headcount(2);
        let errors = validate_request(&sample_roster(), &config).unwrap_err();
        // 3 trainees, 1 senior: both minimums are contradictory.
        assert_eq!(errors.len(), 2);
        assert!(errors
            .iter()
            .all(|e| e.kind == ValidationErrorKind::ContradictoryConfig));
    }

    #[test]
    fn test_config_problems_surface() {
        let config = RosterConfig::default().with_max_consecutive_call_days(0);
        let errors = validate_request(&sample_roster(), &config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.message.contains("max_consecutive_call_days")));
    }

    #[test]
    fn test_multiple_errors() {
        let roster = Roster::new(vec![Person::trainee("R1", 0), Person::trainee("R1", 2)]);
        let config = RosterConfig::default().with_min_home_headcount(5);
        let errors = validate_request(&roster, &config).unwrap_err();
        assert!(errors.len() >= 3);
    }
}

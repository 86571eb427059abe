//! Activity model.
//!
//! An activity assignment is a `(person, day, kind)` triple. Six kinds are
//! call-type and are filled slot by slot; the rest describe where a person
//! spends the day and are derived once per person-day.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The closed set of activity kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ActivityKind {
    /// Daytime resident call.
    DayCall,
    /// Overnight resident call.
    NightCall,
    /// 24h resident call on designated weekend days.
    WeekendCall,
    /// Standby resident call.
    Backup,
    /// Staff call requiring the cranial tag.
    CranialStaffCall,
    /// Staff call requiring the spine tag.
    SpineStaffCall,
    /// Blocked date.
    Vacation,
    /// Away on an external rotation.
    OffService,
    /// Working on the home service.
    OnService,
    /// Standing clinic.
    Clinic,
    /// Academic half-day, conference, or similar.
    AcademicEvent,
}

/// Who may fill a call slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotRole {
    /// Any trainee.
    Trainee,
    /// Staff with the given tag.
    Staff(super::StaffSpecialty),
}

impl ActivityKind {
    /// Whether this kind is a call slot.
    #[inline]
    pub fn is_call(&self) -> bool {
        matches!(
            self,
            Self::DayCall
                | Self::NightCall
                | Self::WeekendCall
                | Self::Backup
                | Self::CranialStaffCall
                | Self::SpineStaffCall
        )
    }

    /// Whether this kind is backup.
    #[inline]
    pub fn is_backup(&self) -> bool {
        *self == Self::Backup
    }

    /// Role required for a call slot, `None` for non-call kinds.
    pub fn slot_role(&self) -> Option<SlotRole> {
        use super::StaffSpecialty;
        match self {
            Self::DayCall | Self::NightCall | Self::WeekendCall | Self::Backup => {
                Some(SlotRole::Trainee)
            }
            Self::CranialStaffCall => Some(SlotRole::Staff(StaffSpecialty::Cranial)),
            Self::SpineStaffCall => Some(SlotRole::Staff(StaffSpecialty::Spine)),
            _ => None,
        }
    }

    /// Human-readable name.
    pub fn label(&self) -> &'static str {
        match self {
            Self::DayCall => "Day Call",
            Self::NightCall => "Night Call",
            Self::WeekendCall => "Weekend Call",
            Self::Backup => "Backup",
            Self::CranialStaffCall => "Cranial Staff Call",
            Self::SpineStaffCall => "Spine Staff Call",
            Self::Vacation => "Vacation",
            Self::OffService => "Off-Service",
            Self::OnService => "Neurosurgery",
            Self::Clinic => "Clinic",
            Self::AcademicEvent => "Academic Event",
        }
    }
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A committed `(person, day, kind)` triple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    /// Person id.
    pub person_id: String,
    /// Day index in the window (0-based).
    pub day: u32,
    /// Calendar date (denormalized for consumers).
    pub date: NaiveDate,
    /// Activity kind.
    pub kind: ActivityKind,
}

impl Assignment {
    /// Creates an assignment.
    pub fn new(person_id: impl Into<String>, day: u32, date: NaiveDate, kind: ActivityKind) -> Self {
        Self {
            person_id: person_id.into(),
            day,
            date,
            kind,
        }
    }

    /// Whether this is a call slot.
    #[inline]
    pub fn is_call(&self) -> bool {
        self.kind.is_call()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StaffSpecialty;

    #[test]
    fn test_call_classification() {
        let calls = [
            ActivityKind::DayCall,
            ActivityKind::NightCall,
            ActivityKind::WeekendCall,
            ActivityKind::Backup,
            ActivityKind::CranialStaffCall,
            ActivityKind::SpineStaffCall,
        ];
        for k in calls {
            assert!(k.is_call(), "{k} should be call-type");
            assert!(k.slot_role().is_some());
        }
        for k in [
            ActivityKind::Vacation,
            ActivityKind::OffService,
            ActivityKind::OnService,
            ActivityKind::Clinic,
            ActivityKind::AcademicEvent,
        ] {
            assert!(!k.is_call());
            assert!(k.slot_role().is_none());
        }
    }

    #[test]
    fn test_slot_roles() {
        assert_eq!(ActivityKind::Backup.slot_role(), Some(SlotRole::Trainee));
        assert_eq!(
            ActivityKind::SpineStaffCall.slot_role(),
            Some(SlotRole::Staff(StaffSpecialty::Spine))
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(ActivityKind::NightCall.to_string(), "Night Call");
        assert_eq!(ActivityKind::OnService.to_string(), "Neurosurgery");
    }
}

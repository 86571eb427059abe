//! Roster model.
//!
//! A person is either a trainee (post-graduate year 1..=7) or a supervising
//! staff member. Trainees take resident call slots and rotate through
//! off-service blocks; staff carry specialty tags that decide which staff
//! call slots they may fill.

use std::collections::{BTreeSet, HashMap};

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use super::TimingPreference;

/// Seniority level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Seniority {
    /// Post-graduate year (1 = intern).
    Pgy(u8),
    /// Supervising staff.
    Attending,
}

impl Seniority {
    /// Post-graduate year, `None` for staff.
    pub fn pgy(&self) -> Option<u8> {
        match self {
            Self::Pgy(y) => Some(*y),
            Self::Attending => None,
        }
    }
}

/// Staff specialty tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StaffSpecialty {
    /// Cranial call coverage.
    Cranial,
    /// Spine call coverage.
    Spine,
}

/// A mandatory off-service rotation to place in the yearly plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotationRequest {
    /// Service name (e.g., "Neurology").
    pub service: String,
    /// Required duration in contiguous blocks.
    pub duration_blocks: u8,
    /// Preferred placement window.
    pub timing: TimingPreference,
    /// Whether the rotation still permits call at the home service, counted
    /// against the person's `off_service_call_cap`.
    pub call_eligible: bool,
}

impl RotationRequest {
    /// Creates a request with no timing preference and no call eligibility.
    pub fn new(service: impl Into<String>, duration_blocks: u8) -> Self {
        Self {
            service: service.into(),
            duration_blocks,
            timing: TimingPreference::Any,
            call_eligible: false,
        }
    }

    /// Sets the timing preference.
    pub fn with_timing(mut self, timing: TimingPreference) -> Self {
        self.timing = timing;
        self
    }

    /// Marks the rotation as call-eligible.
    ///
    /// Pair with [`Person::with_off_service_call_cap`]; the default cap of
    /// zero admits no off-service call.
    pub fn call_eligible(mut self) -> Self {
        self.call_eligible = true;
        self
    }
}

/// A trainee or staff member.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
    /// Unique identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Seniority level.
    pub seniority: Seniority,
    /// Assigned to the home service when no rotation plan applies.
    pub on_service: bool,
    /// Maximum calls while on the home service, per window.
    pub home_call_cap: u32,
    /// Maximum calls while on a call-eligible off-service rotation, per window.
    pub off_service_call_cap: u32,
    /// Whether a static off-service status (`on_service == false`) permits call.
    pub off_service_call_eligible: bool,
    /// Blocked dates.
    pub vacation_days: BTreeSet<NaiveDate>,
    /// Weekend calls already served before this window.
    pub weekend_calls: u32,
    /// Dates of calls already assigned. Those inside the window occupy that
    /// day and count against the home call cap.
    pub call_history: BTreeSet<NaiveDate>,
    /// Cohort tag for major-holiday alternation.
    pub holiday_group: Option<String>,
    /// May serve as backup.
    pub can_be_backup: bool,
    /// First-year trainee allowed to take call without a senior on call.
    pub allow_solo_pgy1_call: bool,
    /// Chief resident.
    pub chief: bool,
    /// Days reserved for chief duties (guaranteed OR days).
    pub chief_reserved_days: BTreeSet<NaiveDate>,
    /// Number of days this person may carry two call slots.
    pub double_call_allowance: u32,
    /// Staff specialties.
    pub specialties: BTreeSet<StaffSpecialty>,
    /// Weekdays with a standing clinic.
    pub clinic_days: Vec<Weekday>,
    /// Mandatory off-service rotations for the year.
    pub rotations: Vec<RotationRequest>,
}

impl Person {
    /// Creates a person with default caps (8 home calls, no off-service calls).
    pub fn new(id: impl Into<String>, seniority: Seniority) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            seniority,
            on_service: true,
            home_call_cap: 8,
            off_service_call_cap: 0,
            off_service_call_eligible: false,
            vacation_days: BTreeSet::new(),
            weekend_calls: 0,
            call_history: BTreeSet::new(),
            holiday_group: None,
            can_be_backup: true,
            allow_solo_pgy1_call: false,
            chief: false,
            chief_reserved_days: BTreeSet::new(),
            double_call_allowance: 0,
            specialties: BTreeSet::new(),
            clinic_days: Vec::new(),
            rotations: Vec::new(),
        }
    }

    /// Creates a trainee of the given post-graduate year.
    pub fn trainee(id: impl Into<String>, pgy: u8) -> Self {
        Self::new(id, Seniority::Pgy(pgy))
    }

    /// Creates a staff member.
    pub fn staff(id: impl Into<String>) -> Self {
        Self {
            can_be_backup: false,
            ..Self::new(id, Seniority::Attending)
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the home-service call cap.
    pub fn with_home_call_cap(mut self, cap: u32) -> Self {
        self.home_call_cap = cap;
        self
    }

    /// Sets the call cap while on a call-eligible off-service rotation.
    pub fn with_off_service_call_cap(mut self, cap: u32) -> Self {
        self.off_service_call_cap = cap;
        self
    }

    /// Marks the person as off the home service for the window.
    pub fn off_service(mut self, call_eligible: bool, cap: u32) -> Self {
        self.on_service = false;
        self.off_service_call_eligible = call_eligible;
        self.off_service_call_cap = cap;
        self
    }

    /// Adds a blocked date.
    pub fn with_vacation(mut self, date: NaiveDate) -> Self {
        self.vacation_days.insert(date);
        self
    }

    /// Adds every date in `[from, to]` as blocked.
    pub fn with_vacation_range(mut self, from: NaiveDate, to: NaiveDate) -> Self {
        self.vacation_days
            .extend(from.iter_days().take_while(|d| *d <= to));
        self
    }

    /// Seeds the cumulative weekend-call counter.
    pub fn with_weekend_calls(mut self, count: u32) -> Self {
        self.weekend_calls = count;
        self
    }

    /// Adds an already-assigned call date.
    pub fn with_call_on(mut self, date: NaiveDate) -> Self {
        self.call_history.insert(date);
        self
    }

    /// Sets the holiday group.
    pub fn with_holiday_group(mut self, group: impl Into<String>) -> Self {
        self.holiday_group = Some(group.into());
        self
    }

    /// Sets backup eligibility.
    pub fn with_backup(mut self, can_be_backup: bool) -> Self {
        self.can_be_backup = can_be_backup;
        self
    }

    /// Allows solo call as a first-year trainee.
    pub fn with_solo_call(mut self) -> Self {
        self.allow_solo_pgy1_call = true;
        self
    }

    /// Marks the person as chief with reserved days.
    pub fn as_chief(mut self, reserved: impl IntoIterator<Item = NaiveDate>) -> Self {
        self.chief = true;
        self.chief_reserved_days.extend(reserved);
        self
    }

    /// Sets the double-call allowance.
    pub fn with_double_calls(mut self, allowance: u32) -> Self {
        self.double_call_allowance = allowance;
        self
    }

    /// Adds a staff specialty.
    pub fn with_specialty(mut self, specialty: StaffSpecialty) -> Self {
        self.specialties.insert(specialty);
        self
    }

    /// Adds a standing clinic weekday.
    pub fn with_clinic_day(mut self, weekday: Weekday) -> Self {
        self.clinic_days.push(weekday);
        self
    }

    /// Adds a mandatory rotation.
    pub fn with_rotation(mut self, rotation: RotationRequest) -> Self {
        self.rotations.push(rotation);
        self
    }

    /// Whether this is a staff member.
    pub fn is_staff(&self) -> bool {
        self.seniority == Seniority::Attending
    }

    /// Whether this is a trainee.
    pub fn is_trainee(&self) -> bool {
        !self.is_staff()
    }

    /// Whether the trainee is at or above the senior threshold.
    pub fn is_senior(&self, senior_min_pgy: u8) -> bool {
        matches!(self.seniority, Seniority::Pgy(y) if y >= senior_min_pgy)
    }

    /// Whether this is a first-year trainee.
    pub fn is_pgy1(&self) -> bool {
        self.seniority == Seniority::Pgy(1)
    }

    /// Whether the date is blocked.
    pub fn is_on_vacation(&self, date: NaiveDate) -> bool {
        self.vacation_days.contains(&date)
    }

    /// Whether the date is a reserved chief day.
    pub fn is_chief_reserved(&self, date: NaiveDate) -> bool {
        self.chief && self.chief_reserved_days.contains(&date)
    }

    /// Whether the person carries a staff specialty.
    pub fn has_specialty(&self, specialty: StaffSpecialty) -> bool {
        self.specialties.contains(&specialty)
    }
}

/// The people available to one scheduling request.
///
/// Roster order is significant: it is the final deterministic tie-breaker.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Roster {
    /// People in roster order.
    pub people: Vec<Person>,
}

impl Roster {
    /// Creates a roster.
    pub fn new(people: Vec<Person>) -> Self {
        Self { people }
    }

    /// Builder: appends a person.
    pub fn with_person(mut self, person: Person) -> Self {
        self.people.push(person);
        self
    }

    /// Number of people.
    pub fn len(&self) -> usize {
        self.people.len()
    }

    /// Whether the roster is empty.
    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }

    /// Trainees in roster order.
    pub fn trainees(&self) -> impl Iterator<Item = &Person> {
        self.people.iter().filter(|p| p.is_trainee())
    }

    /// Staff in roster order.
    pub fn staff(&self) -> impl Iterator<Item = &Person> {
        self.people.iter().filter(|p| p.is_staff())
    }

    /// Finds a person by id.
    pub fn find(&self, id: &str) -> Option<&Person> {
        self.people.iter().find(|p| p.id == id)
    }

    /// Roster position by id.
    pub fn positions(&self) -> HashMap<&str, usize> {
        self.people
            .iter()
            .enumerate()
            .map(|(i, p)| (p.id.as_str(), i))
            .collect()
    }
}

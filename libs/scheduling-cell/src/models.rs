use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_utils::validation::is_valid_email;

// ==============================================================================
// INTERVALS
// ==============================================================================

/// Half-open span `[start, end)` between two instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeInterval {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    pub fn is_well_formed(&self) -> bool {
        self.start < self.end
    }
}

// ==============================================================================
// CORE SCHEDULING MODELS
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailabilityWindow {
    pub id: Uuid,
    pub doctor_id: Uuid,
    pub doctor_email: String,
    pub time_start: DateTime<Utc>,
    pub time_end: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AvailabilityWindow {
    pub fn new(doctor_id: Uuid, doctor_email: impl Into<String>, interval: TimeInterval) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            doctor_id,
            doctor_email: doctor_email.into(),
            time_start: interval.start,
            time_end: interval.end,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn interval(&self) -> TimeInterval {
        TimeInterval::new(self.time_start, self.time_end)
    }

    pub fn moved_to(&self, interval: TimeInterval) -> Self {
        Self {
            time_start: interval.start,
            time_end: interval.end,
            updated_at: Utc::now(),
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub doctor_id: Uuid,
    pub doctor_email: String,
    pub patient_id: Uuid,
    pub patient_email: String,
    pub time_start: DateTime<Utc>,
    pub time_end: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Appointment {
    pub fn from_request(request: AppointmentRequest) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            doctor_id: request.doctor_id,
            doctor_email: request.doctor_email,
            patient_id: request.patient_id,
            patient_email: request.patient_email,
            time_start: request.time_start,
            time_end: request.time_end,
            created_at: now,
            updated_at: now,
        }
    }

    /// Full replacement of parties and interval, keeping identity and creation time.
    pub fn replaced_with(&self, request: AppointmentRequest) -> Self {
        Self {
            id: self.id,
            created_at: self.created_at,
            updated_at: Utc::now(),
            ..Self::from_request(request)
        }
    }

    pub fn interval(&self) -> TimeInterval {
        TimeInterval::new(self.time_start, self.time_end)
    }

    pub fn participants(&self) -> [Uuid; 2] {
        [self.doctor_id, self.patient_id]
    }
}

// ==============================================================================
// REQUEST MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityWindowRequest {
    pub time_start: DateTime<Utc>,
    pub time_end: DateTime<Utc>,
}

impl AvailabilityWindowRequest {
    pub fn interval(&self) -> TimeInterval {
        TimeInterval::new(self.time_start, self.time_end)
    }
}

/// Body of both create and update: update replaces every field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentRequest {
    pub doctor_id: Uuid,
    pub doctor_email: String,
    pub patient_id: Uuid,
    pub patient_email: String,
    pub time_start: DateTime<Utc>,
    pub time_end: DateTime<Utc>,
}

impl AppointmentRequest {
    pub fn interval(&self) -> TimeInterval {
        TimeInterval::new(self.time_start, self.time_end)
    }

    pub fn validate_contacts(&self) -> Result<(), SchedulingError> {
        for email in [&self.doctor_email, &self.patient_email] {
            if !is_valid_email(email) {
                return Err(SchedulingError::InvalidEmail(email.clone()));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScheduleQuery {
    pub doctor_id: Option<Uuid>,
}

// ==============================================================================
// POLICY
// ==============================================================================

/// Optional tightenings of the default booking rules. Both are off by default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchedulingPolicy {
    /// Only a participant of the stored appointment may rewrite it.
    pub require_participant_on_update: bool,
    /// Reject window moves/deletes that would leave a booked appointment uncovered.
    pub enforce_window_coverage: bool,
}

impl SchedulingPolicy {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            require_participant_on_update: config.require_appointment_participant,
            enforce_window_coverage: config.enforce_window_coverage,
        }
    }
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchedulingError {
    #[error("TimeEnd must be after TimeStart")]
    InvalidInterval,

    #[error("No free schedules for your request")]
    NoAvailability,

    #[error("This time is already appointed")]
    TimeConflict,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Forbidden(String),

    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    #[error("Schedule still covers booked appointments")]
    WindowInUse,

    #[error("Storage error: {0}")]
    StorageError(String),
}

impl SchedulingError {
    pub fn storage(e: impl std::fmt::Display) -> Self {
        SchedulingError::StorageError(e.to_string())
    }

    /// Only storage failures may succeed on a blind retry.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SchedulingError::StorageError(_))
    }
}

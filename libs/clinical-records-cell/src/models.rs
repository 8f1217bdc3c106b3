use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use uuid::Uuid;

use scheduling_cell::AuthError;
use shared_models::auth::Identity;

// ==============================================================================
// RECORD ABSTRACTION
// ==============================================================================

/// A doctor-authored record about one patient.
///
/// The writing doctor becomes `doctor_id` and is the only one allowed to
/// revise or delete it; the doctor and the patient may both read it.
pub trait ClinicalRecord: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// PostgREST table name.
    const TABLE: &'static str;
    /// Human name used in error messages.
    const LABEL: &'static str;

    type Draft: RecordDraft;

    fn id(&self) -> Uuid;
    fn doctor_id(&self) -> Uuid;
    fn patient_id(&self) -> Uuid;
    fn created_at(&self) -> DateTime<Utc>;

    fn from_draft(doctor: &Identity, draft: Self::Draft) -> Self;

    /// Replace every draft-controlled field, keeping identity and creation time.
    fn revise(&self, doctor: &Identity, draft: Self::Draft) -> Self;

    fn participants(&self) -> [Uuid; 2] {
        [self.doctor_id(), self.patient_id()]
    }
}

/// Request body for creating or fully replacing a record.
pub trait RecordDraft: DeserializeOwned + Send + 'static {
    fn patient_email(&self) -> &str;
}

// ==============================================================================
// PRESCRIPTIONS
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prescription {
    pub id: Uuid,
    pub doctor_id: Uuid,
    pub doctor_email: String,
    pub patient_id: Uuid,
    pub patient_email: String,
    pub drug_name: String,
    pub dosage: String,
    pub duration_days: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrescriptionDraft {
    pub patient_id: Uuid,
    pub patient_email: String,
    pub drug_name: String,
    pub dosage: String,
    pub duration_days: u32,
}

impl RecordDraft for PrescriptionDraft {
    fn patient_email(&self) -> &str {
        &self.patient_email
    }
}

impl ClinicalRecord for Prescription {
    const TABLE: &'static str = "prescriptions";
    const LABEL: &'static str = "Prescription";

    type Draft = PrescriptionDraft;

    fn id(&self) -> Uuid {
        self.id
    }

    fn doctor_id(&self) -> Uuid {
        self.doctor_id
    }

    fn patient_id(&self) -> Uuid {
        self.patient_id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn from_draft(doctor: &Identity, draft: PrescriptionDraft) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            doctor_id: doctor.id,
            doctor_email: doctor.email.clone(),
            patient_id: draft.patient_id,
            patient_email: draft.patient_email,
            drug_name: draft.drug_name,
            dosage: draft.dosage,
            duration_days: draft.duration_days,
            created_at: now,
            updated_at: now,
        }
    }

    fn revise(&self, doctor: &Identity, draft: PrescriptionDraft) -> Self {
        Self {
            id: self.id,
            created_at: self.created_at,
            ..Self::from_draft(doctor, draft)
        }
    }
}

// ==============================================================================
// MEDICAL RECORDS
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicalRecord {
    pub id: Uuid,
    pub doctor_id: Uuid,
    pub doctor_email: String,
    pub patient_id: Uuid,
    pub patient_email: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MedicalRecordDraft {
    pub patient_id: Uuid,
    pub patient_email: String,
    pub text: String,
}

impl RecordDraft for MedicalRecordDraft {
    fn patient_email(&self) -> &str {
        &self.patient_email
    }
}

impl ClinicalRecord for MedicalRecord {
    const TABLE: &'static str = "medical_records";
    const LABEL: &'static str = "Medical record";

    type Draft = MedicalRecordDraft;

    fn id(&self) -> Uuid {
        self.id
    }

    fn doctor_id(&self) -> Uuid {
        self.doctor_id
    }

    fn patient_id(&self) -> Uuid {
        self.patient_id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn from_draft(doctor: &Identity, draft: MedicalRecordDraft) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            doctor_id: doctor.id,
            doctor_email: doctor.email.clone(),
            patient_id: draft.patient_id,
            patient_email: draft.patient_email,
            text: draft.text,
            created_at: now,
            updated_at: now,
        }
    }

    fn revise(&self, doctor: &Identity, draft: MedicalRecordDraft) -> Self {
        Self {
            id: self.id,
            created_at: self.created_at,
            ..Self::from_draft(doctor, draft)
        }
    }
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordsError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Forbidden(String),

    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<AuthError> for RecordsError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::Forbidden(msg) => RecordsError::Forbidden(msg),
        }
    }
}

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize)]
pub struct JwtClaims {
    #[serde(alias = "user_id")]
    pub sub: String,
    pub exp: Option<u64>,
    pub email: Option<String>,
    #[serde(default)]
    pub is_doctor: bool,
    pub iat: Option<u64>,
}

/// The caller, as resolved from a verified bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: Uuid,
    pub is_doctor: bool,
    pub email: String,
}

impl Identity {
    pub fn doctor(id: Uuid, email: impl Into<String>) -> Self {
        Self { id, is_doctor: true, email: email.into() }
    }

    pub fn patient(id: Uuid, email: impl Into<String>) -> Self {
        Self { id, is_doctor: false, email: email.into() }
    }
}

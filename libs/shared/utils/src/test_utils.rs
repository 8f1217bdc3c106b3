use std::sync::Arc;
use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use base64::{Engine as _, engine::general_purpose};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::auth::Identity;

pub struct TestConfig {
    pub jwt_secret: String,
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub email_api_url: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "test-secret-key-for-jwt-validation-must-be-long-enough".to_string(),
            supabase_url: "http://localhost:54321".to_string(),
            supabase_anon_key: "test-anon-key".to_string(),
            email_api_url: String::new(),
        }
    }
}

impl TestConfig {
    pub fn with_supabase_url(url: impl Into<String>) -> Self {
        Self {
            supabase_url: url.into(),
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            supabase_url: self.supabase_url.clone(),
            supabase_anon_key: self.supabase_anon_key.clone(),
            supabase_service_role_key: String::new(),
            jwt_secret: self.jwt_secret.clone(),
            email_api_url: self.email_api_url.clone(),
            email_api_key: "test-email-key".to_string(),
            email_from: "noreply@practice.local".to_string(),
            port: 8080,
            require_appointment_participant: false,
            enforce_window_coverage: false,
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }
}

pub struct TestUser {
    pub id: Uuid,
    pub email: String,
    pub is_doctor: bool,
}

impl Default for TestUser {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4(),
            email: "test@example.com".to_string(),
            is_doctor: false,
        }
    }
}

impl TestUser {
    pub fn new(email: &str, is_doctor: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: email.to_string(),
            is_doctor,
        }
    }

    pub fn doctor(email: &str) -> Self {
        Self::new(email, true)
    }

    pub fn patient(email: &str) -> Self {
        Self::new(email, false)
    }

    pub fn to_identity(&self) -> Identity {
        Identity {
            id: self.id,
            is_doctor: self.is_doctor,
            email: self.email.clone(),
        }
    }
}

pub struct JwtTestUtils;

impl JwtTestUtils {
    pub fn create_test_token(user: &TestUser, secret: &str, exp_hours: Option<i64>) -> String {
        let now = Utc::now();
        let exp = now + Duration::hours(exp_hours.unwrap_or(24));

        let payload = json!({
            "sub": user.id.to_string(),
            "email": user.email,
            "is_doctor": user.is_doctor,
            "iat": now.timestamp(),
            "exp": exp.timestamp()
        });

        Self::sign_claims(&payload, secret)
    }

    /// Signs arbitrary claims, for tokens the typed helpers cannot produce.
    pub fn sign_claims(payload: &Value, secret: &str) -> String {
        let header = json!({
            "alg": "HS256",
            "typ": "JWT"
        });

        let header_encoded = general_purpose::URL_SAFE_NO_PAD.encode(header.to_string());
        let payload_encoded = general_purpose::URL_SAFE_NO_PAD.encode(payload.to_string());

        let signing_input = format!("{}.{}", header_encoded, payload_encoded);

        let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
            .expect("HMAC can take key of any size");
        mac.update(signing_input.as_bytes());
        let signature = mac.finalize().into_bytes();
        let signature_encoded = general_purpose::URL_SAFE_NO_PAD.encode(signature);

        format!("{}.{}", signing_input, signature_encoded)
    }

    pub fn create_expired_token(user: &TestUser, secret: &str) -> String {
        Self::create_test_token(user, secret, Some(-1))
    }

    pub fn create_invalid_signature_token(user: &TestUser) -> String {
        Self::create_test_token(user, "wrong-secret", Some(24))
    }

    pub fn create_malformed_token() -> String {
        "invalid.token.format".to_string()
    }

    pub fn bearer(user: &TestUser, secret: &str) -> String {
        format!("Bearer {}", Self::create_test_token(user, secret, Some(24)))
    }
}

use std::env;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub supabase_service_role_key: String,
    pub jwt_secret: String,
    pub email_api_url: String,
    pub email_api_key: String,
    pub email_from: String,
    pub port: u16,
    pub require_appointment_participant: bool,
    pub enforce_window_coverage: bool,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            supabase_url: env::var("SUPABASE_URL")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_URL not set, using empty value");
                    String::new()
                }),
            supabase_anon_key: env::var("SUPABASE_ANON_PUBLIC_KEY")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_ANON_PUBLIC_KEY not set, using empty value");
                    String::new()
                }),
            supabase_service_role_key: env::var("SUPABASE_SERVICE_ROLE_KEY")
                .unwrap_or_default(),
            jwt_secret: env::var("JWT_SECRET")
                .unwrap_or_else(|_| {
                    warn!("JWT_SECRET not set, every request will be rejected");
                    String::new()
                }),
            email_api_url: env::var("EMAIL_API_URL")
                .unwrap_or_else(|_| {
                    warn!("EMAIL_API_URL not set, notification emails are disabled");
                    String::new()
                }),
            email_api_key: env::var("EMAIL_API_KEY").unwrap_or_default(),
            email_from: env::var("EMAIL_FROM")
                .unwrap_or_else(|_| "noreply@practice.local".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            require_appointment_participant: env_flag("REQUIRE_APPOINTMENT_PARTICIPANT"),
            enforce_window_coverage: env_flag("ENFORCE_WINDOW_COVERAGE"),
        };

        if !config.is_configured() {
            warn!("Supabase not configured - falling back to in-memory storage");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.supabase_url.is_empty() && !self.supabase_anon_key.is_empty()
    }

    pub fn is_email_configured(&self) -> bool {
        !self.email_api_url.is_empty() && !self.email_from.is_empty()
    }

    /// Key used for server-side table access. Falls back to the anon key.
    pub fn storage_key(&self) -> &str {
        if self.supabase_service_role_key.is_empty() {
            &self.supabase_anon_key
        } else {
            &self.supabase_service_role_key
        }
    }
}

fn env_flag(name: &str) -> bool {
    env::var(name)
        .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(false)
}

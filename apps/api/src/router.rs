use std::sync::Arc;

use axum::{routing::get, Router};
use tracing::info;

use clinical_records_cell::router::record_routes;
use clinical_records_cell::{
    InMemoryRecordStore, MedicalRecord, Prescription, RecordStore, RecordsService, SupabaseRecordStore,
};
use notification_cell::router::notification_routes;
use notification_cell::{
    EmailClient, InMemoryNotificationStore, NotificationService, NotificationStore, SupabaseNotificationStore,
};
use scheduling_cell::router::{appointment_routes, schedule_routes};
use scheduling_cell::{
    AppointmentStore, AvailabilityStore, BookingService, InMemoryAppointmentStore, InMemoryAvailabilityStore,
    SchedulingPolicy, SupabaseAppointmentStore, SupabaseAvailabilityStore,
};
use shared_config::AppConfig;
use shared_database::SupabaseClient;

/// Every persistence seam, backed either by Supabase or by process memory.
struct Backends {
    availability: Arc<dyn AvailabilityStore>,
    appointments: Arc<dyn AppointmentStore>,
    notifications: Arc<dyn NotificationStore>,
    prescriptions: Arc<dyn RecordStore<Prescription>>,
    medical_records: Arc<dyn RecordStore<MedicalRecord>>,
}

impl Backends {
    fn for_config(config: &AppConfig) -> Self {
        if !config.is_configured() {
            info!("Using in-memory storage");
            return Self {
                availability: Arc::new(InMemoryAvailabilityStore::new()),
                appointments: Arc::new(InMemoryAppointmentStore::new()),
                notifications: Arc::new(InMemoryNotificationStore::new()),
                prescriptions: Arc::new(InMemoryRecordStore::<Prescription>::new()),
                medical_records: Arc::new(InMemoryRecordStore::<MedicalRecord>::new()),
            };
        }

        info!("Using Supabase storage at {}", config.supabase_url);
        let supabase = Arc::new(SupabaseClient::new(config));
        Self {
            availability: Arc::new(SupabaseAvailabilityStore::new(supabase.clone())),
            appointments: Arc::new(SupabaseAppointmentStore::new(supabase.clone())),
            notifications: Arc::new(SupabaseNotificationStore::new(supabase.clone())),
            prescriptions: Arc::new(SupabaseRecordStore::<Prescription>::new(supabase.clone())),
            medical_records: Arc::new(SupabaseRecordStore::<MedicalRecord>::new(supabase)),
        }
    }
}

pub fn create_router(config: Arc<AppConfig>) -> Router {
    let backends = Backends::for_config(&config);

    let notifications = Arc::new(NotificationService::new(
        backends.notifications,
        EmailClient::from_config(&config),
    ));

    // One booking service for the whole process: it owns the per-doctor locks.
    let booking = Arc::new(BookingService::new(
        backends.availability,
        backends.appointments,
        notifications.clone(),
        SchedulingPolicy::from_config(&config),
    ));

    let prescriptions = Arc::new(RecordsService::new(backends.prescriptions));
    let medical_records = Arc::new(RecordsService::new(backends.medical_records));

    Router::new()
        .route("/", get(|| async { "Practice API is running!" }))
        .nest("/api/schedules", schedule_routes(config.clone(), booking.clone()))
        .nest("/api/appointments", appointment_routes(config.clone(), booking))
        .nest("/api/notifications", notification_routes(config.clone(), notifications))
        .nest("/api/prescriptions", record_routes(config.clone(), prescriptions))
        .nest("/api/medical_records", record_routes(config, medical_records))
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use shared_utils::test_utils::{JwtTestUtils, TestConfig, TestUser};

    fn in_memory_config() -> TestConfig {
        TestConfig {
            supabase_url: String::new(),
            ..TestConfig::default()
        }
    }

    async fn call(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    #[tokio::test]
    async fn test_liveness_is_public() {
        let app = create_router(in_memory_config().to_arc());

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_every_api_prefix_requires_a_token() {
        let app = create_router(in_memory_config().to_arc());

        for uri in [
            "/api/schedules",
            "/api/appointments",
            "/api/notifications",
            "/api/prescriptions",
            "/api/medical_records",
        ] {
            let (status, _) = call(&app, Request::builder().uri(uri).body(Body::empty()).unwrap()).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "{}", uri);
        }
    }

    #[tokio::test]
    async fn test_booking_produces_notifications_for_both_parties() {
        let config = in_memory_config();
        let app = create_router(config.to_arc());

        let doctor = TestUser::doctor("doctor@test.com");
        let patient = TestUser::patient("patient@test.com");
        let doctor_bearer = JwtTestUtils::bearer(&doctor, &config.jwt_secret);
        let patient_bearer = JwtTestUtils::bearer(&patient, &config.jwt_secret);

        let (status, _) = call(
            &app,
            Request::builder()
                .method("POST")
                .uri("/api/schedules")
                .header("Authorization", &doctor_bearer)
                .header("Content-Type", "application/json")
                .body(Body::from(
                    json!({ "time_start": "2023-12-01T09:00:00Z", "time_end": "2023-12-01T12:00:00Z" }).to_string(),
                ))
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, _) = call(
            &app,
            Request::builder()
                .method("POST")
                .uri("/api/appointments")
                .header("Authorization", &patient_bearer)
                .header("Content-Type", "application/json")
                .body(Body::from(
                    json!({
                        "doctor_id": doctor.id,
                        "doctor_email": doctor.email,
                        "patient_id": patient.id,
                        "patient_email": patient.email,
                        "time_start": "2023-12-01T10:00:00Z",
                        "time_end": "2023-12-01T10:30:00Z"
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        for bearer in [&doctor_bearer, &patient_bearer] {
            let (status, body) = call(
                &app,
                Request::builder()
                    .uri("/api/notifications")
                    .header("Authorization", bearer)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["total"], 1);
            assert_eq!(body["notifications"][0]["text"], "Appointment data created");
        }
    }
}

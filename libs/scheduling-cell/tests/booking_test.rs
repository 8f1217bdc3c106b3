use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Result};
use assert_matches::assert_matches;
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use mockall::mock;
use uuid::Uuid;

use notification_cell::{
    InMemoryNotificationStore, Notification, NotificationDispatcher, NotificationError,
    NotificationRequest, NotificationService, NotificationStore, NotificationType,
};
use scheduling_cell::{
    Appointment, AppointmentRequest, AppointmentStore, AvailabilityStore, AvailabilityWindow, BookingService,
    InMemoryAppointmentStore, InMemoryAvailabilityStore, SchedulingError, SchedulingPolicy,
    TimeInterval,
};
use shared_models::auth::Identity;

mock! {
    pub Dispatcher {}

    #[async_trait]
    impl NotificationDispatcher for Dispatcher {
        async fn notify(&self, request: NotificationRequest) -> Result<Notification, NotificationError>;
    }
}

/// Delays every doctor listing so that unserialized callers would interleave
/// between their validation read and their write.
struct SlowAppointmentStore {
    inner: InMemoryAppointmentStore,
    delay: Duration,
}

#[async_trait]
impl AppointmentStore for SlowAppointmentStore {
    async fn list_by_doctor(&self, doctor_id: Uuid) -> Result<Vec<Appointment>> {
        let rows = self.inner.list_by_doctor(doctor_id).await?;
        tokio::time::sleep(self.delay).await;
        Ok(rows)
    }

    async fn list_by_participant(&self, user_id: Uuid) -> Result<Vec<Appointment>> {
        self.inner.list_by_participant(user_id).await
    }

    async fn get(&self, id: Uuid) -> Result<Option<Appointment>> {
        self.inner.get(id).await
    }

    async fn create(&self, appointment: &Appointment) -> Result<Appointment> {
        self.inner.create(appointment).await
    }

    async fn update(&self, appointment: &Appointment) -> Result<Option<Appointment>> {
        self.inner.update(appointment).await
    }

    async fn delete(&self, id: Uuid) -> Result<Option<Appointment>> {
        self.inner.delete(id).await
    }
}

/// Serves reads from memory but refuses every write.
struct ReadOnlyAppointmentStore {
    inner: InMemoryAppointmentStore,
}

#[async_trait]
impl AppointmentStore for ReadOnlyAppointmentStore {
    async fn list_by_doctor(&self, doctor_id: Uuid) -> Result<Vec<Appointment>> {
        self.inner.list_by_doctor(doctor_id).await
    }

    async fn list_by_participant(&self, user_id: Uuid) -> Result<Vec<Appointment>> {
        self.inner.list_by_participant(user_id).await
    }

    async fn get(&self, id: Uuid) -> Result<Option<Appointment>> {
        self.inner.get(id).await
    }

    async fn create(&self, _appointment: &Appointment) -> Result<Appointment> {
        Err(anyhow!("connection refused"))
    }

    async fn update(&self, _appointment: &Appointment) -> Result<Option<Appointment>> {
        Err(anyhow!("connection refused"))
    }

    async fn delete(&self, _id: Uuid) -> Result<Option<Appointment>> {
        Err(anyhow!("connection refused"))
    }
}

struct UnreachableAvailabilityStore;

#[async_trait]
impl AvailabilityStore for UnreachableAvailabilityStore {
    async fn list_all(&self) -> Result<Vec<AvailabilityWindow>> {
        Err(anyhow!("connection refused"))
    }

    async fn list_by_doctor(&self, _doctor_id: Uuid) -> Result<Vec<AvailabilityWindow>> {
        Err(anyhow!("connection refused"))
    }

    async fn get(&self, _id: Uuid) -> Result<Option<AvailabilityWindow>> {
        Err(anyhow!("connection refused"))
    }

    async fn create(&self, _window: &AvailabilityWindow) -> Result<AvailabilityWindow> {
        Err(anyhow!("connection refused"))
    }

    async fn update(&self, _window: &AvailabilityWindow) -> Result<Option<AvailabilityWindow>> {
        Err(anyhow!("connection refused"))
    }

    async fn delete(&self, _id: Uuid) -> Result<Option<AvailabilityWindow>> {
        Err(anyhow!("connection refused"))
    }
}

// ==============================================================================
// TEST FIXTURES
// ==============================================================================

fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2023, 12, 1, hour, minute, 0).unwrap()
}

fn span(from: u32, to: u32) -> TimeInterval {
    TimeInterval::new(at(from, 0), at(to, 0))
}

struct Fixture {
    booking: BookingService,
    availability: Arc<InMemoryAvailabilityStore>,
    appointments: Arc<dyn AppointmentStore>,
    notifications: Arc<InMemoryNotificationStore>,
    doctor: Identity,
    patient: Identity,
}

impl Fixture {
    fn with(policy: SchedulingPolicy, appointments: Arc<dyn AppointmentStore>) -> Self {
        let availability = Arc::new(InMemoryAvailabilityStore::new());
        let notifications = Arc::new(InMemoryNotificationStore::new());
        let dispatcher = Arc::new(NotificationService::new(notifications.clone(), None));

        Self {
            booking: BookingService::new(availability.clone(), appointments.clone(), dispatcher, policy),
            availability,
            appointments,
            notifications,
            doctor: Identity::doctor(Uuid::new_v4(), "doctor@test.com"),
            patient: Identity::patient(Uuid::new_v4(), "patient@test.com"),
        }
    }

    fn new() -> Self {
        Self::with(SchedulingPolicy::default(), Arc::new(InMemoryAppointmentStore::new()))
    }

    /// Publishes `[09:00, 12:00)` for the fixture doctor.
    async fn open_morning(&self) -> Uuid {
        self.booking
            .create_availability_window(&self.doctor, span(9, 12))
            .await
            .unwrap()
            .id
    }

    fn request(&self, interval: TimeInterval) -> AppointmentRequest {
        AppointmentRequest {
            doctor_id: self.doctor.id,
            doctor_email: self.doctor.email.clone(),
            patient_id: self.patient.id,
            patient_email: self.patient.email.clone(),
            time_start: interval.start,
            time_end: interval.end,
        }
    }

    async fn notifications_for(&self, recipient_id: Uuid) -> Vec<Notification> {
        self.notifications.list_for_recipient(recipient_id).await.unwrap()
    }
}

fn dispatcher_returning_errors(expected_calls: usize) -> MockDispatcher {
    let mut dispatcher = MockDispatcher::new();
    dispatcher
        .expect_notify()
        .times(expected_calls)
        .returning(|_| Err(NotificationError::Delivery("relay unreachable".to_string())));
    dispatcher
}

// ==============================================================================
// APPOINTMENTS
// ==============================================================================

#[tokio::test]
async fn test_create_appointment_notifies_both_parties() {
    let fx = Fixture::new();
    fx.open_morning().await;

    let appointment = fx
        .booking
        .create_appointment(&fx.patient, fx.request(span(9, 10)))
        .await
        .unwrap();

    assert_eq!(appointment.doctor_id, fx.doctor.id);
    assert_eq!(fx.appointments.list_by_doctor(fx.doctor.id).await.unwrap(), vec![appointment]);

    for recipient in [fx.doctor.id, fx.patient.id] {
        let received = fx.notifications_for(recipient).await;
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].notification_type, NotificationType::Create);
        assert_eq!(received[0].text, "Appointment data created");
    }
}

#[tokio::test]
async fn test_rejected_appointment_writes_nothing() {
    let fx = Fixture::new();
    fx.open_morning().await;
    fx.booking
        .create_appointment(&fx.patient, fx.request(span(9, 10)))
        .await
        .unwrap();

    let mut overlapping = fx.request(span(9, 10));
    overlapping.time_start = at(9, 30);
    overlapping.time_end = at(10, 30);
    let result = fx.booking.create_appointment(&fx.patient, overlapping).await;
    assert_matches!(result, Err(SchedulingError::TimeConflict));

    let result = fx.booking.create_appointment(&fx.patient, fx.request(span(8, 10))).await;
    assert_matches!(result, Err(SchedulingError::NoAvailability));

    assert_eq!(fx.appointments.list_by_doctor(fx.doctor.id).await.unwrap().len(), 1);
    assert_eq!(fx.notifications_for(fx.patient.id).await.len(), 1);
}

#[tokio::test]
async fn test_invalid_contact_is_rejected() {
    let fx = Fixture::new();
    fx.open_morning().await;

    let mut request = fx.request(span(9, 10));
    request.doctor_email = "doctor-at-test".to_string();

    let result = fx.booking.create_appointment(&fx.patient, request).await;
    assert_matches!(result, Err(SchedulingError::InvalidEmail(email)) if email == "doctor-at-test");
    assert!(fx.appointments.list_by_doctor(fx.doctor.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_update_at_same_interval_succeeds() {
    let fx = Fixture::new();
    fx.open_morning().await;
    let created = fx
        .booking
        .create_appointment(&fx.patient, fx.request(span(9, 10)))
        .await
        .unwrap();

    let updated = fx
        .booking
        .update_appointment(&fx.patient, created.id, fx.request(span(9, 10)))
        .await
        .unwrap();

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.interval(), created.interval());

    let received = fx.notifications_for(fx.doctor.id).await;
    assert_eq!(received.len(), 2);
    assert!(received
        .iter()
        .any(|n| n.notification_type == NotificationType::Change && n.text == "Appointment data has changed"));
}

#[tokio::test]
async fn test_update_still_conflicts_with_other_appointments() {
    let fx = Fixture::new();
    fx.open_morning().await;
    let first = fx
        .booking
        .create_appointment(&fx.patient, fx.request(span(9, 10)))
        .await
        .unwrap();
    fx.booking
        .create_appointment(&fx.patient, fx.request(span(10, 11)))
        .await
        .unwrap();

    let result = fx
        .booking
        .update_appointment(&fx.patient, first.id, fx.request(span(10, 11)))
        .await;
    assert_matches!(result, Err(SchedulingError::TimeConflict));

    let stored = fx.appointments.get(first.id).await.unwrap().unwrap();
    assert_eq!(stored.interval(), span(9, 10));
}

#[tokio::test]
async fn test_update_of_missing_appointment_is_not_found() {
    let fx = Fixture::new();
    fx.open_morning().await;

    let result = fx
        .booking
        .update_appointment(&fx.patient, Uuid::new_v4(), fx.request(span(9, 10)))
        .await;
    assert_matches!(result, Err(SchedulingError::NotFound(_)));
}

#[tokio::test]
async fn test_cancel_requires_doctor_role() {
    let fx = Fixture::new();
    fx.open_morning().await;
    let created = fx
        .booking
        .create_appointment(&fx.patient, fx.request(span(9, 10)))
        .await
        .unwrap();

    let result = fx.booking.cancel_appointment(&fx.patient, created.id).await;
    assert_matches!(result, Err(SchedulingError::Forbidden(_)));
    assert!(fx.appointments.get(created.id).await.unwrap().is_some());
}

#[tokio::test]
async fn test_cancel_notifies_parties_of_deleted_row() {
    let fx = Fixture::new();
    fx.open_morning().await;
    let created = fx
        .booking
        .create_appointment(&fx.patient, fx.request(span(9, 10)))
        .await
        .unwrap();

    fx.booking.cancel_appointment(&fx.doctor, created.id).await.unwrap();

    assert!(fx.appointments.get(created.id).await.unwrap().is_none());
    for recipient in [fx.doctor.id, fx.patient.id] {
        let received = fx.notifications_for(recipient).await;
        assert!(received
            .iter()
            .any(|n| n.notification_type == NotificationType::Cancel && n.text == "Appointment data has cancelled"));
    }

    let again = fx.booking.cancel_appointment(&fx.doctor, created.id).await;
    assert_matches!(again, Err(SchedulingError::NotFound(_)));
}

#[tokio::test]
async fn test_reads_are_limited_to_participants() {
    let fx = Fixture::new();
    fx.open_morning().await;
    let created = fx
        .booking
        .create_appointment(&fx.patient, fx.request(span(9, 10)))
        .await
        .unwrap();
    let stranger = Identity::patient(Uuid::new_v4(), "stranger@test.com");

    assert_eq!(fx.booking.get_appointment(&fx.patient, created.id).await.unwrap(), created);
    assert_matches!(
        fx.booking.get_appointment(&stranger, created.id).await,
        Err(SchedulingError::Forbidden(_))
    );

    assert_eq!(fx.booking.list_appointments(&fx.doctor).await.unwrap().len(), 1);
    assert!(fx.booking.list_appointments(&stranger).await.unwrap().is_empty());
}

// ==============================================================================
// NOTIFICATION FAILURES
// ==============================================================================

#[tokio::test]
async fn test_notification_failure_does_not_fail_create() {
    let availability = Arc::new(InMemoryAvailabilityStore::new());
    let appointments = Arc::new(InMemoryAppointmentStore::new());
    let booking = BookingService::new(
        availability,
        appointments.clone(),
        Arc::new(dispatcher_returning_errors(2)),
        SchedulingPolicy::default(),
    );

    let doctor = Identity::doctor(Uuid::new_v4(), "doctor@test.com");
    booking.create_availability_window(&doctor, span(9, 12)).await.unwrap();

    let request = AppointmentRequest {
        doctor_id: doctor.id,
        doctor_email: doctor.email.clone(),
        patient_id: Uuid::new_v4(),
        patient_email: "patient@test.com".to_string(),
        time_start: at(9, 0),
        time_end: at(10, 0),
    };

    tokio_test::assert_ok!(booking.create_appointment(&doctor, request).await);
    assert_eq!(appointments.list_by_doctor(doctor.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_rejected_mutation_sends_no_notification() {
    let booking = BookingService::new(
        Arc::new(InMemoryAvailabilityStore::new()),
        Arc::new(InMemoryAppointmentStore::new()),
        Arc::new(dispatcher_returning_errors(0)),
        SchedulingPolicy::default(),
    );

    let doctor = Identity::doctor(Uuid::new_v4(), "doctor@test.com");
    let request = AppointmentRequest {
        doctor_id: doctor.id,
        doctor_email: doctor.email.clone(),
        patient_id: Uuid::new_v4(),
        patient_email: "patient@test.com".to_string(),
        time_start: at(9, 0),
        time_end: at(10, 0),
    };

    let result = booking.create_appointment(&doctor, request).await;
    assert_matches!(result, Err(SchedulingError::NoAvailability));
}

// ==============================================================================
// STORAGE FAILURES
// ==============================================================================

fn read_only_booking(
    availability: Arc<InMemoryAvailabilityStore>,
    appointments: Arc<ReadOnlyAppointmentStore>,
) -> BookingService {
    BookingService::new(
        availability,
        appointments,
        Arc::new(dispatcher_returning_errors(0)),
        SchedulingPolicy::default(),
    )
}

fn request_with(doctor: &Identity, interval: TimeInterval) -> AppointmentRequest {
    AppointmentRequest {
        doctor_id: doctor.id,
        doctor_email: doctor.email.clone(),
        patient_id: Uuid::new_v4(),
        patient_email: "patient@test.com".to_string(),
        time_start: interval.start,
        time_end: interval.end,
    }
}

#[tokio::test]
async fn test_failed_create_write_is_a_storage_error() {
    let doctor = Identity::doctor(Uuid::new_v4(), "doctor@test.com");
    let availability = Arc::new(InMemoryAvailabilityStore::new());
    availability
        .create(&AvailabilityWindow::new(doctor.id, doctor.email.clone(), span(9, 12)))
        .await
        .unwrap();
    let appointments = Arc::new(ReadOnlyAppointmentStore {
        inner: InMemoryAppointmentStore::new(),
    });
    let booking = read_only_booking(availability, appointments.clone());

    let result = booking.create_appointment(&doctor, request_with(&doctor, span(9, 10))).await;

    assert_matches!(result, Err(SchedulingError::StorageError(message)) if message.contains("connection refused"));
    assert!(appointments.list_by_doctor(doctor.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_failed_update_write_keeps_stored_row() {
    let doctor = Identity::doctor(Uuid::new_v4(), "doctor@test.com");
    let availability = Arc::new(InMemoryAvailabilityStore::new());
    availability
        .create(&AvailabilityWindow::new(doctor.id, doctor.email.clone(), span(9, 12)))
        .await
        .unwrap();

    let inner = InMemoryAppointmentStore::new();
    let stored = inner
        .create(&Appointment::from_request(request_with(&doctor, span(9, 10))))
        .await
        .unwrap();
    let appointments = Arc::new(ReadOnlyAppointmentStore { inner });
    let booking = read_only_booking(availability, appointments.clone());

    let result = booking
        .update_appointment(&doctor, stored.id, request_with(&doctor, span(10, 11)))
        .await;

    assert_matches!(result, Err(SchedulingError::StorageError(_)));
    assert_eq!(appointments.get(stored.id).await.unwrap(), Some(stored));
}

#[tokio::test]
async fn test_failed_cancel_write_keeps_stored_row() {
    let doctor = Identity::doctor(Uuid::new_v4(), "doctor@test.com");
    let inner = InMemoryAppointmentStore::new();
    let stored = inner
        .create(&Appointment::from_request(request_with(&doctor, span(9, 10))))
        .await
        .unwrap();
    let appointments = Arc::new(ReadOnlyAppointmentStore { inner });
    let booking = read_only_booking(Arc::new(InMemoryAvailabilityStore::new()), appointments.clone());

    let result = booking.cancel_appointment(&doctor, stored.id).await;

    assert_matches!(result, Err(SchedulingError::StorageError(_)));
    assert_eq!(appointments.get(stored.id).await.unwrap(), Some(stored));
}

#[tokio::test]
async fn test_unreachable_schedule_store_rejects_booking() {
    let doctor = Identity::doctor(Uuid::new_v4(), "doctor@test.com");
    let appointments = Arc::new(InMemoryAppointmentStore::new());
    let booking = BookingService::new(
        Arc::new(UnreachableAvailabilityStore),
        appointments.clone(),
        Arc::new(dispatcher_returning_errors(0)),
        SchedulingPolicy::default(),
    );

    let result = booking.create_appointment(&doctor, request_with(&doctor, span(9, 10))).await;
    assert_matches!(result, Err(SchedulingError::StorageError(_)));
    assert!(appointments.list_by_doctor(doctor.id).await.unwrap().is_empty());

    let result = booking.create_availability_window(&doctor, span(9, 12)).await;
    assert_matches!(result, Err(SchedulingError::StorageError(_)));
}

// ==============================================================================
// AVAILABILITY WINDOWS
// ==============================================================================

#[tokio::test]
async fn test_non_doctor_cannot_publish_window() {
    let fx = Fixture::new();

    let result = fx.booking.create_availability_window(&fx.patient, span(9, 12)).await;
    assert_matches!(result, Err(SchedulingError::Forbidden(_)));
    assert!(fx.availability.list_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_window_belongs_to_caller() {
    let fx = Fixture::new();
    let window = fx
        .booking
        .create_availability_window(&fx.doctor, span(9, 12))
        .await
        .unwrap();

    assert_eq!(window.doctor_id, fx.doctor.id);
    assert_eq!(window.doctor_email, fx.doctor.email);
    assert_eq!(
        fx.booking.list_availability_windows(Some(fx.doctor.id)).await.unwrap(),
        vec![window.clone()]
    );
    assert!(fx
        .booking
        .list_availability_windows(Some(Uuid::new_v4()))
        .await
        .unwrap()
        .is_empty());
    assert_eq!(fx.booking.list_availability_windows(None).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_malformed_window_is_rejected() {
    let fx = Fixture::new();

    let result = fx.booking.create_availability_window(&fx.doctor, span(12, 9)).await;
    assert_matches!(result, Err(SchedulingError::InvalidInterval));

    let window_id = fx.open_morning().await;
    let result = fx
        .booking
        .update_availability_window(&fx.doctor, window_id, span(11, 11))
        .await;
    assert_matches!(result, Err(SchedulingError::InvalidInterval));
}

#[tokio::test]
async fn test_only_owner_mutates_window() {
    let fx = Fixture::new();
    let window_id = fx.open_morning().await;
    let other_doctor = Identity::doctor(Uuid::new_v4(), "other@test.com");

    let result = fx
        .booking
        .update_availability_window(&other_doctor, window_id, span(13, 14))
        .await;
    assert_matches!(result, Err(SchedulingError::Forbidden(_)));

    let result = fx.booking.delete_availability_window(&other_doctor, window_id).await;
    assert_matches!(result, Err(SchedulingError::Forbidden(_)));

    let moved = fx
        .booking
        .update_availability_window(&fx.doctor, window_id, span(13, 14))
        .await
        .unwrap();
    assert_eq!(moved.interval(), span(13, 14));

    fx.booking.delete_availability_window(&fx.doctor, window_id).await.unwrap();
    assert_matches!(
        fx.booking.get_availability_window(window_id).await,
        Err(SchedulingError::NotFound(_))
    );
}

// ==============================================================================
// POLICY
// ==============================================================================

#[tokio::test]
async fn test_window_coverage_is_not_enforced_by_default() {
    let fx = Fixture::new();
    let window_id = fx.open_morning().await;
    fx.booking
        .create_appointment(&fx.patient, fx.request(span(9, 10)))
        .await
        .unwrap();

    let result = fx.booking.delete_availability_window(&fx.doctor, window_id).await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_window_coverage_policy_protects_booked_appointments() {
    let policy = SchedulingPolicy { enforce_window_coverage: true, ..Default::default() };
    let fx = Fixture::with(policy, Arc::new(InMemoryAppointmentStore::new()));
    let window_id = fx.open_morning().await;
    fx.booking
        .create_appointment(&fx.patient, fx.request(span(9, 10)))
        .await
        .unwrap();

    let result = fx.booking.delete_availability_window(&fx.doctor, window_id).await;
    assert_matches!(result, Err(SchedulingError::WindowInUse));

    let result = fx
        .booking
        .update_availability_window(&fx.doctor, window_id, span(10, 12))
        .await;
    assert_matches!(result, Err(SchedulingError::WindowInUse));

    let widened = fx
        .booking
        .update_availability_window(&fx.doctor, window_id, span(8, 13))
        .await;
    assert!(widened.is_ok());
}

#[tokio::test]
async fn test_participant_policy_on_update() {
    let stranger = Identity::patient(Uuid::new_v4(), "stranger@test.com");

    let open = Fixture::new();
    open.open_morning().await;
    let created = open
        .booking
        .create_appointment(&open.patient, open.request(span(9, 10)))
        .await
        .unwrap();
    let result = open
        .booking
        .update_appointment(&stranger, created.id, open.request(span(10, 11)))
        .await;
    assert!(result.is_ok());

    let policy = SchedulingPolicy { require_participant_on_update: true, ..Default::default() };
    let strict = Fixture::with(policy, Arc::new(InMemoryAppointmentStore::new()));
    strict.open_morning().await;
    let created = strict
        .booking
        .create_appointment(&strict.patient, strict.request(span(9, 10)))
        .await
        .unwrap();
    let result = strict
        .booking
        .update_appointment(&stranger, created.id, strict.request(span(10, 11)))
        .await;
    assert_matches!(result, Err(SchedulingError::Forbidden(_)));
}

// ==============================================================================
// CONCURRENCY
// ==============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_creates_book_exactly_once() {
    let slow = Arc::new(SlowAppointmentStore {
        inner: InMemoryAppointmentStore::new(),
        delay: Duration::from_millis(50),
    });
    let fx = Arc::new(Fixture::with(SchedulingPolicy::default(), slow));
    fx.booking
        .create_availability_window(&fx.doctor, span(13, 17))
        .await
        .unwrap();

    let first = {
        let fx = Arc::clone(&fx);
        tokio::spawn(async move {
            let request = fx.request(span(14, 15));
            fx.booking.create_appointment(&fx.patient, request).await
        })
    };
    let second = {
        let fx = Arc::clone(&fx);
        tokio::spawn(async move {
            let request = fx.request(span(14, 15));
            fx.booking.create_appointment(&fx.patient, request).await
        })
    };

    let (first, second) = tokio::join!(first, second);
    let results = [first.unwrap(), second.unwrap()];

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert_eq!(
        results
            .iter()
            .filter(|r| matches!(r, Err(SchedulingError::TimeConflict)))
            .count(),
        1
    );
    assert_eq!(fx.appointments.list_by_doctor(fx.doctor.id).await.unwrap().len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_different_doctors_book_in_parallel() {
    let slow = Arc::new(SlowAppointmentStore {
        inner: InMemoryAppointmentStore::new(),
        delay: Duration::from_millis(20),
    });
    let fx = Arc::new(Fixture::with(SchedulingPolicy::default(), slow));
    let other = Identity::doctor(Uuid::new_v4(), "other@test.com");

    for doctor in [&fx.doctor, &other] {
        fx.booking.create_availability_window(doctor, span(13, 17)).await.unwrap();
    }

    let bookings = [fx.doctor.clone(), other.clone()].into_iter().map(|doctor| {
        let fx = Arc::clone(&fx);
        tokio::spawn(async move {
            let mut request = fx.request(span(14, 15));
            request.doctor_id = doctor.id;
            request.doctor_email = doctor.email.clone();
            fx.booking.create_appointment(&fx.patient, request).await
        })
    });

    for result in futures::future::join_all(bookings).await {
        assert!(result.unwrap().is_ok());
    }
}

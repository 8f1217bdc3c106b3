use std::sync::Arc;

use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use notification_cell::{NotificationDispatcher, NotificationRequest, NotificationType};
use shared_models::auth::Identity;

use crate::models::{
    Appointment, AppointmentRequest, AvailabilityWindow, SchedulingError, SchedulingPolicy,
    TimeInterval,
};
use crate::services::authorization::{authorize, authorize_participant, Action};
use crate::services::conflict::ConflictValidator;
use crate::services::locks::DoctorLocks;
use crate::store::{AppointmentStore, AvailabilityStore};

const CREATED_TEXT: &str = "Appointment data created";
const CHANGED_TEXT: &str = "Appointment data has changed";
const CANCELLED_TEXT: &str = "Appointment data has cancelled";

/// Orchestrates guard, per-doctor lock, validation, write and notification
/// for every schedule and appointment mutation.
///
/// Every rejection happens before the write. Notifications go out after the
/// doctor's lock is released and never change the outcome.
pub struct BookingService {
    availability: Arc<dyn AvailabilityStore>,
    appointments: Arc<dyn AppointmentStore>,
    validator: ConflictValidator,
    dispatcher: Arc<dyn NotificationDispatcher>,
    locks: DoctorLocks,
    policy: SchedulingPolicy,
}

impl BookingService {
    pub fn new(
        availability: Arc<dyn AvailabilityStore>,
        appointments: Arc<dyn AppointmentStore>,
        dispatcher: Arc<dyn NotificationDispatcher>,
        policy: SchedulingPolicy,
    ) -> Self {
        let validator = ConflictValidator::new(Arc::clone(&availability), Arc::clone(&appointments));

        Self {
            availability,
            appointments,
            validator,
            dispatcher,
            locks: DoctorLocks::new(),
            policy,
        }
    }

    // ==============================================================================
    // APPOINTMENTS
    // ==============================================================================

    #[instrument(skip(self, caller, request), fields(caller = %caller.id, doctor = %request.doctor_id))]
    pub async fn create_appointment(
        &self,
        caller: &Identity,
        request: AppointmentRequest,
    ) -> Result<Appointment, SchedulingError> {
        authorize(Action::CreateAppointment, caller, None)?;
        request.validate_contacts()?;

        let appointment = {
            let _guard = self.locks.lock(request.doctor_id).await;

            self.validator
                .validate(request.doctor_id, request.interval(), None)
                .await?;

            let appointment = Appointment::from_request(request);
            self.appointments
                .create(&appointment)
                .await
                .map_err(SchedulingError::storage)?
        };

        info!("Appointment {} booked with doctor {}", appointment.id, appointment.doctor_id);
        self.notify_participants(&appointment, NotificationType::Create, CREATED_TEXT).await;

        Ok(appointment)
    }

    #[instrument(skip(self, caller, request), fields(caller = %caller.id, doctor = %request.doctor_id))]
    pub async fn update_appointment(
        &self,
        caller: &Identity,
        appointment_id: Uuid,
        request: AppointmentRequest,
    ) -> Result<Appointment, SchedulingError> {
        let existing = self.load_appointment(appointment_id).await?;

        authorize(Action::UpdateAppointment, caller, Some(existing.doctor_id))?;
        if self.policy.require_participant_on_update {
            authorize_participant(caller, &existing.participants())?;
        }
        request.validate_contacts()?;

        let updated = {
            // Only the target doctor can gain an overlap; moving off the stored doctor frees time.
            let _guard = self.locks.lock(request.doctor_id).await;

            self.validator
                .validate(request.doctor_id, request.interval(), Some(appointment_id))
                .await?;

            let replacement = existing.replaced_with(request);
            self.appointments
                .update(&replacement)
                .await
                .map_err(SchedulingError::storage)?
                .ok_or(SchedulingError::NotFound("Appointment"))?
        };

        info!("Appointment {} updated", updated.id);
        self.notify_participants(&updated, NotificationType::Change, CHANGED_TEXT).await;

        Ok(updated)
    }

    #[instrument(skip(self, caller), fields(caller = %caller.id))]
    pub async fn cancel_appointment(
        &self,
        caller: &Identity,
        appointment_id: Uuid,
    ) -> Result<(), SchedulingError> {
        authorize(Action::DeleteAppointment, caller, None)?;

        let existing = self.load_appointment(appointment_id).await?;

        let deleted = {
            let _guard = self.locks.lock(existing.doctor_id).await;

            self.appointments
                .delete(appointment_id)
                .await
                .map_err(SchedulingError::storage)?
                .ok_or(SchedulingError::NotFound("Appointment"))?
        };

        info!("Appointment {} cancelled by {}", deleted.id, caller.id);
        self.notify_participants(&deleted, NotificationType::Cancel, CANCELLED_TEXT).await;

        Ok(())
    }

    pub async fn get_appointment(
        &self,
        caller: &Identity,
        appointment_id: Uuid,
    ) -> Result<Appointment, SchedulingError> {
        let appointment = self.load_appointment(appointment_id).await?;
        authorize_participant(caller, &appointment.participants())?;
        Ok(appointment)
    }

    pub async fn list_appointments(&self, caller: &Identity) -> Result<Vec<Appointment>, SchedulingError> {
        debug!("Listing appointments for {}", caller.id);
        self.appointments
            .list_by_participant(caller.id)
            .await
            .map_err(SchedulingError::storage)
    }

    // ==============================================================================
    // AVAILABILITY WINDOWS
    // ==============================================================================

    #[instrument(skip(self, caller), fields(caller = %caller.id))]
    pub async fn create_availability_window(
        &self,
        caller: &Identity,
        interval: TimeInterval,
    ) -> Result<AvailabilityWindow, SchedulingError> {
        authorize(Action::CreateAvailability, caller, None)?;
        if !interval.is_well_formed() {
            return Err(SchedulingError::InvalidInterval);
        }

        let window = AvailabilityWindow::new(caller.id, caller.email.clone(), interval);

        let created = {
            let _guard = self.locks.lock(caller.id).await;
            self.availability
                .create(&window)
                .await
                .map_err(SchedulingError::storage)?
        };

        info!("Schedule {} created for doctor {}", created.id, created.doctor_id);
        Ok(created)
    }

    #[instrument(skip(self, caller), fields(caller = %caller.id))]
    pub async fn update_availability_window(
        &self,
        caller: &Identity,
        window_id: Uuid,
        interval: TimeInterval,
    ) -> Result<AvailabilityWindow, SchedulingError> {
        let existing = self.load_window(window_id).await?;

        authorize(Action::MutateAvailability, caller, Some(existing.doctor_id))?;
        if !interval.is_well_formed() {
            return Err(SchedulingError::InvalidInterval);
        }

        let updated = {
            let _guard = self.locks.lock(existing.doctor_id).await;

            if self.policy.enforce_window_coverage {
                self.validator
                    .check_window_change(existing.doctor_id, window_id, Some(interval))
                    .await?;
            }

            self.availability
                .update(&existing.moved_to(interval))
                .await
                .map_err(SchedulingError::storage)?
                .ok_or(SchedulingError::NotFound("Schedule"))?
        };

        info!("Schedule {} moved to {:?}", updated.id, interval);
        Ok(updated)
    }

    #[instrument(skip(self, caller), fields(caller = %caller.id))]
    pub async fn delete_availability_window(
        &self,
        caller: &Identity,
        window_id: Uuid,
    ) -> Result<(), SchedulingError> {
        let existing = self.load_window(window_id).await?;

        authorize(Action::MutateAvailability, caller, Some(existing.doctor_id))?;

        {
            let _guard = self.locks.lock(existing.doctor_id).await;

            if self.policy.enforce_window_coverage {
                self.validator
                    .check_window_change(existing.doctor_id, window_id, None)
                    .await?;
            }

            self.availability
                .delete(window_id)
                .await
                .map_err(SchedulingError::storage)?
                .ok_or(SchedulingError::NotFound("Schedule"))?;
        }

        info!("Schedule {} deleted", window_id);
        Ok(())
    }

    pub async fn get_availability_window(&self, window_id: Uuid) -> Result<AvailabilityWindow, SchedulingError> {
        self.load_window(window_id).await
    }

    pub async fn list_availability_windows(
        &self,
        doctor_id: Option<Uuid>,
    ) -> Result<Vec<AvailabilityWindow>, SchedulingError> {
        let windows = match doctor_id {
            Some(doctor_id) => self.availability.list_by_doctor(doctor_id).await,
            None => self.availability.list_all().await,
        };
        windows.map_err(SchedulingError::storage)
    }

    // ==============================================================================
    // PRIVATE HELPER METHODS
    // ==============================================================================

    async fn load_appointment(&self, appointment_id: Uuid) -> Result<Appointment, SchedulingError> {
        self.appointments
            .get(appointment_id)
            .await
            .map_err(SchedulingError::storage)?
            .ok_or(SchedulingError::NotFound("Appointment"))
    }

    async fn load_window(&self, window_id: Uuid) -> Result<AvailabilityWindow, SchedulingError> {
        self.availability
            .get(window_id)
            .await
            .map_err(SchedulingError::storage)?
            .ok_or(SchedulingError::NotFound("Schedule"))
    }

    async fn notify_participants(&self, appointment: &Appointment, kind: NotificationType, text: &str) {
        let recipients = [
            (appointment.doctor_id, &appointment.doctor_email),
            (appointment.patient_id, &appointment.patient_email),
        ];

        for (recipient_id, email) in recipients {
            let request = NotificationRequest::new(recipient_id, email.as_str(), kind, text);
            if let Err(e) = self.dispatcher.notify(request).await {
                warn!(
                    "Failed to notify {} about appointment {}: {}",
                    recipient_id, appointment.id, e
                );
            }
        }
    }
}

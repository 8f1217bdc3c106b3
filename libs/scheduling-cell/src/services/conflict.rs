use std::sync::Arc;

use tracing::{debug, instrument, warn};
use uuid::Uuid;

use crate::models::{SchedulingError, TimeInterval};
use crate::services::interval::{contains, overlaps};
use crate::store::{AppointmentStore, AvailabilityStore};

/// Read-only acceptance decision for a candidate appointment interval.
///
/// The caller is responsible for holding the doctor's lock if it intends to
/// write based on the outcome.
pub struct ConflictValidator {
    availability: Arc<dyn AvailabilityStore>,
    appointments: Arc<dyn AppointmentStore>,
}

impl ConflictValidator {
    pub fn new(availability: Arc<dyn AvailabilityStore>, appointments: Arc<dyn AppointmentStore>) -> Self {
        Self { availability, appointments }
    }

    /// Accept `candidate` for `doctor_id` iff it is well formed, lies inside one
    /// of the doctor's windows, and overlaps none of the doctor's appointments
    /// other than `exclude_appointment_id`.
    #[instrument(skip(self))]
    pub async fn validate(
        &self,
        doctor_id: Uuid,
        candidate: TimeInterval,
        exclude_appointment_id: Option<Uuid>,
    ) -> Result<(), SchedulingError> {
        if !candidate.is_well_formed() {
            return Err(SchedulingError::InvalidInterval);
        }

        let windows = self
            .availability
            .list_by_doctor(doctor_id)
            .await
            .map_err(SchedulingError::storage)?;

        if !windows.iter().any(|w| contains(&w.interval(), &candidate)) {
            debug!("No window of doctor {} covers {:?} ({} windows)", doctor_id, candidate, windows.len());
            return Err(SchedulingError::NoAvailability);
        }

        let existing = self
            .appointments
            .list_by_doctor(doctor_id)
            .await
            .map_err(SchedulingError::storage)?;

        let conflict = existing
            .iter()
            .filter(|a| Some(a.id) != exclude_appointment_id)
            .find(|a| overlaps(&a.interval(), &candidate));

        if let Some(conflict) = conflict {
            warn!(
                "Conflict detected for doctor {}: candidate {:?} overlaps appointment {}",
                doctor_id, candidate, conflict.id
            );
            return Err(SchedulingError::TimeConflict);
        }

        Ok(())
    }

    /// Check that moving (`Some`) or removing (`None`) window `window_id` leaves
    /// every appointment it covered still covered by some other window.
    #[instrument(skip(self))]
    pub async fn check_window_change(
        &self,
        doctor_id: Uuid,
        window_id: Uuid,
        replacement: Option<TimeInterval>,
    ) -> Result<(), SchedulingError> {
        let windows = self
            .availability
            .list_by_doctor(doctor_id)
            .await
            .map_err(SchedulingError::storage)?;

        let Some(current) = windows.iter().find(|w| w.id == window_id) else {
            return Ok(());
        };
        let current = current.interval();

        let remaining: Vec<TimeInterval> = windows
            .iter()
            .filter(|w| w.id != window_id)
            .map(|w| w.interval())
            .chain(replacement)
            .collect();

        let appointments = self
            .appointments
            .list_by_doctor(doctor_id)
            .await
            .map_err(SchedulingError::storage)?;

        let stranded = appointments
            .iter()
            .filter(|a| contains(&current, &a.interval()))
            .find(|a| !remaining.iter().any(|w| contains(w, &a.interval())));

        if let Some(stranded) = stranded {
            warn!(
                "Schedule {} change would leave appointment {} uncovered",
                window_id, stranded.id
            );
            return Err(SchedulingError::WindowInUse);
        }

        Ok(())
    }
}

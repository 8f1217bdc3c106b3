//! Persistence seams for schedules and appointments.
//!
//! Stores only move rows; every scheduling rule lives in the services.

mod memory;
mod supabase;

pub use memory::{InMemoryAppointmentStore, InMemoryAvailabilityStore};
pub use supabase::{SupabaseAppointmentStore, SupabaseAvailabilityStore};

use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{Appointment, AvailabilityWindow};

#[async_trait]
pub trait AvailabilityStore: Send + Sync {
    async fn list_all(&self) -> Result<Vec<AvailabilityWindow>>;

    async fn list_by_doctor(&self, doctor_id: Uuid) -> Result<Vec<AvailabilityWindow>>;

    async fn get(&self, id: Uuid) -> Result<Option<AvailabilityWindow>>;

    async fn create(&self, window: &AvailabilityWindow) -> Result<AvailabilityWindow>;

    /// `None` when no row with `window.id` exists.
    async fn update(&self, window: &AvailabilityWindow) -> Result<Option<AvailabilityWindow>>;

    /// Returns the deleted row, `None` when it was already gone.
    async fn delete(&self, id: Uuid) -> Result<Option<AvailabilityWindow>>;
}

#[async_trait]
pub trait AppointmentStore: Send + Sync {
    async fn list_by_doctor(&self, doctor_id: Uuid) -> Result<Vec<Appointment>>;

    /// Appointments where `user_id` is either the doctor or the patient.
    async fn list_by_participant(&self, user_id: Uuid) -> Result<Vec<Appointment>>;

    async fn get(&self, id: Uuid) -> Result<Option<Appointment>>;

    async fn create(&self, appointment: &Appointment) -> Result<Appointment>;

    async fn update(&self, appointment: &Appointment) -> Result<Option<Appointment>>;

    async fn delete(&self, id: Uuid) -> Result<Option<Appointment>>;
}

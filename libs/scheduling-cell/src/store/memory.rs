use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{Appointment, AvailabilityWindow};
use super::{AppointmentStore, AvailabilityStore};

#[derive(Default)]
pub struct InMemoryAvailabilityStore {
    windows: RwLock<HashMap<Uuid, AvailabilityWindow>>,
}

impl InMemoryAvailabilityStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn sorted_windows(mut windows: Vec<AvailabilityWindow>) -> Vec<AvailabilityWindow> {
    windows.sort_by_key(|w| (w.time_start, w.created_at));
    windows
}

#[async_trait]
impl AvailabilityStore for InMemoryAvailabilityStore {
    async fn list_all(&self) -> Result<Vec<AvailabilityWindow>> {
        Ok(sorted_windows(self.windows.read().await.values().cloned().collect()))
    }

    async fn list_by_doctor(&self, doctor_id: Uuid) -> Result<Vec<AvailabilityWindow>> {
        let windows = self.windows.read().await;
        Ok(sorted_windows(
            windows.values().filter(|w| w.doctor_id == doctor_id).cloned().collect(),
        ))
    }

    async fn get(&self, id: Uuid) -> Result<Option<AvailabilityWindow>> {
        Ok(self.windows.read().await.get(&id).cloned())
    }

    async fn create(&self, window: &AvailabilityWindow) -> Result<AvailabilityWindow> {
        self.windows.write().await.insert(window.id, window.clone());
        Ok(window.clone())
    }

    async fn update(&self, window: &AvailabilityWindow) -> Result<Option<AvailabilityWindow>> {
        let mut windows = self.windows.write().await;
        Ok(windows.get_mut(&window.id).map(|slot| {
            *slot = window.clone();
            slot.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> Result<Option<AvailabilityWindow>> {
        Ok(self.windows.write().await.remove(&id))
    }
}

#[derive(Default)]
pub struct InMemoryAppointmentStore {
    appointments: RwLock<HashMap<Uuid, Appointment>>,
}

impl InMemoryAppointmentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn sorted_appointments(mut appointments: Vec<Appointment>) -> Vec<Appointment> {
    appointments.sort_by_key(|a| (a.time_start, a.created_at));
    appointments
}

#[async_trait]
impl AppointmentStore for InMemoryAppointmentStore {
    async fn list_by_doctor(&self, doctor_id: Uuid) -> Result<Vec<Appointment>> {
        let appointments = self.appointments.read().await;
        Ok(sorted_appointments(
            appointments.values().filter(|a| a.doctor_id == doctor_id).cloned().collect(),
        ))
    }

    async fn list_by_participant(&self, user_id: Uuid) -> Result<Vec<Appointment>> {
        let appointments = self.appointments.read().await;
        Ok(sorted_appointments(
            appointments
                .values()
                .filter(|a| a.doctor_id == user_id || a.patient_id == user_id)
                .cloned()
                .collect(),
        ))
    }

    async fn get(&self, id: Uuid) -> Result<Option<Appointment>> {
        Ok(self.appointments.read().await.get(&id).cloned())
    }

    async fn create(&self, appointment: &Appointment) -> Result<Appointment> {
        self.appointments.write().await.insert(appointment.id, appointment.clone());
        Ok(appointment.clone())
    }

    async fn update(&self, appointment: &Appointment) -> Result<Option<Appointment>> {
        let mut appointments = self.appointments.write().await;
        Ok(appointments.get_mut(&appointment.id).map(|slot| {
            *slot = appointment.clone();
            slot.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> Result<Option<Appointment>> {
        Ok(self.appointments.write().await.remove(&id))
    }
}

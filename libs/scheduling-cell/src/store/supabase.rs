use std::sync::Arc;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Method;
use uuid::Uuid;

use shared_database::SupabaseClient;

use crate::models::{Appointment, AvailabilityWindow};
use super::{AppointmentStore, AvailabilityStore};

const WINDOWS: &str = "/rest/v1/availability_windows";
const APPOINTMENTS: &str = "/rest/v1/appointments";

pub struct SupabaseAvailabilityStore {
    supabase: Arc<SupabaseClient>,
}

impl SupabaseAvailabilityStore {
    pub fn new(supabase: Arc<SupabaseClient>) -> Self {
        Self { supabase }
    }
}

#[async_trait]
impl AvailabilityStore for SupabaseAvailabilityStore {
    async fn list_all(&self) -> Result<Vec<AvailabilityWindow>> {
        let path = format!("{}?order=time_start.asc", WINDOWS);
        self.supabase.request(Method::GET, &path, None).await
    }

    async fn list_by_doctor(&self, doctor_id: Uuid) -> Result<Vec<AvailabilityWindow>> {
        let path = format!("{}?doctor_id=eq.{}&order=time_start.asc", WINDOWS, doctor_id);
        self.supabase.request(Method::GET, &path, None).await
    }

    async fn get(&self, id: Uuid) -> Result<Option<AvailabilityWindow>> {
        let path = format!("{}?id=eq.{}", WINDOWS, id);
        let mut rows: Vec<AvailabilityWindow> = self.supabase.request(Method::GET, &path, None).await?;
        Ok(rows.pop())
    }

    async fn create(&self, window: &AvailabilityWindow) -> Result<AvailabilityWindow> {
        let mut rows: Vec<AvailabilityWindow> = self
            .supabase
            .request_returning(Method::POST, WINDOWS, Some(serde_json::to_value(window)?))
            .await?;
        rows.pop().ok_or_else(|| anyhow!("Schedule insert returned no rows"))
    }

    async fn update(&self, window: &AvailabilityWindow) -> Result<Option<AvailabilityWindow>> {
        let path = format!("{}?id=eq.{}", WINDOWS, window.id);
        let mut rows: Vec<AvailabilityWindow> = self
            .supabase
            .request_returning(Method::PATCH, &path, Some(serde_json::to_value(window)?))
            .await?;
        Ok(rows.pop())
    }

    async fn delete(&self, id: Uuid) -> Result<Option<AvailabilityWindow>> {
        let path = format!("{}?id=eq.{}", WINDOWS, id);
        let mut rows: Vec<AvailabilityWindow> = self
            .supabase
            .request_returning(Method::DELETE, &path, None)
            .await?;
        Ok(rows.pop())
    }
}

pub struct SupabaseAppointmentStore {
    supabase: Arc<SupabaseClient>,
}

impl SupabaseAppointmentStore {
    pub fn new(supabase: Arc<SupabaseClient>) -> Self {
        Self { supabase }
    }
}

#[async_trait]
impl AppointmentStore for SupabaseAppointmentStore {
    async fn list_by_doctor(&self, doctor_id: Uuid) -> Result<Vec<Appointment>> {
        let path = format!("{}?doctor_id=eq.{}&order=time_start.asc", APPOINTMENTS, doctor_id);
        self.supabase.request(Method::GET, &path, None).await
    }

    async fn list_by_participant(&self, user_id: Uuid) -> Result<Vec<Appointment>> {
        let path = format!(
            "{}?or=(doctor_id.eq.{},patient_id.eq.{})&order=time_start.asc",
            APPOINTMENTS, user_id, user_id
        );
        self.supabase.request(Method::GET, &path, None).await
    }

    async fn get(&self, id: Uuid) -> Result<Option<Appointment>> {
        let path = format!("{}?id=eq.{}", APPOINTMENTS, id);
        let mut rows: Vec<Appointment> = self.supabase.request(Method::GET, &path, None).await?;
        Ok(rows.pop())
    }

    async fn create(&self, appointment: &Appointment) -> Result<Appointment> {
        let mut rows: Vec<Appointment> = self
            .supabase
            .request_returning(Method::POST, APPOINTMENTS, Some(serde_json::to_value(appointment)?))
            .await?;
        rows.pop().ok_or_else(|| anyhow!("Appointment insert returned no rows"))
    }

    async fn update(&self, appointment: &Appointment) -> Result<Option<Appointment>> {
        let path = format!("{}?id=eq.{}", APPOINTMENTS, appointment.id);
        let mut rows: Vec<Appointment> = self
            .supabase
            .request_returning(Method::PATCH, &path, Some(serde_json::to_value(appointment)?))
            .await?;
        Ok(rows.pop())
    }

    async fn delete(&self, id: Uuid) -> Result<Option<Appointment>> {
        let path = format!("{}?id=eq.{}", APPOINTMENTS, id);
        let mut rows: Vec<Appointment> = self
            .supabase
            .request_returning(Method::DELETE, &path, None)
            .await?;
        Ok(rows.pop())
    }
}

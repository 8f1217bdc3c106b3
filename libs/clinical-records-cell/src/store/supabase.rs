use std::marker::PhantomData;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Method;
use uuid::Uuid;

use shared_database::SupabaseClient;

use crate::models::ClinicalRecord;
use super::RecordStore;

/// PostgREST-backed store for any record kind, keyed by `R::TABLE`.
pub struct SupabaseRecordStore<R> {
    supabase: Arc<SupabaseClient>,
    _record: PhantomData<fn() -> R>,
}

impl<R: ClinicalRecord> SupabaseRecordStore<R> {
    pub fn new(supabase: Arc<SupabaseClient>) -> Self {
        Self { supabase, _record: PhantomData }
    }

    fn table() -> String {
        format!("/rest/v1/{}", R::TABLE)
    }
}

#[async_trait]
impl<R: ClinicalRecord> RecordStore<R> for SupabaseRecordStore<R> {
    async fn list_by_participant(&self, user_id: Uuid) -> Result<Vec<R>> {
        let path = format!(
            "{}?or=(doctor_id.eq.{},patient_id.eq.{})&order=created_at.asc",
            Self::table(), user_id, user_id
        );
        self.supabase.request(Method::GET, &path, None).await
    }

    async fn get(&self, id: Uuid) -> Result<Option<R>> {
        let path = format!("{}?id=eq.{}", Self::table(), id);
        let mut rows: Vec<R> = self.supabase.request(Method::GET, &path, None).await?;
        Ok(rows.pop())
    }

    async fn create(&self, record: &R) -> Result<R> {
        let mut rows: Vec<R> = self
            .supabase
            .request_returning(Method::POST, &Self::table(), Some(serde_json::to_value(record)?))
            .await?;
        rows.pop()
            .ok_or_else(|| anyhow!("{} insert returned no rows", R::LABEL))
    }

    async fn update(&self, record: &R) -> Result<Option<R>> {
        let path = format!("{}?id=eq.{}", Self::table(), record.id());
        let mut rows: Vec<R> = self
            .supabase
            .request_returning(Method::PATCH, &path, Some(serde_json::to_value(record)?))
            .await?;
        Ok(rows.pop())
    }

    async fn delete(&self, id: Uuid) -> Result<Option<R>> {
        let path = format!("{}?id=eq.{}", Self::table(), id);
        let mut rows: Vec<R> = self
            .supabase
            .request_returning(Method::DELETE, &path, None)
            .await?;
        Ok(rows.pop())
    }
}

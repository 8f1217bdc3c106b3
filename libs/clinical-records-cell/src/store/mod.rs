mod memory;
mod supabase;

pub use memory::InMemoryRecordStore;
pub use supabase::SupabaseRecordStore;

use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

use crate::models::ClinicalRecord;

#[async_trait]
pub trait RecordStore<R: ClinicalRecord>: Send + Sync {
    /// Records where `user_id` is either the doctor or the patient.
    async fn list_by_participant(&self, user_id: Uuid) -> Result<Vec<R>>;

    async fn get(&self, id: Uuid) -> Result<Option<R>>;

    async fn create(&self, record: &R) -> Result<R>;

    async fn update(&self, record: &R) -> Result<Option<R>>;

    async fn delete(&self, id: Uuid) -> Result<Option<R>>;
}

use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::ClinicalRecord;
use super::RecordStore;

pub struct InMemoryRecordStore<R> {
    records: RwLock<HashMap<Uuid, R>>,
}

impl<R> InMemoryRecordStore<R> {
    pub fn new() -> Self {
        Self { records: RwLock::new(HashMap::new()) }
    }
}

impl<R> Default for InMemoryRecordStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<R: ClinicalRecord> RecordStore<R> for InMemoryRecordStore<R> {
    async fn list_by_participant(&self, user_id: Uuid) -> Result<Vec<R>> {
        let mut found: Vec<R> = self
            .records
            .read()
            .await
            .values()
            .filter(|r| r.participants().contains(&user_id))
            .cloned()
            .collect();
        found.sort_by_key(|r| r.created_at());
        Ok(found)
    }

    async fn get(&self, id: Uuid) -> Result<Option<R>> {
        Ok(self.records.read().await.get(&id).cloned())
    }

    async fn create(&self, record: &R) -> Result<R> {
        self.records.write().await.insert(record.id(), record.clone());
        Ok(record.clone())
    }

    async fn update(&self, record: &R) -> Result<Option<R>> {
        let mut records = self.records.write().await;
        Ok(records.get_mut(&record.id()).map(|slot| {
            *slot = record.clone();
            slot.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> Result<Option<R>> {
        Ok(self.records.write().await.remove(&id))
    }
}

use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use scheduling_cell::{authorize, authorize_participant, Action};
use shared_models::auth::Identity;
use shared_utils::validation::is_valid_email;

use crate::models::{ClinicalRecord, RecordDraft, RecordsError};
use crate::store::RecordStore;

/// CRUD for one record kind with the doctor-authored ownership rules.
pub struct RecordsService<R: ClinicalRecord> {
    store: Arc<dyn RecordStore<R>>,
}

impl<R: ClinicalRecord> RecordsService<R> {
    pub fn new(store: Arc<dyn RecordStore<R>>) -> Self {
        Self { store }
    }

    pub async fn list(&self, caller: &Identity) -> Result<Vec<R>, RecordsError> {
        debug!("Listing {} rows for {}", R::TABLE, caller.id);
        self.store
            .list_by_participant(caller.id)
            .await
            .map_err(storage)
    }

    pub async fn get(&self, caller: &Identity, id: Uuid) -> Result<R, RecordsError> {
        let record = self.load(id).await?;
        authorize_participant(caller, &record.participants())?;
        Ok(record)
    }

    pub async fn create(&self, caller: &Identity, draft: R::Draft) -> Result<R, RecordsError> {
        authorize(Action::CreateRecord, caller, None)?;
        check_email(&draft)?;

        let record = self
            .store
            .create(&R::from_draft(caller, draft))
            .await
            .map_err(storage)?;

        info!("{} {} written by doctor {}", R::LABEL, record.id(), caller.id);
        Ok(record)
    }

    pub async fn update(&self, caller: &Identity, id: Uuid, draft: R::Draft) -> Result<R, RecordsError> {
        let existing = self.load(id).await?;
        authorize(Action::MutateRecord, caller, Some(existing.doctor_id()))?;
        check_email(&draft)?;

        let updated = self
            .store
            .update(&existing.revise(caller, draft))
            .await
            .map_err(storage)?
            .ok_or(RecordsError::NotFound(R::LABEL))?;

        info!("{} {} revised", R::LABEL, updated.id());
        Ok(updated)
    }

    pub async fn delete(&self, caller: &Identity, id: Uuid) -> Result<(), RecordsError> {
        let existing = self.load(id).await?;
        authorize(Action::MutateRecord, caller, Some(existing.doctor_id()))?;

        self.store
            .delete(id)
            .await
            .map_err(storage)?
            .ok_or(RecordsError::NotFound(R::LABEL))?;

        info!("{} {} deleted", R::LABEL, id);
        Ok(())
    }

    async fn load(&self, id: Uuid) -> Result<R, RecordsError> {
        self.store
            .get(id)
            .await
            .map_err(storage)?
            .ok_or(RecordsError::NotFound(R::LABEL))
    }
}

fn check_email(draft: &impl RecordDraft) -> Result<(), RecordsError> {
    let email = draft.patient_email();
    if is_valid_email(email) {
        Ok(())
    } else {
        Err(RecordsError::InvalidEmail(email.to_string()))
    }
}

fn storage(e: anyhow::Error) -> RecordsError {
    RecordsError::Storage(e.to_string())
}

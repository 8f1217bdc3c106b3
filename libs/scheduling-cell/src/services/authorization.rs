use thiserror::Error;
use uuid::Uuid;

use shared_models::auth::Identity;

use crate::models::SchedulingError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    CreateAvailability,
    MutateAvailability,
    CreateAppointment,
    UpdateAppointment,
    DeleteAppointment,
    CreateRecord,
    MutateRecord,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("{0}")]
    Forbidden(String),
}

impl From<AuthError> for SchedulingError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::Forbidden(msg) => SchedulingError::Forbidden(msg),
        }
    }
}

/// Decide whether `identity` may perform `action` on a resource owned by
/// `resource_owner_id`. Pure: reads nothing beyond its arguments.
pub fn authorize(
    action: Action,
    identity: &Identity,
    resource_owner_id: Option<Uuid>,
) -> Result<(), AuthError> {
    match action {
        Action::CreateAvailability => require_doctor(identity, "Only a user with doctor role can create schedule"),
        Action::MutateAvailability => require_owner(identity, resource_owner_id, "This schedule does not belong to you"),
        // Either role may book or rewrite an appointment.
        Action::CreateAppointment | Action::UpdateAppointment => Ok(()),
        Action::DeleteAppointment => require_doctor(identity, "Only a doctor can delete appointment"),
        Action::CreateRecord => require_doctor(identity, "Only a doctor can create this record"),
        Action::MutateRecord => require_owner(identity, resource_owner_id, "This record does not belong to you"),
    }
}

/// Read access: the caller must be one of the resource's participants.
pub fn authorize_participant(identity: &Identity, participants: &[Uuid]) -> Result<(), AuthError> {
    if participants.contains(&identity.id) {
        Ok(())
    } else {
        Err(AuthError::Forbidden("You are not a participant of this resource".to_string()))
    }
}

fn require_doctor(identity: &Identity, message: &str) -> Result<(), AuthError> {
    if identity.is_doctor {
        Ok(())
    } else {
        Err(AuthError::Forbidden(message.to_string()))
    }
}

fn require_owner(identity: &Identity, owner: Option<Uuid>, message: &str) -> Result<(), AuthError> {
    match owner {
        Some(owner) if owner == identity.id => Ok(()),
        _ => Err(AuthError::Forbidden(message.to_string())),
    }
}

pub mod handlers;
pub mod models;
pub mod router;
pub mod services;
pub mod store;

pub use models::*;
pub use services::authorization::{authorize, authorize_participant, Action, AuthError};
pub use services::booking::BookingService;
pub use services::conflict::ConflictValidator;
pub use services::interval::{contains, overlaps};
pub use services::locks::{DoctorGuard, DoctorLocks};
pub use store::{
    AppointmentStore, AvailabilityStore, InMemoryAppointmentStore, InMemoryAvailabilityStore,
    SupabaseAppointmentStore, SupabaseAvailabilityStore,
};

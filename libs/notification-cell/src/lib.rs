pub mod handlers;
pub mod models;
pub mod router;
pub mod services;
pub mod store;

pub use models::*;
pub use services::{EmailClient, NotificationDispatcher, NotificationService};
pub use store::{InMemoryNotificationStore, NotificationStore, SupabaseNotificationStore};

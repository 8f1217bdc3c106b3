pub mod dispatcher;
pub mod email;

pub use dispatcher::{NotificationDispatcher, NotificationService};
pub use email::EmailClient;

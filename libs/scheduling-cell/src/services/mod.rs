pub mod authorization;
pub mod booking;
pub mod conflict;
pub mod interval;
pub mod locks;

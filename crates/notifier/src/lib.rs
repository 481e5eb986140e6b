//! Notifier crate: mail gateway client, message templates and event routing.
/// Mail gateway client
pub mod client;
/// Delivery error taxonomy
pub mod error;
/// Message templates and per-event routing
pub mod templates;

pub use client::Mailer;
pub use error::SendError;
pub use templates::{NotificationJob, route};

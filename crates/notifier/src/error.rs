use thiserror::Error;

/// Why a notification could not be delivered.
///
/// Delivery failures are a notification-layer concern: they are logged and
/// the job is dropped, but they never block sibling sends or cursor
/// advancement.
#[derive(Debug, Error)]
pub enum SendError {
    /// The recipient address is not a plausible email address. Permanent:
    /// the send is never attempted on the wire.
    #[error("invalid recipient address {0:?}")]
    InvalidRecipient(String),
    /// The mail gateway rejected the request or could not be reached
    /// (authentication, connection, quota, timeout). Transient, but not
    /// retried within this process.
    #[error("mail transport failure: {0}")]
    Transport(#[from] reqwest::Error),
}

impl SendError {
    /// Whether the failure is permanent for this event occurrence.
    pub const fn is_permanent(&self) -> bool {
        matches!(self, Self::InvalidRecipient(_))
    }
}

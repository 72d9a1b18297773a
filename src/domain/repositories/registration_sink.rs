use async_trait::async_trait;
use thiserror::Error;

use crate::domain::registration::SheetRecord;

/// Acknowledgement from the spreadsheet webhook
///
/// An ack means the webhook accepted the request. The response body is kept
/// for logging only; nothing confirms the row was actually stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayAck {
    /// Status of the response that completed delivery
    pub status: u16,
    /// True when delivery went through the redirect fallback
    pub via_redirect: bool,
    pub body: String,
}

/// Reasons a relay attempt failed. Every variant is fatal for the submission.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("webhook unreachable: {0}")]
    Unreachable(String),

    #[error("webhook request failed: {status}")]
    Status { status: u16 },

    #[error("could not extract redirect URL from 302 response")]
    RedirectTargetMissing,

    #[error("invalid redirect URL {url}: {reason}")]
    InvalidRedirectUrl { url: String, reason: String },

    #[error("redirect failed: {status}")]
    RedirectStatus { status: u16 },

    #[error("redirect request failed: {0}")]
    RedirectUnreachable(String),
}

pub type RelayResult<T> = Result<T, RelayError>;

/// Destination for validated registrations
///
/// The spreadsheet behind it is the only store of record; implementations
/// perform at most one delivery attempt per call.
#[async_trait]
pub trait RegistrationSink: Send + Sync {
    /// Deliver one spreadsheet row
    async fn submit(&self, record: &SheetRecord) -> RelayResult<RelayAck>;
}

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::registration::Submission;

/// Raw reply from the registration endpoint
///
/// The body is kept as text; the wizard decides how to read it based on
/// the status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiReply {
    pub status: u16,
    pub body: String,
}

impl ApiReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Failures that prevented any reply from arriving
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{0}")]
    Network(String),

    #[error("invalid endpoint URL: {0}")]
    InvalidEndpoint(String),

    #[error("unexpected reply ({status}): {detail}")]
    UnexpectedReply { status: u16, detail: String },
}

/// Port the wizard uses to send its single submission
#[async_trait]
pub trait RegistrationApi: Send + Sync {
    async fn register(&self, submission: &Submission) -> Result<ApiReply, ClientError>;
}

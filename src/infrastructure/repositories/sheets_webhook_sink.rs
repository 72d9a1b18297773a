use async_trait::async_trait;
use reqwest::redirect::{Action, Attempt, Policy};
use reqwest::{Client, StatusCode};
use std::time::Duration;

use super::redirect;
use crate::domain::registration::SheetRecord;
use crate::domain::repositories::{RegistrationSink, RelayAck, RelayError, RelayResult};

/// Hops followed before a redirect chain is treated as a failure
const MAX_REDIRECTS: usize = 10;

/// Spreadsheet webhook implementation of RegistrationSink
///
/// Posts each row as JSON. The POST client stops on a 302 so the webhook's
/// "Moved Temporarily" page can be delivered through the GET fallback; any
/// other redirect is followed. The fallback GET follows redirects normally.
pub struct SheetsWebhookSink {
    client: Client,
    fallback_client: Client,
    webhook_url: String,
}

impl SheetsWebhookSink {
    /// Creates a new SheetsWebhookSink
    ///
    /// # Arguments
    /// * `webhook_url` - Endpoint that receives the POSTed rows
    /// * `timeout` - Upper bound for each outbound request
    pub fn new(webhook_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .redirect(Policy::custom(stop_on_found))
            .timeout(timeout)
            .build()?;
        let fallback_client = Client::builder()
            .redirect(Policy::limited(MAX_REDIRECTS))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            fallback_client,
            webhook_url: webhook_url.into(),
        })
    }

    async fn follow_redirect(&self, body: &str, record: &SheetRecord) -> RelayResult<RelayAck> {
        let target = redirect::extract_href(body).ok_or(RelayError::RedirectTargetMissing)?;
        let url = redirect::fallback_url(&target, record)?;
        tracing::info!(redirect_url = %target, "following webhook redirect");

        let response = self
            .fallback_client
            .get(url)
            .send()
            .await
            .map_err(|e| RelayError::RedirectUnreachable(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| RelayError::RedirectUnreachable(e.to_string()))?;
        tracing::debug!(status = status.as_u16(), body = %body, "redirect response");

        if !status.is_success() {
            return Err(RelayError::RedirectStatus {
                status: status.as_u16(),
            });
        }

        Ok(RelayAck {
            status: status.as_u16(),
            via_redirect: true,
            body,
        })
    }
}

/// Hands a 302 back to the caller and follows every other redirect
fn stop_on_found(attempt: Attempt) -> Action {
    if attempt.status() == StatusCode::FOUND {
        attempt.stop()
    } else if attempt.previous().len() > MAX_REDIRECTS {
        attempt.error("too many redirects")
    } else {
        attempt.follow()
    }
}

#[async_trait]
impl RegistrationSink for SheetsWebhookSink {
    async fn submit(&self, record: &SheetRecord) -> RelayResult<RelayAck> {
        tracing::debug!(team_name = %record.team_name, "sending row to webhook");

        let response = self
            .client
            .post(&self.webhook_url)
            .json(record)
            .send()
            .await
            .map_err(|e| RelayError::Unreachable(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| RelayError::Unreachable(e.to_string()))?;
        tracing::debug!(status = status.as_u16(), body = %body, "webhook response");

        if redirect::is_redirect(status.as_u16(), &body) {
            return self.follow_redirect(&body, record).await;
        }

        if !status.is_success() {
            return Err(RelayError::Status {
                status: status.as_u16(),
            });
        }

        Ok(RelayAck {
            status: status.as_u16(),
            via_redirect: false,
            body,
        })
    }
}

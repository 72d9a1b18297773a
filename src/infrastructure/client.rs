use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::domain::registration::{ProblemCatalog, ProblemTracksResponse, Submission};
use crate::domain::wizard::{ApiReply, ClientError, RegistrationApi};

/// Path of the registration endpoint on the service
pub const REGISTER_PATH: &str = "/api/register";
/// Path of the problem-track listing on the service
pub const PROBLEM_TRACKS_PATH: &str = "/api/problem-tracks";

/// HTTP implementation of RegistrationApi
///
/// Posts the submission as JSON and hands back the raw status and body.
pub struct HttpRegistrationClient {
    client: Client,
    endpoint: Url,
    tracks_endpoint: Url,
}

impl HttpRegistrationClient {
    /// Creates a client for the service at `base_url`
    ///
    /// # Example
    /// ```
    /// use teamreg::infrastructure::client::HttpRegistrationClient;
    ///
    /// let client = HttpRegistrationClient::new("http://localhost:3000").expect("valid url");
    /// assert_eq!(client.endpoint().as_str(), "http://localhost:3000/api/register");
    /// ```
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let invalid =
            |e: url::ParseError| ClientError::InvalidEndpoint(format!("{}: {}", base_url, e));
        let base = Url::parse(base_url).map_err(invalid)?;
        let endpoint = base.join(REGISTER_PATH).map_err(invalid)?;
        let tracks_endpoint = base.join(PROBLEM_TRACKS_PATH).map_err(invalid)?;

        Ok(Self {
            client: Client::new(),
            endpoint,
            tracks_endpoint,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Fetches the problem-track catalog the service is configured with
    pub async fn problem_tracks(&self) -> Result<ProblemCatalog, ClientError> {
        let response = self
            .client
            .get(self.tracks_endpoint.clone())
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            return Err(ClientError::UnexpectedReply {
                status,
                detail: "problem tracks unavailable".to_string(),
            });
        }

        let listing: ProblemTracksResponse =
            response.json().await.map_err(|e| ClientError::UnexpectedReply {
                status,
                detail: e.to_string(),
            })?;

        Ok(ProblemCatalog::from(listing))
    }
}

#[async_trait]
impl RegistrationApi for HttpRegistrationClient {
    async fn register(&self, submission: &Submission) -> Result<ApiReply, ClientError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(submission)
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;
        tracing::debug!(status, body = %body, "registration endpoint replied");

        Ok(ApiReply { status, body })
    }
}

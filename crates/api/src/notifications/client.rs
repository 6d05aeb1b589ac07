//! HTTP client for the preference service.

use async_trait::async_trait;
use prefgate_core::envelope::ApiResponse;
use prefgate_core::preferences::PreferenceSnapshot;
use prefgate_core::types::UserId;

use crate::config::UsersClientConfig;

/// Why a preference lookup produced no snapshot.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Request to preference service failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Preference service returned HTTP {status}")]
    Status { status: u16 },

    #[error("Preference service reported failure: {}", .0.as_deref().unwrap_or("no message"))]
    Unsuccessful(Option<String>),

    #[error("Preference service response carried no data")]
    MissingPayload,
}

/// Somewhere a user's current preferences can be fetched from.
#[async_trait]
pub trait PreferenceSource: Send + Sync {
    async fn fetch(&self, user_id: UserId) -> Result<PreferenceSnapshot, ClientError>;
}

/// Calls `GET {base_url}/preferences/user/{userId}` on the preference
/// service, bounded by the configured timeout.
#[derive(Clone)]
pub struct UsersServiceClient {
    http: reqwest::Client,
    base_url: String,
}

impl UsersServiceClient {
    pub fn new(config: &UsersClientConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.timeout)
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl PreferenceSource for UsersServiceClient {
    async fn fetch(&self, user_id: UserId) -> Result<PreferenceSnapshot, ClientError> {
        let url = format!("{}/preferences/user/{user_id}", self.base_url);
        let response = self.http.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
            });
        }

        let envelope: ApiResponse<PreferenceSnapshot> = response.json().await?;
        if !envelope.success {
            return Err(ClientError::Unsuccessful(envelope.message));
        }
        envelope.data.ok_or(ClientError::MissingPayload)
    }
}

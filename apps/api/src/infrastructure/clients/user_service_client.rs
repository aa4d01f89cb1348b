use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::{debug, instrument};
use url::Url;
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::ports::UserDirectory;

/// Logical name the user-service is registered under
pub const USER_SERVICE: &str = "user-service";

/// Resolves user references against a remote user-service.
///
/// Calls `GET {base}/api/users/{id}`: a success status means the user
/// exists, 404 means it does not. Any other status or a transport failure
/// is reported as an upstream error rather than guessed at.
pub struct HttpUserDirectory {
    client: reqwest::Client,
    base: Url,
}

impl HttpUserDirectory {
    pub fn new(client: reqwest::Client, base: Url) -> Self {
        Self { client, base }
    }

    fn user_url(&self, id: Uuid) -> Result<Url, DomainError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| DomainError::upstream(USER_SERVICE, "invalid user-service base URL"))?
            .pop_if_empty()
            .extend(&["api", "users", &id.to_string()]);
        Ok(url)
    }
}

#[async_trait]
impl UserDirectory for HttpUserDirectory {
    #[instrument(
        name = "shifts.http.user_service.user_exists",
        skip_all,
        fields(base = %self.base, user_id = %id)
    )]
    async fn user_exists(&self, id: Uuid) -> Result<bool, DomainError> {
        let url = self.user_url(id)?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| DomainError::upstream(USER_SERVICE, e.to_string()))?;

        let status = response.status();
        debug!(%status, "user-service responded");
        match status {
            s if s.is_success() => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            s => Err(DomainError::upstream(USER_SERVICE, format!("HTTP {}", s))),
        }
    }
}

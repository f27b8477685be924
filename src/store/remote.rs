//! REST client for the lesson planner API.
//!
//! Endpoints: `GET /health`, `GET /subjects`, `POST /subjects`,
//! `PUT /subjects/{id}`, `DELETE /subjects/{id}`. Bodies are the subject
//! JSON shape.

use std::time::Duration;

use crate::schedule::Subject;

use super::StoreError;

#[derive(Debug, Clone)]
pub struct RemoteApi {
    client: reqwest::Client,
    base_url: String,
}

impl RemoteApi {
    /// * `base_url` - API root, e.g. `http://localhost:3001/api`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `true` when the API answers `/health` with a success status.
    /// Transport failures count as unhealthy rather than as errors.
    pub async fn health(&self) -> bool {
        match self.client.get(self.url("/health")).send().await {
            Ok(response) if response.status().is_success() => true,
            Ok(response) => {
                tracing::warn!(status = response.status().as_u16(), "API health check failed");
                false
            }
            Err(e) => {
                tracing::warn!(error = %e, url = %self.base_url, "API unreachable");
                false
            }
        }
    }

    pub async fn list(&self) -> Result<Vec<Subject>, StoreError> {
        tracing::debug!("GET /subjects");
        let response = self.client.get(self.url("/subjects")).send().await?;
        Self::parse_response(response).await
    }

    pub async fn create(&self, subject: &Subject) -> Result<(), StoreError> {
        tracing::debug!(id = subject.id(), "POST /subjects");
        let response = self
            .client
            .post(self.url("/subjects"))
            .json(subject)
            .send()
            .await?;
        Self::check_status(response).await
    }

    pub async fn update(&self, subject: &Subject) -> Result<(), StoreError> {
        tracing::debug!(id = subject.id(), "PUT /subjects/{{id}}");
        let response = self
            .client
            .put(self.url(&format!("/subjects/{}", subject.id())))
            .json(subject)
            .send()
            .await?;
        Self::check_status(response).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), StoreError> {
        tracing::debug!(id, "DELETE /subjects/{{id}}");
        let response = self
            .client
            .delete(self.url(&format!("/subjects/{}", id)))
            .send()
            .await?;
        Self::check_status(response).await
    }

    // ---- private helpers ----

    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, StoreError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            tracing::error!(status = status.as_u16(), %body, "API returned an error");
            return Err(StoreError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, StoreError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }

    async fn check_status(response: reqwest::Response) -> Result<(), StoreError> {
        Self::ensure_success(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_drops_trailing_slash() {
        let api = RemoteApi::with_client(reqwest::Client::new(), "http://localhost:3001/api/");
        assert_eq!(api.base_url(), "http://localhost:3001/api");
        assert_eq!(api.url("/subjects"), "http://localhost:3001/api/subjects");
    }
}

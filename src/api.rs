//! Client for the series REST backend.
//!
//! Every call takes the session explicitly and carries its bearer
//! token; nothing here reads ambient state. A 401 or 403 from any
//! endpoint maps to [`ApiError::SessionExpired`] so callers can treat
//! an expired token uniformly, regardless of which action hit it.

use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use crate::models::{Episode, EpisodeBody, Series, SeriesBody};
use crate::session::Session;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The backend rejected the token (401/403). The session must be
    /// ended immediately.
    #[error("session expired")]
    SessionExpired,

    #[error("request failed with status {0}")]
    Status(StatusCode),

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    client: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn list_series(&self, session: &Session) -> ApiResult<Vec<Series>> {
        self.execute(self.request(session, Method::GET, "/series"))
            .await
    }

    pub async fn get_series(&self, session: &Session, series_id: &str) -> ApiResult<Series> {
        self.execute(self.request(session, Method::GET, &format!("/series/{series_id}")))
            .await
    }

    pub async fn create_series(
        &self,
        session: &Session,
        body: &SeriesBody,
    ) -> ApiResult<Series> {
        self.execute(self.request(session, Method::POST, "/series").json(body))
            .await
    }

    pub async fn update_series(
        &self,
        session: &Session,
        series_id: &str,
        body: &SeriesBody,
    ) -> ApiResult<Series> {
        self.execute(
            self.request(session, Method::PATCH, &format!("/series/{series_id}"))
                .json(body),
        )
        .await
    }

    pub async fn delete_series(&self, session: &Session, series_id: &str) -> ApiResult<Series> {
        self.execute(self.request(session, Method::DELETE, &format!("/series/{series_id}")))
            .await
    }

    pub async fn add_episode(
        &self,
        session: &Session,
        series_id: &str,
        body: &EpisodeBody,
    ) -> ApiResult<Episode> {
        self.execute(
            self.request(
                session,
                Method::PATCH,
                &format!("/series/{series_id}/add-episode"),
            )
            .json(body),
        )
        .await
    }

    pub async fn update_episode(
        &self,
        session: &Session,
        series_id: &str,
        episode_id: &str,
        body: &EpisodeBody,
    ) -> ApiResult<Episode> {
        self.execute(
            self.request(
                session,
                Method::PATCH,
                &format!("/series/{series_id}/update-episode/{episode_id}"),
            )
            .json(body),
        )
        .await
    }

    pub async fn remove_episode(
        &self,
        session: &Session,
        series_id: &str,
        episode_id: &str,
    ) -> ApiResult<Episode> {
        self.execute(self.request(
            session,
            Method::PATCH,
            &format!("/series/{series_id}/remove-episode/{episode_id}"),
        ))
        .await
    }

    fn request(&self, session: &Session, method: Method, path: &str) -> RequestBuilder {
        debug!(%method, path, "api request");
        self.client
            .request(method, self.endpoint(path))
            .bearer_auth(&session.token)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
    }

    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> ApiResult<T> {
        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ApiError::SessionExpired);
        }
        if !status.is_success() {
            return Err(ApiError::Status(status));
        }

        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_paths() {
        let client = ApiClient::new("http://localhost:4000");
        assert_eq!(client.endpoint("/series"), "http://localhost:4000/series");
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let client = ApiClient::new("http://localhost:4000/");
        assert_eq!(
            client.endpoint("/series/abc"),
            "http://localhost:4000/series/abc"
        );
    }
}

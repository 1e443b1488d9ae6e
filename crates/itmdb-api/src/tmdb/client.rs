//! `TmdbClient` - TMDb API client implementation.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::instrument;
use url::Url;

use super::api::LocalTmdbApi;
use super::params::{SearchMovieParams, TmdbErrorResponse};
use super::rate_limiter::RateLimiter;
use crate::configuration::TmdbConfiguration;
use crate::error::FetchError;
use crate::options::FetchOptions;

/// Default base URL for TMDb API v3.
const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3/";

/// Maximum number of retries for HTTP 429 responses.
const MAX_RETRIES: u32 = 3;

/// Backoff step between retries (multiplied by the retry count).
const RETRY_BACKOFF: Duration = Duration::from_secs(1);

/// TMDb API client.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbClient {
    /// HTTP client.
    http_client: Client,
    /// Base URL for API requests.
    base_url: Url,
    /// Bearer API token.
    api_token: String,
    /// Request pacing.
    rate_limiter: Arc<Mutex<RateLimiter>>,
    /// Backoff step for 429 retries.
    retry_backoff: Duration,
}

/// Builder for `TmdbClient`.
#[derive(Debug, Default)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbClientBuilder {
    base_url: Option<Url>,
    api_token: Option<String>,
    user_agent: Option<String>,
    min_interval: Option<Duration>,
    retry_backoff: Option<Duration>,
}

impl TmdbClientBuilder {
    /// Overrides the base URL (for wiremock in tests).
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the API bearer token (required).
    #[must_use]
    pub fn api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    /// Sets the User-Agent (required).
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Sets the minimum request interval (default: 25ms).
    #[must_use]
    pub const fn min_interval(mut self, interval: Duration) -> Self {
        self.min_interval = Some(interval);
        self
    }

    /// Sets the 429 backoff step (default: 1s).
    #[must_use]
    pub const fn retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff = Some(backoff);
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// - `api_token` is not set or empty.
    /// - `user_agent` is not set.
    /// - `reqwest::Client` build fails.
    pub fn build(self) -> Result<TmdbClient> {
        let api_token = self
            .api_token
            .filter(|t| !t.trim().is_empty())
            .context("api_token is required")?;
        let user_agent = self.user_agent.context("user_agent is required")?;

        let base_url = match self.base_url {
            Some(url) => url,
            None => Url::parse(DEFAULT_BASE_URL).context("invalid default base URL")?,
        };

        let rate_limiter = self
            .min_interval
            .map_or_else(RateLimiter::default, RateLimiter::new);

        let http_client = Client::builder()
            .user_agent(&user_agent)
            .gzip(true)
            .build()
            .context("failed to build HTTP client")?;

        Ok(TmdbClient {
            http_client,
            base_url,
            api_token,
            rate_limiter: Arc::new(Mutex::new(rate_limiter)),
            retry_backoff: self.retry_backoff.unwrap_or(RETRY_BACKOFF),
        })
    }
}

impl TmdbClient {
    /// Creates a new builder.
    #[must_use]
    pub fn builder() -> TmdbClientBuilder {
        TmdbClientBuilder::default()
    }

    /// Sends a GET request with Bearer auth, query params, and rate limiting.
    /// Retries up to `MAX_RETRIES` times on HTTP 429.
    #[instrument(skip_all, fields(path = path))]
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, FetchError> {
        self.rate_limiter.lock().await.wait().await;

        let url = self
            .base_url
            .join(path)
            .map_err(|e| FetchError::Transport(format!("invalid request path {path}: {e}")))?;

        let mut retries = 0u32;
        loop {
            let request = self
                .http_client
                .get(url.clone())
                .bearer_auth(&self.api_token)
                .query(query)
                .build()?;

            tracing::debug!(url = %request.url(), "TMDB API request");

            let response = self.http_client.execute(request).await?;
            let status = response.status();

            if status == StatusCode::TOO_MANY_REQUESTS {
                retries = retries.saturating_add(1);
                if retries > MAX_RETRIES {
                    return Err(FetchError::Transport(format!(
                        "rate limit exceeded after {MAX_RETRIES} retries: {path}"
                    )));
                }
                tracing::warn!(
                    retry = retries,
                    max_retries = MAX_RETRIES,
                    "TMDB API rate limited (429). Retrying..."
                );
                tokio::time::sleep(self.retry_backoff.saturating_mul(retries)).await;
                self.rate_limiter.lock().await.wait().await;
                continue;
            }

            if !status.is_success() {
                let body = response
                    .text()
                    .await
                    .unwrap_or_else(|_| String::from("<failed to read body>"));
                let detail = serde_json::from_str::<TmdbErrorResponse>(&body).map_or(
                    body,
                    |e| format!("code={}, message={}", e.status_code, e.status_message),
                );
                if status == StatusCode::NOT_FOUND {
                    return Err(FetchError::NotFound(format!("{path}: {detail}")));
                }
                return Err(FetchError::Transport(format!(
                    "TMDB API error (HTTP {status}): {detail}"
                )));
            }

            let body = response.text().await?;
            return serde_json::from_str(&body)
                .map_err(|e| FetchError::MalformedResponse(format!("{path}: {e}")));
        }
    }
}

impl LocalTmdbApi for TmdbClient {
    #[instrument(skip(self, language))]
    async fn movie_details(
        &self,
        movie_id: u64,
        options: FetchOptions,
        language: &str,
    ) -> Result<Value, FetchError> {
        let path = format!("movie/{movie_id}");
        let mut query = vec![("language", String::from(language))];
        if let Some(append) = options.append_to_response() {
            query.push(("append_to_response", append));
        }
        self.get_json(&path, &query).await
    }

    #[instrument(skip_all)]
    async fn search_movie(&self, params: &SearchMovieParams) -> Result<Value, FetchError> {
        self.get_json("search/movie", &params.to_query()).await
    }

    #[instrument(skip_all)]
    async fn configuration(&self) -> Result<TmdbConfiguration, FetchError> {
        self.get_json("configuration", &[]).await
    }
}

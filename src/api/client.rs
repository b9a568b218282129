//! HTTP client over the ordering backend.

use reqwest::{Client, Method, Response, StatusCode, header};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::auth::TokenStore;

use super::ApiError;

/// Bearer-authenticated JSON client for the ordering API.
///
/// The token is read from the [`TokenStore`] per request; a 401 response
/// invalidates it locally before the error is surfaced.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http: Client,
    tokens: TokenStore,
}

impl ApiClient {
    /// Create a client for the API rooted at `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>, tokens: TokenStore) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Self {
            base_url,
            http: Client::new(),
            tokens,
        }
    }

    /// GET `path` and decode the JSON response.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-2xx response.
    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let request = self.request(Method::GET, path).await;

        self.handle_response(request.send().await?).await
    }

    /// Send `body` as JSON to `path` and decode the JSON response.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-2xx response.
    pub(crate) async fn send_json<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &impl Serialize,
    ) -> Result<T, ApiError> {
        let request = self.request(method, path).await.json(body);

        self.handle_response(request.send().await?).await
    }

    async fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}/{path}", self.base_url);
        let mut request = self.http.request(method, url);

        if let Some(token) = self.bearer().await {
            request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }

        request
    }

    async fn bearer(&self) -> Option<String> {
        match self.tokens.load().await {
            Ok(token) => token,
            Err(error) => {
                warn!(%error, "failed to read stored token, sending unauthenticated");
                None
            }
        }
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: Response,
    ) -> Result<T, ApiError> {
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            if let Err(error) = self.tokens.invalidate().await {
                warn!(%error, "failed to invalidate stored token after 401");
            }

            return Err(ApiError::Unauthorized);
        }

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();

            return Err(ApiError::Api {
                status: status.as_u16(),
                message: error_message(status, &text),
            });
        }

        Ok(response.json().await?)
    }
}

/// Pull the server's `message` field out of an error body, falling back
/// to the status line.
fn error_message(status: StatusCode, body: &str) -> String {
    #[derive(serde::Deserialize)]
    struct ErrorBody {
        message: Option<String>,
    }

    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|parsed| parsed.message)
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        })
}

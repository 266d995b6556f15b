//! GET/POST/DELETE over one configured [`reqwest::Client`].
//!
//! Every request carries the configured headers, basic-auth pair, and
//! timeouts. Transport failures come back as the untouched [`reqwest::Error`];
//! the dispatcher neither retries nor interprets status codes.

use flags::StoreError;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, StatusCode, Url};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::ClientConfig;

/// Status and body of a completed exchange.
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// Response status code.
    pub status: StatusCode,
    /// Response body as text.
    pub body: String,
}

impl RawResponse {
    /// Deserialises the body as JSON into `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}

/// Issues requests against absolute URLs with shared connection parameters.
#[derive(Debug, Clone)]
pub struct RequestDispatcher {
    client: reqwest::Client,
    basic_auth: Option<(String, SecretString)>,
}

impl RequestDispatcher {
    /// Builds the underlying client from `config`.
    ///
    /// # Errors
    ///
    /// [`StoreError::Configuration`] if a header name or value is not valid
    /// HTTP, or the client cannot be initialised.
    pub fn new(config: &ClientConfig) -> Result<Self, StoreError> {
        let mut headers = HeaderMap::new();
        for (name, value) in config.headers() {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| StoreError::configuration(format!("header name {name:?}: {e}")))?;
            let value = HeaderValue::from_str(&value)
                .map_err(|e| StoreError::configuration(format!("header {name}: {e}")))?;
            headers.insert(name, value);
        }

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = config.open_timeout() {
            builder = builder.connect_timeout(timeout);
        }
        if let Some(timeout) = config.read_timeout() {
            builder = builder.read_timeout(timeout);
        }
        let client = builder.build().map_err(StoreError::configuration)?;

        let basic_auth = config
            .basic_auth()
            .map(|(user, pass)| (user.to_string(), SecretString::new(pass.to_string())));

        Ok(Self { client, basic_auth })
    }

    /// Sends a GET with no body.
    pub async fn get(&self, url: Url) -> Result<RawResponse, reqwest::Error> {
        self.execute(Method::GET, url, None).await
    }

    /// Sends a POST with `payload` as the JSON body.
    pub async fn post(&self, url: Url, payload: &Value) -> Result<RawResponse, reqwest::Error> {
        self.execute(Method::POST, url, Some(payload)).await
    }

    /// Sends a DELETE, with `payload` as the JSON body when present.
    pub async fn delete(
        &self,
        url: Url,
        payload: Option<&Value>,
    ) -> Result<RawResponse, reqwest::Error> {
        self.execute(Method::DELETE, url, payload).await
    }

    async fn execute(
        &self,
        method: Method,
        url: Url,
        payload: Option<&Value>,
    ) -> Result<RawResponse, reqwest::Error> {
        debug!(%method, %url, has_body = payload.is_some(), "sending request");

        let mut request = self.client.request(method.clone(), url.clone());
        if let Some((username, password)) = &self.basic_auth {
            request = request.basic_auth(username, Some(password.expose_secret()));
        }
        // Serialised by hand so a configured Content-Type is not overwritten.
        if let Some(payload) = payload {
            request = request.body(payload.to_string());
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        debug!(%method, %url, status = status.as_u16(), "received response");
        Ok(RawResponse { status, body })
    }
}

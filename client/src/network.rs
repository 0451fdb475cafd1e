//! JSON-over-HTTP transport to the snake server.

use crate::error::{ClientError, ConnectivityError};
use log::{debug, trace};
use serde_json::Value;
use shared::JsonObject;
use std::fmt;
use std::time::Duration;
use tokio::runtime::{Builder, Runtime};

pub const DEFAULT_SERVER_URL: &str = "http://localhost:8081";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Start,
    Move,
    Image,
    Destroy,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::Start => "/start",
            Endpoint::Move => "/move",
            Endpoint::Image => "/image",
            Endpoint::Destroy => "/destroy",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// One blocking request/reply exchange with the server.
///
/// A returned object is always a complete, parsed JSON object. It may still
/// carry the server's soft `error` key; interpreting that is up to the caller.
pub trait Transport {
    fn post(&self, endpoint: Endpoint, body: &JsonObject) -> Result<JsonObject, ConnectivityError>;

    /// Like [`Transport::post`], but gives up after `limit` even when the
    /// transport otherwise waits indefinitely.
    fn post_within(
        &self,
        endpoint: Endpoint,
        body: &JsonObject,
        _limit: Duration,
    ) -> Result<JsonObject, ConnectivityError> {
        self.post(endpoint, body)
    }
}

impl<T: Transport + ?Sized> Transport for &T {
    fn post(&self, endpoint: Endpoint, body: &JsonObject) -> Result<JsonObject, ConnectivityError> {
        (**self).post(endpoint, body)
    }

    fn post_within(
        &self,
        endpoint: Endpoint,
        body: &JsonObject,
        limit: Duration,
    ) -> Result<JsonObject, ConnectivityError> {
        (**self).post_within(endpoint, body, limit)
    }
}

/// reqwest client driven by a private current-thread tokio runtime, so each
/// call blocks the calling task for the duration of the round-trip.
pub struct HttpTransport {
    base_url: String,
    client: reqwest::Client,
    runtime: Runtime,
    timeout: Option<Duration>,
}

impl HttpTransport {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, ClientError> {
        let runtime = Builder::new_current_thread().enable_all().build()?;

        Ok(HttpTransport {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
            runtime,
            timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: Endpoint) -> String {
        format!("{}{}", self.base_url, endpoint.path())
    }

    async fn round_trip(&self, url: &str, body: &JsonObject) -> Result<JsonObject, ConnectivityError> {
        let unreachable = |e: reqwest::Error| ConnectivityError::Unreachable {
            url: url.to_string(),
            reason: e.to_string(),
        };

        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(unreachable)?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(unreachable)?;

        trace!("{} replied {} ({} bytes)", url, status, bytes.len());

        match serde_json::from_slice::<Value>(&bytes) {
            Ok(Value::Object(object)) => Ok(object),
            Ok(other) => Err(ConnectivityError::Malformed {
                url: url.to_string(),
                reason: format!("expected a JSON object, got {}", json_kind(&other)),
            }),
            Err(e) => Err(ConnectivityError::Malformed {
                url: url.to_string(),
                reason: format!("status {}: {}", status, e),
            }),
        }
    }

    fn exchange(
        &self,
        endpoint: Endpoint,
        body: &JsonObject,
        timeout: Option<Duration>,
    ) -> Result<JsonObject, ConnectivityError> {
        let url = self.url(endpoint);
        debug!("POST {}", url);

        // The timer must be created inside the runtime, not before entering it
        self.runtime.block_on(async {
            match timeout {
                Some(limit) => match tokio::time::timeout(limit, self.round_trip(&url, body)).await {
                    Ok(result) => result,
                    Err(_) => Err(ConnectivityError::TimedOut {
                        url: url.clone(),
                        timeout: limit,
                    }),
                },
                None => self.round_trip(&url, body).await,
            }
        })
    }
}

impl Transport for HttpTransport {
    fn post(&self, endpoint: Endpoint, body: &JsonObject) -> Result<JsonObject, ConnectivityError> {
        self.exchange(endpoint, body, self.timeout)
    }

    fn post_within(
        &self,
        endpoint: Endpoint,
        body: &JsonObject,
        limit: Duration,
    ) -> Result<JsonObject, ConnectivityError> {
        let limit = self.timeout.map_or(limit, |configured| configured.min(limit));
        self.exchange(endpoint, body, Some(limit))
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

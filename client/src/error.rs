//! Error taxonomy for the client.
//!
//! Only [`ClientError`] ends the process. Everything else is either handled
//! where it occurs or promoted into a `ClientError` by the session controller.

use std::time::Duration;
use thiserror::Error;

/// The HTTP round-trip itself failed; no usable reply exists.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConnectivityError {
    #[error("unable to reach {url}: {reason}")]
    Unreachable { url: String, reason: String },

    #[error("request to {url} timed out after {timeout:?}")]
    TimedOut { url: String, timeout: Duration },

    #[error("malformed reply from {url}: {reason}")]
    Malformed { url: String, reason: String },
}

/// Why a frame could not be produced. The previous frame stays on screen.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RenderError {
    #[error("server could not render board: {0}")]
    Server(String),

    #[error("unable to fetch board image: {0}")]
    Network(#[from] ConnectivityError),

    #[error("could not decode board image: {0}")]
    Decode(String),

    #[error("could not encode board image request: {0}")]
    Encode(String),
}

/// Unrecoverable failures.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("unable to connect to server: {0}")]
    Connectivity(#[from] ConnectivityError),

    #[error("server refused to start a game: {0}")]
    StartRejected(String),

    #[error("failed to encode request: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("failed to set up HTTP runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

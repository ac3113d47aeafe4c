//! Error types for deckwire-client.

use std::time::Duration;

use thiserror::Error;

/// Main error type for all deckwire operations.
#[derive(Debug, Error)]
pub enum DeckwireError {
    /// I/O error on the underlying socket.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    ///
    /// Raised per message for malformed frames and for frames whose shape
    /// does not match their discriminator.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// WebSocket handshake, read or write failure.
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// Launch arguments missing or malformed.
    #[error("invalid launch arguments: {0}")]
    InvalidArgs(#[from] clap::Error),

    /// The `-info` document handed over by the host could not be parsed.
    #[error("invalid info document: {0}")]
    InvalidInfo(#[source] serde_json::Error),

    /// Connecting and registering did not finish in time.
    #[error("connection to host timed out after {0:?}")]
    ConnectTimeout(Duration),

    /// No handler registered for the given routing key.
    #[error("no handler found for {0:?}")]
    HandlerNotFound(String),

    /// A handler was registered for a different event shape than the one
    /// delivered under its routing key.
    #[error("handler expects {expected} but received {found}")]
    EventMismatch {
        /// Discriminator the handler accepts.
        expected: &'static str,
        /// Discriminator of the delivered event.
        found: String,
    },

    /// Connection closed.
    #[error("Connection closed")]
    ConnectionClosed,
}

/// Result type alias using DeckwireError.
pub type Result<T> = std::result::Result<T, DeckwireError>;

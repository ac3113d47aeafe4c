//! Registration message.
//!
//! Sent once, right after the channel opens, to tell the host which plugin
//! instance is on the other end. The host does not reply; it starts sending
//! events once it has accepted the registration.
//!
//! # Example
//!
//! ```
//! use deckwire_client::control::{build_register_message, LaunchArgs};
//!
//! let args = LaunchArgs::parse_args([
//!     "plugin", "-port", "28196", "-pluginUUID", "5A3B",
//!     "-registerEvent", "registerPlugin", "-info", "{}",
//! ])
//! .unwrap();
//! let json = build_register_message(&args).unwrap();
//! assert_eq!(json, r#"{"event":"registerPlugin","uuid":"5A3B"}"#);
//! ```

use serde::Serialize;

use super::LaunchArgs;
use crate::codec::JsonCodec;
use crate::error::Result;

/// The registration handshake message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisterMessage {
    /// Registration event name from `-registerEvent`.
    pub event: String,
    /// Plugin instance id from `-pluginUUID`.
    pub uuid: String,
}

impl RegisterMessage {
    /// Create a registration message.
    pub fn new(event: impl Into<String>, uuid: impl Into<String>) -> Self {
        Self {
            event: event.into(),
            uuid: uuid.into(),
        }
    }

    /// Registration message for the given launch arguments.
    pub fn from_args(args: &LaunchArgs) -> Self {
        Self::new(args.register_event.clone(), args.plugin_uuid.clone())
    }
}

/// Build the registration JSON for the given launch arguments.
pub fn build_register_message(args: &LaunchArgs) -> Result<String> {
    JsonCodec::encode(&RegisterMessage::from_args(args))
}

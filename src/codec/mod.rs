//! Codec module - JSON encoding and envelope decoding.
//!
//! - [`JsonCodec`] - `serde_json` encode/decode for whole messages
//! - [`decode_envelope`] - classify a raw frame by its `event` discriminator
//!   and decode it into an [`InboundEvent`](crate::event::InboundEvent)
//!
//! # Example
//!
//! ```
//! use deckwire_client::codec::decode_routed;
//!
//! let raw = br#"{"event":"touchTap","action":"com.x.press","context":"c1","device":"d1","payload":{"coordinates":{"column":1,"row":0},"hold":false}}"#;
//! let (key, _event) = decode_routed(raw).unwrap().unwrap();
//! assert_eq!(key.as_str(), "com.x.press/touchTap");
//!
//! // Unknown discriminators are dropped, not errors.
//! assert!(decode_routed(br#"{"event":"unknownFutureEvent"}"#).unwrap().is_none());
//! ```

mod envelope;
mod json;

pub use envelope::{decode_envelope, decode_routed, peek_discriminator};
pub use json::JsonCodec;

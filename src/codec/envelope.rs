//! Envelope decoding.
//!
//! A frame is decoded in two passes: first only the `event` discriminator is
//! read, then the whole frame is decoded into the shape [`EventKind`] maps
//! that discriminator to. Discriminators without a shape are reported and
//! come back as [`InboundEvent::Unrecognized`].

use serde::Deserialize;

use super::JsonCodec;
use crate::error::Result;
use crate::event::{EventKind, InboundEvent, RouteKey};

/// Just enough of an envelope to classify it.
#[derive(Deserialize)]
struct Discriminator {
    event: String,
}

/// Read the `event` discriminator of a raw frame.
///
/// # Errors
///
/// Returns [`DeckwireError::Json`](crate::DeckwireError::Json) if the frame
/// is not a JSON object or `event` is missing or not a string.
pub fn peek_discriminator(raw: &[u8]) -> Result<String> {
    let envelope: Discriminator = JsonCodec::decode(raw)?;
    Ok(envelope.event)
}

/// Decode a raw frame into an [`InboundEvent`].
///
/// Unknown and not-yet-supported discriminators are logged and returned as
/// [`InboundEvent::Unrecognized`]; they are never an error.
///
/// # Errors
///
/// Malformed frames and frames whose body does not fit the shape of their
/// discriminator. Both are per-frame failures.
pub fn decode_envelope(raw: &[u8]) -> Result<InboundEvent> {
    let name = peek_discriminator(raw)?;

    let decoded = match EventKind::from_wire(&name) {
        Some(kind) => kind.decode(raw)?,
        None => None,
    };

    match decoded {
        Some(event) => Ok(event),
        None => {
            tracing::warn!("{:?} is unimplemented", name);
            Ok(InboundEvent::Unrecognized { event: name })
        }
    }
}

/// Decode a raw frame and compute its routing key.
///
/// Returns `Ok(None)` for unrecognized events.
pub fn decode_routed(raw: &[u8]) -> Result<Option<(RouteKey, InboundEvent)>> {
    let event = decode_envelope(raw)?;
    Ok(event.route_key().map(|key| (key, event)))
}

//! Event module - the shapes exchanged with the host.
//!
//! - [`EventKind`] - every discriminator the host documents, and the mapping
//!   from discriminator to decode shape
//! - [`InboundEvent`] - decoded host-to-plugin events
//! - [`SetFeedbackEvent`] - plugin-to-host feedback
//!
//! # Example
//!
//! ```
//! use deckwire_client::event::{EventKind, InboundEvent};
//!
//! let raw = br#"{"event":"dialRotate","action":"com.x.volume","context":"c1","device":"d1","payload":{"ticks":3}}"#;
//! let event = EventKind::DialRotate.decode(raw).unwrap().unwrap();
//!
//! assert_eq!(event.route_key().unwrap().as_str(), "com.x.volume/dialRotate");
//! if let InboundEvent::DialRotate(rotate) = event {
//!     assert_eq!(rotate.payload.ticks, 3);
//! }
//! ```

mod kind;
mod received;
mod sent;

pub use kind::EventKind;
pub use received::{
    Coordinates, DialPressEvent, DialPressPayload, DialRotateEvent, DialRotatePayload,
    InboundEvent, RouteKey, Settings, TouchTapEvent, TouchTapPayload, WillAppearEvent,
    WillAppearPayload,
};
pub use sent::{SetFeedbackEvent, SET_FEEDBACK};

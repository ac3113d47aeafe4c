//! Events received from the host.
//!
//! Every concrete shape carries the same four top-level fields (`action`,
//! `event`, `context`, `device`) plus a kind-specific `payload`. The host
//! omits empty fields, so everything except `action` and `event` falls back
//! to its zero value when absent.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::EventKind;
use crate::error::Result;

/// Opaque per-action settings owned by the host.
///
/// The host controls the shape, so it is kept as an uninterpreted JSON
/// document. Use [`Settings::decode`] to read it into a typed struct.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Settings(pub serde_json::Value);

impl Settings {
    /// Decode the settings into `T`.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(T::deserialize(&self.0)?)
    }

    /// True when the host sent no settings (or an explicit `null`).
    pub fn is_empty(&self) -> bool {
        match &self.0 {
            serde_json::Value::Null => true,
            serde_json::Value::Object(map) => map.is_empty(),
            _ => false,
        }
    }

    /// Borrow the raw document.
    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }
}

/// Grid position of the control on the device.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Coordinates {
    pub column: i32,
    pub row: i32,
}

/// Payload of a `touchTap` event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TouchTapPayload {
    pub settings: Settings,
    pub coordinates: Coordinates,
    /// Tap position on the touch strip, normally `[x, y]`. Kept as sent;
    /// empty when the host omits it.
    pub tap_pos: Vec<i32>,
    pub hold: bool,
}

/// A tap on the touch strip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TouchTapEvent {
    pub action: String,
    pub event: String,
    #[serde(default)]
    pub context: String,
    #[serde(default)]
    pub device: String,
    #[serde(default)]
    pub payload: TouchTapPayload,
}

/// Payload of a `dialPress` event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DialPressPayload {
    pub settings: Settings,
    pub coordinates: Coordinates,
    pub pressed: bool,
}

/// A dial pushed down or released.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialPressEvent {
    pub action: String,
    pub event: String,
    #[serde(default)]
    pub context: String,
    #[serde(default)]
    pub device: String,
    #[serde(default)]
    pub payload: DialPressPayload,
}

/// Payload of a `dialRotate` event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DialRotatePayload {
    pub settings: Settings,
    pub coordinates: Coordinates,
    /// Signed rotation delta; negative is counter-clockwise.
    pub ticks: i32,
    pub pressed: bool,
}

/// A dial turned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialRotateEvent {
    pub action: String,
    pub event: String,
    #[serde(default)]
    pub context: String,
    #[serde(default)]
    pub device: String,
    #[serde(default)]
    pub payload: DialRotatePayload,
}

/// Payload of a `willAppear` event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WillAppearPayload {
    /// Controller kind, e.g. `"Keypad"` or `"Encoder"`.
    pub controller: String,
    pub settings: Settings,
    pub coordinates: Coordinates,
    pub state: i32,
    pub is_in_multi_action: bool,
}

/// An action instance became visible on a device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WillAppearEvent {
    pub action: String,
    pub event: String,
    #[serde(default)]
    pub context: String,
    #[serde(default)]
    pub device: String,
    #[serde(default)]
    pub payload: WillAppearPayload,
}

/// A decoded host-to-plugin message.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundEvent {
    TouchTap(TouchTapEvent),
    DialPress(DialPressEvent),
    DialRotate(DialRotateEvent),
    WillAppear(WillAppearEvent),
    /// A discriminator this crate does not decode. Carries the raw name.
    Unrecognized {
        /// The `event` field as sent by the host.
        event: String,
    },
}

impl InboundEvent {
    /// Discriminator of this event as it appeared on the wire.
    pub fn event_name(&self) -> &str {
        match self {
            InboundEvent::TouchTap(e) => &e.event,
            InboundEvent::DialPress(e) => &e.event,
            InboundEvent::DialRotate(e) => &e.event,
            InboundEvent::WillAppear(e) => &e.event,
            InboundEvent::Unrecognized { event } => event,
        }
    }

    /// Kind of this event, if the discriminator is documented.
    pub fn kind(&self) -> Option<EventKind> {
        EventKind::from_wire(self.event_name())
    }

    /// The `(action, context, device)` triple of a decoded event.
    pub fn target(&self) -> Option<(&str, &str, &str)> {
        match self {
            InboundEvent::TouchTap(e) => Some((&e.action, &e.context, &e.device)),
            InboundEvent::DialPress(e) => Some((&e.action, &e.context, &e.device)),
            InboundEvent::DialRotate(e) => Some((&e.action, &e.context, &e.device)),
            InboundEvent::WillAppear(e) => Some((&e.action, &e.context, &e.device)),
            InboundEvent::Unrecognized { .. } => None,
        }
    }

    /// Routing key `action/event`, read from the decoded shape.
    ///
    /// `None` for [`InboundEvent::Unrecognized`].
    pub fn route_key(&self) -> Option<RouteKey> {
        let (action, event) = match self {
            InboundEvent::TouchTap(e) => (&e.action, &e.event),
            InboundEvent::DialPress(e) => (&e.action, &e.event),
            InboundEvent::DialRotate(e) => (&e.action, &e.event),
            InboundEvent::WillAppear(e) => (&e.action, &e.event),
            InboundEvent::Unrecognized { .. } => return None,
        };
        Some(RouteKey::new(action, event))
    }

    /// True for [`InboundEvent::Unrecognized`].
    pub fn is_unrecognized(&self) -> bool {
        matches!(self, InboundEvent::Unrecognized { .. })
    }
}

/// Handler lookup key, `"<action>/<event>"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RouteKey(String);

impl RouteKey {
    /// Build the key for an action UUID and an event name.
    pub fn new(action: &str, event: &str) -> Self {
        Self(format!("{}/{}", action, event))
    }

    /// Key for an action UUID and a documented event kind.
    pub fn for_kind(action: &str, kind: EventKind) -> Self {
        Self::new(action, kind.as_str())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RouteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RouteKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<RouteKey> for String {
    fn from(key: RouteKey) -> Self {
        key.0
    }
}

//! Event discriminators and the discriminator-to-shape mapping.
//!
//! The host names every message with an `event` string. [`EventKind`] lists
//! all of them, including kinds this crate does not decode yet. Adding
//! support for a kind means adding its shape in `received.rs` and one arm in
//! [`EventKind::decode`].

use std::fmt;

use super::InboundEvent;
use crate::codec::JsonCodec;
use crate::error::Result;

/// Every discriminator the host protocol documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    DidReceiveSettings,
    DidReceiveGlobalSettings,
    KeyDown,
    KeyUp,
    TouchTap,
    DialPress,
    DialRotate,
    WillAppear,
    WillDisappear,
    TitleParametersDidChange,
    DeviceDidConnect,
    DeviceDidDisconnect,
    ApplicationDidLaunch,
    ApplicationDidTerminate,
    SystemDidWakeUp,
    PropertyInspectorDidAppear,
    PropertyInspectorDidDisappear,
    SendToPlugin,
    SendToPropertyInspector,
}

impl EventKind {
    /// All documented kinds, in protocol order.
    pub const ALL: [EventKind; 19] = [
        EventKind::DidReceiveSettings,
        EventKind::DidReceiveGlobalSettings,
        EventKind::KeyDown,
        EventKind::KeyUp,
        EventKind::TouchTap,
        EventKind::DialPress,
        EventKind::DialRotate,
        EventKind::WillAppear,
        EventKind::WillDisappear,
        EventKind::TitleParametersDidChange,
        EventKind::DeviceDidConnect,
        EventKind::DeviceDidDisconnect,
        EventKind::ApplicationDidLaunch,
        EventKind::ApplicationDidTerminate,
        EventKind::SystemDidWakeUp,
        EventKind::PropertyInspectorDidAppear,
        EventKind::PropertyInspectorDidDisappear,
        EventKind::SendToPlugin,
        EventKind::SendToPropertyInspector,
    ];

    /// Wire name of this kind.
    pub const fn as_str(self) -> &'static str {
        match self {
            EventKind::DidReceiveSettings => "didReceiveSettings",
            EventKind::DidReceiveGlobalSettings => "didReceiveGlobalSettings",
            EventKind::KeyDown => "keyDown",
            EventKind::KeyUp => "keyUp",
            EventKind::TouchTap => "touchTap",
            EventKind::DialPress => "dialPress",
            EventKind::DialRotate => "dialRotate",
            EventKind::WillAppear => "willAppear",
            EventKind::WillDisappear => "willDisappear",
            EventKind::TitleParametersDidChange => "titleParametersDidChange",
            EventKind::DeviceDidConnect => "deviceDidConnect",
            EventKind::DeviceDidDisconnect => "deviceDidDisconnect",
            EventKind::ApplicationDidLaunch => "applicationDidLaunch",
            EventKind::ApplicationDidTerminate => "applicationDidTerminate",
            EventKind::SystemDidWakeUp => "systemDidWakeUp",
            EventKind::PropertyInspectorDidAppear => "propertyInspectorDidAppear",
            EventKind::PropertyInspectorDidDisappear => "propertyInspectorDidDisappear",
            EventKind::SendToPlugin => "sendToPlugin",
            EventKind::SendToPropertyInspector => "sendToPropertyInspector",
        }
    }

    /// Resolve a wire discriminator. Returns `None` for names the protocol
    /// does not document.
    pub fn from_wire(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == name)
    }

    /// Whether frames of this kind are decoded into a typed shape.
    pub fn is_supported(self) -> bool {
        matches!(
            self,
            EventKind::TouchTap | EventKind::DialPress | EventKind::DialRotate | EventKind::WillAppear
        )
    }

    /// Decode a full frame into the shape registered for this kind.
    ///
    /// Returns `Ok(None)` for kinds without a shape. A frame that does not
    /// fit the shape is an error for that frame only.
    pub fn decode(self, raw: &[u8]) -> Result<Option<InboundEvent>> {
        let event = match self {
            EventKind::TouchTap => InboundEvent::TouchTap(JsonCodec::decode(raw)?),
            EventKind::DialPress => InboundEvent::DialPress(JsonCodec::decode(raw)?),
            EventKind::DialRotate => InboundEvent::DialRotate(JsonCodec::decode(raw)?),
            EventKind::WillAppear => InboundEvent::WillAppear(JsonCodec::decode(raw)?),
            _ => return Ok(None),
        };
        Ok(Some(event))
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_wire_roundtrips_every_kind() {
        for kind in EventKind::ALL {
            assert_eq!(EventKind::from_wire(kind.as_str()), Some(kind));
        }
    }

    #[test]
    fn test_from_wire_unknown() {
        assert_eq!(EventKind::from_wire("unknownFutureEvent"), None);
        assert_eq!(EventKind::from_wire("TouchTap"), None);
        assert_eq!(EventKind::from_wire(""), None);
    }

    #[test]
    fn test_supported_kinds() {
        let supported: Vec<_> = EventKind::ALL
            .into_iter()
            .filter(|k| k.is_supported())
            .collect();
        assert_eq!(
            supported,
            vec![
                EventKind::TouchTap,
                EventKind::DialPress,
                EventKind::DialRotate,
                EventKind::WillAppear
            ]
        );
    }

    #[test]
    fn test_decode_unsupported_kind_is_none() {
        let raw = br#"{"event":"keyDown","action":"a","context":"c","device":"d"}"#;
        assert!(EventKind::KeyDown.decode(raw).unwrap().is_none());
    }

    #[test]
    fn test_decode_shape_mismatch_is_error() {
        let raw = br#"{"event":"dialRotate","action":"a","payload":{"ticks":"three"}}"#;
        assert!(EventKind::DialRotate.decode(raw).is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(EventKind::WillAppear.to_string(), "willAppear");
    }
}

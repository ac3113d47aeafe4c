//! JSON codec using `serde_json`.
//!
//! Every message on the host channel is a single JSON object in one
//! WebSocket text frame.

use crate::error::Result;

/// JSON codec for whole messages.
pub struct JsonCodec;

impl JsonCodec {
    /// Encode a value to a JSON string.
    ///
    /// # Errors
    ///
    /// Returns error if the value cannot be serialized.
    #[inline]
    pub fn encode<T: serde::Serialize>(value: &T) -> Result<String> {
        Ok(serde_json::to_string(value)?)
    }

    /// Decode JSON bytes to a value.
    ///
    /// # Errors
    ///
    /// Returns error if the bytes are not valid JSON for type T.
    #[inline]
    pub fn decode<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DeckwireError;
    use serde::{Deserialize, Serialize};

    #[derive(Serialize, Deserialize, PartialEq, Debug)]
    struct Register {
        event: String,
        uuid: String,
    }

    #[test]
    fn test_encode_is_single_line() {
        let msg = Register {
            event: "registerPlugin".to_string(),
            uuid: "ABC".to_string(),
        };
        let json = JsonCodec::encode(&msg).unwrap();

        assert!(!json.contains('\n'));
        assert_eq!(json, r#"{"event":"registerPlugin","uuid":"ABC"}"#);
    }

    #[test]
    fn test_decode_struct() {
        let decoded: Register = JsonCodec::decode(br#"{"event":"e","uuid":"u"}"#).unwrap();
        assert_eq!(decoded.uuid, "u");
    }

    #[test]
    fn test_decode_invalid() {
        let result: Result<Register> = JsonCodec::decode(b"not json");
        assert!(matches!(result, Err(DeckwireError::Json(_))));
    }
}

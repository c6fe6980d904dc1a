//! Text codec: JSON text ↔ typed values.
//!
//! The [`Wire`] impls turn typed values into `serde_json::Value`s; a
//! [`Codec`] adds the last step to and from the text frames the transport
//! carries.

use serde_json::Value;

use crate::wire::Wire;
use crate::ProtocolError;

/// Converts typed values to and from text frames.
///
/// `Send + Sync + 'static` so a codec can live inside the long-running
/// client task.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into a text frame.
    ///
    /// # Errors
    /// Returns `ProtocolError::Encode` if the value cannot be written.
    fn encode<T: Wire>(&self, value: &T) -> Result<String, ProtocolError>;

    /// Parses a text frame and decodes it as `T`.
    ///
    /// # Errors
    /// `ProtocolError::Json` for malformed text, `ProtocolError::Decode`
    /// when the document does not match `T`'s schema.
    fn decode<T: Wire>(&self, text: &str) -> Result<T, ProtocolError>;
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] over compact JSON text.
///
/// ```rust
/// use firewall_protocol::{Action, Codec, JsonCodec, Vector};
///
/// let codec = JsonCodec;
/// let text = codec.encode(&Action::move_to(Vector::new(3, 4))).unwrap();
/// assert_eq!(text, r#"{"action":"move","position":{"x":3,"y":4}}"#);
///
/// let decoded: Action = codec.decode(&text).unwrap();
/// assert_eq!(decoded, Action::move_to(Vector::new(3, 4)));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn encode<T: Wire>(&self, value: &T) -> Result<String, ProtocolError> {
        serde_json::to_string(&value.encode()).map_err(ProtocolError::Encode)
    }

    fn decode<T: Wire>(&self, text: &str) -> Result<T, ProtocolError> {
        let value: Value = serde_json::from_str(text).map_err(ProtocolError::Json)?;
        Ok(T::decode(&value)?)
    }
}

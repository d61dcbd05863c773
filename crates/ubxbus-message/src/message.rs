use std::any::Any;
use std::fmt;

use bytes::Bytes;
use ubxbus_frame::{Frame, FrameError};

/// Decoder for one message type. Returns `None` when the payload does not
/// have the shape the type expects.
pub type DecodeFn = fn(&[u8]) -> Option<Box<dyn Message>>;

/// Registry key for a `(class, id)` pair.
pub fn message_key(class: u8, id: u8) -> u16 {
    u16::from_be_bytes([class, id])
}

/// Static description of a message type.
#[derive(Clone, Copy)]
pub struct MessageType {
    pub class: u8,
    pub id: u8,
    pub name: &'static str,
    pub decode: DecodeFn,
}

impl MessageType {
    pub const fn new(class: u8, id: u8, name: &'static str, decode: DecodeFn) -> Self {
        Self {
            class,
            id,
            name,
            decode,
        }
    }

    pub fn key(&self) -> u16 {
        message_key(self.class, self.id)
    }

    /// Run this type's decoder over `payload`.
    pub fn decode(&self, payload: &[u8]) -> Option<Box<dyn Message>> {
        (self.decode)(payload)
    }
}

impl fmt::Debug for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageType")
            .field("class", &format_args!("0x{:02X}", self.class))
            .field("id", &format_args!("0x{:02X}", self.id))
            .field("name", &self.name)
            .finish()
    }
}

/// A typed UBX message.
pub trait Message: Any + fmt::Debug {
    fn message_type(&self) -> MessageType;

    /// The message body, without framing.
    fn serialize_payload(&self) -> Bytes;

    /// Wrap the serialized payload in a frame.
    fn flatten(&self) -> Result<Frame, FrameError> {
        let message_type = self.message_type();
        Frame::new(message_type.class, message_type.id, self.serialize_payload())
    }

    fn as_any(&self) -> &dyn Any;
}

impl dyn Message {
    /// Downcast to a concrete message type.
    pub fn downcast_ref<T: Message>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    pub fn name(&self) -> &'static str {
        self.message_type().name
    }
}

use std::collections::HashMap;

use tracing::{debug, warn};
use ubxbus_frame::Frame;

use crate::message::{message_key, Message, MessageType};
use crate::nav::NavPosllh;

/// Outcome of routing a frame through a [`MessageRegistry`].
#[derive(Debug)]
pub enum Dispatch {
    /// A registered type accepted the payload.
    Decoded(Box<dyn Message>),
    /// No type is registered for the frame's `(class, id)`.
    Unknown { class: u8, id: u8 },
    /// A type is registered but its decoder rejected the payload.
    Malformed(MessageType),
}

impl Dispatch {
    /// Drop the reason for absence, the way [`MessageRegistry::unflatten`] does.
    pub fn into_message(self) -> Option<Box<dyn Message>> {
        match self {
            Self::Decoded(message) => Some(message),
            Self::Unknown { .. } | Self::Malformed(_) => None,
        }
    }
}

/// `(class, id)`-keyed table of message decoders.
///
/// Meant to be filled once at startup and then only read. Registration takes
/// `&mut self`, so sharing a populated registry (by reference or in an `Arc`)
/// freezes it.
#[derive(Debug, Default, Clone)]
pub struct MessageRegistry {
    types: HashMap<u16, MessageType>,
}

impl MessageRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every message type this crate implements.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register(NavPosllh::TYPE);
        registry
    }

    /// Register a type. The last registration for a key wins; the displaced
    /// entry is returned.
    pub fn register(&mut self, message_type: MessageType) -> Option<MessageType> {
        let previous = self.types.insert(message_type.key(), message_type);
        if let Some(previous) = &previous {
            warn!(
                class = message_type.class,
                id = message_type.id,
                previous = previous.name,
                replacement = message_type.name,
                "message type registered twice, replacing earlier entry"
            );
        }
        previous
    }

    pub fn get(&self, class: u8, id: u8) -> Option<&MessageType> {
        self.types.get(&message_key(class, id))
    }

    pub fn contains(&self, class: u8, id: u8) -> bool {
        self.types.contains_key(&message_key(class, id))
    }

    /// Decode `frame` with its registered type.
    ///
    /// `None` means either no type is registered or the payload was rejected.
    /// Use [`dispatch`](Self::dispatch) when the difference matters.
    pub fn unflatten(&self, frame: &Frame) -> Option<Box<dyn Message>> {
        self.dispatch(frame).into_message()
    }

    /// Decode `frame`, reporting why nothing was produced.
    pub fn dispatch(&self, frame: &Frame) -> Dispatch {
        let Some(message_type) = self.types.get(&frame.key()) else {
            debug!(class = frame.class(), id = frame.id(), "no decoder registered");
            return Dispatch::Unknown {
                class: frame.class(),
                id: frame.id(),
            };
        };
        match message_type.decode(frame.payload()) {
            Some(message) => Dispatch::Decoded(message),
            None => {
                debug!(
                    name = message_type.name,
                    len = frame.len(),
                    "decoder rejected payload"
                );
                Dispatch::Malformed(*message_type)
            }
        }
    }

    /// Registered keys, sorted.
    pub fn keys(&self) -> Vec<u16> {
        let mut keys: Vec<u16> = self.types.keys().copied().collect();
        keys.sort_unstable();
        keys
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

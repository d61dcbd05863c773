//! Typed UBX messages.
//!
//! A [`Message`] knows its [`MessageType`] and how to serialize its payload;
//! `flatten` turns it into a [`Frame`](ubxbus_frame::Frame). Going the other
//! way, a [`MessageRegistry`] maps a frame's `(class, id)` to the decode
//! function of the registered type.
//!
//! Registries are plain values: build one at startup, register every type,
//! then share it read-only with whatever dispatches frames.

pub mod class;
pub mod error;
pub mod exchange;
pub mod message;
pub mod nav;
pub mod registry;

pub use class::{class_name, ACK, CFG, INF, LOG, MGA, MON, NAV, RXM, SEC, TIM, UPD};
pub use error::{MessageError, Result};
pub use exchange::{poll_message, send_message};
pub use message::{message_key, DecodeFn, Message, MessageType};
pub use nav::{NavPosllh, NavPosllhPoll, NAV_POSLLH, NAV_POSLLH_LEN};
pub use registry::{Dispatch, MessageRegistry};

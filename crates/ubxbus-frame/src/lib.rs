//! UBX frame codec.
//!
//! Every message travels in a checksummed envelope:
//! - Two sync bytes `0xB5 0x62`
//! - Message class and id (1 byte each)
//! - A 2-byte little-endian payload length
//! - The payload
//! - A 2-byte two-accumulator checksum, big-endian
//!
//! [`PackedReader`] and [`PackedWriter`] give positional, endianness-aware
//! access to fixed-size buffers and are shared with message decoders.
//! Malformed wire data is not an error: [`Frame::deserialize`] returns `None`.

pub mod checksum;
pub mod codec;
pub mod error;
pub mod reader;
pub mod writer;

pub use checksum::Checksum;
pub use codec::{Frame, FRAME_OVERHEAD, HEADER_SIZE, MAX_PAYLOAD, SYNC_1, SYNC_2};
pub use error::{FrameError, Result};
pub use reader::PackedReader;
pub use writer::PackedWriter;

use std::fmt;
use std::sync::OnceLock;

use bytes::Bytes;
use tracing::trace;

use crate::checksum::Checksum;
use crate::error::{FrameError, Result};
use crate::reader::PackedReader;
use crate::writer::PackedWriter;

/// First sync byte.
pub const SYNC_1: u8 = 0xB5;

/// Second sync byte.
pub const SYNC_2: u8 = 0x62;

/// Sync (2) + class (1) + id (1) + length (2).
pub const HEADER_SIZE: usize = 6;

/// Header plus the 2-byte checksum trailer.
pub const FRAME_OVERHEAD: usize = HEADER_SIZE + 2;

/// The length field is 16 bits wide.
pub const MAX_PAYLOAD: usize = u16::MAX as usize;

/// A UBX frame: class, id and payload, with lazily memoized wire bytes.
///
/// Wire format:
/// ```text
/// ┌──────┬──────┬───────┬──────┬───────────┬──────────────┬────────────┐
/// │ 0xB5 │ 0x62 │ Class │ Id   │ Length    │ Payload      │ Checksum   │
/// │      │      │ (1B)  │ (1B) │ (2B LE)   │ (Length B)   │ (2B BE)    │
/// └──────┴──────┴───────┴──────┴───────────┴──────────────┴────────────┘
/// ```
///
/// The checksum covers every byte from the class through the end of the
/// payload. A frame never changes after construction, so the serialized bytes
/// and checksum are computed at most once and never go stale.
#[derive(Clone)]
pub struct Frame {
    class: u8,
    id: u8,
    payload: Bytes,
    wire: OnceLock<Bytes>,
    checksum: OnceLock<u16>,
}

impl Frame {
    /// Create a frame. Fails if the payload does not fit the length field.
    pub fn new(class: u8, id: u8, payload: impl Into<Bytes>) -> Result<Self> {
        let payload = payload.into();
        if payload.len() > MAX_PAYLOAD {
            return Err(FrameError::PayloadTooLarge {
                size: payload.len(),
                max: MAX_PAYLOAD,
            });
        }
        Ok(Self {
            class,
            id,
            payload,
            wire: OnceLock::new(),
            checksum: OnceLock::new(),
        })
    }

    /// Parse and validate serialized frame bytes.
    ///
    /// Returns `None` when the buffer is shorter than the frame overhead, a
    /// sync byte is wrong, the length field disagrees with the buffer length,
    /// or the checksum does not match. Corrupt wire data is expected, so none
    /// of these are errors.
    pub fn deserialize(bytes: impl Into<Bytes>) -> Option<Self> {
        let wire = bytes.into();
        if wire.len() < FRAME_OVERHEAD {
            trace!(len = wire.len(), "frame shorter than overhead");
            return None;
        }

        let reader = PackedReader::new(&wire);
        if reader.peek_u8(0).ok()? != SYNC_1 || reader.peek_u8(1).ok()? != SYNC_2 {
            trace!("frame sync mismatch");
            return None;
        }

        let declared = usize::from(reader.peek_u16_le(4).ok()?);
        if declared + FRAME_OVERHEAD != wire.len() {
            trace!(declared, len = wire.len(), "frame length field mismatch");
            return None;
        }

        let expected = reader.peek_u16_be(-2).ok()?;
        let actual = Checksum::compute(&wire[2..wire.len() - 2]);
        if actual != expected {
            trace!(expected, actual, "frame checksum mismatch");
            return None;
        }

        let class = reader.peek_u8(2).ok()?;
        let id = reader.peek_u8(3).ok()?;
        let payload = wire.slice(HEADER_SIZE..HEADER_SIZE + declared);
        Some(Self::from_wire(class, id, payload, wire))
    }

    /// Rebuild a frame around bytes already known to be a valid encoding of
    /// `class`, `id` and `payload`. The checksum is taken from the trailer,
    /// not recomputed.
    fn from_wire(class: u8, id: u8, payload: Bytes, wire: Bytes) -> Self {
        let frame = Self {
            class,
            id,
            payload,
            wire: OnceLock::new(),
            checksum: OnceLock::new(),
        };
        if let Ok(checksum) = PackedReader::new(&wire).peek_u16_be(-2) {
            let _ = frame.checksum.set(checksum);
        }
        let _ = frame.wire.set(wire);
        frame
    }

    pub fn class(&self) -> u8 {
        self.class
    }

    pub fn id(&self) -> u8 {
        self.id
    }

    /// `(class << 8) | id`, the registry key for this frame.
    pub fn key(&self) -> u16 {
        u16::from_be_bytes([self.class, self.id])
    }

    pub fn payload(&self) -> &Bytes {
        &self.payload
    }

    /// Payload length in bytes.
    pub fn len(&self) -> usize {
        self.payload.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }

    /// Total on-wire size: payload plus [`FRAME_OVERHEAD`].
    pub fn wire_size(&self) -> usize {
        self.payload.len() + FRAME_OVERHEAD
    }

    /// Checksum over class, id, length field and payload.
    pub fn checksum(&self) -> u16 {
        *self.checksum.get_or_init(|| {
            let mut checksum = Checksum::new();
            checksum.update8(self.class);
            checksum.update8(self.id);
            checksum.update(&self.length_field().to_le_bytes());
            checksum.update(&self.payload);
            checksum.get()
        })
    }

    /// The serialized frame. Computed on first use, then shared.
    pub fn serialize(&self) -> Bytes {
        self.wire
            .get_or_init(|| {
                let mut writer = PackedWriter::new(self.wire_size());
                // The writer is sized from the payload, so these cannot overflow it.
                let _ = writer.write_u8(SYNC_1);
                let _ = writer.write_u8(SYNC_2);
                let _ = writer.write_u8(self.class);
                let _ = writer.write_u8(self.id);
                let _ = writer.write_u16_le(self.length_field());
                let _ = writer.write_array(&self.payload);
                let _ = writer.write_u16_be(self.checksum());
                writer.into_bytes()
            })
            .clone()
    }

    fn length_field(&self) -> u16 {
        // Bounded by MAX_PAYLOAD at construction.
        self.payload.len() as u16
    }
}

impl PartialEq for Frame {
    fn eq(&self, other: &Self) -> bool {
        self.class == other.class && self.id == other.id && self.payload == other.payload
    }
}

impl Eq for Frame {}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Frame")
            .field("class", &format_args!("0x{:02X}", self.class))
            .field("id", &format_args!("0x{:02X}", self.id))
            .field("len", &self.payload.len())
            .field("checksum", &format_args!("0x{:04X}", self.checksum()))
            .finish()
    }
}

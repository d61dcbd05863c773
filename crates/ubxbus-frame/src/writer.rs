use bytes::{Bytes, BytesMut};

use crate::error::Result;
use crate::reader::resolve_offset;

macro_rules! writer_fields {
    ($($(#[$meta:meta])* $poke:ident, $write:ident => $ty:ty, $conv:ident;)*) => {
        $(
            $(#[$meta])*
            pub fn $poke(&mut self, offset: isize, value: $ty) -> Result<()> {
                self.poke_array(offset, &value.$conv())
            }

            $(#[$meta])*
            pub fn $write(&mut self, value: $ty) -> Result<()> {
                self.write_array(&value.$conv())
            }
        )*
    };
}

/// Positional writer over a pre-sized, zero-filled buffer.
///
/// The mirror of [`PackedReader`](crate::PackedReader): `poke_*` writes at an
/// explicit (possibly negative) offset, `write_*` writes at the cursor and
/// advances it. The buffer never grows; writes past the end fail.
#[derive(Debug, Clone)]
pub struct PackedWriter {
    data: BytesMut,
    position: usize,
}

impl PackedWriter {
    pub fn new(size: usize) -> Self {
        Self {
            data: BytesMut::zeroed(size),
            position: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// Move the cursor. Negative positions count from the end.
    pub fn set_position(&mut self, position: isize) -> Result<()> {
        self.position = resolve_offset(position, 0, self.data.len())?;
        Ok(())
    }

    pub fn reset(&mut self) {
        self.position = 0;
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Freeze the written buffer.
    pub fn into_bytes(self) -> Bytes {
        self.data.freeze()
    }

    writer_fields! {
        /// Unsigned 8-bit integer.
        poke_u8, write_u8 => u8, to_le_bytes;
        /// Signed 8-bit integer.
        poke_i8, write_i8 => i8, to_le_bytes;
        /// Unsigned 16-bit integer, little-endian.
        poke_u16_le, write_u16_le => u16, to_le_bytes;
        /// Signed 16-bit integer, little-endian.
        poke_i16_le, write_i16_le => i16, to_le_bytes;
        /// Unsigned 16-bit integer, big-endian.
        poke_u16_be, write_u16_be => u16, to_be_bytes;
        /// Signed 16-bit integer, big-endian.
        poke_i16_be, write_i16_be => i16, to_be_bytes;
        /// Unsigned 32-bit integer, little-endian.
        poke_u32_le, write_u32_le => u32, to_le_bytes;
        /// Signed 32-bit integer, little-endian.
        poke_i32_le, write_i32_le => i32, to_le_bytes;
        /// Unsigned 32-bit integer, big-endian.
        poke_u32_be, write_u32_be => u32, to_be_bytes;
        /// Signed 32-bit integer, big-endian.
        poke_i32_be, write_i32_be => i32, to_be_bytes;
        /// Unsigned 64-bit integer, little-endian.
        poke_u64_le, write_u64_le => u64, to_le_bytes;
        /// Signed 64-bit integer, little-endian.
        poke_i64_le, write_i64_le => i64, to_le_bytes;
        /// Unsigned 64-bit integer, big-endian.
        poke_u64_be, write_u64_be => u64, to_be_bytes;
        /// Signed 64-bit integer, big-endian.
        poke_i64_be, write_i64_be => i64, to_be_bytes;
        /// IEEE 754 single precision, little-endian.
        poke_f32_le, write_f32_le => f32, to_le_bytes;
        /// IEEE 754 double precision, little-endian.
        poke_f64_le, write_f64_le => f64, to_le_bytes;
    }

    /// A character stored as a single byte. Characters above U+00FF are
    /// truncated to their low byte.
    pub fn poke_char(&mut self, offset: isize, value: char) -> Result<()> {
        self.poke_u8(offset, (u32::from(value) & 0xFF) as u8)
    }

    pub fn write_char(&mut self, value: char) -> Result<()> {
        self.write_u8((u32::from(value) & 0xFF) as u8)
    }

    /// Copy raw bytes to `offset`.
    pub fn poke_array(&mut self, offset: isize, bytes: &[u8]) -> Result<()> {
        let start = resolve_offset(offset, bytes.len(), self.data.len())?;
        self.data[start..start + bytes.len()].copy_from_slice(bytes);
        Ok(())
    }

    /// Copy raw bytes to the cursor and advance past them.
    pub fn write_array(&mut self, bytes: &[u8]) -> Result<()> {
        // Buffers never exceed isize::MAX bytes.
        self.poke_array(self.position as isize, bytes)?;
        self.position += bytes.len();
        Ok(())
    }
}

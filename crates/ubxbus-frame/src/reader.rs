use crate::error::{FrameError, Result};

/// Resolve a possibly negative offset against a buffer of `size` bytes.
///
/// Negative offsets count from the end (`size + offset`). The whole access of
/// `len` bytes has to fit, otherwise the access is out of bounds.
pub(crate) fn resolve_offset(offset: isize, len: usize, size: usize) -> Result<usize> {
    let start = if offset < 0 {
        size.checked_sub(offset.unsigned_abs())
    } else {
        Some(offset.unsigned_abs())
    };
    match start {
        Some(start) if start.checked_add(len).is_some_and(|end| end <= size) => Ok(start),
        _ => Err(FrameError::OutOfBounds { offset, len, size }),
    }
}

macro_rules! reader_fields {
    ($($(#[$meta:meta])* $peek:ident, $read:ident => $ty:ty, $conv:ident;)*) => {
        $(
            $(#[$meta])*
            pub fn $peek(&self, offset: isize) -> Result<$ty> {
                self.peek_bytes(offset).map(<$ty>::$conv)
            }

            $(#[$meta])*
            pub fn $read(&mut self) -> Result<$ty> {
                self.read_bytes().map(<$ty>::$conv)
            }
        )*
    };
}

/// Positional reader over a fixed byte buffer.
///
/// `peek_*` reads at an explicit offset and leaves the cursor alone; `read_*`
/// reads at the cursor and advances it. Offsets may be negative to address
/// fields relative to the end of the buffer, e.g. `peek_u16_be(-2)` for a
/// trailing checksum.
#[derive(Debug, Clone)]
pub struct PackedReader<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> PackedReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    pub fn data(&self) -> &'a [u8] {
        self.data
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

    /// Bytes left between the cursor and the end of the buffer.
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.position)
    }

    /// Move the cursor. Negative positions count from the end.
    pub fn set_position(&mut self, position: isize) -> Result<()> {
        self.position = resolve_offset(position, 0, self.data.len())?;
        Ok(())
    }

    pub fn reset(&mut self) {
        self.position = 0;
    }

    fn cursor(&self) -> isize {
        // A slice never holds more than isize::MAX bytes.
        self.position as isize
    }

    fn peek_bytes<const N: usize>(&self, offset: isize) -> Result<[u8; N]> {
        let start = resolve_offset(offset, N, self.data.len())?;
        let mut out = [0u8; N];
        out.copy_from_slice(&self.data[start..start + N]);
        Ok(out)
    }

    fn read_bytes<const N: usize>(&mut self) -> Result<[u8; N]> {
        let bytes = self.peek_bytes(self.cursor())?;
        self.position += N;
        Ok(bytes)
    }

    reader_fields! {
        /// Unsigned 8-bit integer.
        peek_u8, read_u8 => u8, from_le_bytes;
        /// Signed 8-bit integer.
        peek_i8, read_i8 => i8, from_le_bytes;
        /// Unsigned 16-bit integer, little-endian.
        peek_u16_le, read_u16_le => u16, from_le_bytes;
        /// Signed 16-bit integer, little-endian.
        peek_i16_le, read_i16_le => i16, from_le_bytes;
        /// Unsigned 16-bit integer, big-endian.
        peek_u16_be, read_u16_be => u16, from_be_bytes;
        /// Signed 16-bit integer, big-endian.
        peek_i16_be, read_i16_be => i16, from_be_bytes;
        /// Unsigned 32-bit integer, little-endian.
        peek_u32_le, read_u32_le => u32, from_le_bytes;
        /// Signed 32-bit integer, little-endian.
        peek_i32_le, read_i32_le => i32, from_le_bytes;
        /// Unsigned 32-bit integer, big-endian.
        peek_u32_be, read_u32_be => u32, from_be_bytes;
        /// Signed 32-bit integer, big-endian.
        peek_i32_be, read_i32_be => i32, from_be_bytes;
        /// Unsigned 64-bit integer, little-endian.
        peek_u64_le, read_u64_le => u64, from_le_bytes;
        /// Signed 64-bit integer, little-endian.
        peek_i64_le, read_i64_le => i64, from_le_bytes;
        /// Unsigned 64-bit integer, big-endian.
        peek_u64_be, read_u64_be => u64, from_be_bytes;
        /// Signed 64-bit integer, big-endian.
        peek_i64_be, read_i64_be => i64, from_be_bytes;
        /// IEEE 754 single precision, little-endian.
        peek_f32_le, read_f32_le => f32, from_le_bytes;
        /// IEEE 754 double precision, little-endian.
        peek_f64_le, read_f64_le => f64, from_le_bytes;
    }

    /// A single byte interpreted as a character.
    pub fn peek_char(&self, offset: isize) -> Result<char> {
        self.peek_u8(offset).map(char::from)
    }

    pub fn read_char(&mut self) -> Result<char> {
        self.read_u8().map(char::from)
    }

    /// Borrow `len` raw bytes at `offset`.
    pub fn peek_array(&self, offset: isize, len: usize) -> Result<&'a [u8]> {
        let start = resolve_offset(offset, len, self.data.len())?;
        Ok(&self.data[start..start + len])
    }

    /// Borrow `len` raw bytes at the cursor and advance past them.
    pub fn read_array(&mut self, len: usize) -> Result<&'a [u8]> {
        let bytes = self.peek_array(self.cursor(), len)?;
        self.position += len;
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: [u8; 8] = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08];

    #[test]
    fn negative_offset_counts_from_end() {
        let reader = PackedReader::new(&SAMPLE);
        assert_eq!(reader.peek_u16_le(-2).unwrap(), reader.peek_u16_le(6).unwrap());
        assert_eq!(reader.peek_u16_be(-2).unwrap(), 0x0708);
        assert_eq!(reader.peek_u8(-8).unwrap(), 0x01);
        assert!(reader.peek_u8(-9).is_err());
    }

    #[test]
    fn endianness() {
        let reader = PackedReader::new(&SAMPLE);
        assert_eq!(reader.peek_u16_le(0).unwrap(), 0x0201);
        assert_eq!(reader.peek_u16_be(0).unwrap(), 0x0102);
        assert_eq!(reader.peek_u32_le(0).unwrap(), 0x0403_0201);
        assert_eq!(reader.peek_u32_be(0).unwrap(), 0x0102_0304);
        assert_eq!(reader.peek_u64_le(0).unwrap(), 0x0807_0605_0403_0201);
        assert_eq!(reader.peek_u64_be(0).unwrap(), 0x0102_0304_0506_0708);
    }

    #[test]
    fn signed_values() {
        let bytes = [0xFF, 0xFE, 0xFF, 0xFF, 0xFF];
        let reader = PackedReader::new(&bytes);
        assert_eq!(reader.peek_i8(0).unwrap(), -1);
        assert_eq!(reader.peek_i16_le(0).unwrap(), -257);
        assert_eq!(reader.peek_i16_be(0).unwrap(), -2);
        assert_eq!(reader.peek_i32_le(1).unwrap(), -2);
        assert_eq!(reader.peek_i32_be(1).unwrap(), -16_777_217);
    }

    #[test]
    fn floats_are_little_endian() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&1.5f32.to_le_bytes());
        bytes.extend_from_slice(&(-2.25f64).to_le_bytes());
        let mut reader = PackedReader::new(&bytes);
        assert_eq!(reader.read_f32_le().unwrap(), 1.5);
        assert_eq!(reader.read_f64_le().unwrap(), -2.25);
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn cursor_reads_advance() {
        let mut reader = PackedReader::new(&SAMPLE);
        assert_eq!(reader.read_u8().unwrap(), 0x01);
        assert_eq!(reader.read_u16_le().unwrap(), 0x0302);
        assert_eq!(reader.position(), 3);
        assert_eq!(reader.read_array(3).unwrap(), &[0x04, 0x05, 0x06]);
        assert_eq!(reader.read_char().unwrap(), '\u{7}');
        assert_eq!(reader.remaining(), 1);
        assert!(reader.read_u16_le().is_err());
        assert_eq!(reader.position(), 7);
    }

    #[test]
    fn set_position_accepts_negative_and_end() {
        let mut reader = PackedReader::new(&SAMPLE);
        reader.set_position(-2).unwrap();
        assert_eq!(reader.read_u16_be().unwrap(), 0x0708);
        reader.set_position(8).unwrap();
        assert_eq!(reader.remaining(), 0);
        assert!(reader.set_position(9).is_err());
        reader.reset();
        assert_eq!(reader.position(), 0);
    }

    #[test]
    fn out_of_bounds_reports_access() {
        let reader = PackedReader::new(&SAMPLE);
        assert_eq!(
            reader.peek_u32_le(6),
            Err(FrameError::OutOfBounds {
                offset: 6,
                len: 4,
                size: 8
            })
        );
        assert!(reader.peek_array(4, 5).is_err());
        assert_eq!(reader.peek_array(8, 0).unwrap(), &[] as &[u8]);
    }
}

/// Errors that can occur while building frames or accessing packed fields.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FrameError {
    /// The payload exceeds what the 16-bit length field can describe.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// A positional access fell outside the buffer.
    #[error("access of {len} bytes at offset {offset} is out of bounds for a {size}-byte buffer")]
    OutOfBounds { offset: isize, len: usize, size: usize },
}

pub type Result<T> = std::result::Result<T, FrameError>;

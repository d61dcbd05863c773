/// Errors that can occur while exchanging typed messages.
#[derive(Debug, thiserror::Error)]
pub enum MessageError {
    /// The message could not be framed.
    #[error("frame error: {0}")]
    Frame(#[from] ubxbus_frame::FrameError),

    /// The transport failed.
    #[error("transport error: {0}")]
    Transport(#[from] ubxbus_transport::TransportError),
}

pub type Result<T> = std::result::Result<T, MessageError>;

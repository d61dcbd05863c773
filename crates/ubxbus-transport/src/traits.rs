use ubxbus_frame::Frame;

use crate::error::Result;

/// Sends and receives whole frames.
pub trait UbxTransport {
    /// Transmit one frame.
    fn send(&mut self, frame: &Frame) -> Result<()>;

    /// Fetch the next frame if one is available.
    ///
    /// `Ok(None)` covers both "nothing pending" and "pending data was not a
    /// valid frame".
    fn poll(&mut self) -> Result<Option<Frame>>;
}

impl<T: UbxTransport + ?Sized> UbxTransport for &mut T {
    fn send(&mut self, frame: &Frame) -> Result<()> {
        (**self).send(frame)
    }

    fn poll(&mut self) -> Result<Option<Frame>> {
        (**self).poll()
    }
}

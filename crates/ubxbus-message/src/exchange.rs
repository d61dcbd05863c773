use tracing::debug;
use ubxbus_transport::UbxTransport;

use crate::error::Result;
use crate::message::Message;
use crate::registry::{Dispatch, MessageRegistry};

/// Flatten `message` and send it.
pub fn send_message<T: UbxTransport + ?Sized>(
    transport: &mut T,
    message: &dyn Message,
) -> Result<()> {
    let frame = message.flatten()?;
    debug!(
        name = message.message_type().name,
        len = frame.len(),
        "sending message"
    );
    transport.send(&frame)?;
    Ok(())
}

/// Poll one frame and route it through `registry`.
///
/// `Ok(None)` when no frame was available. Frames that arrive but do not
/// decode come back as [`Dispatch::Unknown`] or [`Dispatch::Malformed`].
pub fn poll_message<T: UbxTransport + ?Sized>(
    transport: &mut T,
    registry: &MessageRegistry,
) -> Result<Option<Dispatch>> {
    Ok(transport.poll()?.map(|frame| registry.dispatch(&frame)))
}

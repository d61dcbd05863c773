//! Frame transports.
//!
//! A [`UbxTransport`] sends and polls whole [`Frame`](ubxbus_frame::Frame)s,
//! independent of the bus underneath. [`TwiTransport`] implements it on top
//! of any [`TwiDriver`](ubxbus_twi::TwiDriver) using the u-blox DDC register
//! convention, and translates bus failures into transport-level kinds.

pub mod config;
pub mod error;
pub mod traits;
pub mod twi;

pub use config::{
    TwiTransportConfig, DEFAULT_DEVICE_ADDRESS, DEFAULT_FRAME_LENGTH_LIMIT, NO_DATA_SENTINEL,
    REG_BYTE_COUNT, REG_DATA,
};
pub use error::{Result, TransportError};
pub use traits::UbxTransport;
pub use twi::TwiTransport;

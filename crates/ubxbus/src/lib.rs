//! UBX protocol messaging over a two-wire bus.
//!
//! ubxbus talks to u-blox style receivers over I2C/TWI: transactions on the
//! bus, checksummed UBX frames on top, and typed messages on top of those.
//!
//! # Crate Structure
//!
//! - [`twi`]: transactions, bus primitives and the engine that drives them
//! - [`frame`]: UBX frame codec, checksum and packed field access
//! - [`transport`]: frame send/poll over a bus driver
//! - [`message`]: typed messages and the `(class, id)` registry

/// Re-export bus transaction types.
pub mod twi {
    pub use ubxbus_twi::*;
}

/// Re-export frame types.
pub mod frame {
    pub use ubxbus_frame::*;
}

/// Re-export transport types.
pub mod transport {
    pub use ubxbus_transport::*;
}

/// Re-export message types.
pub mod message {
    pub use ubxbus_message::*;
}

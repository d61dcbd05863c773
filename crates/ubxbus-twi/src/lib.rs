//! Two-wire (I2C/TWI) bus transaction engine.
//!
//! This is the lowest layer of ubxbus. A [`Transaction`] is an ordered list
//! of addressed write/read [`Segment`]s; a [`TwiDriver`] executes it as one
//! bus exchange bounded by a start and a stop condition.
//!
//! - [`BusPrimitives`] is the contract a concrete backend implements
//!   (start, repeated start, stop, address byte, data byte, read byte).
//! - [`BusEngine`] turns any `BusPrimitives` into a `TwiDriver` and owns the
//!   ACK/NACK protocol.
//! - [`DummyBus`] is a simulated backend that records every primitive.
//! - [`LoggingDriver`] wraps any driver and logs its operations.

pub mod delegate;
pub mod dummy;
pub mod engine;
pub mod error;
pub mod traits;
pub mod transaction;

pub use delegate::LoggingDriver;
pub use dummy::{BusEvent, DummyBus, DEFAULT_FILL_BYTE};
pub use engine::BusEngine;
pub use error::{DriverError, NackStage, Result, TransactionError, TwiError};
pub use traits::{BusPrimitives, TwiDriver};
pub use transaction::{
    address_byte, AddressedBuilder, Direction, Segment, Transaction, TransactionBuilder,
    MAX_ADDRESS,
};

use std::fmt;

/// Local failures of the bus implementation itself.
///
/// These originate in the driver (port cannot be opened, ioctl failed, ...)
/// and say nothing about the remote hardware.
#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    /// The bus port could not be opened.
    #[error("failed to open bus port {port}: {reason}")]
    Open { port: String, reason: String },

    /// The bus port could not be closed.
    #[error("failed to close bus port {port}: {reason}")]
    Close { port: String, reason: String },

    /// A primitive was issued on a port that is not open.
    #[error("bus port {0} is not open")]
    NotOpen(String),

    /// An I/O error occurred in the underlying device node.
    #[error("bus I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Any other local driver fault.
    #[error("bus driver fault: {0}")]
    Other(String),
}

/// Where in a segment a NACK was received.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NackStage {
    /// Nobody acknowledged the address byte: the device is not on the bus.
    Address,
    /// The device acknowledged its address but refused a data byte.
    DataWrite,
}

impl fmt::Display for NackStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NackStage::Address => f.write_str("address"),
            NackStage::DataWrite => f.write_str("data write"),
        }
    }
}

/// Failures caused by the bus or the remote hardware.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransactionError {
    /// A byte was not acknowledged.
    #[error("NACK at {stage} stage from device 0x{address:02X}")]
    Nack { address: u8, stage: NackStage },

    /// A segment carries an address outside the 7-bit range.
    #[error("invalid 7-bit bus address 0x{0:02X}")]
    InvalidAddress(u8),
}

impl TransactionError {
    /// True if no device acknowledged its address.
    pub fn is_address_nack(&self) -> bool {
        matches!(
            self,
            TransactionError::Nack {
                stage: NackStage::Address,
                ..
            }
        )
    }
}

/// Errors surfaced by [`TwiDriver::submit`](crate::TwiDriver::submit).
#[derive(Debug, thiserror::Error)]
pub enum TwiError {
    /// Local driver fault.
    #[error("driver error: {0}")]
    Driver(#[from] DriverError),

    /// Bus or remote-device fault.
    #[error("transaction error: {0}")]
    Transaction(#[from] TransactionError),
}

pub type Result<T> = std::result::Result<T, TwiError>;

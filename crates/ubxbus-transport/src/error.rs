use ubxbus_twi::{DriverError, NackStage, TransactionError, TwiError};

/// Errors surfaced by frame transports.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// No device acknowledged the configured address.
    #[error("device 0x{address:02X} unreachable via TWI")]
    DeviceUnreachable {
        address: u8,
        #[source]
        source: TransactionError,
    },

    /// The local bus driver failed.
    #[error("TWI driver error: {0}")]
    Driver(#[source] DriverError),

    /// Any other bus failure.
    #[error("TWI transfer failed: {0}")]
    Failed(#[source] TransactionError),
}

impl TransportError {
    /// True if the device did not answer at all.
    pub fn is_unreachable(&self) -> bool {
        matches!(self, TransportError::DeviceUnreachable { .. })
    }
}

impl From<TwiError> for TransportError {
    fn from(err: TwiError) -> Self {
        match err {
            TwiError::Driver(source) => TransportError::Driver(source),
            TwiError::Transaction(source) => match source {
                TransactionError::Nack {
                    address,
                    stage: NackStage::Address,
                } => TransportError::DeviceUnreachable { address, source },
                other => TransportError::Failed(other),
            },
        }
    }
}

pub type Result<T> = std::result::Result<T, TransportError>;

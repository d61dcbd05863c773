use std::fmt;

use ubxbus_frame::FrameError;
use ubxbus_message::MessageError;
use ubxbus_transport::TransportError;
use ubxbus_twi::{DriverError, NackStage, TransactionError, TwiError};

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const BUS_ERROR: i32 = 3;
pub const DEVICE_UNREACHABLE: i32 = 4;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn usage(message: impl Into<String>) -> Self {
        Self::new(USAGE, message)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn driver_error(context: &str, err: DriverError) -> CliError {
    let code = match err {
        DriverError::Io(_) => INTERNAL,
        _ => FAILURE,
    };
    CliError::new(code, format!("{context}: {err}"))
}

fn transaction_code(err: &TransactionError) -> i32 {
    match err {
        TransactionError::Nack {
            stage: NackStage::Address,
            ..
        } => DEVICE_UNREACHABLE,
        TransactionError::Nack { .. } => BUS_ERROR,
        TransactionError::InvalidAddress(_) => USAGE,
    }
}

pub fn twi_error(context: &str, err: TwiError) -> CliError {
    match err {
        TwiError::Driver(err) => driver_error(context, err),
        TwiError::Transaction(err) => {
            CliError::new(transaction_code(&err), format!("{context}: {err}"))
        }
    }
}

pub fn transport_error(context: &str, err: TransportError) -> CliError {
    match err {
        TransportError::Driver(err) => driver_error(context, err),
        TransportError::DeviceUnreachable { .. } => {
            CliError::new(DEVICE_UNREACHABLE, format!("{context}: {err}"))
        }
        TransportError::Failed(ref source) => {
            CliError::new(transaction_code(source), format!("{context}: {err}"))
        }
    }
}

pub fn frame_error(context: &str, err: FrameError) -> CliError {
    match err {
        FrameError::PayloadTooLarge { .. } => {
            CliError::new(DATA_INVALID, format!("{context}: {err}"))
        }
        other => CliError::new(INTERNAL, format!("{context}: {other}")),
    }
}

pub fn message_error(context: &str, err: MessageError) -> CliError {
    match err {
        MessageError::Frame(err) => frame_error(context, err),
        MessageError::Transport(err) => transport_error(context, err),
    }
}

use tracing::{debug, error, info};

use crate::error::{DriverError, Result, TwiError};
use crate::traits::TwiDriver;
use crate::transaction::Transaction;

/// Wraps another [`TwiDriver`] and logs every operation through `tracing`.
///
/// Behaviour is otherwise unchanged: results and errors pass through as-is.
#[derive(Debug)]
pub struct LoggingDriver<D> {
    inner: D,
    port: String,
}

impl<D: TwiDriver> LoggingDriver<D> {
    pub fn new(inner: D, port: impl Into<String>) -> Self {
        Self {
            inner,
            port: port.into(),
        }
    }

    pub fn port(&self) -> &str {
        &self.port
    }

    /// Borrow the wrapped driver.
    pub fn get_ref(&self) -> &D {
        &self.inner
    }

    /// Mutably borrow the wrapped driver.
    pub fn get_mut(&mut self) -> &mut D {
        &mut self.inner
    }

    /// Consume the wrapper and return the wrapped driver.
    pub fn into_inner(self) -> D {
        self.inner
    }
}

impl<D: TwiDriver> TwiDriver for LoggingDriver<D> {
    fn open(&mut self) -> std::result::Result<(), DriverError> {
        info!(port = %self.port, "opening bus port");
        match self.inner.open() {
            Ok(()) => {
                info!(port = %self.port, "bus port opened");
                Ok(())
            }
            Err(err) => {
                error!(port = %self.port, error = %err, "failed to open bus port");
                Err(err)
            }
        }
    }

    fn close(&mut self) -> std::result::Result<(), DriverError> {
        info!(port = %self.port, "closing bus port");
        match self.inner.close() {
            Ok(()) => {
                info!(port = %self.port, "bus port closed");
                Ok(())
            }
            Err(err) => {
                error!(port = %self.port, error = %err, "failed to close bus port");
                Err(err)
            }
        }
    }

    fn submit<'t>(&mut self, transaction: &'t mut Transaction) -> Result<&'t Transaction> {
        debug!(port = %self.port, segments = transaction.len(), "submitting transaction");
        match self.inner.submit(transaction) {
            Ok(done) => {
                debug!(port = %self.port, transaction = %done, "transaction completed");
                Ok(done)
            }
            Err(err @ TwiError::Transaction(_)) => {
                error!(port = %self.port, error = %err, "transaction failed");
                Err(err)
            }
            Err(err @ TwiError::Driver(_)) => {
                error!(port = %self.port, error = %err, "bus driver error");
                Err(err)
            }
        }
    }
}

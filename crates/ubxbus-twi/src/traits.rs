use crate::error::{DriverError, Result};
use crate::transaction::{address_byte, Transaction};

/// The interface between the bus layer and everything above it.
///
/// Every call blocks until the bus exchange completes or fails. A caller that
/// needs a timeout has to enforce it inside the concrete bus implementation.
pub trait TwiDriver {
    /// Open the bus port. Repeated opens are left to the implementation.
    fn open(&mut self) -> std::result::Result<(), DriverError>;

    /// Close the bus port.
    fn close(&mut self) -> std::result::Result<(), DriverError>;

    /// Execute `transaction`, filling its read segments in place.
    ///
    /// Returns the same transaction so the caller can read the filled-in
    /// buffers. A NACK aborts the whole transaction; nothing is retried.
    fn submit<'t>(&mut self, transaction: &'t mut Transaction) -> Result<&'t Transaction>;
}

impl<D: TwiDriver + ?Sized> TwiDriver for &mut D {
    fn open(&mut self) -> std::result::Result<(), DriverError> {
        (**self).open()
    }

    fn close(&mut self) -> std::result::Result<(), DriverError> {
        (**self).close()
    }

    fn submit<'t>(&mut self, transaction: &'t mut Transaction) -> Result<&'t Transaction> {
        (**self).submit(transaction)
    }
}

impl<D: TwiDriver + ?Sized> TwiDriver for Box<D> {
    fn open(&mut self) -> std::result::Result<(), DriverError> {
        (**self).open()
    }

    fn close(&mut self) -> std::result::Result<(), DriverError> {
        (**self).close()
    }

    fn submit<'t>(&mut self, transaction: &'t mut Transaction) -> Result<&'t Transaction> {
        (**self).submit(transaction)
    }
}

/// Bit-level bus primitives a concrete backend must provide.
///
/// Acknowledgement is reported as `Ok(true)`; `Ok(false)` is a NACK from the
/// remote side. `Err` is reserved for local driver faults.
pub trait BusPrimitives {
    fn open(&mut self) -> std::result::Result<(), DriverError>;

    fn close(&mut self) -> std::result::Result<(), DriverError>;

    fn start(&mut self) -> std::result::Result<(), DriverError>;

    /// Backends without a distinct repeated-start signal fall back to `start`.
    fn repeated_start(&mut self) -> std::result::Result<(), DriverError> {
        self.start()
    }

    fn stop(&mut self) -> std::result::Result<(), DriverError>;

    /// Write the address byte for `address` with the R/W bit set from `is_read`.
    fn write_address(
        &mut self,
        address: u8,
        is_read: bool,
    ) -> std::result::Result<bool, DriverError> {
        self.write_byte(address_byte(address, is_read))
    }

    fn write_byte(&mut self, byte: u8) -> std::result::Result<bool, DriverError>;

    /// Read one byte. `ack` asks the device for more data; the last byte of a
    /// read is requested with `ack == false`.
    fn read_byte(&mut self, ack: bool) -> std::result::Result<u8, DriverError>;
}

use std::collections::VecDeque;
use std::fmt::Write as _;

use tracing::{debug, info};

use crate::error::DriverError;
use crate::traits::BusPrimitives;
use crate::transaction::MAX_ADDRESS;

/// Byte supplied for reads when no scripted data is queued.
pub const DEFAULT_FILL_BYTE: u8 = 0x55;

/// One bus primitive as observed by [`DummyBus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusEvent {
    Start,
    RepeatedStart,
    Stop,
    Address { address: u8, is_read: bool, ack: bool },
    Write { byte: u8, ack: bool },
    Read { byte: u8, ack: bool },
}

/// A bus backend that works without hardware.
///
/// Acknowledges everything and answers reads with queued bytes, falling back
/// to a fill byte. Every primitive is recorded so callers can assert on the
/// exact bus sequence. Scripted NACKs and faults simulate misbehaving devices.
#[derive(Debug, Clone)]
pub struct DummyBus {
    port: String,
    open: bool,
    fill_byte: u8,
    read_data: VecDeque<u8>,
    nack_addresses: Vec<u8>,
    nack_after_data_bytes: Option<usize>,
    data_bytes_written: usize,
    fault: Option<String>,
    events: Vec<BusEvent>,
    exchange_start: usize,
}

impl DummyBus {
    pub fn new(port: impl Into<String>) -> Self {
        Self {
            port: port.into(),
            open: false,
            fill_byte: DEFAULT_FILL_BYTE,
            read_data: VecDeque::new(),
            nack_addresses: Vec::new(),
            nack_after_data_bytes: None,
            data_bytes_written: 0,
            fault: None,
            events: Vec::new(),
            exchange_start: 0,
        }
    }

    /// Byte returned by reads once the queued data runs out.
    pub fn with_fill_byte(mut self, byte: u8) -> Self {
        self.fill_byte = byte;
        self
    }

    /// Queue bytes to be returned by subsequent reads, in order.
    pub fn with_read_data(mut self, data: impl IntoIterator<Item = u8>) -> Self {
        self.read_data.extend(data);
        self
    }

    /// Never acknowledge the address byte for `address`.
    pub fn nack_address(mut self, address: u8) -> Self {
        self.nack_addresses.push(address);
        self
    }

    /// Acknowledge the first `count` data bytes written, then NACK.
    pub fn nack_after_data_bytes(mut self, count: usize) -> Self {
        self.nack_after_data_bytes = Some(count);
        self
    }

    /// Fail every bus primitive with a driver fault.
    pub fn with_fault(mut self, reason: impl Into<String>) -> Self {
        self.fault = Some(reason.into());
        self
    }

    /// Queue more read data on an existing bus.
    pub fn push_read_data(&mut self, data: impl IntoIterator<Item = u8>) {
        self.read_data.extend(data);
    }

    pub fn port(&self) -> &str {
        &self.port
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Every primitive recorded so far.
    pub fn events(&self) -> &[BusEvent] {
        &self.events
    }

    pub fn clear_events(&mut self) {
        self.events.clear();
        self.exchange_start = 0;
    }

    /// Render the recorded primitives in bus notation, with ACK markers.
    pub fn trace(&self) -> String {
        render_events(&self.events)
    }

    fn check_fault(&self) -> Result<(), DriverError> {
        match &self.fault {
            Some(reason) => Err(DriverError::Other(format!("{}: {reason}", self.port))),
            None => Ok(()),
        }
    }
}

impl Default for DummyBus {
    fn default() -> Self {
        Self::new("dummy")
    }
}

impl BusPrimitives for DummyBus {
    fn open(&mut self) -> Result<(), DriverError> {
        if let Some(reason) = &self.fault {
            return Err(DriverError::Open {
                port: self.port.clone(),
                reason: reason.clone(),
            });
        }
        self.open = true;
        info!(port = %self.port, "opened dummy bus port");
        Ok(())
    }

    fn close(&mut self) -> Result<(), DriverError> {
        self.open = false;
        info!(port = %self.port, "closed dummy bus port");
        Ok(())
    }

    fn start(&mut self) -> Result<(), DriverError> {
        self.check_fault()?;
        self.exchange_start = self.events.len();
        self.events.push(BusEvent::Start);
        Ok(())
    }

    fn repeated_start(&mut self) -> Result<(), DriverError> {
        self.check_fault()?;
        self.events.push(BusEvent::RepeatedStart);
        Ok(())
    }

    fn stop(&mut self) -> Result<(), DriverError> {
        self.events.push(BusEvent::Stop);
        let start = self.exchange_start.min(self.events.len());
        debug!(port = %self.port, trace = %render_events(&self.events[start..]), "bus exchange");
        self.exchange_start = self.events.len();
        Ok(())
    }

    fn write_address(&mut self, address: u8, is_read: bool) -> Result<bool, DriverError> {
        self.check_fault()?;
        let ack = !self.nack_addresses.contains(&address);
        self.events.push(BusEvent::Address {
            address,
            is_read,
            ack,
        });
        Ok(ack)
    }

    fn write_byte(&mut self, byte: u8) -> Result<bool, DriverError> {
        self.check_fault()?;
        let ack = match self.nack_after_data_bytes {
            Some(limit) => self.data_bytes_written < limit,
            None => true,
        };
        self.data_bytes_written = self.data_bytes_written.saturating_add(1);
        self.events.push(BusEvent::Write { byte, ack });
        Ok(ack)
    }

    fn read_byte(&mut self, ack: bool) -> Result<u8, DriverError> {
        self.check_fault()?;
        let byte = self.read_data.pop_front().unwrap_or(self.fill_byte);
        self.events.push(BusEvent::Read { byte, ack });
        Ok(byte)
    }
}

fn render_events(events: &[BusEvent]) -> String {
    let mut out = String::new();
    for event in events {
        // Writing into a String cannot fail.
        let _ = match *event {
            BusEvent::Start => write!(out, "[S]"),
            BusEvent::RepeatedStart => write!(out, "[Sr]"),
            BusEvent::Stop => write!(out, "[P]"),
            BusEvent::Address {
                address,
                is_read,
                ack,
            } => write!(
                out,
                "[AD:{:02X}+{}|{}]",
                address & MAX_ADDRESS,
                if is_read { 'R' } else { 'W' },
                ack_marker(ack)
            ),
            BusEvent::Write { byte, ack } => write!(out, "[W:{byte:02X}|{}]", ack_marker(ack)),
            BusEvent::Read { byte, ack } => write!(out, "[R:{byte:02X}|{}]", ack_marker(ack)),
        };
    }
    out
}

fn ack_marker(ack: bool) -> &'static str {
    if ack {
        "A"
    } else {
        "NA"
    }
}

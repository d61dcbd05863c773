use tracing::{debug, trace, warn};
use ubxbus_frame::{Frame, PackedReader};
use ubxbus_twi::{Segment, Transaction, TwiDriver};

use crate::config::TwiTransportConfig;
use crate::error::{Result, TransportError};
use crate::traits::UbxTransport;

/// [`UbxTransport`] over a two-wire bus driver.
///
/// Sending writes the serialized frame to the device in one write segment.
/// Polling runs two independent transactions: one reads the byte-count
/// register, the other reads that many bytes from the data register.
///
/// The two poll transactions are not atomic. If the device changes its
/// buffer between them, the data read can be truncated or stale; the frame
/// check then usually rejects it and `poll` yields `None`. Nothing here tries
/// to detect or repair that.
#[derive(Debug)]
pub struct TwiTransport<D> {
    driver: D,
    config: TwiTransportConfig,
}

impl<D: TwiDriver> TwiTransport<D> {
    /// Transport to a device at `address` with default register wiring.
    pub fn new(driver: D, address: u8) -> Self {
        Self::with_config(driver, TwiTransportConfig::at(address))
    }

    /// Transport with explicit device wiring.
    pub fn with_config(driver: D, config: TwiTransportConfig) -> Self {
        Self { driver, config }
    }

    pub fn config(&self) -> &TwiTransportConfig {
        &self.config
    }

    pub fn address(&self) -> u8 {
        self.config.address
    }

    /// Open the underlying driver.
    pub fn open(&mut self) -> Result<()> {
        self.driver.open().map_err(TransportError::Driver)
    }

    /// Close the underlying driver.
    pub fn close(&mut self) -> Result<()> {
        self.driver.close().map_err(TransportError::Driver)
    }

    /// Borrow the driver.
    pub fn get_ref(&self) -> &D {
        &self.driver
    }

    /// Mutably borrow the driver.
    pub fn get_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    /// Consume the transport and return the driver.
    pub fn into_inner(self) -> D {
        self.driver
    }

    /// Number of bytes the device reports as pending.
    pub fn bytes_available(&mut self) -> Result<usize> {
        let count = self.read_register(self.config.byte_count_register, 2)?;
        let available = PackedReader::new(&count).peek_u16_le(0).unwrap_or(0);
        Ok(usize::from(available))
    }

    /// Select `register`, then read `len` bytes with a repeated start.
    fn read_register(&mut self, register: u8, len: usize) -> Result<Vec<u8>> {
        let mut transaction = Transaction::addressed(self.config.address)
            .write([register])
            .read(len)
            .build();
        self.driver.submit(&mut transaction)?;
        Ok(transaction
            .into_segments()
            .pop()
            .map(Segment::into_data)
            .unwrap_or_default())
    }
}

impl<D: TwiDriver> UbxTransport for TwiTransport<D> {
    fn send(&mut self, frame: &Frame) -> Result<()> {
        let wire = frame.serialize();
        debug!(
            address = self.config.address,
            class = frame.class(),
            id = frame.id(),
            size = wire.len(),
            "sending frame"
        );
        let mut transaction = Segment::write(self.config.address, wire.to_vec()).into_transaction();
        self.driver.submit(&mut transaction)?;
        Ok(())
    }

    fn poll(&mut self) -> Result<Option<Frame>> {
        let available = self.bytes_available()?;
        if available == 0 {
            trace!(address = self.config.address, "no bytes pending");
            return Ok(None);
        }
        if available > self.config.frame_length_limit {
            warn!(
                address = self.config.address,
                available,
                limit = self.config.frame_length_limit,
                "pending byte count exceeds frame length limit, skipping read"
            );
            return Ok(None);
        }

        let data = self.read_register(self.config.data_register, available)?;
        if data.first() == Some(&self.config.no_data_sentinel) {
            trace!(address = self.config.address, "device reported no data");
            return Ok(None);
        }

        let frame = Frame::deserialize(data);
        match &frame {
            Some(frame) => debug!(
                address = self.config.address,
                class = frame.class(),
                id = frame.id(),
                len = frame.len(),
                "received frame"
            ),
            None => debug!(
                address = self.config.address,
                available,
                "discarding invalid frame data"
            ),
        }
        Ok(frame)
    }
}

#[cfg(test)]
mod tests {
    use ubxbus_twi::{BusEngine, BusEvent, DriverError, DummyBus};

    use super::*;
    use crate::config::DEFAULT_DEVICE_ADDRESS;

    fn transport(bus: DummyBus) -> TwiTransport<BusEngine<DummyBus>> {
        TwiTransport::new(BusEngine::new(bus), DEFAULT_DEVICE_ADDRESS)
    }

    fn device_holding(frame: &Frame) -> DummyBus {
        let wire = frame.serialize();
        let count = u16::try_from(wire.len()).unwrap().to_le_bytes();
        DummyBus::new("test")
            .with_read_data(count)
            .with_read_data(wire.to_vec())
    }

    #[test]
    fn send_writes_whole_frame_in_one_segment() {
        let frame = Frame::new(0x06, 0x00, Vec::new()).unwrap();
        let mut transport = transport(DummyBus::new("test"));

        transport.send(&frame).unwrap();

        let bus = transport.get_ref().get_ref();
        assert_eq!(
            bus.trace(),
            "[S][AD:42+W|A][W:B5|A][W:62|A][W:06|A][W:00|A][W:00|A][W:00|A][W:06|A][W:18|A][P]"
        );
    }

    #[test]
    fn send_to_absent_device_is_unreachable() {
        let frame = Frame::new(0x06, 0x00, Vec::new()).unwrap();
        let mut transport = transport(DummyBus::new("test").nack_address(DEFAULT_DEVICE_ADDRESS));

        let err = transport.send(&frame).unwrap_err();
        assert!(matches!(
            err,
            TransportError::DeviceUnreachable {
                address: DEFAULT_DEVICE_ADDRESS,
                ..
            }
        ));
    }

    #[test]
    fn send_refused_data_is_generic_failure() {
        let frame = Frame::new(0x06, 0x00, Vec::new()).unwrap();
        let mut transport = transport(DummyBus::new("test").nack_after_data_bytes(2));

        let err = transport.send(&frame).unwrap_err();
        assert!(matches!(err, TransportError::Failed(_)));
    }

    #[test]
    fn send_driver_fault_is_driver_error() {
        let frame = Frame::new(0x06, 0x00, Vec::new()).unwrap();
        let mut transport = transport(DummyBus::new("test").with_fault("bus gone"));

        let err = transport.send(&frame).unwrap_err();
        assert!(matches!(err, TransportError::Driver(DriverError::Other(_))));
        assert!(matches!(transport.open(), Err(TransportError::Driver(_))));
    }

    #[test]
    fn poll_reads_count_then_frame() {
        let frame = Frame::new(0x01, 0x02, vec![1, 2, 3, 4]).unwrap();
        let mut transport = transport(device_holding(&frame));

        let polled = transport.poll().unwrap().unwrap();
        assert_eq!(polled, frame);

        let events = transport.get_ref().get_ref().events();
        let selectors: Vec<u8> = events
            .iter()
            .filter_map(|event| match event {
                BusEvent::Write { byte, .. } => Some(*byte),
                _ => None,
            })
            .collect();
        assert_eq!(selectors, vec![0xFC, 0xFF]);
        let stops = events.iter().filter(|e| **e == BusEvent::Stop).count();
        assert_eq!(stops, 2);
    }

    #[test]
    fn poll_with_nothing_pending_skips_data_read() {
        let mut transport = transport(DummyBus::new("test").with_read_data([0x00, 0x00]));

        assert!(transport.poll().unwrap().is_none());

        let stops = transport
            .get_ref()
            .get_ref()
            .events()
            .iter()
            .filter(|e| **e == BusEvent::Stop)
            .count();
        assert_eq!(stops, 1);
    }

    #[test]
    fn poll_over_limit_skips_data_read() {
        let count = 4097u16.to_le_bytes();
        let mut transport = transport(DummyBus::new("test").with_read_data(count));

        assert!(transport.poll().unwrap().is_none());

        let stops = transport
            .get_ref()
            .get_ref()
            .events()
            .iter()
            .filter(|e| **e == BusEvent::Stop)
            .count();
        assert_eq!(stops, 1);
    }

    #[test]
    fn poll_respects_configured_limit() {
        let frame = Frame::new(0x01, 0x02, vec![0; 32]).unwrap();
        let config = TwiTransportConfig {
            frame_length_limit: 16,
            ..TwiTransportConfig::default()
        };
        let mut transport =
            TwiTransport::with_config(BusEngine::new(device_holding(&frame)), config);

        assert!(transport.poll().unwrap().is_none());
    }

    #[test]
    fn poll_no_data_sentinel() {
        // Count says 3 bytes, device streams 0xFF: nothing to parse.
        let bus = DummyBus::new("test")
            .with_read_data([0x03, 0x00])
            .with_fill_byte(0xFF);
        let mut transport = transport(bus);

        assert!(transport.poll().unwrap().is_none());
    }

    #[test]
    fn poll_garbage_is_absent_not_error() {
        let mut transport = transport(
            DummyBus::new("test")
                .with_read_data([0x08, 0x00])
                .with_read_data([0xB5, 0x62, 0x01, 0x02, 0x00, 0x00, 0x00, 0x00]),
        );

        assert!(transport.poll().unwrap().is_none());
    }

    #[test]
    fn poll_absent_device_is_unreachable() {
        let bus = DummyBus::new("test").nack_address(DEFAULT_DEVICE_ADDRESS);
        let mut transport = transport(bus);
        let err = transport.poll().unwrap_err();
        assert!(err.is_unreachable());
    }

    #[test]
    fn bytes_available_is_little_endian() {
        let mut transport = transport(DummyBus::new("test").with_read_data([0x34, 0x12]));
        assert_eq!(transport.bytes_available().unwrap(), 0x1234);
    }
}

use tracing::{debug, warn};

use crate::error::{DriverError, NackStage, Result, TransactionError, TwiError};
use crate::traits::{BusPrimitives, TwiDriver};
use crate::transaction::{Direction, Segment, Transaction, MAX_ADDRESS};

/// Executes transactions over any [`BusPrimitives`] backend.
///
/// Owns the ACK/NACK protocol: start before the first segment, repeated start
/// before every other one, address byte with direction bit, data phase, and
/// exactly one stop condition per non-empty transaction, error path included.
#[derive(Debug)]
pub struct BusEngine<B> {
    bus: B,
}

impl<B: BusPrimitives> BusEngine<B> {
    pub fn new(bus: B) -> Self {
        Self { bus }
    }

    /// Borrow the underlying bus.
    pub fn get_ref(&self) -> &B {
        &self.bus
    }

    /// Mutably borrow the underlying bus.
    pub fn get_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    /// Consume the engine and return the bus.
    pub fn into_inner(self) -> B {
        self.bus
    }

    fn run_segments(&mut self, segments: &mut [Segment]) -> Result<()> {
        for (index, segment) in segments.iter_mut().enumerate() {
            if index == 0 {
                self.bus.start()?;
            } else {
                self.bus.repeated_start()?;
            }

            let address = segment.address();
            if !self.bus.write_address(address, segment.is_read())? {
                return Err(TransactionError::Nack {
                    address,
                    stage: NackStage::Address,
                }
                .into());
            }

            match segment.direction() {
                Direction::Write => {
                    for &byte in segment.data() {
                        if !self.bus.write_byte(byte)? {
                            return Err(TransactionError::Nack {
                                address,
                                stage: NackStage::DataWrite,
                            }
                            .into());
                        }
                    }
                }
                Direction::Read => {
                    let buf = segment.data_mut();
                    let last = buf.len().saturating_sub(1);
                    for (i, slot) in buf.iter_mut().enumerate() {
                        *slot = self.bus.read_byte(i != last)?;
                    }
                }
            }
        }
        Ok(())
    }
}

impl<B: BusPrimitives> TwiDriver for BusEngine<B> {
    fn open(&mut self) -> std::result::Result<(), DriverError> {
        self.bus.open()
    }

    fn close(&mut self) -> std::result::Result<(), DriverError> {
        self.bus.close()
    }

    fn submit<'t>(&mut self, transaction: &'t mut Transaction) -> Result<&'t Transaction> {
        // No start means no orphaned stop.
        if transaction.is_empty() {
            return Ok(transaction);
        }

        if let Some(segment) = transaction
            .iter()
            .find(|segment| segment.address() > MAX_ADDRESS)
        {
            return Err(TransactionError::InvalidAddress(segment.address()).into());
        }

        debug!(segments = transaction.len(), "submitting transaction");
        let outcome = self.run_segments(transaction.segments_mut());
        let stopped = self.bus.stop();

        match (outcome, stopped) {
            (Ok(()), Ok(())) => Ok(transaction),
            (Ok(()), Err(stop_err)) => Err(TwiError::Driver(stop_err)),
            (Err(err), Ok(())) => {
                debug!(error = %err, "transaction aborted");
                Err(err)
            }
            (Err(err), Err(stop_err)) => {
                warn!(error = %err, stop_error = %stop_err, "stop condition failed after aborted transaction");
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dummy::{BusEvent, DummyBus};

    fn example_transaction() -> Transaction {
        Transaction::builder()
            .segment(Segment::write(0x03, [0x40, 0x41]))
            .segment(Segment::write(0x04, [0x01, 0x02, 0x03]))
            .segment(Segment::read(0x04, 1))
            .build()
    }

    #[test]
    fn empty_transaction_touches_nothing() {
        let mut engine = BusEngine::new(DummyBus::new("test"));
        let mut tx = Transaction::builder().build();

        engine.submit(&mut tx).unwrap();

        assert!(engine.get_ref().events().is_empty());
    }

    #[test]
    fn emits_primitives_in_order() {
        let mut engine = BusEngine::new(DummyBus::new("test").with_read_data([0x7E]));
        let mut tx = example_transaction();

        let done = engine.submit(&mut tx).unwrap();
        assert_eq!(done.segment_data(2), Some(&[0x7E][..]));

        assert_eq!(
            engine.get_ref().events(),
            &[
                BusEvent::Start,
                BusEvent::Address { address: 0x03, is_read: false, ack: true },
                BusEvent::Write { byte: 0x40, ack: true },
                BusEvent::Write { byte: 0x41, ack: true },
                BusEvent::RepeatedStart,
                BusEvent::Address { address: 0x04, is_read: false, ack: true },
                BusEvent::Write { byte: 0x01, ack: true },
                BusEvent::Write { byte: 0x02, ack: true },
                BusEvent::Write { byte: 0x03, ack: true },
                BusEvent::RepeatedStart,
                BusEvent::Address { address: 0x04, is_read: true, ack: true },
                BusEvent::Read { byte: 0x7E, ack: false },
                BusEvent::Stop,
            ]
        );
    }

    #[test]
    fn multi_byte_read_acks_all_but_last() {
        let mut engine = BusEngine::new(DummyBus::new("test").with_read_data([1, 2, 3]));
        let mut tx = Transaction::addressed(0x42).read(3).build();

        engine.submit(&mut tx).unwrap();

        let acks: Vec<bool> = engine
            .get_ref()
            .events()
            .iter()
            .filter_map(|event| match event {
                BusEvent::Read { ack, .. } => Some(*ack),
                _ => None,
            })
            .collect();
        assert_eq!(acks, vec![true, true, false]);
        assert_eq!(tx.segment_data(0), Some(&[1, 2, 3][..]));
    }

    #[test]
    fn address_nack_aborts_before_data_and_still_stops() {
        let mut engine = BusEngine::new(DummyBus::new("test").nack_address(0x03));
        let mut tx = example_transaction();

        let err = engine.submit(&mut tx).unwrap_err();
        assert!(matches!(
            err,
            TwiError::Transaction(TransactionError::Nack {
                address: 0x03,
                stage: NackStage::Address
            })
        ));

        let events = engine.get_ref().events();
        assert_eq!(
            events,
            &[
                BusEvent::Start,
                BusEvent::Address { address: 0x03, is_read: false, ack: false },
                BusEvent::Stop,
            ]
        );
        let stops = events.iter().filter(|e| **e == BusEvent::Stop).count();
        assert_eq!(stops, 1);
    }

    #[test]
    fn data_nack_aborts_remaining_segments() {
        let mut engine = BusEngine::new(DummyBus::new("test").nack_after_data_bytes(3));
        let mut tx = example_transaction();

        let err = engine.submit(&mut tx).unwrap_err();
        assert!(matches!(
            err,
            TwiError::Transaction(TransactionError::Nack {
                address: 0x04,
                stage: NackStage::DataWrite
            })
        ));

        let events = engine.get_ref().events();
        assert!(!events
            .iter()
            .any(|e| matches!(e, BusEvent::Address { is_read: true, .. })));
        assert_eq!(events.last(), Some(&BusEvent::Stop));
        assert_eq!(tx.segment_data(2), Some(&[0][..]));
    }

    #[test]
    fn invalid_address_rejected_without_bus_activity() {
        let mut engine = BusEngine::new(DummyBus::new("test"));
        let mut tx = Transaction::builder()
            .segment(Segment::write(0x10, [1]))
            .segment(Segment::read(0x80, 1))
            .build();

        let err = engine.submit(&mut tx).unwrap_err();
        assert!(matches!(
            err,
            TwiError::Transaction(TransactionError::InvalidAddress(0x80))
        ));
        assert!(engine.get_ref().events().is_empty());
    }

    #[test]
    fn zero_length_read_emits_no_read_byte() {
        let mut engine = BusEngine::new(DummyBus::new("test"));
        let mut tx = Transaction::addressed(0x42).read(0).build();

        engine.submit(&mut tx).unwrap();

        assert_eq!(
            engine.get_ref().events(),
            &[
                BusEvent::Start,
                BusEvent::Address { address: 0x42, is_read: true, ack: true },
                BusEvent::Stop,
            ]
        );
    }

    struct FaultyStopBus;

    impl BusPrimitives for FaultyStopBus {
        fn open(&mut self) -> std::result::Result<(), DriverError> {
            Ok(())
        }
        fn close(&mut self) -> std::result::Result<(), DriverError> {
            Ok(())
        }
        fn start(&mut self) -> std::result::Result<(), DriverError> {
            Ok(())
        }
        fn stop(&mut self) -> std::result::Result<(), DriverError> {
            Err(DriverError::Other("stop failed".into()))
        }
        fn write_byte(&mut self, _byte: u8) -> std::result::Result<bool, DriverError> {
            Ok(true)
        }
        fn read_byte(&mut self, _ack: bool) -> std::result::Result<u8, DriverError> {
            Ok(0)
        }
    }

    #[test]
    fn stop_failure_surfaces_as_driver_error() {
        let mut engine = BusEngine::new(FaultyStopBus);
        let mut tx = Transaction::addressed(0x42).write([1]).build();

        let err = engine.submit(&mut tx).unwrap_err();
        assert!(matches!(err, TwiError::Driver(DriverError::Other(_))));
    }
}

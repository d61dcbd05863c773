use std::fmt;

/// Highest valid 7-bit bus address.
pub const MAX_ADDRESS: u8 = 0x7F;

/// Compose the on-wire address byte: 7-bit address followed by the R/W bit.
pub fn address_byte(address: u8, is_read: bool) -> u8 {
    (address << 1) | u8::from(is_read)
}

/// Direction of a segment, as seen from the bus master.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Write,
    Read,
}

/// One addressed read or write operation within a [`Transaction`].
///
/// For a write segment the data is caller-supplied and never touched by the
/// engine. For a read segment the data is a zeroed buffer of the requested
/// length; it is an output slot that the engine fills in place while the
/// transaction is submitted, and the caller reads it afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    direction: Direction,
    address: u8,
    data: Vec<u8>,
}

impl Segment {
    /// A write of `data` to the device at `address`.
    pub fn write(address: u8, data: impl Into<Vec<u8>>) -> Self {
        Self {
            direction: Direction::Write,
            address,
            data: data.into(),
        }
    }

    /// A read of `len` bytes from the device at `address`.
    pub fn read(address: u8, len: usize) -> Self {
        Self {
            direction: Direction::Read,
            address,
            data: vec![0; len],
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    pub fn is_read(&self) -> bool {
        self.direction == Direction::Read
    }

    /// Written bytes, or the bytes read so far for a read segment.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The address byte this segment puts on the wire.
    pub fn address_byte(&self) -> u8 {
        address_byte(self.address, self.is_read())
    }

    /// Take the segment's buffer.
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Read segments are filled through this during submission.
    pub(crate) fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Wrap this segment in a one-segment transaction.
    pub fn into_transaction(self) -> Transaction {
        TransactionBuilder::new().segment(self).build()
    }

    fn fmt_bus(&self, f: &mut fmt::Formatter<'_>, repeated: bool) -> fmt::Result {
        f.write_str(if repeated { "[Sr]" } else { "[S]" })?;
        let dir = match self.direction {
            Direction::Write => 'W',
            Direction::Read => 'R',
        };
        write!(f, "[AD:{:02X}+{dir}]", self.address & MAX_ADDRESS)?;
        for byte in &self.data {
            write!(f, "[{dir}:{byte:02X}]")?;
        }
        Ok(())
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_bus(f, false)
    }
}

/// An ordered group of segments executed as one bus exchange.
///
/// The segment list is fixed once built; only the buffers of read segments
/// change, and only while a driver is executing the transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    segments: Box<[Segment]>,
}

impl Transaction {
    /// Start building a transaction from arbitrary segments.
    pub fn builder() -> TransactionBuilder {
        TransactionBuilder::new()
    }

    /// Start building a transaction whose segments all target `address`.
    pub fn addressed(address: u8) -> AddressedBuilder {
        AddressedBuilder::new(address)
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub(crate) fn segments_mut(&mut self) -> &mut [Segment] {
        &mut self.segments
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Segment> {
        self.segments.iter()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Take the segments, e.g. to keep a read buffer without copying.
    pub fn into_segments(self) -> Vec<Segment> {
        self.segments.into_vec()
    }

    /// Data of the segment at `index`, typically a filled-in read buffer.
    pub fn segment_data(&self, index: usize) -> Option<&[u8]> {
        self.segments.get(index).map(Segment::data)
    }
}

impl<'a> IntoIterator for &'a Transaction {
    type Item = &'a Segment;
    type IntoIter = std::slice::Iter<'a, Segment>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("[]");
        }
        for (index, segment) in self.segments.iter().enumerate() {
            segment.fmt_bus(f, index > 0)?;
        }
        f.write_str("[P]")
    }
}

/// Accumulates segments in insertion order.
#[derive(Debug, Clone, Default)]
pub struct TransactionBuilder {
    segments: Vec<Segment>,
}

impl TransactionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one segment.
    pub fn segment(mut self, segment: Segment) -> Self {
        self.segments.push(segment);
        self
    }

    /// Append every segment accumulated by another builder.
    pub fn with(mut self, other: impl Into<TransactionBuilder>) -> Self {
        self.segments.extend(other.into().segments);
        self
    }

    pub fn build(self) -> Transaction {
        Transaction {
            segments: self.segments.into_boxed_slice(),
        }
    }
}

/// Builder with a fixed default address for its `write`/`read` shortcuts.
#[derive(Debug, Clone)]
pub struct AddressedBuilder {
    address: u8,
    inner: TransactionBuilder,
}

impl AddressedBuilder {
    pub fn new(address: u8) -> Self {
        Self {
            address,
            inner: TransactionBuilder::new(),
        }
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    /// Append a write of `data` at the builder's address.
    pub fn write(mut self, data: impl Into<Vec<u8>>) -> Self {
        self.inner = self.inner.segment(Segment::write(self.address, data));
        self
    }

    /// Append a read of `len` bytes at the builder's address.
    pub fn read(mut self, len: usize) -> Self {
        self.inner = self.inner.segment(Segment::read(self.address, len));
        self
    }

    /// Append an arbitrary segment, which may target another address.
    pub fn segment(mut self, segment: Segment) -> Self {
        self.inner = self.inner.segment(segment);
        self
    }

    pub fn with(mut self, other: impl Into<TransactionBuilder>) -> Self {
        self.inner = self.inner.with(other);
        self
    }

    pub fn build(self) -> Transaction {
        self.inner.build()
    }
}

impl From<AddressedBuilder> for TransactionBuilder {
    fn from(builder: AddressedBuilder) -> Self {
        builder.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_byte_appends_direction_bit() {
        assert_eq!(address_byte(0x42, false), 0x84);
        assert_eq!(address_byte(0x42, true), 0x85);
        assert_eq!(address_byte(MAX_ADDRESS, true), 0xFF);
    }

    #[test]
    fn read_segment_is_zeroed() {
        let segment = Segment::read(0x04, 3);
        assert!(segment.is_read());
        assert_eq!(segment.data(), &[0, 0, 0]);
        assert_eq!(segment.address_byte(), 0x09);
    }

    #[test]
    fn builder_preserves_insertion_order() {
        let tx = Transaction::builder()
            .segment(Segment::write(0x03, [0x40, 0x41]))
            .with(Transaction::addressed(0x04).write([0x01]).read(2))
            .segment(Segment::read(0x05, 1))
            .build();

        let addresses: Vec<(u8, Direction)> =
            tx.iter().map(|s| (s.address(), s.direction())).collect();
        assert_eq!(
            addresses,
            vec![
                (0x03, Direction::Write),
                (0x04, Direction::Write),
                (0x04, Direction::Read),
                (0x05, Direction::Read),
            ]
        );
    }

    #[test]
    fn addressed_builder_targets_its_address() {
        let tx = Transaction::addressed(0x42).write([0xFC]).read(2).build();
        assert_eq!(tx.len(), 2);
        assert!(tx.iter().all(|s| s.address() == 0x42));
        assert_eq!(tx.segment_data(0), Some(&[0xFC][..]));
        assert_eq!(tx.segment_data(1), Some(&[0, 0][..]));
        assert_eq!(tx.segment_data(2), None);
    }

    #[test]
    fn display_uses_bus_notation() {
        let tx = Transaction::builder()
            .segment(Segment::write(0x03, [0x40, 0x41]))
            .segment(Segment::read(0x04, 1))
            .build();
        assert_eq!(
            tx.to_string(),
            "[S][AD:03+W][W:40][W:41][Sr][AD:04+R][R:00][P]"
        );
        assert_eq!(Transaction::builder().build().to_string(), "[]");
    }

    #[test]
    fn single_segment_transaction() {
        let tx = Segment::write(0x42, vec![1, 2, 3]).into_transaction();
        assert_eq!(tx.len(), 1);
        assert!(!tx.is_empty());
    }
}

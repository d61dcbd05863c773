/// Two-accumulator 8-bit Fletcher checksum (RFC 1145) used by UBX frames.
///
/// `a` is the running sum of the bytes and `b` the running sum of `a`, both
/// modulo 256. [`get`](Checksum::get) packs them as `(a << 8) | b`, which,
/// written big-endian, puts `CK_A` before `CK_B` on the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Checksum {
    a: u8,
    b: u8,
}

impl Checksum {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update8(&mut self, byte: u8) {
        self.a = self.a.wrapping_add(byte);
        self.b = self.b.wrapping_add(self.a);
    }

    /// High byte first, then low byte.
    pub fn update16(&mut self, value: u16) {
        let [high, low] = value.to_be_bytes();
        self.update8(high);
        self.update8(low);
    }

    pub fn update(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.update8(byte);
        }
    }

    pub fn get(&self) -> u16 {
        u16::from_be_bytes([self.a, self.b])
    }

    /// Checksum of a whole byte slice.
    pub fn compute(bytes: &[u8]) -> u16 {
        let mut checksum = Self::new();
        checksum.update(bytes);
        checksum.get()
    }
}

/// Default 7-bit DDC address of u-blox receivers.
pub const DEFAULT_DEVICE_ADDRESS: u8 = 0x42;

/// Register holding the 2-byte little-endian count of pending bytes.
pub const REG_BYTE_COUNT: u8 = 0xFC;

/// Register streaming the pending bytes.
pub const REG_DATA: u8 = 0xFF;

/// First data byte reported when the device has nothing valid to send.
pub const NO_DATA_SENTINEL: u8 = 0xFF;

/// Upper bound on a single poll read. Guards against a garbled count field.
pub const DEFAULT_FRAME_LENGTH_LIMIT: usize = 4096;

/// Device wiring for [`TwiTransport`](crate::TwiTransport).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TwiTransportConfig {
    /// 7-bit bus address of the device.
    pub address: u8,
    /// Largest byte count a poll will read in one go.
    pub frame_length_limit: usize,
    /// Selector for the byte-count register.
    pub byte_count_register: u8,
    /// Selector for the data register.
    pub data_register: u8,
    /// First byte that marks "no frame available".
    pub no_data_sentinel: u8,
}

impl Default for TwiTransportConfig {
    fn default() -> Self {
        Self {
            address: DEFAULT_DEVICE_ADDRESS,
            frame_length_limit: DEFAULT_FRAME_LENGTH_LIMIT,
            byte_count_register: REG_BYTE_COUNT,
            data_register: REG_DATA,
            no_data_sentinel: NO_DATA_SENTINEL,
        }
    }
}

impl TwiTransportConfig {
    /// Default wiring for a device at `address`.
    pub fn at(address: u8) -> Self {
        Self {
            address,
            ..Self::default()
        }
    }
}

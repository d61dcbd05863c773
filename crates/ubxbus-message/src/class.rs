//! Message class ids.

/// Acknowledgements of configuration messages.
pub const ACK: u8 = 0x05;

/// Configuration input.
pub const CFG: u8 = 0x06;

/// Printf-style information messages.
pub const INF: u8 = 0x04;

/// Logging.
pub const LOG: u8 = 0x21;

/// Multiple GNSS assistance.
pub const MGA: u8 = 0x13;

/// Monitoring.
pub const MON: u8 = 0x0A;

/// Navigation results.
pub const NAV: u8 = 0x01;

/// Receiver manager.
pub const RXM: u8 = 0x02;

/// Security.
pub const SEC: u8 = 0x27;

/// Timing.
pub const TIM: u8 = 0x0D;

/// Firmware update.
pub const UPD: u8 = 0x09;

/// Returns a human-readable name for a class id.
pub fn class_name(class: u8) -> &'static str {
    match class {
        ACK => "ACK",
        CFG => "CFG",
        INF => "INF",
        LOG => "LOG",
        MGA => "MGA",
        MON => "MON",
        NAV => "NAV",
        RXM => "RXM",
        SEC => "SEC",
        TIM => "TIM",
        UPD => "UPD",
        _ => "UNKNOWN",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_known_classes() {
        assert_eq!(class_name(NAV), "NAV");
        assert_eq!(class_name(0x06), "CFG");
        assert_eq!(class_name(0xEE), "UNKNOWN");
    }
}

//! Hex helpers for command-line byte arguments.

use std::fmt::Write;

/// Parse a hex byte string. Whitespace, `:` and `-` separators and a leading
/// `0x` are accepted, so `b5 62`, `B5:62` and `0xb562` are the same input.
pub fn parse_hex(input: &str) -> Result<Vec<u8>, String> {
    let trimmed = input.trim();
    let trimmed = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    let digits: Vec<char> = trimmed
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ':' && *c != '-')
        .collect();
    if let Some(bad) = digits.iter().find(|c| !c.is_ascii_hexdigit()) {
        return Err(format!("invalid hex digit {bad:?} in {input:?}"));
    }
    if digits.len() % 2 != 0 {
        return Err(format!("odd number of hex digits in {input:?}"));
    }
    digits
        .chunks(2)
        .map(|pair| {
            let text: String = pair.iter().collect();
            u8::from_str_radix(&text, 16).map_err(|_| format!("invalid hex byte {text:?}"))
        })
        .collect()
}

/// Parse a byte given as `0x`-prefixed hex or as decimal.
pub fn parse_byte(input: &str) -> Result<u8, String> {
    let input = input.trim();
    let parsed = match input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
    {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => input.parse(),
    };
    parsed.map_err(|_| format!("invalid byte value: {input}"))
}

/// Uppercase hex, no separators.
pub fn to_hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        let _ = write!(out, "{byte:02X}");
    }
    out
}

/// Uppercase hex, one space between bytes.
pub fn to_hex_spaced(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|byte| format!("{byte:02X}"))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_hex_accepts_separators() {
        let expected = vec![0xB5, 0x62, 0x06];
        assert_eq!(parse_hex("b56206").unwrap(), expected);
        assert_eq!(parse_hex("B5 62 06").unwrap(), expected);
        assert_eq!(parse_hex("b5:62:06").unwrap(), expected);
        assert_eq!(parse_hex("0xB56206").unwrap(), expected);
        assert_eq!(parse_hex("").unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn parse_hex_rejects_bad_input() {
        assert!(parse_hex("b56").is_err());
        assert!(parse_hex("zz").is_err());
    }

    #[test]
    fn parse_byte_hex_and_decimal() {
        assert_eq!(parse_byte("0x42").unwrap(), 0x42);
        assert_eq!(parse_byte("66").unwrap(), 66);
        assert!(parse_byte("256").is_err());
        assert!(parse_byte("0x1FF").is_err());
    }

    #[test]
    fn formats_uppercase() {
        assert_eq!(to_hex(&[0xB5, 0x62, 0x0A]), "B5620A");
        assert_eq!(to_hex_spaced(&[0xB5, 0x62, 0x0A]), "B5 62 0A");
        assert_eq!(to_hex_spaced(&[]), "");
    }
}

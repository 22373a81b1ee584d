use thiserror::Error;

/// Returns true if `digit` is `0`-`9` or `A`-`F`.
/// Lowercase digits are not accepted: records must be written in uppercase.
pub fn is_hex_digit(digit: u8) -> bool {
    matches!(digit, b'0'..=b'9' | b'A'..=b'F')
}

/// Decodes a single uppercase hex digit into its nibble value.
pub fn decode_hex_digit(digit: u8) -> Result<u8, InvalidHexDigit> {
    match digit {
        b'0'..=b'9' => Ok(digit - b'0'),
        b'A'..=b'F' => Ok(10 + (digit - b'A')),
        d => Err(InvalidHexDigit(d)),
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid hex digit '{}'", char::from(*.0))]
pub struct InvalidHexDigit(pub u8);

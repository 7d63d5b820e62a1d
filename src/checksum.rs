//! # Checksums
//!
//! The NMEA 0183 checksum is the XOR of every byte between the `$` prefix and
//! the `*` delimiter, written after the `*` as two hexadecimal digits.
//!
//! [`checksum`] and [`format_checksum`] work on complete byte spans and are
//! what the [command builder](crate::command) uses. [`ChecksumState`] is the
//! incremental form the parser feeds one byte at a time.

use nom::AsBytes;

/// Calculates the NMEA 0183 checksum of the given sentence body.
///
/// The body is everything between `$` and `*`, excluding both.
///
/// # Examples
///
/// ```rust
/// use gps_mtk3339::checksum;
///
/// assert_eq!(checksum("PGTOP,11,3"), 0x6F);
/// assert_eq!(checksum(&b"PMTK605"[..]), 0x31);
/// ```
pub fn checksum<I>(input: I) -> u8
where
    I: AsBytes,
{
    input
        .as_bytes()
        .iter()
        .fold(0u8, |accumulated_xor, &byte| accumulated_xor ^ byte)
}

/// Formats a checksum value as a two-digit uppercase hexadecimal string.
///
/// # Examples
///
/// ```rust
/// use gps_mtk3339::format_checksum;
///
/// assert_eq!(format_checksum(0x41), "41");
/// assert_eq!(format_checksum(0x0A), "0A");
/// ```
pub fn format_checksum(checksum: u8) -> String {
    format!("{checksum:02X}")
}

/// Value of a single case-insensitive hexadecimal digit.
pub fn hex_nibble(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        _ => None,
    }
}

/// Running checksum of the sentence currently being decoded.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ChecksumState {
    calculated: u8,
    expected: u8,
    nibbles: u8,
}

impl ChecksumState {
    /// Folds one body byte into the running XOR.
    pub fn update(&mut self, byte: u8) {
        self.calculated ^= byte;
    }

    /// Accumulates one digit of the trailing `HH`.
    ///
    /// Returns `false` if `byte` is not a hexadecimal digit.
    pub fn push_digit(&mut self, byte: u8) -> bool {
        match hex_nibble(byte) {
            Some(nibble) => {
                self.expected = (self.expected << 4) | nibble;
                self.nibbles += 1;
                true
            }
            None => false,
        }
    }

    /// XOR of the body bytes seen so far.
    pub fn calculated(&self) -> u8 {
        self.calculated
    }

    /// Checksum transmitted with the sentence, if both digits have arrived.
    pub fn expected(&self) -> Option<u8> {
        (self.nibbles == 2).then_some(self.expected)
    }

    /// `None` when no checksum was transmitted, otherwise whether it matches.
    pub fn verdict(&self) -> Option<bool> {
        self.expected().map(|expected| expected == self.calculated)
    }
}

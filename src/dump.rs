//! # Hex Dump
//!
//! Diagnostic rendering of raw input, logged when a structural error is hit.

use std::fmt;

const ROW: usize = 16;

/// Displays a byte slice as rows of offset, hex bytes and printable ASCII.
///
/// Formatting is lazy, so a `HexDump` can be handed to a disabled log
/// statement for free.
#[derive(Debug, Clone, Copy)]
pub struct HexDump<'a>(pub &'a [u8]);

impl fmt::Display for HexDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row, chunk) in self.0.chunks(ROW).enumerate() {
            write!(f, "{:08X}", row * ROW)?;
            for byte in chunk {
                write!(f, " {byte:02X}")?;
            }
            for _ in chunk.len()..ROW {
                f.write_str("   ")?;
            }

            f.write_str("  |")?;
            for &byte in chunk {
                let printable = if (0x20..0x7F).contains(&byte) { byte as char } else { '.' };
                write!(f, "{printable}")?;
            }
            f.write_str("|\n")?;
        }
        Ok(())
    }
}

/// Renders `bytes` the way `hexdump -C` does, 16 bytes per row.
///
/// # Examples
///
/// ```rust
/// use gps_mtk3339::hex_dump;
///
/// assert_eq!(
///     hex_dump(b"$PGTOP"),
///     "00000000 24 50 47 54 4F 50                                |$PGTOP|\n"
/// );
/// ```
pub fn hex_dump(bytes: &[u8]) -> String {
    HexDump(bytes).to_string()
}

use log::LevelFilter;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{FixMode, Handler, Scratch, SelectionMode};
use crate::{
    ParserConfig,
    decode::{Field, Value},
    record::{Mode, Record},
};

/// Highest PRN accepted in a GSA satellite slot, exclusive.
const MAX_PRN: u32 = 64;

/// Dilution of precision reported by GSA (all three) and GGA (HDOP only).
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dilution {
    /// Position dilution of precision, NaN when absent
    pub pdop: f32,
    /// Horizontal dilution of precision, NaN when absent
    pub hdop: f32,
    /// Vertical dilution of precision, NaN when absent
    pub vdop: f32,
}

impl Default for Dilution {
    fn default() -> Self {
        Self {
            pdop: f32::NAN,
            hdop: f32::NAN,
            vdop: f32::NAN,
        }
    }
}

/// The two mode fields of a GSA sentence.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FixModes {
    /// Mode 1: [`Mode::Manual`] or [`Mode::Automatic`]
    pub selection: Mode,
    /// Mode 2: [`Mode::NoFix`], [`Mode::Fix2D`] or [`Mode::Fix3D`]
    pub fix: Mode,
}

/// GSA - GPS DOP and active satellites
///
/// <https://gpsd.gitlab.io/gpsd/NMEA.html#_gsa_gps_dop_and_active_satellites>
///
/// ```text
///         1 2 3                        14 15  16  17
///         | | |                         |  |   |   |
///  $--GSA,a,a,x,x,x,x,x,x,x,x,x,x,x,x,x,x,x.x,x.x,x.x*hh<CR><LF>
/// ```
///
/// Informational only: no record is produced. Empty satellite slots keep the
/// zero sentinel.
pub(super) static HANDLER: Handler = Handler {
    layout: &[
        Field::Letter(SelectionMode::LETTERS),
        Field::Letter(FixMode::LETTERS),
        PRN,
        PRN,
        PRN,
        PRN,
        PRN,
        PRN,
        PRN,
        PRN,
        PRN,
        PRN,
        PRN,
        PRN,
        Field::Real,
        Field::Real,
        Field::Real,
    ],
    is_complete,
    commit,
    assemble,
};

const PRN: Field = Field::Integer { max_digits: 3 };

fn is_complete(fields: usize) -> bool {
    fields == 17
}

fn commit(scratch: &mut Scratch, index: usize, value: Value, log: LevelFilter) {
    match index {
        0 => {
            if let Some(mode) = value.letter().and_then(SelectionMode::from_letter) {
                scratch.fix_modes.selection = mode.into();
            }
        }
        1 => {
            if let Some(mode) = value.letter().and_then(FixMode::from_letter) {
                scratch.fix_modes.fix = mode.into();
            }
        }
        2..=13 => {
            scratch.satellites_used[index - 2] = match value.integer() {
                Some(prn) if prn >= MAX_PRN => {
                    log_at!(log, Warn, "GSA satellite id {prn} out of range");
                    0
                }
                Some(prn) => prn as u8,
                None => 0,
            }
        }
        14 => scratch.dilution.pdop = value.real(),
        15 => scratch.dilution.hdop = value.real(),
        16 => scratch.dilution.vdop = value.real(),
        _ => {}
    }
}

fn assemble(_: &Scratch, _: &ParserConfig) -> Option<Record> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{record::SentenceKind, sentences::tests::decode_fields};

    #[test]
    fn test_gsa_scratch() {
        let scratch = decode_fields(
            SentenceKind::GSA,
            "A,3,29,21,26,15,18,09,06,10,,,,,2.32,0.95,2.11",
        );

        assert_eq!(
            scratch.fix_modes,
            FixModes {
                selection: Mode::Automatic,
                fix: Mode::Fix3D,
            }
        );
        assert_eq!(
            scratch.satellites_used,
            [29, 21, 26, 15, 18, 9, 6, 10, 0, 0, 0, 0]
        );
        assert_eq!(scratch.dilution.pdop, 2.32);
        assert_eq!(scratch.dilution.hdop, 0.95);
        assert_eq!(scratch.dilution.vdop, 2.11);
        assert_eq!(assemble(&scratch, &ParserConfig::default()), None);
    }

    #[test]
    fn test_gsa_out_of_range_prn() {
        let scratch = decode_fields(SentenceKind::GSA, "M,1,64,120,05,,,,,,,,,,,,");

        assert_eq!(scratch.fix_modes.selection, Mode::Manual);
        assert_eq!(scratch.fix_modes.fix, Mode::NoFix);
        assert_eq!(&scratch.satellites_used[..3], &[0, 0, 5]);
        assert!(scratch.dilution.pdop.is_nan());
    }
}

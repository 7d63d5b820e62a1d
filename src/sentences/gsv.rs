use log::LevelFilter;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{Handler, Scratch};
use crate::{
    ParserConfig,
    decode::{Field, Value},
    record::Record,
};

/// Position of a GSV sentence inside its group.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct GsvGroup {
    /// Total number of GSV sentences in the group
    pub total: u8,
    /// Zero-based index of this sentence in the group
    pub index: u8,
    /// Total number of satellites in view
    pub satellites_in_view: u8,
}

/// One satellite block of a GSV sentence.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Satellite {
    /// Satellite ID, 0 when absent or outside 1 to 32
    pub prn: u8,
    /// Elevation in degrees (0 to 90)
    pub elevation: Option<u8>,
    /// Azimuth in degrees from true north (0 to 359)
    pub azimuth: Option<u16>,
    /// Signal-to-noise ratio in dB (0 to 99)
    pub snr: Option<u8>,
}

/// GSV - Satellites in View
///
/// <https://gpsd.gitlab.io/gpsd/NMEA.html#_gsv_satellites_in_view>
///
/// ```text
///         1 2 3 4 5 6 7     n
///         | | | | | | |     |
///  $--GSV,x,x,x,x,x,x,x,...,x*hh<CR><LF>
/// ```
///
/// Informational only. Each sentence carries up to four blocks of
/// `id,elevation,azimuth,snr`; the blocks of earlier sentences in the same
/// group are not retained.
pub(super) static HANDLER: Handler = Handler {
    layout: &[
        Field::Integer { max_digits: 1 },
        Field::Integer { max_digits: 1 },
        Field::Integer { max_digits: 2 },
        ID,
        ELEVATION,
        AZIMUTH,
        SNR,
        ID,
        ELEVATION,
        AZIMUTH,
        SNR,
        ID,
        ELEVATION,
        AZIMUTH,
        SNR,
        ID,
        ELEVATION,
        AZIMUTH,
        SNR,
    ],
    is_complete,
    commit,
    assemble,
};

const ID: Field = Field::Integer { max_digits: 3 };
const ELEVATION: Field = Field::Integer { max_digits: 3 };
const AZIMUTH: Field = Field::Integer { max_digits: 3 };
const SNR: Field = Field::Integer { max_digits: 3 };

const HEADER_FIELDS: usize = 3;
const BLOCK_FIELDS: usize = 4;

fn is_complete(fields: usize) -> bool {
    fields >= HEADER_FIELDS && (fields - HEADER_FIELDS) % BLOCK_FIELDS == 0
}

fn in_range<T>(
    log: LevelFilter,
    what: &str,
    value: Option<u32>,
    valid: impl Fn(u32) -> bool,
    convert: impl Fn(u32) -> T,
) -> Option<T> {
    match value {
        Some(value) if valid(value) => Some(convert(value)),
        Some(value) => {
            log_at!(log, Warn, "GSV {what} {value} out of range");
            None
        }
        None => None,
    }
}

fn commit(scratch: &mut Scratch, index: usize, value: Value, log: LevelFilter) {
    let group = scratch.gsv_group.get_or_insert_with(GsvGroup::default);
    match index {
        0 => group.total = value.integer().unwrap_or(0) as u8,
        1 => group.index = (value.integer().unwrap_or(1) as u8).saturating_sub(1),
        2 => group.satellites_in_view = value.integer().unwrap_or(0) as u8,
        _ => {
            let satellite = &mut scratch.satellite;
            match (index - HEADER_FIELDS) % BLOCK_FIELDS {
                0 => {
                    *satellite = Satellite::default();
                    let valid = |v: u32| (1..=32).contains(&v);
                    satellite.prn =
                        in_range(log, "satellite id", value.integer(), valid, |v| v as u8)
                            .unwrap_or(0);
                }
                1 => {
                    satellite.elevation =
                        in_range(log, "elevation", value.integer(), |v| v <= 90, |v| v as u8)
                }
                2 => {
                    satellite.azimuth =
                        in_range(log, "azimuth", value.integer(), |v| v < 360, |v| v as u16)
                }
                _ => {
                    satellite.snr = in_range(log, "snr", value.integer(), |v| v <= 99, |v| v as u8);
                    if scratch.satellites.push(*satellite).is_err() {
                        log_at!(log, Warn, "GSV sentence carries more than four satellites");
                    }
                }
            }
        }
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
    fn test_gsv_blocks() {
        let scratch = decode_fields(
            SentenceKind::GSV,
            "3,1,09,29,36,029,42,21,46,314,43,26,44,020,43,15,21,321,39",
        );

        assert_eq!(
            scratch.gsv_group,
            Some(GsvGroup {
                total: 3,
                index: 0,
                satellites_in_view: 9,
            })
        );
        assert_eq!(scratch.satellites.len(), 4);
        assert_eq!(
            scratch.satellites[0],
            Satellite {
                prn: 29,
                elevation: Some(36),
                azimuth: Some(29),
                snr: Some(42),
            }
        );
        assert_eq!(scratch.satellites[3].prn, 15);
        assert_eq!(assemble(&scratch, &ParserConfig::default()), None);
    }

    #[test]
    fn test_gsv_empty_values() {
        let scratch = decode_fields(SentenceKind::GSV, "3,3,09,07,,,26");

        assert_eq!(scratch.gsv_group.unwrap().index, 2);
        assert_eq!(
            scratch.satellites.as_slice(),
            &[Satellite {
                prn: 7,
                elevation: None,
                azimuth: None,
                snr: Some(26),
            }]
        );
    }

    #[test]
    fn test_gsv_out_of_range_values() {
        let scratch = decode_fields(SentenceKind::GSV, "1,1,02,33,91,360,100,05,90,359,99");

        assert_eq!(
            scratch.satellites[0],
            Satellite {
                prn: 0,
                elevation: None,
                azimuth: None,
                snr: None,
            }
        );
        assert_eq!(
            scratch.satellites[1],
            Satellite {
                prn: 5,
                elevation: Some(90),
                azimuth: Some(359),
                snr: Some(99),
            }
        );
    }

    #[test]
    fn test_gsv_completeness() {
        assert!((HANDLER.is_complete)(3));
        assert!(!(HANDLER.is_complete)(5));
        assert!((HANDLER.is_complete)(7));
        assert!((HANDLER.is_complete)(19));
        assert_eq!(HANDLER.field(19), None);
    }
}

use log::LevelFilter;

use super::{
    DIRECTION_EW, DIRECTION_NS, Handler, Scratch, commit_coordinate, commit_direction, commit_time,
};
use crate::{
    ParserConfig,
    decode::{Field, Value},
    record::{PositionFix, Record, SentenceKind},
};

/// GGA - Global Positioning System Fix Data
///
/// <https://gpsd.gitlab.io/gpsd/NMEA.html#_gga_global_positioning_system_fix_data>
///
/// ```text
///                                                      11
///         1         2       3 4        5 6 7  8   9  10 |  12 13  14
///         |         |       | |        | | |  |   |   | |   | |   |
///  $--GGA,hhmmss.ss,ddmm.mm,a,ddmmm.mm,a,x,xx,x.x,x.x,M,x.x,M,x.x,xxxx*hh<CR><LF>
/// ```
pub(super) static HANDLER: Handler = Handler {
    layout: &[
        Field::Time,
        Field::Latitude,
        DIRECTION_NS,
        Field::Longitude,
        DIRECTION_EW,
        Field::Letter(PositionFix::LETTERS),
        Field::Integer { max_digits: 2 },
        Field::Real,
        Field::Real,
        Field::Letter(b"M"),
        Field::Real,
        Field::Letter(b"M"),
        // Age of differential data and reference station id are ignored.
        Field::Skip,
        Field::Skip,
    ],
    is_complete,
    commit,
    assemble,
};

fn is_complete(fields: usize) -> bool {
    fields == 14
}

fn commit(scratch: &mut Scratch, index: usize, value: Value, log: LevelFilter) {
    match index {
        0 => commit_time(scratch, value, log),
        1 => commit_coordinate(&mut scratch.latitude, value),
        2 => commit_direction(&mut scratch.latitude, value),
        3 => commit_coordinate(&mut scratch.longitude, value),
        4 => commit_direction(&mut scratch.longitude, value),
        5 => {
            scratch.posfix = value
                .letter()
                .and_then(PositionFix::from_letter)
                .unwrap_or_default()
        }
        6 => scratch.num_satellites = value.integer().unwrap_or(0) as u8,
        7 => scratch.dilution.hdop = value.real(),
        8 => scratch.altitude = value.real(),
        10 => scratch.geoidal_separation = value.real(),
        _ => {}
    }
}

fn assemble(scratch: &Scratch, config: &ParserConfig) -> Option<Record> {
    let mut record = scratch.record(SentenceKind::GGA, config);
    // Only a time of day is transmitted.
    record.is_valid_timestamp = false;
    record.posfix = scratch.posfix;
    record.num_satellites = scratch.num_satellites;
    record.hdop = scratch.dilution.hdop;
    record.altitude_meters = scratch.altitude;
    record.geoidal_separation_meters = scratch.geoidal_separation;
    Some(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{record::Direction, sentences::tests::decode_fields};

    #[test]
    fn test_gga_record() {
        let scratch = decode_fields(
            SentenceKind::GGA,
            "185916.000,4048.5993,N,07418.5416,W,1,07,1.09,107.2,M,-34.2,M,,",
        );
        let record = assemble(&scratch, &ParserConfig::default()).unwrap();

        assert_eq!(record.kind, SentenceKind::GGA);
        assert_eq!(record.latitude.direction, Direction::North);
        assert_eq!(record.latitude.degrees, 40);
        assert_eq!(record.longitude.direction, Direction::West);
        assert_eq!(record.longitude.degrees, 74);
        assert_eq!(record.posfix, PositionFix::GPSFix);
        assert_eq!(record.num_satellites, 7);
        assert_eq!(record.hdop, 1.09);
        assert_eq!(record.altitude_meters, 107.2);
        assert_eq!(record.geoidal_separation_meters, -34.2);
        assert!(!record.is_valid_timestamp);
        assert_eq!(record.timestamp.seconds, 18 * 3600 + 59 * 60 + 16);
    }

    #[test]
    fn test_gga_without_fix() {
        let scratch = decode_fields(SentenceKind::GGA, ",,,,,0,00,,,M,,M,,");
        let record = assemble(&scratch, &ParserConfig::default()).unwrap();

        assert!(!record.latitude.is_set());
        assert!(!record.longitude.is_set());
        assert_eq!(record.posfix, PositionFix::NoFix);
        assert_eq!(record.num_satellites, 0);
        assert!(record.altitude_meters.is_nan());
        assert!(record.hdop.is_nan());
    }

    #[test]
    fn test_gga_completeness() {
        assert!(!(HANDLER.is_complete)(13));
        assert!((HANDLER.is_complete)(14));
        assert_eq!(HANDLER.field(14), None);
    }
}

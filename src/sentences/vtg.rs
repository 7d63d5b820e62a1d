use log::LevelFilter;

use super::{FaaMode, Handler, Scratch, commit_faa_mode};
use crate::{
    ParserConfig,
    decode::{Field, Value},
    record::{Record, SentenceKind},
};

/// VTG - Track made good and Ground speed
///
/// <https://gpsd.gitlab.io/gpsd/NMEA.html#_vtg_track_made_good_and_ground_speed>
///
/// ```text
///          1  2  3  4  5  6  7  8 9
///          |  |  |  |  |  |  |  | |
///  $--VTG,x.x,T,x.x,M,x.x,N,x.x,K,m*hh<CR><LF>
/// ```
pub(super) static HANDLER: Handler = Handler {
    layout: &[
        Field::Real,
        Field::Letter(b"T"),
        Field::Real,
        Field::Letter(b"M"),
        Field::Real,
        Field::Letter(b"N"),
        Field::Real,
        Field::Letter(b"K"),
        Field::Letter(FaaMode::LETTERS),
    ],
    is_complete,
    commit,
    assemble,
};

fn is_complete(fields: usize) -> bool {
    matches!(fields, 8 | 9)
}

fn commit(scratch: &mut Scratch, index: usize, value: Value, _: LevelFilter) {
    match index {
        0 => scratch.course = value.real(),
        2 => scratch.heading = value.real(),
        4 => scratch.speed_knots = value.real(),
        6 => scratch.speed_kmph = value.real(),
        8 => commit_faa_mode(scratch, value),
        _ => {}
    }
}

fn assemble(scratch: &Scratch, config: &ParserConfig) -> Option<Record> {
    let mut record = scratch.record(SentenceKind::VTG, config);
    record.course_degrees = scratch.course;
    record.heading_degrees = scratch.heading;
    record.speed_knots = scratch.speed_knots;
    record.speed_kmph = scratch.speed_kmph;
    record.mode = scratch.mode;
    Some(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{record::Mode, sentences::tests::decode_fields};

    #[test]
    fn test_vtg_record() {
        let scratch = decode_fields(SentenceKind::VTG, "7.37,T,,M,1.10,N,2.04,K,A");
        let record = assemble(&scratch, &ParserConfig::default()).unwrap();

        assert_eq!(record.course_degrees, 7.37);
        assert!(record.heading_degrees.is_nan());
        assert_eq!(record.speed_knots, 1.10);
        assert_eq!(record.speed_kmph, 2.04);
        assert_eq!(record.mode, Mode::Autonomous);
        assert!(!record.latitude.is_set());
        assert!(!record.is_valid_timestamp);
    }

    #[test]
    fn test_vtg_without_mode() {
        let scratch = decode_fields(SentenceKind::VTG, "054.7,T,034.4,M,005.5,N,010.2,K");
        let record = assemble(&scratch, &ParserConfig::default()).unwrap();

        assert_eq!(record.heading_degrees, 34.4);
        assert_eq!(record.mode, Mode::Unset);
    }
}

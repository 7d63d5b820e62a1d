use log::LevelFilter;

use super::{
    DIRECTION_EW, DIRECTION_NS, FaaMode, Handler, Scratch, commit_coordinate, commit_direction,
    commit_faa_mode, commit_time,
};
use crate::{
    ParserConfig,
    decode::{Field, Value},
    record::{Record, SentenceKind, Status},
};

/// GLL - Geographic Position - Latitude/Longitude
///
/// <https://gpsd.gitlab.io/gpsd/NMEA.html#_gll_geographic_position_latitudelongitude>
///
/// ```text
///         1       2 3        4 5         6 7
///         |       | |        | |         | |
///  $--GLL,ddmm.mm,a,dddmm.mm,a,hhmmss.ss,a,m*hh<CR><LF>
/// ```
pub(super) static HANDLER: Handler = Handler {
    layout: &[
        Field::Latitude,
        DIRECTION_NS,
        Field::Longitude,
        DIRECTION_EW,
        Field::Time,
        Field::Letter(Status::LETTERS),
        Field::Letter(FaaMode::LETTERS),
    ],
    is_complete,
    commit,
    assemble,
};

fn is_complete(fields: usize) -> bool {
    matches!(fields, 6 | 7)
}

fn commit(scratch: &mut Scratch, index: usize, value: Value, log: LevelFilter) {
    match index {
        0 => commit_coordinate(&mut scratch.latitude, value),
        1 => commit_direction(&mut scratch.latitude, value),
        2 => commit_coordinate(&mut scratch.longitude, value),
        3 => commit_direction(&mut scratch.longitude, value),
        4 => commit_time(scratch, value, log),
        5 => scratch.status = value.letter().and_then(Status::from_letter),
        6 => commit_faa_mode(scratch, value),
        _ => {}
    }
}

fn assemble(scratch: &Scratch, config: &ParserConfig) -> Option<Record> {
    let mut record = scratch.record(SentenceKind::GLL, config);
    record.is_valid_timestamp = false;
    record.status = scratch.status;
    record.mode = scratch.mode;
    Some(record)
}

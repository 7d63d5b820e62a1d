use log::LevelFilter;

use super::{
    DIRECTION_EW, DIRECTION_NS, FaaMode, Handler, Scratch, commit_coordinate, commit_direction,
    commit_faa_mode, commit_time,
};
use crate::{
    ParserConfig,
    decode::{Field, Value},
    record::{Direction, Record, SentenceKind, Status},
};

/// RMC - Recommended Minimum Navigation Information
///
/// <https://gpsd.gitlab.io/gpsd/NMEA.html#_rmc_recommended_minimum_navigation_information>
///
/// ```text
///         1         2 3       4 5        6  7   8   9    10 11
///         |         | |       | |        |  |   |   |    |  |
///  $--RMC,hhmmss.ss,A,ddmm.mm,a,dddmm.mm,a,x.x,x.x,xxxx,x.x,a*hh<CR><LF>
/// ```
///
/// NMEA 2.3:
/// ```text
///         1         2 3       4 5        6  7   8   9    10 1112
///         |         | |       | |        |  |   |   |    |  | |
///  $--RMC,hhmmss.ss,A,ddmm.mm,a,dddmm.mm,a,x.x,x.x,xxxx,x.x,a,m*hh<CR><LF>
/// ```
pub(super) static HANDLER: Handler = Handler {
    layout: &[
        Field::Time,
        Field::Letter(Status::LETTERS),
        Field::Latitude,
        DIRECTION_NS,
        Field::Longitude,
        DIRECTION_EW,
        Field::Real,
        Field::Real,
        Field::Date,
        Field::Real,
        DIRECTION_EW,
        Field::Letter(FaaMode::LETTERS),
    ],
    is_complete,
    commit,
    assemble,
};

fn is_complete(fields: usize) -> bool {
    matches!(fields, 11 | 12)
}

fn commit(scratch: &mut Scratch, index: usize, value: Value, log: LevelFilter) {
    match index {
        0 => commit_time(scratch, value, log),
        1 => scratch.status = value.letter().and_then(Status::from_letter),
        2 => commit_coordinate(&mut scratch.latitude, value),
        3 => commit_direction(&mut scratch.latitude, value),
        4 => commit_coordinate(&mut scratch.longitude, value),
        5 => commit_direction(&mut scratch.longitude, value),
        6 => scratch.speed_knots = value.real(),
        7 => scratch.course = value.real(),
        8 => scratch.date = value.date(),
        9 => scratch.magnetic_variation = value.real(),
        10 => {
            if let Some(direction) = value.letter().and_then(Direction::from_letter) {
                scratch.magnetic_variation_direction = direction;
            }
        }
        11 => commit_faa_mode(scratch, value),
        _ => {}
    }
}

fn assemble(scratch: &Scratch, config: &ParserConfig) -> Option<Record> {
    let mut record = scratch.record(SentenceKind::RMC, config);
    record.status = scratch.status;
    record.speed_knots = scratch.speed_knots;
    record.course_degrees = scratch.course;
    record.magnetic_variation_degrees = match scratch.magnetic_variation_direction {
        Direction::West => -scratch.magnetic_variation,
        _ => scratch.magnetic_variation,
    };
    record.mode = scratch.mode;
    Some(record)
}

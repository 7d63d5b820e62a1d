use log::LevelFilter;

use super::{Handler, Scratch};
use crate::{
    ParserConfig,
    decode::{Field, Value},
    record::{AntennaStatus, Record, SentenceKind},
};

/// PGTOP - MTK antenna status
///
/// ```text
///         1  2
///         |  |
///  $PGTOP,xx,x*hh<CR><LF>
/// ```
///
/// Field 1 is the function type (`11` for antenna status), field 2 is
/// `1` shorted, `2` internal antenna, `3` active antenna.
pub(super) static HANDLER: Handler = Handler {
    layout: &[
        Field::Integer { max_digits: 2 },
        Field::Integer { max_digits: 2 },
    ],
    is_complete,
    commit,
    assemble,
};

fn is_complete(fields: usize) -> bool {
    fields == 2
}

fn commit(scratch: &mut Scratch, index: usize, value: Value, log: LevelFilter) {
    match index {
        0 => scratch.pgtop_function = value.integer(),
        1 => {
            scratch.antenna_status = match value.integer() {
                Some(value) => AntennaStatus::from_value(value).unwrap_or_else(|| {
                    log_at!(log, Warn, "invalid PGTOP antenna status {value}");
                    AntennaStatus::Unset
                }),
                None => AntennaStatus::Unset,
            }
        }
        _ => {}
    }
}

fn assemble(scratch: &Scratch, config: &ParserConfig) -> Option<Record> {
    let mut record = scratch.record(SentenceKind::PGTOP, config);
    record.antenna_status = scratch.antenna_status;
    Some(record)
}

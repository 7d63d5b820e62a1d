//! # Sentence-Type Handlers
//!
//! One handler per recognized sentence id. A handler is a row of plain data
//! and function pointers:
//!
//! - `layout` lists the grammar of every field, in order. The tokenizer builds
//!   the decoder for field `n` from `layout[n]`; a sentence with more fields
//!   than its layout is a structural error.
//! - `is_complete` says whether a sentence that stopped after `n` fields is
//!   acceptable (trailing NMEA 2.3 mode fields are optional, GSV has 0 to 4
//!   satellite blocks).
//! - `commit` stores a finished field into [`Scratch`].
//! - `assemble` turns the scratch of a finished sentence into a [`Record`],
//!   or `None` for informational kinds.
//!
//! PMTK sentences are buffered verbatim instead and decoded by [`pmtk`].

mod gga;
mod gll;
mod gsa;
mod gsv;
pub(crate) mod pmtk;
mod pgtop;
mod rmc;
mod vtg;

pub use gsa::{Dilution, FixModes};
pub use gsv::{GsvGroup, Satellite};
pub use pmtk::{AckFlag, PmtkMessage};

use log::LevelFilter;

use crate::{
    ParserConfig,
    decode::{CalendarDate, Field, TimeOfDay, Value},
    record::{
        AntennaStatus, Direction, LatLon, Mode, PositionFix, Record, SentenceKind, Status,
        Timestamp,
    },
};

/// Longest PMTK payload kept after the `PMTK` prefix.
pub(crate) const PMTK_PAYLOAD_CAPACITY: usize = 96;

/// Decoding table entry of one sentence kind.
pub(crate) struct Handler {
    pub layout: &'static [Field],
    pub is_complete: fn(usize) -> bool,
    pub commit: fn(&mut Scratch, usize, Value, LevelFilter),
    pub assemble: fn(&Scratch, &ParserConfig) -> Option<Record>,
}

impl Handler {
    pub fn field(&self, index: usize) -> Option<Field> {
        self.layout.get(index).copied()
    }
}

/// Handler of a field-decoded kind, `None` for buffered PMTK sentences.
pub(crate) fn handler(kind: SentenceKind) -> Option<&'static Handler> {
    match kind {
        SentenceKind::GGA => Some(&gga::HANDLER),
        SentenceKind::GSA => Some(&gsa::HANDLER),
        SentenceKind::GSV => Some(&gsv::HANDLER),
        SentenceKind::RMC => Some(&rmc::HANDLER),
        SentenceKind::VTG => Some(&vtg::HANDLER),
        SentenceKind::GLL => Some(&gll::HANDLER),
        SentenceKind::PGTOP => Some(&pgtop::HANDLER),
        SentenceKind::PMTK => None,
    }
}

/// Identifiers matched after `$`, in recognition order.
pub(crate) const IDENTIFIERS: [SentenceKind; 8] = [
    SentenceKind::GGA,
    SentenceKind::GSA,
    SentenceKind::GSV,
    SentenceKind::RMC,
    SentenceKind::VTG,
    SentenceKind::GLL,
    SentenceKind::PGTOP,
    SentenceKind::PMTK,
];

letter_enum! {
    /// GSA mode 1
    pub enum SelectionMode {
        /// M - Manual, forced to operate in 2D or 3D
        b'M' => Manual,
        /// A - Automatic, allowed to switch 2D/3D
        b'A' => Automatic,
    }
}

letter_enum! {
    /// GSA mode 2
    pub enum FixMode {
        /// 1 - Fix not available
        b'1' => NoFix,
        /// 2 - 2D fix
        b'2' => Fix2D,
        /// 3 - 3D fix
        b'3' => Fix3D,
    }
}

letter_enum! {
    /// FAA mode indicator (NMEA 2.3 and later)
    pub enum FaaMode {
        /// A - Autonomous mode
        b'A' => Autonomous,
        /// D - Differential mode
        b'D' => Differential,
        /// E - Estimated (dead reckoning) mode
        b'E' => Estimated,
        /// N - Data not valid
        b'N' => NotValid,
    }
}

impl From<SelectionMode> for Mode {
    fn from(mode: SelectionMode) -> Self {
        match mode {
            SelectionMode::Manual => Mode::Manual,
            SelectionMode::Automatic => Mode::Automatic,
        }
    }
}

impl From<FixMode> for Mode {
    fn from(mode: FixMode) -> Self {
        match mode {
            FixMode::NoFix => Mode::NoFix,
            FixMode::Fix2D => Mode::Fix2D,
            FixMode::Fix3D => Mode::Fix3D,
        }
    }
}

impl From<FaaMode> for Mode {
    fn from(mode: FaaMode) -> Self {
        match mode {
            FaaMode::Autonomous => Mode::Autonomous,
            FaaMode::Differential => Mode::Differential,
            FaaMode::Estimated => Mode::Estimated,
            FaaMode::NotValid => Mode::Unset,
        }
    }
}

/// Per-sentence scratch storage.
///
/// Reinitialized whenever a `$` starts a new sentence. Nothing in here
/// allocates, so a reset never touches the heap.
#[derive(Debug, Clone)]
pub(crate) struct Scratch {
    pub time: Option<TimeOfDay>,
    pub date: Option<CalendarDate>,
    pub latitude: LatLon,
    pub longitude: LatLon,
    pub status: Option<Status>,
    pub posfix: PositionFix,
    pub num_satellites: u8,
    pub dilution: Dilution,
    pub altitude: f32,
    pub geoidal_separation: f32,
    pub speed_knots: f32,
    pub speed_kmph: f32,
    pub course: f32,
    pub heading: f32,
    pub magnetic_variation: f32,
    pub magnetic_variation_direction: Direction,
    pub mode: Mode,
    pub fix_modes: FixModes,
    pub satellites_used: [u8; 12],
    pub gsv_group: Option<GsvGroup>,
    pub satellites: heapless::Vec<Satellite, 4>,
    pub satellite: Satellite,
    pub pgtop_function: Option<u32>,
    pub antenna_status: AntennaStatus,
    pub pmtk: heapless::String<PMTK_PAYLOAD_CAPACITY>,
}

impl Default for Scratch {
    fn default() -> Self {
        Self {
            time: None,
            date: None,
            latitude: LatLon::default(),
            longitude: LatLon::default(),
            status: None,
            posfix: PositionFix::NoFix,
            num_satellites: 0,
            dilution: Dilution::default(),
            altitude: f32::NAN,
            geoidal_separation: f32::NAN,
            speed_knots: f32::NAN,
            speed_kmph: f32::NAN,
            course: f32::NAN,
            heading: f32::NAN,
            magnetic_variation: f32::NAN,
            magnetic_variation_direction: Direction::Unset,
            mode: Mode::Unset,
            fix_modes: FixModes::default(),
            satellites_used: [0; 12],
            gsv_group: None,
            satellites: heapless::Vec::new(),
            satellite: Satellite::default(),
            pgtop_function: None,
            antenna_status: AntennaStatus::Unset,
            pmtk: heapless::String::new(),
        }
    }
}

impl Scratch {
    /// Time and date builders turned into a record timestamp.
    ///
    /// Returns whether the timestamp is absolute (Unix time) along with it.
    pub fn timestamp(&self, config: &ParserConfig) -> (bool, Timestamp) {
        let Some(time) = self.time else {
            return (false, Timestamp::default());
        };
        let microseconds = time.millisecond as u32 * 1000;

        if let Some(date) = self.date {
            match unix_midnight(date, config.century) {
                Some(midnight) => {
                    return (
                        true,
                        Timestamp {
                            seconds: midnight + time.seconds_of_day(),
                            microseconds,
                        },
                    );
                }
                None => log_at!(
                    config.log_level,
                    Warn,
                    "invalid date {:02}{:02}{:02}",
                    date.day,
                    date.month as u16 + 1,
                    date.year
                ),
            }
        }

        (
            false,
            Timestamp {
                seconds: time.seconds_of_day(),
                microseconds,
            },
        )
    }

    /// A record of `kind` carrying every scratch field that applies to all kinds.
    pub fn record(&self, kind: SentenceKind, config: &ParserConfig) -> Record {
        let (is_valid_timestamp, timestamp) = self.timestamp(config);
        Record {
            latitude: self.latitude,
            longitude: self.longitude,
            is_valid_timestamp,
            timestamp,
            ..Record::new(kind)
        }
    }
}

fn unix_midnight(date: CalendarDate, century: i32) -> Option<i64> {
    let month = time::Month::try_from(date.month.checked_add(1)?).ok()?;
    let date = time::Date::from_calendar_date(century + date.year as i32, month, date.day).ok()?;
    Some(date.midnight().assume_utc().unix_timestamp())
}

pub(crate) fn commit_time(scratch: &mut Scratch, value: Value, log: LevelFilter) {
    scratch.time = match value.time() {
        Some(time) if !time.is_valid() => {
            log_at!(
                log,
                Warn,
                "invalid time of day {:02}:{:02}:{:02}",
                time.hour,
                time.minute,
                time.second
            );
            None
        }
        time => time,
    };
}

pub(crate) fn commit_coordinate(coordinate: &mut LatLon, value: Value) {
    if let Some((degrees, minutes)) = value.coordinate() {
        coordinate.degrees = degrees;
        coordinate.minutes = minutes;
    }
}

/// A hemisphere letter only counts when the coordinate itself was present.
pub(crate) fn commit_direction(coordinate: &mut LatLon, value: Value) {
    if coordinate.minutes.is_nan() {
        return;
    }
    if let Some(direction) = value.letter().and_then(Direction::from_letter) {
        coordinate.direction = direction;
    }
}

pub(crate) fn commit_faa_mode(scratch: &mut Scratch, value: Value) {
    if let Some(mode) = value.letter().and_then(FaaMode::from_letter) {
        scratch.mode = mode.into();
    }
}

const DIRECTION_NS: Field = Field::Letter(b"NS");
const DIRECTION_EW: Field = Field::Letter(b"EW");

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::Decoder;

    /// Runs a field list through the handler of `kind`, the way the tokenizer does.
    pub(crate) fn decode_fields(kind: SentenceKind, fields: &str) -> Scratch {
        let handler = handler(kind).unwrap();
        let mut scratch = Scratch::default();
        let count = fields.split(',').count();
        for (index, field) in fields.split(',').enumerate() {
            let mut decoder = Decoder::from(handler.field(index).unwrap());
            for byte in field.bytes() {
                decoder.push(byte).unwrap();
            }
            (handler.commit)(&mut scratch, index, decoder.finish().unwrap(), LevelFilter::Off);
        }
        assert!((handler.is_complete)(count), "{kind} incomplete after {count} fields");
        scratch
    }

    #[test]
    fn test_identifiers_are_unique_prefix_free() {
        for a in IDENTIFIERS {
            for b in IDENTIFIERS {
                if a != b {
                    assert!(!a.identifier().starts_with(b.identifier()));
                }
            }
        }
    }

    #[test]
    fn test_mode_conversions() {
        assert_eq!(Mode::from(SelectionMode::Automatic), Mode::Automatic);
        assert_eq!(Mode::from(FixMode::Fix3D), Mode::Fix3D);
        assert_eq!(Mode::from(FaaMode::Estimated), Mode::Estimated);
        assert_eq!(Mode::from(FaaMode::NotValid), Mode::Unset);
    }

    #[test]
    fn test_timestamp_with_and_without_date() {
        let config = ParserConfig::default();
        let mut scratch = Scratch::default();
        assert_eq!(scratch.timestamp(&config), (false, Timestamp::default()));

        scratch.time = Some(TimeOfDay {
            hour: 6,
            minute: 49,
            second: 51,
            millisecond: 250,
        });
        assert_eq!(
            scratch.timestamp(&config),
            (
                false,
                Timestamp {
                    seconds: 6 * 3600 + 49 * 60 + 51,
                    microseconds: 250_000,
                }
            )
        );

        scratch.date = Some(CalendarDate {
            day: 26,
            month: 3,
            year: 6,
        });
        let (valid, timestamp) = scratch.timestamp(&config);
        assert!(valid);
        assert_eq!(timestamp.seconds, 1_146_034_191);

        let (valid, timestamp) = scratch.timestamp(&config.clone().with_century(1900));
        assert!(valid);
        assert_eq!(timestamp.seconds, 1_146_034_191 - 3_155_760_000);

        scratch.date = Some(CalendarDate {
            day: 31,
            month: 1,
            year: 6,
        });
        assert!(!scratch.timestamp(&config).0);
    }
}

//! # Records
//!
//! A [`Record`] is the decoded form of one record-producing sentence. The
//! parser appends records to a caller-owned `Vec<Record>` and keeps no
//! reference to them afterwards.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Sentence kinds recognized by the parser.
///
/// GSA, GSV and PMTK acknowledgements never produce a [`Record`]; their
/// content is only available through the parser's scratch accessors while
/// the sentence is current.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SentenceKind {
    /// Global Positioning System Fix Data
    GGA,
    /// GPS DOP and active satellites
    GSA,
    /// Satellites in View
    GSV,
    /// Recommended Minimum Navigation Information
    RMC,
    /// Track made good and Ground speed
    VTG,
    /// Geographic Position - Latitude/Longitude
    GLL,
    /// MTK antenna status report
    PGTOP,
    /// MTK command acknowledgement or response
    PMTK,
}

impl SentenceKind {
    /// Talker and sentence identifier as it appears after `$`.
    pub fn identifier(self) -> &'static str {
        match self {
            Self::GGA => "GPGGA",
            Self::GSA => "GPGSA",
            Self::GSV => "GPGSV",
            Self::RMC => "GPRMC",
            Self::VTG => "GPVTG",
            Self::GLL => "GPGLL",
            Self::PGTOP => "PGTOP",
            Self::PMTK => "PMTK",
        }
    }
}

impl fmt::Display for SentenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

/// Hemisphere of a coordinate.
///
/// [`Direction::Unset`] marks a coordinate that was absent from the sentence.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    #[default]
    Unset,
    North,
    South,
    East,
    West,
}

impl Direction {
    pub fn from_letter(letter: u8) -> Option<Self> {
        match letter {
            b'N' => Some(Self::North),
            b'S' => Some(Self::South),
            b'E' => Some(Self::East),
            b'W' => Some(Self::West),
            _ => None,
        }
    }

    fn sign(self) -> f64 {
        match self {
            Self::South | Self::West => -1.0,
            _ => 1.0,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Unset => "UNSET",
            Self::North => "N",
            Self::South => "S",
            Self::East => "E",
            Self::West => "W",
        })
    }
}

/// Latitude or longitude as transmitted: whole degrees plus decimal minutes.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLon {
    /// Hemisphere, [`Direction::Unset`] when the coordinate is absent
    pub direction: Direction,
    /// Whole degrees, meaningless when `direction` is unset
    pub degrees: u16,
    /// Decimal minutes, meaningless when `direction` is unset
    pub minutes: f32,
}

impl Default for LatLon {
    fn default() -> Self {
        Self {
            direction: Direction::Unset,
            degrees: 0,
            minutes: f32::NAN,
        }
    }
}

impl LatLon {
    pub fn is_set(&self) -> bool {
        self.direction != Direction::Unset
    }

    /// Signed decimal degrees, south and west negative.
    pub fn to_decimal_degrees(&self) -> Option<f64> {
        self.is_set().then(|| {
            (self.degrees as f64 + self.minutes as f64 / 60.0) * self.direction.sign()
        })
    }
}

impl fmt::Display for LatLon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_set() {
            write!(f, "{}°{:.4}'{}", self.degrees, self.minutes, self.direction)
        } else {
            f.write_str("(unset)")
        }
    }
}

/// Receiver mode, shared by GSA selection/fix modes and FAA mode indicators.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Unset,
    /// GSA mode 1 `M`
    Manual,
    /// GSA mode 1 `A`
    Automatic,
    /// GSA mode 2 `1`
    NoFix,
    /// GSA mode 2 `2`
    Fix2D,
    /// GSA mode 2 `3`
    Fix3D,
    /// FAA mode `A`
    Autonomous,
    /// FAA mode `D`
    Differential,
    /// FAA mode `E`
    Estimated,
}

letter_enum! {
    /// GPS quality indicator of a GGA sentence
    #[derive(Default)]
    pub enum PositionFix {
        /// 0 - Fix not available
        #[default]
        b'0' => NoFix,
        /// 1 - GPS fix
        b'1' => GPSFix,
        /// 2 - Differential GPS fix
        b'2' => DGPSFix,
    }
}

letter_enum! {
    /// Status indicator of RMC and GLL sentences
    pub enum Status {
        /// A - Valid
        b'A' => Valid,
        /// V - Invalid
        b'V' => Invalid,
    }
}

/// Antenna state reported by `$PGTOP,11,<value>`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum AntennaStatus {
    #[default]
    Unset,
    /// 1 - Antenna shorted
    Shorted,
    /// 2 - Using the internal antenna
    Internal,
    /// 3 - Using the active antenna
    Active,
}

impl AntennaStatus {
    pub fn from_value(value: u32) -> Option<Self> {
        match value {
            1 => Some(Self::Shorted),
            2 => Some(Self::Internal),
            3 => Some(Self::Active),
            _ => None,
        }
    }
}

/// Seconds and microseconds of a fix.
///
/// When [`Record::is_valid_timestamp`] is set, `seconds` counts from the Unix
/// epoch. Otherwise only a time of day was available and `seconds` counts from
/// UTC midnight.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Timestamp {
    pub seconds: i64,
    pub microseconds: u32,
}

/// Firmware details returned by `$PMTK705`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FirmwareInfo {
    /// Release string, e.g. `AXN_2.10_3339_2012072601`
    pub release: String,
    /// Build identifier
    pub build_id: String,
    /// Chip or module name, e.g. `PA6H`
    pub chip: String,
    /// Product version
    pub version: String,
}

/// One decoded sentence.
///
/// Floating point fields hold NaN when the sentence did not carry them.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub kind: SentenceKind,
    pub latitude: LatLon,
    pub longitude: LatLon,
    /// True only when both date and time were transmitted (RMC)
    pub is_valid_timestamp: bool,
    pub timestamp: Timestamp,
    pub mode: Mode,
    pub posfix: PositionFix,
    pub num_satellites: u8,
    pub hdop: f32,
    pub altitude_meters: f32,
    pub geoidal_separation_meters: f32,
    pub speed_kmph: f32,
    pub speed_knots: f32,
    /// Course over ground, true north
    pub course_degrees: f32,
    /// Course over ground, magnetic north
    pub heading_degrees: f32,
    /// Magnetic variation, west negative
    pub magnetic_variation_degrees: f32,
    pub status: Option<Status>,
    pub antenna_status: AntennaStatus,
    pub firmware_info: Option<FirmwareInfo>,
    /// `None` when the sentence carried no `*HH`
    pub checksum_valid: Option<bool>,
}

impl Record {
    pub fn new(kind: SentenceKind) -> Self {
        Self {
            kind,
            latitude: LatLon::default(),
            longitude: LatLon::default(),
            is_valid_timestamp: false,
            timestamp: Timestamp::default(),
            mode: Mode::Unset,
            posfix: PositionFix::NoFix,
            num_satellites: 0,
            hdop: f32::NAN,
            altitude_meters: f32::NAN,
            geoidal_separation_meters: f32::NAN,
            speed_kmph: f32::NAN,
            speed_knots: f32::NAN,
            course_degrees: f32::NAN,
            heading_degrees: f32::NAN,
            magnetic_variation_degrees: f32::NAN,
            status: None,
            antenna_status: AntennaStatus::Unset,
            firmware_info: None,
            checksum_valid: None,
        }
    }

    /// The fix time as a UTC date-time, when a full timestamp is available.
    pub fn datetime(&self) -> Option<time::OffsetDateTime> {
        if !self.is_valid_timestamp {
            return None;
        }

        let datetime = time::OffsetDateTime::from_unix_timestamp(self.timestamp.seconds).ok()?;
        datetime.replace_microsecond(self.timestamp.microseconds).ok()
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        match self.kind {
            SentenceKind::GGA => write!(
                f,
                " lat: {} lon: {} fix: {:?} satellites: {} hdop: {} altitude: {}m",
                self.latitude,
                self.longitude,
                self.posfix,
                self.num_satellites,
                self.hdop,
                self.altitude_meters
            )?,
            SentenceKind::RMC | SentenceKind::GLL => write!(
                f,
                " lat: {} lon: {} speed: {}kn course: {}° mode: {:?}",
                self.latitude, self.longitude, self.speed_knots, self.course_degrees, self.mode
            )?,
            SentenceKind::VTG => write!(
                f,
                " course: {}° heading: {}° speed: {}kn {}km/h mode: {:?}",
                self.course_degrees,
                self.heading_degrees,
                self.speed_knots,
                self.speed_kmph,
                self.mode
            )?,
            SentenceKind::PGTOP => write!(f, " antenna: {:?}", self.antenna_status)?,
            SentenceKind::PMTK => {
                if let Some(info) = &self.firmware_info {
                    write!(
                        f,
                        " firmware: {} build: {} chip: {} version: {}",
                        info.release, info.build_id, info.chip, info.version
                    )?;
                }
            }
            SentenceKind::GSA | SentenceKind::GSV => {}
        }

        match self.datetime() {
            Some(datetime) => write!(f, " time: {datetime}"),
            None if self.timestamp != Timestamp::default() => write!(
                f,
                " time-of-day: {}.{:06}s",
                self.timestamp.seconds, self.timestamp.microseconds
            ),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decimal_degrees() {
        let lat = LatLon {
            direction: Direction::South,
            degrees: 40,
            minutes: 30.0,
        };
        assert_eq!(lat.to_decimal_degrees(), Some(-40.5));
        assert_eq!(LatLon::default().to_decimal_degrees(), None);
    }

    #[test]
    fn test_letter_enums() {
        assert_eq!(PositionFix::from_letter(b'2'), Some(PositionFix::DGPSFix));
        assert_eq!(PositionFix::from_letter(b'3'), None);
        assert_eq!(Status::from_letter(b'V'), Some(Status::Invalid));
        assert_eq!(Status::Valid.letter(), b'A');
        assert_eq!(Status::LETTERS, b"AV");
    }

    #[test]
    fn test_datetime() {
        let mut record = Record::new(SentenceKind::RMC);
        record.timestamp = Timestamp {
            seconds: 1_145_947_791,
            microseconds: 250_000,
        };
        assert_eq!(record.datetime(), None);

        record.is_valid_timestamp = true;
        let datetime = record.datetime().unwrap();
        assert_eq!(datetime.year(), 2006);
        assert_eq!(datetime.millisecond(), 250);
    }
}

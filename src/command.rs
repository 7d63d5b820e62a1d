//! # Command Builder
//!
//! Outbound configuration sentences for MTK3339 receivers. Each [`Command`]
//! renders as a complete sentence, `$<body>*<HH>\r\n`, ready to be written
//! to the serial line. Opening and configuring the line itself is left to
//! the caller.
//!
//! ```rust
//! use gps_mtk3339::command::{Command, MessageRates};
//!
//! let command = Command::EnabledMessages(MessageRates::RMC_GGA);
//! assert_eq!(
//!     command.to_string(),
//!     "$PMTK314,0,1,0,1,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0*28\r\n"
//! );
//! ```

use std::fmt;

use crate::checksum::checksum;

/// `$PMTK101` to `$PMTK104`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Restart {
    /// Use all available data in the NV store
    Hot,
    /// Keep the almanac, drop the ephemeris
    Warm,
    /// Drop time, position, almanac and ephemeris
    Cold,
    /// Cold restart and clear all system and user configuration
    FactoryReset,
}

/// Output rate of each NMEA sentence, in position fixes per sentence.
///
/// 0 disables a sentence, 1 emits it on every fix, up to 5 for every fifth
/// fix. Larger values are clamped to 5.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MessageRates {
    pub gll: u8,
    pub rmc: u8,
    pub vtg: u8,
    pub gga: u8,
    pub gsa: u8,
    pub gsv: u8,
}

impl MessageRates {
    /// Every sentence disabled.
    pub const OFF: Self = Self::new(0, 0, 0, 0, 0, 0);
    /// Only RMC on every fix.
    pub const RMC_ONLY: Self = Self::new(0, 1, 0, 0, 0, 0);
    /// RMC and GGA on every fix.
    pub const RMC_GGA: Self = Self::new(0, 1, 0, 1, 0, 0);
    /// Every supported sentence on every fix.
    pub const ALL: Self = Self::new(1, 1, 1, 1, 1, 1);

    pub const fn new(gll: u8, rmc: u8, vtg: u8, gga: u8, gsa: u8, gsv: u8) -> Self {
        Self {
            gll,
            rmc,
            vtg,
            gga,
            gsa,
            gsv,
        }
    }
}

/// Static navigation speed threshold of `$PMTK386`.
///
/// Below the threshold the receiver reports a speed of zero and holds its
/// position.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SpeedThreshold {
    Disabled,
    #[default]
    Mps0_2,
    Mps0_4,
    Mps0_6,
    Mps0_8,
    Mps1_0,
    Mps1_5,
    Mps2_0,
}

impl SpeedThreshold {
    const ALL: [Self; 8] = [
        Self::Disabled,
        Self::Mps0_2,
        Self::Mps0_4,
        Self::Mps0_6,
        Self::Mps0_8,
        Self::Mps1_0,
        Self::Mps1_5,
        Self::Mps2_0,
    ];

    pub fn meters_per_second(self) -> f32 {
        match self {
            Self::Disabled => 0.0,
            Self::Mps0_2 => 0.2,
            Self::Mps0_4 => 0.4,
            Self::Mps0_6 => 0.6,
            Self::Mps0_8 => 0.8,
            Self::Mps1_0 => 1.0,
            Self::Mps1_5 => 1.5,
            Self::Mps2_0 => 2.0,
        }
    }

    /// The supported threshold equal to `mps`, if any.
    pub fn from_meters_per_second(mps: f32) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|threshold| (threshold.meters_per_second() - mps).abs() < 1e-3)
    }
}

/// Serial line speeds supported by the receiver.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum BaudRate {
    B1200,
    B2400,
    B4800,
    #[default]
    B9600,
    B19200,
    B38400,
    B57600,
    B115200,
}

impl BaudRate {
    pub fn bps(self) -> u32 {
        match self {
            Self::B1200 => 1200,
            Self::B2400 => 2400,
            Self::B4800 => 4800,
            Self::B9600 => 9600,
            Self::B19200 => 19200,
            Self::B38400 => 38400,
            Self::B57600 => 57600,
            Self::B115200 => 115_200,
        }
    }

    pub fn from_bps(bps: u32) -> Option<Self> {
        match bps {
            1200 => Some(Self::B1200),
            2400 => Some(Self::B2400),
            4800 => Some(Self::B4800),
            9600 => Some(Self::B9600),
            19200 => Some(Self::B19200),
            38400 => Some(Self::B38400),
            57600 => Some(Self::B57600),
            115_200 => Some(Self::B115200),
            _ => None,
        }
    }
}

/// An outbound receiver command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Restart(Restart),
    /// `$PMTK161,0`
    Standby,
    /// `$PMTK220`: milliseconds between fixes, rendered within 100 to 10000
    FixInterval(u16),
    /// `$PMTK314`
    EnabledMessages(MessageRates),
    /// `$PMTK386`
    SpeedThreshold(SpeedThreshold),
    /// `$PGCMD,33`: periodic `$PGTOP` antenna reports on or off
    AntennaStatus(bool),
    /// `$PMTK605`: answered by `$PMTK705`
    FirmwareInfo,
    /// `$PMTK251`
    BaudRate(BaudRate),
}

impl Command {
    const MIN_FIX_INTERVAL: u16 = 100;
    const MAX_FIX_INTERVAL: u16 = 10_000;

    /// Fix interval command, clamped to what the receiver accepts.
    pub fn fix_interval(milliseconds: u32) -> Self {
        let clamped = milliseconds.clamp(
            Self::MIN_FIX_INTERVAL as u32,
            Self::MAX_FIX_INTERVAL as u32,
        ) as u16;
        Command::FixInterval(clamped)
    }

    /// Speed threshold command. Unsupported values fall back to 0.2 m/s.
    pub fn speed_threshold(meters_per_second: f32) -> Self {
        let threshold = SpeedThreshold::from_meters_per_second(meters_per_second)
            .unwrap_or_else(|| {
                log::warn!(
                    "unsupported speed threshold {meters_per_second} m/s, using {} m/s",
                    SpeedThreshold::default().meters_per_second()
                );
                SpeedThreshold::default()
            });
        Command::SpeedThreshold(threshold)
    }

    /// Baud rate command. Unsupported values fall back to 9600 bps.
    pub fn baud_rate(bps: u32) -> Self {
        let rate = BaudRate::from_bps(bps).unwrap_or_else(|| {
            log::warn!("invalid baud rate {bps} bps given, using 9600 bps");
            BaudRate::default()
        });
        Command::BaudRate(rate)
    }

    /// Sentence content between `$` and `*`.
    pub fn body(&self) -> String {
        match self {
            Command::Restart(Restart::Hot) => "PMTK101".to_string(),
            Command::Restart(Restart::Warm) => "PMTK102".to_string(),
            Command::Restart(Restart::Cold) => "PMTK103".to_string(),
            Command::Restart(Restart::FactoryReset) => "PMTK104".to_string(),
            Command::Standby => "PMTK161,0".to_string(),
            Command::FixInterval(milliseconds) => format!(
                "PMTK220,{}",
                (*milliseconds).clamp(Self::MIN_FIX_INTERVAL, Self::MAX_FIX_INTERVAL)
            ),
            Command::EnabledMessages(rates) => {
                let rate = |rate: u8| rate.min(5);
                let mut body = format!(
                    "PMTK314,{},{},{},{},{},{}",
                    rate(rates.gll),
                    rate(rates.rmc),
                    rate(rates.vtg),
                    rate(rates.gga),
                    rate(rates.gsa),
                    rate(rates.gsv)
                );
                // Reserved fields.
                body.push_str(&",0".repeat(13));
                body
            }
            Command::SpeedThreshold(threshold) => {
                format!("PMTK386,{:.1}", threshold.meters_per_second())
            }
            Command::AntennaStatus(enabled) => format!("PGCMD,33,{}", u8::from(*enabled)),
            Command::FirmwareInfo => "PMTK605".to_string(),
            Command::BaudRate(rate) => format!("PMTK251,{}", rate.bps()),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let body = self.body();
        write!(f, "${body}*{:02X}\r\n", checksum(body.as_str()))
    }
}

//! # MTK3339 NMEA 0183 Decoder
//!
//! This library decodes the NMEA 0183 sentence stream of MTK3339-class GPS
//! receivers into [`Record`]s. Sentences have the format:
//! `$<talker><id>,D1,D2,...,Dn[*CC]<CR><LF>`
//!
//! The decoder is incremental: [`Parser::parse`] accepts the bytes exactly as
//! they come off the serial line, split at arbitrary offsets, and resumes
//! where the previous call stopped.
//!
//! Recognized sentences:
//! - `GPGGA`, `GPRMC`, `GPVTG`, `GPGLL` and `PGTOP`, each producing one record
//! - `GPGSA` and `GPGSV`, informational, exposed through parser accessors
//! - `PMTK` acknowledgements and system messages; only the `PMTK705`
//!   firmware response produces a record
//!
//! The parser is configurable through [`ParserConfig`] to handle:
//! - Required or optional checksums
//! - Halting at the first structural error or resynchronizing at the next `$`
//! - The century two-digit RMC years belong to
//! - Its own log verbosity, independent of any other parser
//!
//! ## Usage
//!
//! ```rust
//! use gps_mtk3339::{Mode, Parser, SentenceKind};
//!
//! let mut parser = Parser::new();
//! let mut records = Vec::new();
//!
//! let input = b"$GPRMC,064951.000,A,2307.1256,N,12016.4438,E,0.03,165.48,260406,3.05,W,A*2C\n\
//!               $GPVTG,7.37,T,,M,1.10,N,2.04,K,A*38\n";
//! let appended = parser.parse(input, &mut records).unwrap();
//!
//! assert_eq!(appended, 2);
//! assert_eq!(records[0].kind, SentenceKind::RMC);
//! assert!(records[0].is_valid_timestamp);
//! assert_eq!(records[1].mode, Mode::Autonomous);
//! assert!(records[1].heading_degrees.is_nan());
//! ```
//!
//! Outbound receiver configuration lives in [`command`].

#[macro_use]
mod macros;

mod checksum;
pub mod command;
mod config;
mod decode;
mod dump;
pub mod error;
mod parser;
mod parsing;
mod record;
mod sentences;

pub use checksum::{checksum, format_checksum};
pub use config::{ChecksumMode, ParserConfig, RecoveryMode};
pub use dump::{HexDump, hex_dump};
pub use error::{ContentError, Error, IResult};
pub use parser::{Parser, State};
pub use record::{
    AntennaStatus, Direction, FirmwareInfo, LatLon, Mode, PositionFix, Record, SentenceKind,
    Status, Timestamp,
};
pub use sentences::{
    AckFlag, Dilution, FaaMode, FixMode, FixModes, GsvGroup, PmtkMessage, Satellite,
    SelectionMode,
};

#[cfg(doctest)]
#[doc = include_str!("../README.md")]
struct README;

#[cfg(test)]
mod tests {
    mod errors;
    mod scenarios;
    mod split;
}

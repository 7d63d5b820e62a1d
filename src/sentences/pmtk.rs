//! PMTK responses.
//!
//! Unlike the other kinds, a PMTK sentence is not decoded field by field:
//! its payload is buffered up to the checksum and parsed with nom once the
//! sentence is complete.
//!
//! ```text
//!        1   2     n
//!        |   |     |
//!  $PMTKxxx,c--c,...,c--c*hh<CR><LF>
//! ```

use log::LevelFilter;
use nom::{
    Parser,
    bytes::complete::take_while_m_n,
    character::complete::{anychar, char, u16},
    combinator::{map_res, opt, rest},
    error::ErrorKind,
    sequence::preceded,
};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    ContentError, Error, IResult,
    parsing::{consumed, next_field},
    record::{FirmwareInfo, Record, SentenceKind},
};

letter_enum! {
    /// Result flag of a `$PMTK001` acknowledgement
    pub enum AckFlag {
        /// 0 - Invalid command or packet
        b'0' => Invalid,
        /// 1 - Unsupported command or packet type
        b'1' => Unsupported,
        /// 2 - Valid command, but action failed
        b'2' => Failed,
        /// 3 - Valid command, action succeeded
        b'3' => Succeeded,
    }
}

/// Decoded payload of a PMTK sentence.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PmtkMessage<'a> {
    /// `$PMTK001,<command>,<flag>`
    Acknowledgement { command: u16, flag: AckFlag },
    /// `$PMTK010,<message>`: 1 startup, 2 extension mode, 3 normal mode
    System(u16),
    /// `$PMTK011,<text>`
    Text(&'a str),
    /// `$PMTK705,<release>,<build id>,<chip>,<version>`
    Firmware(FirmwareInfo),
    /// Any other command number
    Other { command: u16 },
}

impl<'a> PmtkMessage<'a> {
    /// Parses a payload, everything after `PMTK` and before `*`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use gps_mtk3339::{AckFlag, PmtkMessage};
    ///
    /// let message = PmtkMessage::parse("001,220,3").unwrap();
    /// assert_eq!(
    ///     message,
    ///     PmtkMessage::Acknowledgement { command: 220, flag: AckFlag::Succeeded }
    /// );
    /// ```
    pub fn parse(payload: &'a str) -> Result<Self, Error> {
        message(payload)
            .map(|(_, message)| message)
            .map_err(|e| Error::MalformedSentence {
                kind: SentenceKind::PMTK,
                reason: describe(e),
            })
    }
}

fn command(i: &str) -> IResult<&str, u16> {
    let number: IResult<&str, u16> =
        map_res(take_while_m_n(3, 3, |c: char| c.is_ascii_digit()), str::parse::<u16>).parse(i);
    number.map_err(|_| nom::Err::Error(ContentError::UnrecognizedCommand(i)))
}

fn acknowledgement(i: &str) -> IResult<&str, PmtkMessage<'_>> {
    let (i, command) = preceded(char(','), u16).parse(i)?;
    let (rest, flag) = consumed(preceded(char(','), anychar), ErrorKind::Eof).parse(i)?;
    let flag = u8::try_from(flag)
        .ok()
        .and_then(AckFlag::from_letter)
        .ok_or(nom::Err::Error(ContentError::InvalidField(&i[1..])))?;

    Ok((rest, PmtkMessage::Acknowledgement { command, flag }))
}

fn firmware(i: &str) -> IResult<&str, PmtkMessage<'_>> {
    let (i, (release, build_id, chip, version)) =
        (opt(next_field), opt(next_field), opt(next_field), opt(next_field)).parse(i)?;

    let owned = |field: Option<&str>| field.unwrap_or_default().to_string();
    Ok((
        i,
        PmtkMessage::Firmware(FirmwareInfo {
            release: owned(release),
            build_id: owned(build_id),
            chip: owned(chip),
            version: owned(version),
        }),
    ))
}

fn message(i: &str) -> IResult<&str, PmtkMessage<'_>> {
    let (i, command) = command(i)?;
    match command {
        1 => acknowledgement(i),
        10 => consumed(preceded(char(','), u16), ErrorKind::Eof)
            .map(PmtkMessage::System)
            .parse(i),
        11 => preceded(char(','), rest).map(PmtkMessage::Text).parse(i),
        705 => firmware(i),
        command => Ok((i, PmtkMessage::Other { command })),
    }
}

fn describe(e: nom::Err<ContentError<&str, nom::error::Error<&str>>>) -> String {
    match e {
        nom::Err::Incomplete(_) => "incomplete payload".to_string(),
        nom::Err::Error(e) | nom::Err::Failure(e) => match e {
            ContentError::UnrecognizedCommand(i) => format!("command number expected at {i:?}"),
            ContentError::InvalidField(i) => format!("invalid field {i:?}"),
            ContentError::ParsingError(e) => format!("{:?} at {:?}", e.code, e.input),
        },
    }
}

/// Decodes a finished PMTK payload. Only a firmware response yields a record.
pub(crate) fn assemble(payload: &str, log: LevelFilter) -> Result<Option<Record>, Error> {
    match PmtkMessage::parse(payload)? {
        PmtkMessage::Acknowledgement { command, flag } => {
            log_at!(log, Debug, "PMTK{command:03} acknowledged: {flag:?}");
            Ok(None)
        }
        PmtkMessage::System(message) => {
            log_at!(log, Info, "PMTK system message {message}");
            Ok(None)
        }
        PmtkMessage::Text(text) => {
            log_at!(log, Info, "PMTK text message: {text}");
            Ok(None)
        }
        PmtkMessage::Firmware(info) => {
            log_at!(log, Debug, "PMTK firmware release {}", info.release);
            let mut record = Record::new(SentenceKind::PMTK);
            record.firmware_info = Some(info);
            Ok(Some(record))
        }
        PmtkMessage::Other { command } => {
            log_at!(log, Debug, "PMTK{command:03} ignored");
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acknowledgement() {
        assert_eq!(
            PmtkMessage::parse("001,314,3").unwrap(),
            PmtkMessage::Acknowledgement {
                command: 314,
                flag: AckFlag::Succeeded,
            }
        );
        assert_eq!(
            PmtkMessage::parse("001,103,2").unwrap(),
            PmtkMessage::Acknowledgement {
                command: 103,
                flag: AckFlag::Failed,
            }
        );
        assert!(PmtkMessage::parse("001,220,7").is_err());
        assert!(PmtkMessage::parse("001,220,3,1").is_err());
        assert!(PmtkMessage::parse("001,abc,3").is_err());
    }

    #[test]
    fn test_system_and_text() {
        assert_eq!(PmtkMessage::parse("010,001").unwrap(), PmtkMessage::System(1));
        assert_eq!(PmtkMessage::parse("011,MTKGPS").unwrap(), PmtkMessage::Text("MTKGPS"));
    }

    #[test]
    fn test_firmware() {
        let message = PmtkMessage::parse("705,AXN_2.10_3339_2012072601,5223,PA6H,1.0").unwrap();
        assert_eq!(
            message,
            PmtkMessage::Firmware(FirmwareInfo {
                release: "AXN_2.10_3339_2012072601".to_string(),
                build_id: "5223".to_string(),
                chip: "PA6H".to_string(),
                version: "1.0".to_string(),
            })
        );

        let PmtkMessage::Firmware(info) = PmtkMessage::parse("705,AXN_1.3,2102").unwrap() else {
            panic!("expected a firmware response");
        };
        assert_eq!(info.build_id, "2102");
        assert_eq!(info.chip, "");
        assert_eq!(info.version, "");
    }

    #[test]
    fn test_unrecognized_command() {
        assert_eq!(
            PmtkMessage::parse("869,0,1").unwrap(),
            PmtkMessage::Other { command: 869 }
        );

        let error = PmtkMessage::parse("ABC,1").unwrap_err();
        assert!(matches!(
            error,
            Error::MalformedSentence {
                kind: SentenceKind::PMTK,
                ..
            }
        ));
        assert!(PmtkMessage::parse("").is_err());
    }

    #[test]
    fn test_only_firmware_produces_record() {
        assert_eq!(assemble("001,220,3", LevelFilter::Off).unwrap(), None);
        assert_eq!(assemble("010,002", LevelFilter::Off).unwrap(), None);

        let record = assemble("705,AXN_2.10_3339_2012072601,5223,PA6H,1.0", LevelFilter::Off)
            .unwrap()
            .unwrap();
        assert_eq!(record.kind, SentenceKind::PMTK);
        assert_eq!(record.firmware_info.unwrap().chip, "PA6H");
    }
}

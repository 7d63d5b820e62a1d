//! # Sentence Parser
//!
//! [`Parser`] is a byte-at-a-time state machine. Every byte advances exactly
//! one transition and nothing is looked ahead, so input may be split at any
//! offset across [`Parser::parse`] calls: field accumulators, the running
//! checksum and the per-sentence scratch all live in the parser.
//!
//! ```text
//!          '$'          id ','            ','
//!  Sync ───────► Talker ──────► Field 0 ─────► Field n ──┐
//!   ▲              │ "PMTK"                │ '*'          │ <CR>/<LF>
//!   │              ▼                       ▼              │
//!   │          PmtkBody ──── '*' ───► ChecksumHi          │
//!   │              │                       │              │
//!   │              │ <CR>/<LF>        ChecksumLo          │
//!   │              │                       │              │
//!   │              ▼                       ▼              │
//!   └──────── (finalize) ◄── <CR>/<LF> ─ Terminate ◄──────┘
//! ```
//!
//! Any byte that does not fit the grammar of the current state leads to
//! [`State::Error`], or back to [`State::Sync`] under
//! [`RecoveryMode::Resync`].

use std::{collections::TryReserveError, fmt, io};

use crate::{
    ChecksumMode, Error, ParserConfig, RecoveryMode,
    checksum::ChecksumState,
    decode::{Decoder, Reject},
    dump::HexDump,
    record::{Record, SentenceKind},
    sentences::{self, Dilution, FixModes, GsvGroup, IDENTIFIERS, Satellite, Scratch, pmtk},
};

/// Position of the parser in the sentence grammar.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Scanning for `$`. Whitespace and NUL bytes are skipped.
    #[default]
    Sync,
    /// Matching the talker and sentence identifier.
    Talker,
    /// Decoding field `index` (zero-based) of a `kind` sentence.
    Field { kind: SentenceKind, index: usize },
    /// Buffering the payload of a PMTK sentence.
    PmtkBody,
    /// Expecting the first checksum digit.
    ChecksumHi,
    /// Expecting the second checksum digit.
    ChecksumLo,
    /// Expecting `<CR>` or `<LF>`.
    Terminate,
    /// Halted after a structural error until [`Parser::reset`] is called.
    Error,
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            State::Sync => f.write_str("Sync"),
            State::Talker => f.write_str("Talker"),
            State::Field { kind, index } => write!(f, "Field({kind} #{index})"),
            State::PmtkBody => f.write_str("PmtkBody"),
            State::ChecksumHi => f.write_str("ChecksumHi"),
            State::ChecksumLo => f.write_str("ChecksumLo"),
            State::Terminate => f.write_str("Terminate"),
            State::Error => f.write_str("Error"),
        }
    }
}

/// Why a single byte could not be consumed.
enum Fault {
    /// The byte does not fit the grammar of the current state.
    Unexpected,
    /// The sentence is framed correctly but its content is not.
    Malformed(Error),
    /// The output list could not grow.
    Allocation(TryReserveError),
}

impl From<Reject> for Fault {
    fn from(_: Reject) -> Self {
        Fault::Unexpected
    }
}

/// Incremental NMEA 0183 decoder for MTK3339 receivers.
///
/// # Examples
///
/// ```rust
/// use gps_mtk3339::{AntennaStatus, Parser, SentenceKind};
///
/// let mut parser = Parser::new();
/// let mut records = Vec::new();
///
/// // Serial reads rarely line up with sentence boundaries.
/// assert_eq!(parser.parse(b"$PGTOP,1", &mut records).unwrap(), 0);
/// assert_eq!(parser.parse(b"1,3*6F\r\n", &mut records).unwrap(), 1);
///
/// assert_eq!(records[0].kind, SentenceKind::PGTOP);
/// assert_eq!(records[0].antenna_status, AntennaStatus::Active);
/// ```
#[derive(Debug, Clone)]
pub struct Parser {
    config: ParserConfig,
    state: State,
    kind: Option<SentenceKind>,
    talker: [u8; 5],
    talker_len: usize,
    decoder: Decoder,
    checksum: ChecksumState,
    scratch: Scratch,
    consumed: usize,
    discarded: usize,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser {
    /// A parser with the default [`ParserConfig`].
    pub fn new() -> Self {
        Self::with_config(ParserConfig::default())
    }

    pub fn with_config(config: ParserConfig) -> Self {
        Self {
            config,
            state: State::Sync,
            kind: None,
            talker: [0; 5],
            talker_len: 0,
            decoder: Decoder::default(),
            checksum: ChecksumState::default(),
            scratch: Scratch::default(),
            consumed: 0,
            discarded: 0,
        }
    }

    /// Feeds `input` and appends one [`Record`] to `out` per completed
    /// record-producing sentence.
    ///
    /// Returns the number of records appended by this call. On error the
    /// records completed before the offending byte stay in `out`.
    ///
    /// # Errors
    ///
    /// - [`Error::EmptyInput`] if `input` is empty; nothing is touched.
    /// - [`Error::Halted`] if an earlier call failed and [`reset`](Self::reset)
    ///   was not called since.
    /// - [`Error::UnexpectedByte`] or [`Error::MalformedSentence`] on a
    ///   structural error under [`RecoveryMode::Abort`]. The remaining bytes
    ///   of `input` are not processed.
    /// - [`Error::Allocation`] if `out` cannot grow.
    pub fn parse(&mut self, input: &[u8], out: &mut Vec<Record>) -> Result<usize, Error> {
        if input.is_empty() {
            return Err(Error::EmptyInput);
        }
        if self.state == State::Error {
            return Err(Error::Halted);
        }

        let mut appended = 0;
        for (offset, &byte) in input.iter().enumerate() {
            self.consumed += 1;

            let state = self.state;
            let error = match self.step(byte, out) {
                Ok(true) => {
                    appended += 1;
                    continue;
                }
                Ok(false) => continue,
                Err(Fault::Unexpected) => Error::UnexpectedByte {
                    byte,
                    offset,
                    state,
                },
                Err(Fault::Malformed(error)) => error,
                Err(Fault::Allocation(error)) => return Err(Error::Allocation(error)),
            };

            self.recover(error, state, byte, input)?;
        }

        Ok(appended)
    }

    /// Abandons the sentence in progress and returns to [`State::Sync`].
    ///
    /// Clears the error state and all scratch storage. Counters are kept.
    pub fn reset(&mut self) {
        self.clear();
        self.state = State::Sync;
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Total number of bytes consumed since the parser was created.
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    /// Number of sentences dropped under [`RecoveryMode::Resync`].
    pub fn discarded(&self) -> usize {
        self.discarded
    }

    /// Satellite ids of the current GSA sentence, 0 for empty slots.
    pub fn satellites_used(&self) -> &[u8; 12] {
        &self.scratch.satellites_used
    }

    /// Satellite blocks of the current GSV sentence.
    pub fn satellites_in_view(&self) -> &[Satellite] {
        &self.scratch.satellites
    }

    /// Group position of the current GSV sentence.
    pub fn gsv_group(&self) -> Option<GsvGroup> {
        self.scratch.gsv_group
    }

    /// Mode fields of the current GSA sentence.
    pub fn fix_modes(&self) -> FixModes {
        self.scratch.fix_modes
    }

    /// Dilution of precision of the current GSA or GGA sentence.
    pub fn dilution(&self) -> Dilution {
        self.scratch.dilution
    }

    /// Writes a human-readable dump of the parser state.
    pub fn dump_state<W: io::Write>(&self, sink: &mut W) -> io::Result<()> {
        let scratch = &self.scratch;

        writeln!(sink, "state: {}", self.state)?;
        writeln!(
            sink,
            "consumed: {} bytes, discarded: {} sentences",
            self.consumed, self.discarded
        )?;
        match self.kind {
            Some(kind) => writeln!(sink, "sentence: {kind}")?,
            None => writeln!(
                sink,
                "sentence: {:?} (partial)",
                String::from_utf8_lossy(&self.talker[..self.talker_len])
            )?,
        }
        match self.checksum.expected() {
            Some(expected) => writeln!(
                sink,
                "checksum: calculated {:02X}, transmitted {expected:02X}",
                self.checksum.calculated()
            )?,
            None => writeln!(sink, "checksum: calculated {:02X}", self.checksum.calculated())?,
        }

        match scratch.time {
            Some(time) => writeln!(
                sink,
                "time: {:02}:{:02}:{:02}.{:03}",
                time.hour, time.minute, time.second, time.millisecond
            )?,
            None => writeln!(sink, "time: (unset)")?,
        }
        match scratch.date {
            Some(date) => writeln!(
                sink,
                "date: {:02}/{:02}/{:02}",
                date.day,
                date.month as u16 + 1,
                date.year
            )?,
            None => writeln!(sink, "date: (unset)")?,
        }
        writeln!(sink, "latitude: {}", scratch.latitude)?;
        writeln!(sink, "longitude: {}", scratch.longitude)?;
        writeln!(
            sink,
            "status: {:?}, mode: {:?}, fix modes: {:?}/{:?}",
            scratch.status, scratch.mode, scratch.fix_modes.selection, scratch.fix_modes.fix
        )?;
        writeln!(
            sink,
            "posfix: {:?}, satellites: {}",
            scratch.posfix, scratch.num_satellites
        )?;
        writeln!(
            sink,
            "dop: pdop {} hdop {} vdop {}",
            scratch.dilution.pdop, scratch.dilution.hdop, scratch.dilution.vdop
        )?;
        writeln!(
            sink,
            "altitude: {} m, geoidal separation: {} m",
            scratch.altitude, scratch.geoidal_separation
        )?;
        writeln!(
            sink,
            "speed: {} kn, {} km/h",
            scratch.speed_knots, scratch.speed_kmph
        )?;
        writeln!(
            sink,
            "course: {}, heading: {}, magnetic variation: {} {}",
            scratch.course,
            scratch.heading,
            scratch.magnetic_variation,
            scratch.magnetic_variation_direction
        )?;
        writeln!(sink, "satellites used: {:?}", scratch.satellites_used)?;
        if let Some(group) = scratch.gsv_group {
            writeln!(
                sink,
                "gsv: sentence {}/{}, {} in view",
                group.index as u16 + 1,
                group.total,
                group.satellites_in_view
            )?;
            for satellite in &scratch.satellites {
                writeln!(
                    sink,
                    "  prn {:2} elevation {:?} azimuth {:?} snr {:?}",
                    satellite.prn, satellite.elevation, satellite.azimuth, satellite.snr
                )?;
            }
        }
        writeln!(
            sink,
            "pgtop: function {:?}, antenna {:?}",
            scratch.pgtop_function, scratch.antenna_status
        )?;
        writeln!(sink, "pmtk: {:?}", scratch.pmtk.as_str())
    }

    fn clear(&mut self) {
        self.kind = None;
        self.talker_len = 0;
        self.decoder = Decoder::default();
        self.checksum = ChecksumState::default();
        self.scratch = Scratch::default();
    }

    fn begin(&mut self) {
        self.clear();
        self.state = State::Talker;
    }

    fn recover(&mut self, error: Error, state: State, byte: u8, input: &[u8]) -> Result<(), Error> {
        let log = self.config.log_level;

        if self.config.recovery == RecoveryMode::Resync {
            self.state = State::Sync;
            if state == State::Sync {
                log_at!(log, Debug, "skipping stray byte 0x{byte:02X}");
                return Ok(());
            }

            log_at!(log, Warn, "{error}, resynchronizing");
            log_at!(log, Debug, "input:\n{}", HexDump(input));
            self.discarded += 1;
            if byte == b'$' {
                self.begin();
            }
            return Ok(());
        }

        log_at!(log, Warn, "{error}");
        log_at!(log, Debug, "input:\n{}", HexDump(input));
        self.state = State::Error;
        Err(error)
    }

    /// Consumes one byte. Returns whether a record was appended.
    fn step(&mut self, byte: u8, out: &mut Vec<Record>) -> Result<bool, Fault> {
        match self.state {
            State::Sync => match byte {
                b'$' => self.begin(),
                b' ' | b'\t' | b'\r' | b'\n' | 0 => {}
                _ => return Err(Fault::Unexpected),
            },
            State::Talker => {
                self.checksum.update(byte);
                self.talker(byte)?;
            }
            State::Field { kind, index } => return self.field(kind, index, byte, out),
            State::PmtkBody => return self.pmtk_body(byte, out),
            State::ChecksumHi => {
                if !self.checksum.push_digit(byte) {
                    return Err(Fault::Unexpected);
                }
                self.state = State::ChecksumLo;
            }
            State::ChecksumLo => {
                if !self.checksum.push_digit(byte) {
                    return Err(Fault::Unexpected);
                }
                self.state = State::Terminate;
            }
            State::Terminate => match byte {
                b'\r' | b'\n' => return self.finalize(out),
                _ => return Err(Fault::Unexpected),
            },
            State::Error => return Err(Fault::Unexpected),
        }

        Ok(false)
    }

    fn talker(&mut self, byte: u8) -> Result<(), Fault> {
        if let Some(kind) = self.kind {
            return match byte {
                b',' => self.enter_field(kind, 0),
                _ => Err(Fault::Unexpected),
            };
        }

        let slot = self
            .talker
            .get_mut(self.talker_len)
            .ok_or(Fault::Unexpected)?;
        *slot = byte;
        self.talker_len += 1;

        let prefix = &self.talker[..self.talker_len];
        if let Some(&kind) = IDENTIFIERS
            .iter()
            .find(|kind| kind.identifier().as_bytes() == prefix)
        {
            self.kind = Some(kind);
            if kind == SentenceKind::PMTK {
                self.state = State::PmtkBody;
            }
            Ok(())
        } else if IDENTIFIERS
            .iter()
            .any(|kind| kind.identifier().as_bytes().starts_with(prefix))
        {
            Ok(())
        } else {
            Err(Fault::Unexpected)
        }
    }

    fn enter_field(&mut self, kind: SentenceKind, index: usize) -> Result<(), Fault> {
        let field = sentences::handler(kind)
            .and_then(|handler| handler.field(index))
            .ok_or(Fault::Unexpected)?;

        self.decoder = Decoder::from(field);
        self.state = State::Field { kind, index };
        Ok(())
    }

    fn field(
        &mut self,
        kind: SentenceKind,
        index: usize,
        byte: u8,
        out: &mut Vec<Record>,
    ) -> Result<bool, Fault> {
        match byte {
            b',' => {
                self.checksum.update(byte);
                self.commit(kind, index)?;
                self.enter_field(kind, index + 1)?;
            }
            b'*' => {
                self.commit(kind, index)?;
                self.complete(kind, index + 1)?;
                self.state = State::ChecksumHi;
            }
            b'\r' | b'\n' => {
                self.commit(kind, index)?;
                self.complete(kind, index + 1)?;
                return self.finalize_unchecked(out);
            }
            _ => {
                self.checksum.update(byte);
                self.decoder.push(byte)?;
            }
        }

        Ok(false)
    }

    fn commit(&mut self, kind: SentenceKind, index: usize) -> Result<(), Fault> {
        let value = self.decoder.finish()?;
        log_at!(self.config.log_level, Trace, "{kind} field {index}: {value:?}");

        if let Some(handler) = sentences::handler(kind) {
            (handler.commit)(&mut self.scratch, index, value, self.config.log_level);
        }
        Ok(())
    }

    fn complete(&self, kind: SentenceKind, fields: usize) -> Result<(), Fault> {
        match sentences::handler(kind) {
            Some(handler) if (handler.is_complete)(fields) => Ok(()),
            _ => {
                log_at!(
                    self.config.log_level,
                    Debug,
                    "{kind} sentence ended after {fields} fields"
                );
                Err(Fault::Unexpected)
            }
        }
    }

    fn pmtk_body(&mut self, byte: u8, out: &mut Vec<Record>) -> Result<bool, Fault> {
        match byte {
            b'*' => self.state = State::ChecksumHi,
            b'\r' | b'\n' => return self.finalize_unchecked(out),
            b'$' => return Err(Fault::Unexpected),
            0x20..=0x7E => {
                self.checksum.update(byte);
                self.scratch
                    .pmtk
                    .push(byte as char)
                    .map_err(|_| Fault::Unexpected)?;
            }
            _ => return Err(Fault::Unexpected),
        }

        Ok(false)
    }

    /// Terminator right after the payload, no `*HH` transmitted.
    fn finalize_unchecked(&mut self, out: &mut Vec<Record>) -> Result<bool, Fault> {
        if self.config.checksum == ChecksumMode::Required {
            return Err(Fault::Unexpected);
        }
        self.finalize(out)
    }

    fn finalize(&mut self, out: &mut Vec<Record>) -> Result<bool, Fault> {
        let log = self.config.log_level;
        self.state = State::Sync;

        let kind = self.kind.ok_or(Fault::Unexpected)?;
        let verdict = self.checksum.verdict();
        if let (Some(false), Some(expected)) = (verdict, self.checksum.expected()) {
            log_at!(
                log,
                Warn,
                "{kind} checksum mismatch: calculated {:02X}, transmitted {expected:02X}",
                self.checksum.calculated()
            );
        }

        let record = match sentences::handler(kind) {
            Some(handler) => (handler.assemble)(&self.scratch, &self.config),
            None => pmtk::assemble(&self.scratch.pmtk, log).map_err(Fault::Malformed)?,
        };
        let Some(mut record) = record else {
            log_at!(log, Trace, "{kind} sentence complete");
            return Ok(false);
        };
        record.checksum_valid = verdict;

        out.try_reserve(1).map_err(Fault::Allocation)?;
        log_at!(log, Debug, "{record}");
        out.push(record);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(parser: &mut Parser, input: &[u8]) -> Result<Vec<Record>, Error> {
        let mut records = Vec::new();
        parser.parse(input, &mut records)?;
        Ok(records)
    }

    #[test]
    fn test_state_progression() {
        let mut parser = Parser::new();
        assert_eq!(parser.state(), State::Sync);

        feed(&mut parser, b"$GP").unwrap();
        assert_eq!(parser.state(), State::Talker);

        feed(&mut parser, b"VTG,7.3").unwrap();
        assert_eq!(
            parser.state(),
            State::Field {
                kind: SentenceKind::VTG,
                index: 0,
            }
        );

        feed(&mut parser, b"7,T,,M,1.10,N,2.04,K,A*").unwrap();
        assert_eq!(parser.state(), State::ChecksumHi);
        feed(&mut parser, b"3").unwrap();
        assert_eq!(parser.state(), State::ChecksumLo);
        feed(&mut parser, b"8").unwrap();
        assert_eq!(parser.state(), State::Terminate);

        let records = feed(&mut parser, b"\r").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(parser.state(), State::Sync);
        assert!(feed(&mut parser, b"\n").unwrap().is_empty());
    }

    #[test]
    fn test_pmtk_state() {
        let mut parser = Parser::new();
        feed(&mut parser, b"$PMTK").unwrap();
        assert_eq!(parser.state(), State::PmtkBody);
        feed(&mut parser, b"001,220,3*30").unwrap();
        assert_eq!(parser.state(), State::Terminate);
    }

    #[test]
    fn test_state_display() {
        assert_eq!(State::Sync.to_string(), "Sync");
        assert_eq!(
            State::Field {
                kind: SentenceKind::GGA,
                index: 3,
            }
            .to_string(),
            "Field(GPGGA #3)"
        );
    }

    #[test]
    fn test_talker_rejects_unknown_identifier() {
        let mut parser = Parser::new();
        let error = feed(&mut parser, b"$GPZDA,").unwrap_err();
        assert!(matches!(
            error,
            Error::UnexpectedByte {
                byte: b'Z',
                offset: 3,
                state: State::Talker,
            }
        ));
        assert_eq!(parser.state(), State::Error);
    }

    #[test]
    fn test_identifier_must_be_followed_by_comma() {
        let mut parser = Parser::new();
        let error = feed(&mut parser, b"$GPGGAX").unwrap_err();
        assert!(matches!(error, Error::UnexpectedByte { byte: b'X', .. }));
    }

    #[test]
    fn test_too_many_fields() {
        let mut parser = Parser::new();
        let error = feed(&mut parser, b"$PGTOP,11,3,4*6F\r\n").unwrap_err();
        assert!(matches!(
            error,
            Error::UnexpectedByte {
                byte: b',',
                offset: 11,
                ..
            }
        ));
    }

    #[test]
    fn test_too_few_fields() {
        let mut parser = Parser::new();
        let error = feed(&mut parser, b"$PGTOP,11*6F\r\n").unwrap_err();
        assert!(matches!(
            error,
            Error::UnexpectedByte {
                byte: b'*',
                offset: 9,
                ..
            }
        ));
    }

    #[test]
    fn test_pmtk_payload_overflow() {
        let mut parser = Parser::new();
        let mut input = b"$PMTK011,".to_vec();
        input.extend(std::iter::repeat_n(b'A', 100));

        let error = feed(&mut parser, &input).unwrap_err();
        assert!(matches!(
            error,
            Error::UnexpectedByte {
                state: State::PmtkBody,
                ..
            }
        ));
    }

    #[test]
    fn test_dump_state() {
        let mut parser = Parser::new();
        feed(&mut parser, b"$GPGSV,3,1,09,29,36,029,42,21,46,314").unwrap();

        let mut dump = Vec::new();
        parser.dump_state(&mut dump).unwrap();
        let dump = String::from_utf8(dump).unwrap();

        assert!(dump.starts_with("state: Field(GPGSV #9)\n"));
        assert!(dump.contains("sentence: GPGSV\n"));
        assert!(dump.contains("gsv: sentence 1/3, 9 in view\n"));
        assert!(dump.contains("prn 29 elevation Some(36) azimuth Some(29) snr Some(42)"));
    }
}

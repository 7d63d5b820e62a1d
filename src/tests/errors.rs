use crate::{
    ChecksumMode, Error, Parser, ParserConfig, RecoveryMode, SentenceKind, State,
};

fn resync() -> Parser {
    Parser::with_config(ParserConfig::default().with_recovery(RecoveryMode::Resync))
}

#[test]
fn test_empty_input_touches_nothing() {
    let mut parser = Parser::new();
    let mut records = Vec::new();

    parser.parse(b"$PGT", &mut records).unwrap();
    let consumed = parser.consumed();

    assert!(matches!(parser.parse(b"", &mut records), Err(Error::EmptyInput)));
    assert_eq!(parser.state(), State::Talker);
    assert_eq!(parser.consumed(), consumed);

    assert_eq!(parser.parse(b"OP,11,3*6F\r\n", &mut records).unwrap(), 1);
}

#[test]
fn test_structural_error_halts_until_reset() {
    let mut parser = Parser::new();
    let mut records = Vec::new();

    let error = parser
        .parse(b"$PGTOP,1x,3*6F\r\n$PGTOP,11,3*6F\r\n", &mut records)
        .unwrap_err();
    assert!(matches!(
        error,
        Error::UnexpectedByte {
            byte: b'x',
            offset: 8,
            state: State::Field {
                kind: SentenceKind::PGTOP,
                index: 0,
            },
        }
    ));
    assert!(records.is_empty());
    assert_eq!(parser.state(), State::Error);

    assert!(matches!(
        parser.parse(b"$PGTOP,11,3*6F\r\n", &mut records),
        Err(Error::Halted)
    ));

    parser.reset();
    assert_eq!(parser.state(), State::Sync);
    assert_eq!(parser.parse(b"$PGTOP,11,3*6F\r\n", &mut records).unwrap(), 1);
}

#[test]
fn test_records_before_error_are_kept() {
    let mut parser = Parser::new();
    let mut records = Vec::new();

    let result = parser.parse(b"$PGTOP,11,3*6F\r\n$GPXYZ,1\r\n", &mut records);
    assert!(matches!(
        result,
        Err(Error::UnexpectedByte {
            byte: b'X',
            offset: 19,
            state: State::Talker,
        })
    ));
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].kind, SentenceKind::PGTOP);
}

#[test]
fn test_stray_byte_outside_sentence() {
    let mut parser = Parser::new();
    let mut records = Vec::new();

    let result = parser.parse(b"xyz$PGTOP,11,3*6F\r\n", &mut records);
    assert!(matches!(
        result,
        Err(Error::UnexpectedByte {
            byte: b'x',
            offset: 0,
            state: State::Sync,
        })
    ));

    let mut parser = resync();
    assert_eq!(parser.parse(b"xyz$PGTOP,11,3*6F\r\n", &mut records).unwrap(), 1);
    assert_eq!(parser.discarded(), 0);
}

#[test]
fn test_bad_checksum_digits() {
    let mut parser = Parser::new();
    let mut records = Vec::new();

    let result = parser.parse(b"$PGTOP,11,3*6G\r\n", &mut records);
    assert!(matches!(
        result,
        Err(Error::UnexpectedByte {
            byte: b'G',
            state: State::ChecksumLo,
            ..
        })
    ));

    parser.reset();
    let result = parser.parse(b"$PGTOP,11,3*6F0\r\n", &mut records);
    assert!(matches!(
        result,
        Err(Error::UnexpectedByte {
            byte: b'0',
            state: State::Terminate,
            ..
        })
    ));
}

#[test]
fn test_required_checksum() {
    let config = ParserConfig::default().with_checksum(ChecksumMode::Required);
    let mut parser = Parser::with_config(config);
    let mut records = Vec::new();

    assert_eq!(parser.parse(b"$PGTOP,11,3*6F\r\n", &mut records).unwrap(), 1);

    let result = parser.parse(b"$PGTOP,11,3\r\n", &mut records);
    assert!(matches!(
        result,
        Err(Error::UnexpectedByte {
            byte: b'\r',
            offset: 11,
            ..
        })
    ));

    parser.reset();
    let result = parser.parse(b"$PMTK001,220,3\r\n", &mut records);
    assert!(matches!(
        result,
        Err(Error::UnexpectedByte {
            state: State::PmtkBody,
            ..
        })
    ));
}

#[test]
fn test_malformed_pmtk_payload() {
    let mut parser = Parser::new();
    let mut records = Vec::new();

    let result = parser.parse(b"$PMTKXYZ*00\r\n", &mut records);
    assert!(matches!(
        result,
        Err(Error::MalformedSentence {
            kind: SentenceKind::PMTK,
            ..
        })
    ));
    assert_eq!(parser.state(), State::Error);
}

#[test]
fn test_resync_drops_broken_sentence() {
    let mut parser = resync();
    let mut records = Vec::new();

    let appended = parser
        .parse(
            b"$GPGGA,18591x.000,4048.5993,N*5D\r\n$PGTOP,11,3*6F\r\n",
            &mut records,
        )
        .unwrap();

    assert_eq!(appended, 1);
    assert_eq!(records[0].kind, SentenceKind::PGTOP);
    assert_eq!(parser.discarded(), 1);
    assert_eq!(parser.state(), State::Sync);
}

#[test]
fn test_resync_restarts_on_dollar() {
    let mut parser = resync();
    let mut records = Vec::new();

    // A sentence cut short by the start of the next one.
    let appended = parser
        .parse(b"$GPGGA,1859$PGTOP,11,3*6F\r\n", &mut records)
        .unwrap();

    assert_eq!(appended, 1);
    assert_eq!(records[0].antenna_status, crate::AntennaStatus::Active);
    assert_eq!(parser.discarded(), 1);
}

#[test]
fn test_resync_across_calls() {
    let mut parser = resync();
    let mut records = Vec::new();

    parser.parse(b"$GPVTG,7.37,T,,M,1.1", &mut records).unwrap();
    parser.parse(b"0,X,2.04,K,A*38\n$GPVTG,", &mut records).unwrap();
    parser.parse(b"7.37,T,,M,1.10,N,2.04,K,A*38\n", &mut records).unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(parser.discarded(), 1);
}

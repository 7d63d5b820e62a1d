//! # Error Types
//!
//! Two layers of errors exist in this crate:
//!
//! - [`Error`] is what [`Parser::parse`](crate::Parser::parse) returns. Every
//!   variant is fatal for the call that produced it.
//! - [`ContentError`] is the nom-level error used while parsing buffered PMTK
//!   payloads. It never escapes the crate on its own; a failure is turned into
//!   [`Error::MalformedSentence`].

use std::collections::TryReserveError;

use nom::error::{ErrorKind, FromExternalError, ParseError};
use thiserror::Error;

use crate::{SentenceKind, parser::State};

/// Fatal conditions reported by [`Parser::parse`](crate::Parser::parse).
///
/// Soft conditions (checksum mismatch, out-of-range satellite data, an invalid
/// PGTOP value) are logged and never show up here.
#[derive(Debug, Error)]
pub enum Error {
    /// The input buffer was empty. No parser state was touched.
    #[error("empty input buffer")]
    EmptyInput,

    /// A byte did not match the grammar expected in the current state.
    ///
    /// The parser is left in [`State::Error`] and must be
    /// [`reset`](crate::Parser::reset) before it accepts more input, unless it
    /// runs with [`RecoveryMode::Resync`](crate::RecoveryMode::Resync).
    #[error("unexpected byte 0x{byte:02X} at offset {offset} in state {state}")]
    UnexpectedByte {
        /// The offending byte
        byte: u8,
        /// Index of the byte inside the buffer handed to `parse`
        offset: usize,
        /// State the parser was in when the byte arrived
        state: State,
    },

    /// The parser hit a structural error earlier and has not been reset.
    #[error("parser halted after a structural error, reset it before feeding more input")]
    Halted,

    /// A sentence was framed correctly but its content could not be decoded.
    #[error("malformed {kind} sentence: {reason}")]
    MalformedSentence {
        /// Sentence kind the content belonged to
        kind: SentenceKind,
        /// Short description of the failure
        reason: String,
    },

    /// Growing the caller's record list failed.
    #[error("failed to allocate record storage")]
    Allocation(#[from] TryReserveError),
}

/// Holds the result of the nom content parsers.
///
/// It depends on the input type `I`, the output type `O`, and the error type `E`
/// (by default `nom::error::Error<I>`).
pub type IResult<I, O, E = nom::error::Error<I>> = nom::IResult<I, O, ContentError<I, E>>;

/// Errors raised while parsing the text content of a buffered sentence.
#[derive(Debug, PartialEq)]
pub enum ContentError<I, E> {
    /// The content could not be parsed because its format was invalid.
    ///
    /// This wraps nom's standard parsing errors.
    ParsingError(E),

    /// The command number of a PMTK sentence is not one this crate understands.
    ///
    /// Contains the input starting at the command number.
    UnrecognizedCommand(I),

    /// A field held a value outside of its allowed set.
    ///
    /// Contains the input that caused the error.
    InvalidField(I),
}

impl<I, E> ParseError<I> for ContentError<I, E>
where
    E: ParseError<I>,
{
    fn from_error_kind(input: I, kind: ErrorKind) -> Self {
        ContentError::ParsingError(E::from_error_kind(input, kind))
    }

    fn append(_: I, _: ErrorKind, other: Self) -> Self {
        other
    }
}

impl<I, E, EX> FromExternalError<I, EX> for ContentError<I, E>
where
    E: FromExternalError<I, EX>,
{
    fn from_external_error(input: I, kind: ErrorKind, e: EX) -> Self {
        ContentError::ParsingError(E::from_external_error(input, kind, e))
    }
}

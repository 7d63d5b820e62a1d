//! # Parsing Utilities
//!
//! nom combinators shared by the buffered-content parsers.

use nom::{
    Err, Input, Mode, OutputMode, PResult, Parser,
    bytes::complete::take_till,
    character::complete::char,
    error::{ErrorKind, ParseError},
    sequence::preceded,
};

/// Runs `f` and fails with `e` unless it consumed the whole input.
pub(crate) fn consumed<I, E: ParseError<I>, F>(
    f: F,
    e: ErrorKind,
) -> impl Parser<I, Output = <F as Parser<I>>::Output, Error = E>
where
    I: Input,
    F: Parser<I, Error = E>,
{
    Consumed { f, e }
}

struct Consumed<F> {
    f: F,
    e: ErrorKind,
}

impl<I, F> Parser<I> for Consumed<F>
where
    I: Input,
    F: Parser<I>,
{
    type Output = <F as Parser<I>>::Output;
    type Error = <F as Parser<I>>::Error;

    fn process<OM: OutputMode>(&mut self, i: I) -> PResult<OM, I, Self::Output, Self::Error> {
        let (i, o) = self.f.process::<OM>(i)?;

        if i.input_len() != 0 {
            return Err(Err::Error(OM::Error::bind(|| {
                <F as Parser<I>>::Error::from_error_kind(i, self.e)
            })));
        }

        Ok((i, o))
    }
}

/// A `,` followed by the (possibly empty) field up to the next `,`.
pub(crate) fn next_field<'a, E>(i: &'a str) -> nom::IResult<&'a str, &'a str, E>
where
    E: ParseError<&'a str>,
{
    preceded(char(','), take_till(|c| c == ',')).parse(i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nom::{bytes::complete::take, character::complete::u16};

    type Result<'a, O> = nom::IResult<&'a str, O>;

    #[test]
    fn test_consumed() {
        let result: Result<_> = consumed(take(3u8), ErrorKind::Eof).parse("abc");
        assert_eq!(result, Ok(("", "abc")));

        let result: Result<_> = consumed(take(3u8), ErrorKind::Eof).parse("abcd");
        assert!(result.is_err());
    }

    #[test]
    fn test_next_field() {
        let result: Result<_> = next_field(",220,3");
        assert_eq!(result, Ok((",3", "220")));

        let result: Result<_> = next_field(",,3");
        assert_eq!(result, Ok((",3", "")));

        let result: Result<_> = next_field(",");
        assert_eq!(result, Ok(("", "")));

        let result: Result<_> = next_field("220");
        assert!(result.is_err());

        let result: Result<_> = preceded(char(','), u16).parse(",314");
        assert_eq!(result, Ok(("", 314)));
    }
}

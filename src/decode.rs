//! # Field Decoders
//!
//! Small accumulators that decode one comma-separated field a byte at a time.
//! A decoder lives in the parser's scratch storage, not on the stack, so a
//! field split across two [`Parser::parse`](crate::Parser::parse) calls keeps
//! accumulating where it stopped.
//!
//! Delimiters (`,`, `*`, `<CR>`, `<LF>`) never reach a decoder: the tokenizer
//! handles them and calls [`Decoder::finish`] instead.

/// A byte or a finished field did not fit the decoder's grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Reject;

/// Grammar of one field, as declared by a sentence handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Field {
    /// Unsigned decimal integer of at most `max_digits` digits
    Integer { max_digits: u8 },
    /// Optionally signed decimal real
    Real,
    /// `ddmm.mmmm`
    Latitude,
    /// `dddmm.mmmm`
    Longitude,
    /// A single letter out of the given set
    Letter(&'static [u8]),
    /// `hhmmss.sss`
    Time,
    /// `ddmmyy`
    Date,
    /// Any printable content, discarded
    Skip,
}

/// Decoded content of a finished field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Value {
    Integer(Option<u32>),
    /// NaN when the field was empty
    Real(f32),
    /// Whole degrees and decimal minutes
    Coordinate(Option<(u16, f32)>),
    Letter(Option<u8>),
    Time(Option<TimeOfDay>),
    Date(Option<CalendarDate>),
    Skipped,
}

impl Value {
    pub fn integer(self) -> Option<u32> {
        match self {
            Value::Integer(value) => value,
            _ => None,
        }
    }

    pub fn real(self) -> f32 {
        match self {
            Value::Real(value) => value,
            _ => f32::NAN,
        }
    }

    pub fn coordinate(self) -> Option<(u16, f32)> {
        match self {
            Value::Coordinate(value) => value,
            _ => None,
        }
    }

    pub fn letter(self) -> Option<u8> {
        match self {
            Value::Letter(value) => value,
            _ => None,
        }
    }

    pub fn time(self) -> Option<TimeOfDay> {
        match self {
            Value::Time(value) => value,
            _ => None,
        }
    }

    pub fn date(self) -> Option<CalendarDate> {
        match self {
            Value::Date(value) => value,
            _ => None,
        }
    }
}

/// UTC time of day as transmitted.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TimeOfDay {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub millisecond: u16,
}

impl TimeOfDay {
    /// Allows a leap second.
    pub fn is_valid(&self) -> bool {
        self.hour < 24 && self.minute < 60 && self.second <= 60
    }

    pub fn seconds_of_day(&self) -> i64 {
        self.hour as i64 * 3600 + self.minute as i64 * 60 + self.second as i64
    }
}

/// Calendar date as transmitted.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct CalendarDate {
    pub day: u8,
    /// Zero-based month, January is 0
    pub month: u8,
    /// Raw two-digit year
    pub year: u8,
}

fn digit(byte: u8) -> Result<u8, Reject> {
    if byte.is_ascii_digit() {
        Ok(byte - b'0')
    } else {
        Err(Reject)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct IntegerField {
    value: u32,
    digits: u8,
    max_digits: u8,
}

impl IntegerField {
    pub fn new(max_digits: u8) -> Self {
        Self {
            value: 0,
            digits: 0,
            max_digits: max_digits.min(9),
        }
    }

    pub fn push(&mut self, byte: u8) -> Result<(), Reject> {
        let d = digit(byte)?;
        if self.digits >= self.max_digits {
            return Err(Reject);
        }

        self.value = self.value * 10 + d as u32;
        self.digits += 1;
        Ok(())
    }

    pub fn finish(&self) -> Option<u32> {
        (self.digits > 0).then_some(self.value)
    }
}

/// Signed fixed-point real: `[-]int[.frac]`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RealField {
    negative: bool,
    started: bool,
    dot: bool,
    integer: u64,
    fraction: u64,
    scale: u64,
    digits: u8,
}

impl RealField {
    const MAX_DIGITS: u8 = 18;

    pub fn push(&mut self, byte: u8) -> Result<(), Reject> {
        match byte {
            b'-' if !self.started => self.negative = true,
            b'.' if !self.dot => self.dot = true,
            _ => {
                let d = digit(byte)? as u64;
                if self.digits >= Self::MAX_DIGITS {
                    return Err(Reject);
                }

                if self.dot {
                    self.fraction = self.fraction * 10 + d;
                    self.scale = self.scale.max(1) * 10;
                } else {
                    self.integer = self.integer * 10 + d;
                }
                self.digits += 1;
            }
        }

        self.started = true;
        Ok(())
    }

    /// NaN for an empty field. A lone `-` or `.` is rejected.
    pub fn finish(&self) -> Result<f32, Reject> {
        if !self.started {
            return Ok(f32::NAN);
        }
        if self.digits == 0 {
            return Err(Reject);
        }

        let mut value = self.integer as f64;
        if self.scale > 0 {
            value += self.fraction as f64 / self.scale as f64;
        }
        if self.negative {
            value = -value;
        }

        Ok(value as f32)
    }
}

/// `ddmm.mmmm` or `dddmm.mmmm`, with up to four fractional minute digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct CoordinateField {
    width: u8,
    digits: u8,
    dot: bool,
    degrees: u16,
    minutes: u32,
    fraction: u32,
    fraction_digits: u8,
}

impl CoordinateField {
    const MAX_FRACTION_DIGITS: u8 = 4;

    pub fn latitude() -> Self {
        Self::with_width(2)
    }

    pub fn longitude() -> Self {
        Self::with_width(3)
    }

    fn with_width(width: u8) -> Self {
        Self {
            width,
            digits: 0,
            dot: false,
            degrees: 0,
            minutes: 0,
            fraction: 0,
            fraction_digits: 0,
        }
    }

    pub fn push(&mut self, byte: u8) -> Result<(), Reject> {
        if byte == b'.' {
            if self.dot || self.digits != self.width + 2 {
                return Err(Reject);
            }
            self.dot = true;
            return Ok(());
        }

        let d = digit(byte)?;
        if self.dot {
            if self.fraction_digits >= Self::MAX_FRACTION_DIGITS {
                return Err(Reject);
            }
            self.fraction = self.fraction * 10 + d as u32;
            self.fraction_digits += 1;
        } else if self.digits < self.width {
            self.degrees = self.degrees * 10 + d as u16;
            self.digits += 1;
        } else if self.digits < self.width + 2 {
            self.minutes = self.minutes * 10 + d as u32;
            self.digits += 1;
        } else {
            return Err(Reject);
        }

        Ok(())
    }

    pub fn finish(&self) -> Result<Option<(u16, f32)>, Reject> {
        if self.digits == 0 && !self.dot {
            return Ok(None);
        }
        if self.digits != self.width + 2 {
            return Err(Reject);
        }

        let minutes =
            self.minutes as f64 + self.fraction as f64 / 10f64.powi(self.fraction_digits as i32);
        Ok(Some((self.degrees, minutes as f32)))
    }
}

/// `hhmmss` with up to three fractional (millisecond) digits.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TimeField {
    fields: [u8; 3],
    digits: u8,
    dot: bool,
    millisecond: u16,
    fraction_digits: u8,
}

impl TimeField {
    pub fn push(&mut self, byte: u8) -> Result<(), Reject> {
        if byte == b'.' {
            if self.dot || self.digits != 6 {
                return Err(Reject);
            }
            self.dot = true;
            return Ok(());
        }

        let d = digit(byte)?;
        if self.dot {
            if self.fraction_digits >= 3 {
                return Err(Reject);
            }
            self.millisecond = self.millisecond * 10 + d as u16;
            self.fraction_digits += 1;
        } else if self.digits < 6 {
            let slot = &mut self.fields[self.digits as usize / 2];
            *slot = *slot * 10 + d;
            self.digits += 1;
        } else {
            return Err(Reject);
        }

        Ok(())
    }

    pub fn finish(&self) -> Result<Option<TimeOfDay>, Reject> {
        if self.digits == 0 && !self.dot {
            return Ok(None);
        }
        if self.digits != 6 {
            return Err(Reject);
        }

        let mut millisecond = self.millisecond;
        for _ in self.fraction_digits..3 {
            millisecond *= 10;
        }

        let [hour, minute, second] = self.fields;
        Ok(Some(TimeOfDay {
            hour,
            minute,
            second,
            millisecond,
        }))
    }
}

/// `ddmmyy`
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DateField {
    fields: [u8; 3],
    digits: u8,
}

impl DateField {
    pub fn push(&mut self, byte: u8) -> Result<(), Reject> {
        let d = digit(byte)?;
        if self.digits >= 6 {
            return Err(Reject);
        }

        let slot = &mut self.fields[self.digits as usize / 2];
        *slot = *slot * 10 + d;
        self.digits += 1;
        Ok(())
    }

    pub fn finish(&self) -> Result<Option<CalendarDate>, Reject> {
        match self.digits {
            0 => Ok(None),
            6 => {
                let [day, month, year] = self.fields;
                Ok(Some(CalendarDate {
                    day,
                    month: month.wrapping_sub(1),
                    year,
                }))
            }
            _ => Err(Reject),
        }
    }
}

/// The decoder of the field currently being read.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Decoder {
    Integer(IntegerField),
    Real(RealField),
    Coordinate(CoordinateField),
    Letter {
        allowed: &'static [u8],
        letter: Option<u8>,
    },
    Time(TimeField),
    Date(DateField),
    Skip,
}

impl Default for Decoder {
    fn default() -> Self {
        Decoder::Skip
    }
}

impl From<Field> for Decoder {
    fn from(field: Field) -> Self {
        match field {
            Field::Integer { max_digits } => Decoder::Integer(IntegerField::new(max_digits)),
            Field::Real => Decoder::Real(RealField::default()),
            Field::Latitude => Decoder::Coordinate(CoordinateField::latitude()),
            Field::Longitude => Decoder::Coordinate(CoordinateField::longitude()),
            Field::Letter(allowed) => Decoder::Letter {
                allowed,
                letter: None,
            },
            Field::Time => Decoder::Time(TimeField::default()),
            Field::Date => Decoder::Date(DateField::default()),
            Field::Skip => Decoder::Skip,
        }
    }
}

impl Decoder {
    pub fn push(&mut self, byte: u8) -> Result<(), Reject> {
        match self {
            Decoder::Integer(field) => field.push(byte),
            Decoder::Real(field) => field.push(byte),
            Decoder::Coordinate(field) => field.push(byte),
            Decoder::Letter { allowed, letter } => {
                if letter.is_some() || !allowed.contains(&byte) {
                    return Err(Reject);
                }
                *letter = Some(byte);
                Ok(())
            }
            Decoder::Time(field) => field.push(byte),
            Decoder::Date(field) => field.push(byte),
            Decoder::Skip => {
                if (0x20..0x7F).contains(&byte) && byte != b'$' {
                    Ok(())
                } else {
                    Err(Reject)
                }
            }
        }
    }

    pub fn finish(&self) -> Result<Value, Reject> {
        Ok(match self {
            Decoder::Integer(field) => Value::Integer(field.finish()),
            Decoder::Real(field) => Value::Real(field.finish()?),
            Decoder::Coordinate(field) => Value::Coordinate(field.finish()?),
            Decoder::Letter { letter, .. } => Value::Letter(*letter),
            Decoder::Time(field) => Value::Time(field.finish()?),
            Decoder::Date(field) => Value::Date(field.finish()?),
            Decoder::Skip => Value::Skipped,
        })
    }
}

use std::fmt;

use crate::error::RecordError;

/// A temperature in tenths of a degree, as read from a `-?D[D].D` field.
///
/// Sums and extrema are kept in this scaled form so that aggregation is exact
/// and independent of input order; conversion to `f64` happens only when a
/// report is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Temperature(i16);

impl Temperature {
    pub fn from_tenths(tenths: i16) -> Self {
        Temperature(tenths)
    }

    pub fn tenths(self) -> i16 {
        self.0
    }

    pub fn to_celsius(self) -> f64 {
        f64::from(self.0) / 10.0
    }

    /// Decode a fixed-format temperature field.
    ///
    /// Accepts exactly `'-'? DIGIT DIGIT? '.' DIGIT`; anything else, including
    /// whitespace, a leading `+`, or extra fractional digits, is rejected.
    /// `-0.0` decodes to the same value as `0.0`.
    #[inline]
    pub fn parse(bytes: &[u8]) -> Result<Self, RecordError> {
        let (negative, digits) = match bytes.split_first() {
            Some((b'-', rest)) => (true, rest),
            _ => (false, bytes),
        };

        let magnitude = match *digits {
            [ones, b'.', tenth] if ones.is_ascii_digit() && tenth.is_ascii_digit() => {
                digit(ones) * 10 + digit(tenth)
            }
            [tens, ones, b'.', tenth]
                if tens.is_ascii_digit() && ones.is_ascii_digit() && tenth.is_ascii_digit() =>
            {
                digit(tens) * 100 + digit(ones) * 10 + digit(tenth)
            }
            _ => return Err(RecordError::InvalidTemperature),
        };

        Ok(Temperature(if negative { -magnitude } else { magnitude }))
    }
}

#[inline(always)]
fn digit(byte: u8) -> i16 {
    i16::from(byte - b'0')
}

impl fmt::Display for Temperature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{}.{}", sign, abs / 10, abs % 10)
    }
}

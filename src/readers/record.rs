use memchr::memchr;

use crate::error::RecordError;
use crate::utils::constants::RECORD_DELIMITER;

/// Split a framed line at its first `;` into station and temperature bytes.
///
/// The station is returned verbatim, without trimming.
#[inline]
pub fn split_record(line: &[u8]) -> Result<(&[u8], &[u8]), RecordError> {
    match memchr(RECORD_DELIMITER, line) {
        Some(pos) => Ok((&line[..pos], &line[pos + 1..])),
        None => Err(RecordError::MissingDelimiter),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_at_delimiter() {
        let (station, temperature) = split_record(b"Hamburg;12.0").unwrap();
        assert_eq!(station, b"Hamburg");
        assert_eq!(temperature, b"12.0");
    }

    #[test]
    fn test_split_uses_first_delimiter() {
        let (station, temperature) = split_record(b"A;B;1.0").unwrap();
        assert_eq!(station, b"A");
        assert_eq!(temperature, b"B;1.0");
    }

    #[test]
    fn test_station_is_not_trimmed() {
        let (station, _) = split_record(b" St. John's ;1.0").unwrap();
        assert_eq!(station, b" St. John's ");
    }

    #[test]
    fn test_missing_delimiter() {
        assert_eq!(split_record(b"Hamburg 12.0"), Err(RecordError::MissingDelimiter));
    }

    #[test]
    fn test_empty_station_is_allowed() {
        let (station, temperature) = split_record(b";1.0").unwrap();
        assert!(station.is_empty());
        assert_eq!(temperature, b"1.0");
    }
}

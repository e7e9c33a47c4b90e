//! NMEA 0183 sentence decoding.
//!
//! Only the fields the clock needs are decoded: RMC gives validity, UTC
//! time and date; GGA gives fix quality and satellite count. The other
//! sentence kinds a receiver emits by default are recognized and ignored.
//!
//! Sentence format:
//! ```text
//! $TTKKK,field,field,...*CS
//! ```
//! where `TT` is the talker, `KKK` the sentence kind and `CS` the optional
//! XOR checksum of everything between `$` and `*`.

/// Errors that can occur while decoding a sentence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NmeaError {
    /// Line is not ASCII text
    NotAscii,
    /// Line does not start with `$`
    MissingStart,
    /// Address field is not talker + 3-letter kind
    InvalidAddress,
    /// Checksum digits after `*` are not two hex digits
    InvalidChecksum,
    /// Checksum does not match the sentence body
    ChecksumMismatch,
    /// Sentence kind is not one the decoder recognizes
    UnknownSentence,
    /// A required field is missing
    MissingField,
    /// A field has an invalid value
    InvalidField,
}

/// Sentence kinds recognized by the decoder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SentenceKind {
    /// Recommended minimum data
    Rmc,
    /// Fix information
    Gga,
    /// Active satellites and DOP
    Gsa,
    /// Geographic position
    Gll,
    /// Pseudorange error statistics
    Gst,
    /// Satellites in view
    Gsv,
}

impl SentenceKind {
    fn from_code(code: &str) -> Option<Self> {
        match code {
            "RMC" => Some(SentenceKind::Rmc),
            "GGA" => Some(SentenceKind::Gga),
            "GSA" => Some(SentenceKind::Gsa),
            "GLL" => Some(SentenceKind::Gll),
            "GST" => Some(SentenceKind::Gst),
            "GSV" => Some(SentenceKind::Gsv),
            _ => None,
        }
    }
}

/// UTC time of day from a sentence (fractional seconds dropped)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NmeaTime {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

/// UTC date from a sentence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NmeaDate {
    pub day: u8,
    pub month: u8,
    /// Full year; two-digit years are taken as 20yy
    pub year: u16,
}

/// Decoded RMC sentence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rmc {
    /// Status field was `A` (active)
    pub valid: bool,
    pub time: Option<NmeaTime>,
    pub date: Option<NmeaDate>,
}

/// Decoded GGA sentence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GgaStatus {
    /// Fix quality (0 = no fix)
    pub quality: u8,
    /// Satellites used in the solution
    pub satellites: u8,
    pub time: Option<NmeaTime>,
}

/// One decoded sentence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Sentence {
    Rmc(Rmc),
    Gga(GgaStatus),
    /// Recognized but carries nothing the clock uses
    Other(SentenceKind),
}

impl Sentence {
    /// Kind of the decoded sentence
    pub fn kind(&self) -> SentenceKind {
        match self {
            Sentence::Rmc(_) => SentenceKind::Rmc,
            Sentence::Gga(_) => SentenceKind::Gga,
            Sentence::Other(kind) => *kind,
        }
    }
}

/// Turns one complete line into a sentence
pub trait SentenceDecoder {
    /// Decode a line (terminator already stripped)
    fn decode(&mut self, line: &[u8]) -> Result<Sentence, NmeaError>;
}

/// Field-level NMEA 0183 decoder
#[derive(Debug, Clone, Copy, Default)]
pub struct NmeaDecoder {
    /// Reject sentences that carry no `*hh` checksum
    pub require_checksum: bool,
}

impl NmeaDecoder {
    /// Decoder that accepts sentences with or without a checksum
    pub const fn new() -> Self {
        Self {
            require_checksum: false,
        }
    }
}

impl SentenceDecoder for NmeaDecoder {
    fn decode(&mut self, line: &[u8]) -> Result<Sentence, NmeaError> {
        let text = core::str::from_utf8(line).map_err(|_| NmeaError::NotAscii)?;
        if !text.is_ascii() {
            return Err(NmeaError::NotAscii);
        }

        let text = text.trim();
        let body = text.strip_prefix('$').ok_or(NmeaError::MissingStart)?;
        let body = split_checksum(body, self.require_checksum)?;

        let mut fields = body.split(',');
        let address = fields.next().ok_or(NmeaError::InvalidAddress)?;
        if address.len() != 5 || !address.bytes().all(|b| b.is_ascii_uppercase()) {
            return Err(NmeaError::InvalidAddress);
        }
        let kind = SentenceKind::from_code(&address[2..]).ok_or(NmeaError::UnknownSentence)?;

        match kind {
            SentenceKind::Rmc => decode_rmc(fields).map(Sentence::Rmc),
            SentenceKind::Gga => decode_gga(fields).map(Sentence::Gga),
            other => Ok(Sentence::Other(other)),
        }
    }
}

/// Verify and strip the `*hh` suffix
fn split_checksum(body: &str, required: bool) -> Result<&str, NmeaError> {
    let Some((data, digits)) = body.split_once('*') else {
        return if required {
            Err(NmeaError::InvalidChecksum)
        } else {
            Ok(body)
        };
    };

    if digits.len() != 2 {
        return Err(NmeaError::InvalidChecksum);
    }
    let expected = u8::from_str_radix(digits, 16).map_err(|_| NmeaError::InvalidChecksum)?;
    let actual = data.bytes().fold(0u8, |acc, b| acc ^ b);
    if actual != expected {
        return Err(NmeaError::ChecksumMismatch);
    }
    Ok(data)
}

fn decode_rmc<'a>(mut fields: impl Iterator<Item = &'a str>) -> Result<Rmc, NmeaError> {
    let time = parse_time(fields.next().ok_or(NmeaError::MissingField)?)?;
    let valid = match fields.next().ok_or(NmeaError::MissingField)? {
        "A" => true,
        "V" | "" => false,
        _ => return Err(NmeaError::InvalidField),
    };
    // latitude, N/S, longitude, E/W, speed, course
    let mut fields = fields.skip(6);
    let date = parse_date(fields.next().ok_or(NmeaError::MissingField)?)?;

    Ok(Rmc { valid, time, date })
}

fn decode_gga<'a>(mut fields: impl Iterator<Item = &'a str>) -> Result<GgaStatus, NmeaError> {
    let time = parse_time(fields.next().ok_or(NmeaError::MissingField)?)?;
    // latitude, N/S, longitude, E/W
    let mut fields = fields.skip(4);
    let quality = parse_small(fields.next().ok_or(NmeaError::MissingField)?)?;
    let satellites = parse_small(fields.next().ok_or(NmeaError::MissingField)?)?;

    Ok(GgaStatus {
        quality,
        satellites,
        time,
    })
}

/// Parse two ASCII digits
fn two_digits(bytes: &[u8]) -> Option<u8> {
    match bytes {
        [a @ b'0'..=b'9', b @ b'0'..=b'9'] => Some((a - b'0') * 10 + (b - b'0')),
        _ => None,
    }
}

/// Parse `hhmmss[.sss]`; empty field is `None`
fn parse_time(field: &str) -> Result<Option<NmeaTime>, NmeaError> {
    if field.is_empty() {
        return Ok(None);
    }
    let bytes = field.as_bytes();
    if bytes.len() < 6 {
        return Err(NmeaError::InvalidField);
    }
    let fraction = &bytes[6..];
    if !fraction.is_empty()
        && (fraction[0] != b'.' || !fraction[1..].iter().all(u8::is_ascii_digit))
    {
        return Err(NmeaError::InvalidField);
    }

    let hour = two_digits(&bytes[0..2]).ok_or(NmeaError::InvalidField)?;
    let minute = two_digits(&bytes[2..4]).ok_or(NmeaError::InvalidField)?;
    let second = two_digits(&bytes[4..6]).ok_or(NmeaError::InvalidField)?;

    // 60 is a leap second
    if hour > 23 || minute > 59 || second > 60 {
        return Err(NmeaError::InvalidField);
    }

    Ok(Some(NmeaTime {
        hour,
        minute,
        second,
    }))
}

/// Parse `ddmmyy`; empty field is `None`
fn parse_date(field: &str) -> Result<Option<NmeaDate>, NmeaError> {
    if field.is_empty() {
        return Ok(None);
    }
    let bytes = field.as_bytes();
    if bytes.len() != 6 {
        return Err(NmeaError::InvalidField);
    }

    let day = two_digits(&bytes[0..2]).ok_or(NmeaError::InvalidField)?;
    let month = two_digits(&bytes[2..4]).ok_or(NmeaError::InvalidField)?;
    let yy = two_digits(&bytes[4..6]).ok_or(NmeaError::InvalidField)?;

    if !(1..=31).contains(&day) || !(1..=12).contains(&month) {
        return Err(NmeaError::InvalidField);
    }

    Ok(Some(NmeaDate {
        day,
        month,
        year: 2000 + u16::from(yy),
    }))
}

/// Parse a small unsigned field; empty is 0
fn parse_small(field: &str) -> Result<u8, NmeaError> {
    if field.is_empty() {
        return Ok(0);
    }
    field.parse().map_err(|_| NmeaError::InvalidField)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RMC_VALID: &[u8] =
        b"$GPRMC,123519,A,4807.038,N,01131.000,E,022.4,084.4,161026,003.1,W*67";
    const RMC_VOID: &[u8] = b"$GNRMC,235959.00,V,,,,,,,161026,,,N*60";
    const GGA: &[u8] = b"$GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,*47";
    const GSV: &[u8] =
        b"$GPGSV,2,1,08,01,40,083,46,02,17,308,41,12,07,344,39,14,22,228,45*75";

    fn decode(line: &[u8]) -> Result<Sentence, NmeaError> {
        NmeaDecoder::new().decode(line)
    }

    #[test]
    fn test_decode_valid_rmc() {
        let Sentence::Rmc(rmc) = decode(RMC_VALID).unwrap() else {
            panic!("expected RMC");
        };
        assert!(rmc.valid);
        assert_eq!(
            rmc.time,
            Some(NmeaTime {
                hour: 12,
                minute: 35,
                second: 19
            })
        );
        assert_eq!(
            rmc.date,
            Some(NmeaDate {
                day: 16,
                month: 10,
                year: 2026
            })
        );
    }

    #[test]
    fn test_decode_void_rmc_with_fraction() {
        let Sentence::Rmc(rmc) = decode(RMC_VOID).unwrap() else {
            panic!("expected RMC");
        };
        assert!(!rmc.valid);
        assert_eq!(rmc.time.map(|t| t.second), Some(59));
    }

    #[test]
    fn test_decode_gga() {
        let Sentence::Gga(gga) = decode(GGA).unwrap() else {
            panic!("expected GGA");
        };
        assert_eq!(gga.quality, 1);
        assert_eq!(gga.satellites, 8);
    }

    #[test]
    fn test_other_kinds_ignored() {
        assert_eq!(decode(GSV), Ok(Sentence::Other(SentenceKind::Gsv)));
        assert_eq!(
            decode(b"$GPGSA,A,3,04,05,,09,12,,,24,,,,,2.5,1.3,2.1*39")
                .map(|s| s.kind()),
            Ok(SentenceKind::Gsa)
        );
    }

    #[test]
    fn test_unknown_kind() {
        assert_eq!(
            decode(b"$GPZDA,201530.00,04,07,2002,00,00*60"),
            Err(NmeaError::UnknownSentence)
        );
    }

    #[test]
    fn test_checksum_mismatch() {
        let mut line = [0u8; 80];
        line[..RMC_VALID.len()].copy_from_slice(RMC_VALID);
        // flip status A -> V without fixing the checksum
        line[14] = b'V';
        assert_eq!(
            decode(&line[..RMC_VALID.len()]),
            Err(NmeaError::ChecksumMismatch)
        );
    }

    #[test]
    fn test_checksum_optional_unless_required() {
        let line = b"$GPRMC,000001,A,,,,,,,010124,,";
        assert!(decode(line).is_ok());

        let mut strict = NmeaDecoder {
            require_checksum: true,
        };
        assert_eq!(strict.decode(line), Err(NmeaError::InvalidChecksum));
    }

    #[test]
    fn test_malformed_lines() {
        assert_eq!(decode(b"GPRMC,1"), Err(NmeaError::MissingStart));
        assert_eq!(decode(b""), Err(NmeaError::MissingStart));
        assert_eq!(decode(b"$GP,1"), Err(NmeaError::InvalidAddress));
        assert_eq!(decode(b"$GPRMC,1*zz"), Err(NmeaError::InvalidChecksum));
        assert_eq!(decode(&[b'$', 0xFF, 0xFE]), Err(NmeaError::NotAscii));
        assert_eq!(decode(b"$GPRMC,123519,A"), Err(NmeaError::MissingField));
        assert_eq!(
            decode(b"$GPRMC,126019,A,,,,,,,010124,,"),
            Err(NmeaError::InvalidField)
        );
        assert_eq!(
            decode(b"$GPRMC,123519,X,,,,,,,010124,,"),
            Err(NmeaError::InvalidField)
        );
        assert_eq!(
            decode(b"$GPRMC,123519,A,,,,,,,011324,,"),
            Err(NmeaError::InvalidField)
        );
    }

    #[test]
    fn test_empty_time_and_date() {
        let Sentence::Rmc(rmc) = decode(b"$GPRMC,,V,,,,,,,,,").unwrap() else {
            panic!("expected RMC");
        };
        assert!(!rmc.valid);
        assert_eq!(rmc.time, None);
        assert_eq!(rmc.date, None);
    }
}

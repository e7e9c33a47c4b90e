//! Line accumulation for the GPS byte stream.
//!
//! Bytes arrive one at a time from the UART. The buffer appends them and
//! remembers where the most recently completed line starts and ends, so the
//! dispatcher can decode it at its own cadence.

/// Byte that terminates a sentence
pub const LINE_TERMINATOR: u8 = b'\n';

/// Default capacity for GPS sentences
///
/// NMEA caps a sentence at 82 characters; the extra room covers the bytes
/// that arrive between two dispatcher polls.
pub const GPS_LINE_CAPACITY: usize = 256;

/// Errors from line accumulation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LineError {
    /// Byte rejected because the buffer was full; the buffer was reset
    Overflow,
}

/// Bounded append-only byte accumulator
#[derive(Debug, Clone)]
pub struct LineBuffer<const N: usize> {
    buf: [u8; N],
    len: usize,
    /// Start of the line currently being received
    line_start: usize,
    /// Bounds of the last completed line, terminator excluded
    complete: Option<(usize, usize)>,
}

impl<const N: usize> Default for LineBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> LineBuffer<N> {
    /// Create an empty buffer
    pub const fn new() -> Self {
        Self {
            buf: [0; N],
            len: 0,
            line_start: 0,
            complete: None,
        }
    }

    /// Append one byte
    ///
    /// When the buffer is already full the byte is rejected, all content
    /// (including any completed line) is discarded and `Overflow` returned.
    pub fn push(&mut self, byte: u8) -> Result<(), LineError> {
        if self.len >= N {
            self.reset();
            return Err(LineError::Overflow);
        }

        self.buf[self.len] = byte;
        self.len += 1;

        if byte == LINE_TERMINATOR {
            let mut end = self.len - 1;
            if end > self.line_start && self.buf[end - 1] == b'\r' {
                end -= 1;
            }
            self.complete = Some((self.line_start, end));
            self.line_start = self.len;
        }

        Ok(())
    }

    /// True once a terminator has been seen since the last reset
    pub fn line_available(&self) -> bool {
        self.complete.is_some()
    }

    /// Most recently completed line, without terminator or trailing CR
    pub fn line(&self) -> Option<&[u8]> {
        self.complete.map(|(start, end)| &self.buf[start..end])
    }

    /// Clear content and the line-available flag
    pub fn reset(&mut self) {
        self.len = 0;
        self.line_start = 0;
        self.complete = None;
    }

    /// All accumulated bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    /// Number of accumulated bytes
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if nothing has been accumulated
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Maximum number of bytes held
    pub const fn capacity(&self) -> usize {
        N
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed<const N: usize>(buf: &mut LineBuffer<N>, bytes: &[u8]) {
        for &b in bytes {
            buf.push(b).unwrap();
        }
    }

    #[test]
    fn test_no_terminator_no_line() {
        let mut buf: LineBuffer<64> = LineBuffer::new();
        feed(&mut buf, b"$GPRMC,123519,A");
        assert!(!buf.line_available());
        assert_eq!(buf.line(), None);
        assert_eq!(buf.len(), 15);
    }

    #[test]
    fn test_line_then_reset() {
        let mut buf: LineBuffer<64> = LineBuffer::new();
        feed(&mut buf, b"$GPGGA,1\r\n");
        assert!(buf.line_available());
        assert_eq!(buf.line(), Some(&b"$GPGGA,1"[..]));

        buf.reset();
        assert!(!buf.line_available());
        assert!(buf.is_empty());
        assert_eq!(buf.as_bytes(), b"");
    }

    #[test]
    fn test_most_recent_line_wins() {
        let mut buf: LineBuffer<64> = LineBuffer::new();
        feed(&mut buf, b"$GPGSV,1\r\n$GPRMC,2\r\n$GPG");
        assert_eq!(buf.line(), Some(&b"$GPRMC,2"[..]));
    }

    #[test]
    fn test_bare_lf_line() {
        let mut buf: LineBuffer<16> = LineBuffer::new();
        feed(&mut buf, b"abc\n");
        assert_eq!(buf.line(), Some(&b"abc"[..]));
    }

    #[test]
    fn test_empty_line() {
        let mut buf: LineBuffer<16> = LineBuffer::new();
        feed(&mut buf, b"\r\n");
        assert!(buf.line_available());
        assert_eq!(buf.line(), Some(&b""[..]));
    }

    #[test]
    fn test_overflow_rejects_and_resets() {
        let mut buf: LineBuffer<8> = LineBuffer::new();
        feed(&mut buf, b"ab\ncdefg");
        assert_eq!(buf.len(), 8);
        assert!(buf.line_available());

        assert_eq!(buf.push(b'h'), Err(LineError::Overflow));
        assert!(buf.is_empty());
        assert!(!buf.line_available());

        // Usable again after the forced reset
        feed(&mut buf, b"xy\n");
        assert_eq!(buf.line(), Some(&b"xy"[..]));
    }

    #[test]
    fn test_terminator_fills_last_slot() {
        let mut buf: LineBuffer<4> = LineBuffer::new();
        feed(&mut buf, b"abc\n");
        assert_eq!(buf.line(), Some(&b"abc"[..]));
        assert_eq!(buf.capacity(), 4);
    }
}

//! Periodic sentence dispatch
//!
//! The dispatcher owns the line buffer. The receive path hands it bytes
//! through [`SentenceDispatcher::feed_line`]; the periodic task calls
//! [`SentenceDispatcher::poll`], which decodes the most recently completed
//! line and resets the buffer. Both calls take `&mut self`, so when the
//! receive side runs in another task the bytes must reach the dispatcher
//! through a queue (the firmware uses an SPSC pipe).
//!
//! `feed_line` stops after the first terminator, leaving the rest queued
//! for later cycles, so one line is decoded per cycle and none is shadowed
//! by a later one. [`SentenceDispatcher::push_bytes`] feeds everything, and
//! then only the newest complete line survives to the next poll.

use tubeclock_protocol::{
    GgaStatus, LineBuffer, NmeaError, Sentence, SentenceDecoder, SentenceKind,
    GPS_LINE_CAPACITY,
};

use super::fix::FixRecord;

/// Result of one dispatcher cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DispatchOutcome {
    /// No complete line; nothing changed
    Idle,
    /// RMC decoded; the fix record was overwritten
    Fix(FixRecord),
    /// GGA decoded; the receiver status was overwritten
    Status(GgaStatus),
    /// Sentence recognized but not used
    Ignored(SentenceKind),
    /// Line could not be decoded; previous records retained
    Failed(NmeaError),
}

/// Line buffer plus decoder plus the latest published records
pub struct SentenceDispatcher<D, const N: usize = GPS_LINE_CAPACITY> {
    buffer: LineBuffer<N>,
    decoder: D,
    fix: FixRecord,
    status: Option<GgaStatus>,
}

impl<D: SentenceDecoder, const N: usize> SentenceDispatcher<D, N> {
    /// Create a dispatcher with an empty buffer and no fix
    pub fn new(decoder: D) -> Self {
        Self {
            buffer: LineBuffer::new(),
            decoder,
            fix: FixRecord::none(),
            status: None,
        }
    }

    /// Feed bytes up to and including the first line terminator
    ///
    /// Returns the number of bytes consumed and how many of them overflowed
    /// the buffer. Nothing is consumed while a completed line is waiting
    /// for [`poll`](Self::poll).
    pub fn feed_line(&mut self, bytes: &[u8]) -> (usize, u32) {
        let mut overflows = 0;
        for (consumed, &byte) in bytes.iter().enumerate() {
            if self.buffer.line_available() {
                return (consumed, overflows);
            }
            if self.buffer.push(byte).is_err() {
                overflows += 1;
            }
        }
        (bytes.len(), overflows)
    }

    /// Feed a run of bytes, returning how many overflows occurred
    pub fn push_bytes(&mut self, bytes: &[u8]) -> u32 {
        bytes
            .iter()
            .filter(|&&b| self.buffer.push(b).is_err())
            .count() as u32
    }

    /// True when a completed line is waiting for the next cycle
    pub fn line_available(&self) -> bool {
        self.buffer.line_available()
    }

    /// Run one dispatch cycle
    pub fn poll(&mut self) -> DispatchOutcome {
        let Some(line) = self.buffer.line() else {
            return DispatchOutcome::Idle;
        };

        let outcome = match self.decoder.decode(line) {
            Ok(Sentence::Rmc(rmc)) => {
                self.fix = FixRecord::from(rmc);
                DispatchOutcome::Fix(self.fix)
            }
            Ok(Sentence::Gga(gga)) => {
                self.status = Some(gga);
                DispatchOutcome::Status(gga)
            }
            Ok(Sentence::Other(kind)) => DispatchOutcome::Ignored(kind),
            Err(e) => DispatchOutcome::Failed(e),
        };

        self.buffer.reset();
        outcome
    }

    /// Latest fix record
    pub fn latest_fix(&self) -> FixRecord {
        self.fix
    }

    /// Latest receiver status, if any GGA has been seen
    pub fn latest_status(&self) -> Option<GgaStatus> {
        self.status
    }

    /// Bytes waiting in the line buffer
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tubeclock_protocol::NmeaDecoder;

    const RMC: &[u8] =
        b"$GPRMC,123519,A,4807.038,N,01131.000,E,022.4,084.4,161026,003.1,W*67\r\n";
    const GGA: &[u8] = b"$GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,*47\r\n";
    const GSV: &[u8] =
        b"$GPGSV,2,1,08,01,40,083,46,02,17,308,41,12,07,344,39,14,22,228,45*75\r\n";

    fn dispatcher() -> SentenceDispatcher<NmeaDecoder> {
        SentenceDispatcher::new(NmeaDecoder::new())
    }

    #[test]
    fn test_idle_without_line() {
        let mut d = dispatcher();
        assert_eq!(d.push_bytes(b"$GPRMC,1235"), 0);
        assert_eq!(d.poll(), DispatchOutcome::Idle);
        assert_eq!(d.pending(), 11);
        assert_eq!(d.latest_fix(), FixRecord::none());
    }

    #[test]
    fn test_rmc_publishes_fix() {
        let mut d = dispatcher();
        d.push_bytes(RMC);

        let DispatchOutcome::Fix(fix) = d.poll() else {
            panic!("expected fix");
        };
        assert!(fix.valid);
        assert_eq!(fix.time.map(|t| t.minute), Some(35));
        assert_eq!(d.latest_fix(), fix);
        assert_eq!(d.pending(), 0);
    }

    #[test]
    fn test_gga_publishes_status() {
        let mut d = dispatcher();
        d.push_bytes(GGA);
        assert!(matches!(d.poll(), DispatchOutcome::Status(_)));
        assert_eq!(d.latest_status().map(|s| s.satellites), Some(8));
        assert_eq!(d.latest_fix(), FixRecord::none());
    }

    #[test]
    fn test_only_latest_line_decoded() {
        let mut d = dispatcher();
        d.push_bytes(RMC);
        d.push_bytes(GSV);
        assert_eq!(d.poll(), DispatchOutcome::Ignored(SentenceKind::Gsv));
        // RMC was shadowed by the later line
        assert_eq!(d.latest_fix(), FixRecord::none());
    }

    #[test]
    fn test_feed_line_one_line_per_cycle() {
        let mut d = dispatcher();
        let mut burst = Vec::new();
        burst.extend_from_slice(RMC);
        burst.extend_from_slice(GSV);
        burst.extend_from_slice(b"$GPGG");

        let (consumed, overflows) = d.feed_line(&burst);
        assert_eq!((consumed, overflows), (RMC.len(), 0));
        assert!(d.line_available());
        assert_eq!(d.feed_line(&burst[consumed..]), (0, 0));
        assert!(matches!(d.poll(), DispatchOutcome::Fix(_)));

        let rest = &burst[consumed..];
        let (consumed, _) = d.feed_line(rest);
        assert_eq!(consumed, GSV.len());
        assert_eq!(d.poll(), DispatchOutcome::Ignored(SentenceKind::Gsv));
        assert!(d.latest_fix().valid);

        assert_eq!(d.feed_line(&rest[consumed..]), (5, 0));
        assert!(!d.line_available());
        assert_eq!(d.poll(), DispatchOutcome::Idle);
    }

    #[test]
    fn test_failure_retains_previous_fix() {
        let mut d = dispatcher();
        d.push_bytes(RMC);
        d.poll();
        let before = d.latest_fix();

        d.push_bytes(b"$GPRMC,garbage\r\n");
        assert!(matches!(d.poll(), DispatchOutcome::Failed(_)));
        assert_eq!(d.latest_fix(), before);
        assert_eq!(d.poll(), DispatchOutcome::Idle);
    }

    #[test]
    fn test_overflow_counted_and_recovers() {
        let mut d: SentenceDispatcher<NmeaDecoder, 16> = SentenceDispatcher::new(NmeaDecoder::new());
        let overflows = d.push_bytes(b"0123456789abcdefXYZ");
        assert_eq!(overflows, 1);
        // "YZ" landed after the reset
        assert_eq!(d.pending(), 2);
        assert_eq!(d.poll(), DispatchOutcome::Idle);
    }
}

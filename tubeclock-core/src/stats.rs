//! Recovered-fault bookkeeping
//!
//! Nothing in the clock is fatal. Every fault is logged by the task that
//! sees it and counted here so a long-running unit can be inspected.

/// Category of a recovered fault
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FaultKind {
    /// Tube index outside the addressing table
    Range,
    /// SPI transmission failed or timed out
    Transport,
    /// GPS line buffer overflowed
    BufferOverflow,
    /// GPS line could not be decoded
    Decode,
    /// Valid fix rejected by the calibrator
    CalibrationRejected,
    /// Animation state could not be framed
    Encode,
}

/// Saturating fault counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FaultCounters {
    pub range_errors: u32,
    pub transport_errors: u32,
    pub buffer_overflows: u32,
    pub decode_errors: u32,
    pub calibration_rejections: u32,
    pub encode_errors: u32,
}

impl FaultCounters {
    pub const fn new() -> Self {
        Self {
            range_errors: 0,
            transport_errors: 0,
            buffer_overflows: 0,
            decode_errors: 0,
            calibration_rejections: 0,
            encode_errors: 0,
        }
    }

    /// Count one fault
    pub fn record(&mut self, kind: FaultKind) {
        self.record_n(kind, 1);
    }

    /// Count `n` faults of one kind
    pub fn record_n(&mut self, kind: FaultKind, n: u32) {
        let counter = match kind {
            FaultKind::Range => &mut self.range_errors,
            FaultKind::Transport => &mut self.transport_errors,
            FaultKind::BufferOverflow => &mut self.buffer_overflows,
            FaultKind::Decode => &mut self.decode_errors,
            FaultKind::CalibrationRejected => &mut self.calibration_rejections,
            FaultKind::Encode => &mut self.encode_errors,
        };
        *counter = counter.saturating_add(n);
    }

    /// Add another set of counters into this one
    pub fn merge(&mut self, other: &FaultCounters) {
        self.record_n(FaultKind::Range, other.range_errors);
        self.record_n(FaultKind::Transport, other.transport_errors);
        self.record_n(FaultKind::BufferOverflow, other.buffer_overflows);
        self.record_n(FaultKind::Decode, other.decode_errors);
        self.record_n(FaultKind::CalibrationRejected, other.calibration_rejections);
        self.record_n(FaultKind::Encode, other.encode_errors);
    }

    /// Sum of all counters (saturating)
    pub fn total(&self) -> u32 {
        [
            self.range_errors,
            self.transport_errors,
            self.buffer_overflows,
            self.decode_errors,
            self.calibration_rejections,
            self.encode_errors,
        ]
        .iter()
        .fold(0u32, |acc, &n| acc.saturating_add(n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_by_kind() {
        let mut faults = FaultCounters::new();
        faults.record(FaultKind::Range);
        faults.record(FaultKind::Transport);
        faults.record(FaultKind::Transport);
        faults.record_n(FaultKind::Decode, 3);

        assert_eq!(faults.range_errors, 1);
        assert_eq!(faults.transport_errors, 2);
        assert_eq!(faults.decode_errors, 3);
        assert_eq!(faults.buffer_overflows, 0);
        assert_eq!(faults.total(), 6);
    }

    #[test]
    fn test_merge() {
        let mut total = FaultCounters::new();
        let mut cycle = FaultCounters::new();
        cycle.record_n(FaultKind::Transport, 2);
        cycle.record(FaultKind::Encode);

        total.merge(&cycle);
        total.merge(&cycle);
        assert_eq!(total.transport_errors, 4);
        assert_eq!(total.encode_errors, 2);
        assert_eq!(total.total(), 6);
    }

    #[test]
    fn test_saturates() {
        let mut faults = FaultCounters {
            buffer_overflows: u32::MAX - 1,
            ..FaultCounters::default()
        };
        faults.record_n(FaultKind::BufferOverflow, 5);
        assert_eq!(faults.buffer_overflows, u32::MAX);
        faults.record(FaultKind::Encode);
        assert_eq!(faults.total(), u32::MAX);
    }
}

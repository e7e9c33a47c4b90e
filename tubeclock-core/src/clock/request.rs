//! Target digits published by the time synchronizer

use crate::tube::{TubeIndex, TUBE_COUNT};

/// One target digit per tube
///
/// Tubes are numbered right to left: seconds on 1/0, minutes on 3/2,
/// hours on 5/4 (tens on the higher index).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DigitRequest {
    digits: [u8; TUBE_COUNT],
}

impl DigitRequest {
    /// Split hour, minute and second into two-digit groups
    pub const fn from_hms(hour: u8, minute: u8, second: u8) -> Self {
        Self {
            digits: [
                second % 10,
                second / 10 % 10,
                minute % 10,
                minute / 10 % 10,
                hour % 10,
                hour / 10 % 10,
            ],
        }
    }

    /// Build from raw per-tube digits, indexed by tube
    pub const fn from_digits(digits: [u8; TUBE_COUNT]) -> Self {
        Self { digits }
    }

    /// Target digit for one tube
    pub fn digit(&self, tube: TubeIndex) -> u8 {
        self.digits[tube.get()]
    }

    /// All target digits, indexed by tube
    pub fn digits(&self) -> &[u8; TUBE_COUNT] {
        &self.digits
    }
}

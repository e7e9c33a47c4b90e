//! Time calibration against a GPS fix

use crate::gps::FixRecord;

/// Reasons a fix is not used for calibration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CalibrationError {
    /// Fix carries no time of day
    MissingTime,
    /// Fix carries no date
    MissingDate,
    /// Year is before the receiver's epoch rollover window
    YearOutOfRange(u16),
    /// Date/time does not exist on the calendar
    InvalidDate,
    /// Resulting time is outside the representable range
    OutOfRange,
}

/// Aligns the clock with a fix
///
/// Implementations may also discipline a hardware RTC. Returning an error
/// leaves the clock's time untouched for this tick.
pub trait Calibrator {
    /// Return the Unix time the clock should adopt for this fix
    fn calibrate(&mut self, fix: &FixRecord) -> Result<i64, CalibrationError>;
}

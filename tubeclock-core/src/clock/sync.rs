//! Tick-driven time synchronization

use crate::gps::FixRecord;
use crate::traits::{CalibrationError, Calibrator};

use super::request::DigitRequest;
use super::state::{twelve_hour, Calendar, TimeError, TimeState};

/// Earliest year a fix is trusted for
///
/// Receivers that lost their almanac report dates from the previous GPS
/// week rollover.
pub const MIN_FIX_YEAR: u16 = 2000;

/// Calibrator that trusts any complete, plausible fix
#[derive(Debug, Clone, Copy)]
pub struct FixCalibrator {
    pub min_year: u16,
}

impl Default for FixCalibrator {
    fn default() -> Self {
        Self {
            min_year: MIN_FIX_YEAR,
        }
    }
}

impl Calibrator for FixCalibrator {
    fn calibrate(&mut self, fix: &FixRecord) -> Result<i64, CalibrationError> {
        if fix.time.is_none() {
            return Err(CalibrationError::MissingTime);
        }
        let date = fix.date.ok_or(CalibrationError::MissingDate)?;
        if date.year < self.min_year {
            return Err(CalibrationError::YearOutOfRange(date.year));
        }
        fix.unix_time().ok_or(CalibrationError::InvalidDate)
    }
}

/// What happened to calibration on a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Calibration {
    /// Fix not valid; nothing attempted
    Skipped,
    /// Clock aligned to this Unix time before the tick's increment
    Aligned(i64),
    /// Fix valid but not usable; time left unmodified
    Rejected(CalibrationError),
}

/// Everything one tick produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickReport {
    pub fix_valid: bool,
    pub calibration: Calibration,
    /// Seconds since the Unix epoch after the tick
    pub current_time: i64,
    pub calendar: Calendar,
    /// Hour after the 12-hour reduction
    pub display_hour: u8,
    /// Digits for the animation engine
    pub request: DigitRequest,
}

impl TickReport {
    /// Level for the active-low fix indicator (low while the fix is valid)
    pub fn indicator_high(&self) -> bool {
        !self.fix_valid
    }
}

/// Reacts to the once-per-second tick
pub struct TimeSynchronizer<C> {
    calibrator: C,
    state: TimeState,
}

impl<C: Calibrator> TimeSynchronizer<C> {
    pub fn new(calibrator: C, state: TimeState) -> Self {
        Self { calibrator, state }
    }

    /// Handle one tick edge
    ///
    /// Calibrates against `fix` when it is valid, then advances the clock
    /// by exactly one second whatever the calibration outcome. The only
    /// error is the clock running off the calendar, in which case the
    /// state is left as it was.
    pub fn on_tick(&mut self, fix: &FixRecord) -> Result<TickReport, TimeError> {
        let calibration = if fix.valid {
            let aligned = self.calibrator.calibrate(fix).and_then(|t| {
                self.state
                    .set(t)
                    .map(|()| t)
                    .map_err(|_| CalibrationError::OutOfRange)
            });
            match aligned {
                Ok(t) => Calibration::Aligned(t),
                Err(e) => Calibration::Rejected(e),
            }
        } else {
            Calibration::Skipped
        };

        self.state.advance(1)?;

        let calendar = self.state.calendar();
        let display_hour = twelve_hour(calendar.hour);

        Ok(TickReport {
            fix_valid: fix.valid,
            calibration,
            current_time: self.state.current_time(),
            calendar,
            display_hour,
            request: DigitRequest::from_hms(display_hour, calendar.minute, calendar.second),
        })
    }

    /// Current time state
    pub fn state(&self) -> &TimeState {
        &self.state
    }
}

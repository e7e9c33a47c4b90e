//! Second counter and derived calendar fields

use time::OffsetDateTime;

/// Errors from time arithmetic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimeError {
    /// Time cannot be represented as a calendar date
    OutOfRange,
}

/// Calendar decomposition of a time value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Calendar {
    pub year: i32,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl Calendar {
    /// 1970-01-01 00:00:00
    pub const EPOCH: Self = Self {
        year: 1970,
        month: 1,
        day: 1,
        hour: 0,
        minute: 0,
        second: 0,
    };

    /// Decompose `unix_time` shifted by `offset_s` seconds
    pub fn from_unix(unix_time: i64, offset_s: i32) -> Result<Self, TimeError> {
        let local = unix_time
            .checked_add(i64::from(offset_s))
            .ok_or(TimeError::OutOfRange)?;
        let dt = OffsetDateTime::from_unix_timestamp(local).map_err(|_| TimeError::OutOfRange)?;

        Ok(Self {
            year: dt.year(),
            month: u8::from(dt.month()),
            day: dt.day(),
            hour: dt.hour(),
            minute: dt.minute(),
            second: dt.second(),
        })
    }
}

/// Reduce a 0-23 hour to the displayed hour
///
/// Hours above 12 have 12 subtracted; everything else passes through, so
/// midnight displays as 0.
pub const fn twelve_hour(hour: u8) -> u8 {
    if hour > 12 {
        hour - 12
    } else {
        hour
    }
}

/// Current time in seconds since the Unix epoch plus its calendar fields
///
/// The calendar is recomputed on every change and a change that cannot be
/// decomposed is refused, so the fields always match `current_time`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimeState {
    current_time: i64,
    utc_offset_s: i32,
    calendar: Calendar,
}

impl Default for TimeState {
    /// Unix epoch, UTC
    fn default() -> Self {
        Self {
            current_time: 0,
            utc_offset_s: 0,
            calendar: Calendar::EPOCH,
        }
    }
}

impl TimeState {
    /// Start at `initial_time` with a fixed offset from UTC
    pub fn new(initial_time: i64, utc_offset_minutes: i16) -> Result<Self, TimeError> {
        let utc_offset_s = i32::from(utc_offset_minutes) * 60;
        Ok(Self {
            current_time: initial_time,
            utc_offset_s,
            calendar: Calendar::from_unix(initial_time, utc_offset_s)?,
        })
    }

    /// Jump to a new time
    pub fn set(&mut self, unix_time: i64) -> Result<(), TimeError> {
        self.calendar = Calendar::from_unix(unix_time, self.utc_offset_s)?;
        self.current_time = unix_time;
        Ok(())
    }

    /// Move forward by `seconds`
    pub fn advance(&mut self, seconds: i64) -> Result<(), TimeError> {
        let next = self
            .current_time
            .checked_add(seconds)
            .ok_or(TimeError::OutOfRange)?;
        self.set(next)
    }

    /// Seconds since the Unix epoch (UTC)
    pub fn current_time(&self) -> i64 {
        self.current_time
    }

    /// Local calendar fields
    pub fn calendar(&self) -> Calendar {
        self.calendar
    }

    /// Offset applied before decomposition
    pub fn utc_offset_s(&self) -> i32 {
        self.utc_offset_s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_twelve_hour_boundaries() {
        assert_eq!(twelve_hour(0), 0);
        assert_eq!(twelve_hour(1), 1);
        assert_eq!(twelve_hour(12), 12);
        assert_eq!(twelve_hour(13), 1);
        assert_eq!(twelve_hour(23), 11);
    }

    #[test]
    fn test_calendar_epoch() {
        assert_eq!(Calendar::from_unix(0, 0), Ok(Calendar::EPOCH));
        assert_eq!(TimeState::default(), TimeState::new(0, 0).unwrap());
    }

    #[test]
    fn test_offset_applied() {
        // 2000-01-01 00:30 UTC is 1999-12-31 23:30 at UTC-1
        let state = TimeState::new(946_686_600, -60).unwrap();
        let cal = state.calendar();
        assert_eq!((cal.year, cal.month, cal.day, cal.hour), (1999, 12, 31, 23));
        assert_eq!(state.current_time(), 946_686_600);
    }

    #[test]
    fn test_advance_recomputes() {
        let mut state = TimeState::new(86_399, 0).unwrap();
        state.advance(1).unwrap();
        let cal = state.calendar();
        assert_eq!((cal.day, cal.hour, cal.minute, cal.second), (2, 0, 0, 0));
    }

    #[test]
    fn test_out_of_range_refused() {
        let mut state = TimeState::new(0, 0).unwrap();
        assert_eq!(state.set(i64::MAX), Err(TimeError::OutOfRange));
        assert_eq!(state.current_time(), 0);
        assert_eq!(state.calendar().year, 1970);
        assert_eq!(state.advance(i64::MAX), Err(TimeError::OutOfRange));
        assert_eq!(state.current_time(), 0);
    }

    proptest! {
        #[test]
        fn prop_twelve_hour_range(hour in 0u8..24) {
            let shown = twelve_hour(hour);
            prop_assert!(shown <= 12);
            if hour <= 12 {
                prop_assert_eq!(shown, hour);
            } else {
                prop_assert_eq!(shown, hour - 12);
            }
        }

        #[test]
        fn prop_calendar_is_function_of_time(t in 0i64..4_102_444_800) {
            let mut state = TimeState::new(0, 0).unwrap();
            state.set(t).unwrap();
            prop_assert_eq!(state.calendar(), Calendar::from_unix(t, 0).unwrap());
        }
    }
}

//! Latest decoded position/time fix

use time::{Date, Month, PrimitiveDateTime, Time};
use tubeclock_protocol::{NmeaDate, NmeaTime, Rmc};

/// Snapshot of the most recent RMC sentence
///
/// `Copy` so readers always take a whole record and never observe a
/// half-written one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FixRecord {
    /// Receiver reported an active fix
    pub valid: bool,
    /// UTC time of day
    pub time: Option<NmeaTime>,
    /// UTC date
    pub date: Option<NmeaDate>,
}

impl FixRecord {
    /// Record with no fix
    pub const fn none() -> Self {
        Self {
            valid: false,
            time: None,
            date: None,
        }
    }

    /// Unix time encoded by the fix
    ///
    /// `None` when time or date is missing or the date does not exist
    /// (for example 30 February). A leap second is folded into second 59.
    pub fn unix_time(&self) -> Option<i64> {
        let (time, date) = (self.time?, self.date?);
        let month = Month::try_from(date.month).ok()?;
        let date = Date::from_calendar_date(i32::from(date.year), month, date.day).ok()?;
        let time = Time::from_hms(time.hour, time.minute, time.second.min(59)).ok()?;
        Some(PrimitiveDateTime::new(date, time).assume_utc().unix_timestamp())
    }
}

impl From<Rmc> for FixRecord {
    fn from(rmc: Rmc) -> Self {
        Self {
            valid: rmc.valid,
            time: rmc.time,
            date: rmc.date,
        }
    }
}

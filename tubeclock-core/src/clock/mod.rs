//! Wall-clock time kept against GPS
//!
//! A free-running second counter advanced by the 1PPS edge and realigned
//! whenever a valid fix can be calibrated.

pub mod request;
pub mod state;
pub mod sync;

pub use request::DigitRequest;
pub use state::{twelve_hour, Calendar, TimeError, TimeState};
pub use sync::{Calibration, FixCalibrator, TickReport, TimeSynchronizer};

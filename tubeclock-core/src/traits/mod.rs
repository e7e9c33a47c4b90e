//! Collaborator traits
//!
//! These traits define the seams between the clock logic and the parts of
//! the system that live outside it: the brightness input and the RTC
//! calibration step.

pub mod brightness;
pub mod calibrator;

pub use brightness::BrightnessSource;
pub use calibrator::{CalibrationError, Calibrator};

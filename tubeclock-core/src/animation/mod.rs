//! Per-tube animation
//!
//! Each tube carries a digit state (cathode and dot intensities plus the
//! end-digit addressing marker) and an LED state. The engine advances all
//! of them once per render frame; the renderer then reads the levels.

pub mod digit;
pub mod engine;
pub mod led;
pub mod mode;

pub use digit::{DigitAnimationState, EndDigit, TransitionPolicy, FULL_ON};
pub use engine::AnimationEngine;
pub use led::{LedAnimationState, LedPolicy, LED_CHANNELS};
pub use mode::DisplayMode;

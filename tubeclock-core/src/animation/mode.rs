//! Persisted display modes

use super::digit::TransitionPolicy;
use super::led::{LedPolicy, LED_CHANNELS};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

const OFF: [u8; LED_CHANNELS] = [0, 0, 0];
const RED: [u8; LED_CHANNELS] = [255, 0, 0];
const GREEN: [u8; LED_CHANNELS] = [0, 255, 0];
const BLUE: [u8; LED_CHANNELS] = [0, 0, 255];

/// Frames per breath (about two seconds at the render rate)
const BREATHE_PERIOD: u16 = 116;

/// Per-frame step when the fix LED changes colour
const STATUS_FADE_STEP: u8 = 8;

/// User-selectable look of the clock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DisplayMode {
    /// Configured transition, LEDs off
    #[default]
    Plain,
    /// Configured transition, LEDs show fix status
    FixStatus,
    /// Configured transition, LEDs breathe blue
    Breathe,
    /// No transition, LEDs off
    Cut,
}

impl DisplayMode {
    /// Number of modes
    pub const COUNT: u8 = 4;

    /// Mode from its persisted value; values past the last mode wrap
    pub const fn from_persisted(value: u8) -> Self {
        match value % Self::COUNT {
            0 => DisplayMode::Plain,
            1 => DisplayMode::FixStatus,
            2 => DisplayMode::Breathe,
            _ => DisplayMode::Cut,
        }
    }

    /// Persisted value
    pub const fn persisted(self) -> u8 {
        self as u8
    }

    /// Digit transition for this mode
    pub fn transition(self, configured: TransitionPolicy) -> TransitionPolicy {
        match self {
            DisplayMode::Cut => TransitionPolicy::Cut,
            _ => configured,
        }
    }

    /// LED policy and colour for this mode
    pub fn led(self, fix_valid: bool) -> (LedPolicy, [u8; LED_CHANNELS]) {
        match self {
            DisplayMode::Plain | DisplayMode::Cut => (LedPolicy::Steady, OFF),
            DisplayMode::FixStatus => {
                let color = if fix_valid { GREEN } else { RED };
                (
                    LedPolicy::Fade {
                        step: STATUS_FADE_STEP,
                    },
                    color,
                )
            }
            DisplayMode::Breathe => (
                LedPolicy::Breathe {
                    period: BREATHE_PERIOD,
                },
                BLUE,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persisted_round_trip() {
        let seen: Vec<DisplayMode> = (0..DisplayMode::COUNT)
            .map(DisplayMode::from_persisted)
            .collect();
        assert!(seen.iter().all(|&m| DisplayMode::from_persisted(m.persisted()) == m));
        assert_eq!(
            seen,
            [
                DisplayMode::Plain,
                DisplayMode::FixStatus,
                DisplayMode::Breathe,
                DisplayMode::Cut
            ]
        );
    }

    #[test]
    fn test_persisted_wraps() {
        assert_eq!(DisplayMode::from_persisted(1), DisplayMode::FixStatus);
        assert_eq!(DisplayMode::from_persisted(6), DisplayMode::Breathe);
        assert_eq!(DisplayMode::Cut.persisted(), 3);
    }

    #[test]
    fn test_transition_override() {
        let fade = TransitionPolicy::Crossfade { frames: 30 };
        assert_eq!(DisplayMode::Plain.transition(fade), fade);
        assert_eq!(DisplayMode::Cut.transition(fade), TransitionPolicy::Cut);
    }

    #[test]
    fn test_fix_status_colours() {
        assert_eq!(DisplayMode::FixStatus.led(true).1, GREEN);
        assert_eq!(DisplayMode::FixStatus.led(false).1, RED);
        assert_eq!(DisplayMode::Plain.led(true), (LedPolicy::Steady, OFF));
    }
}

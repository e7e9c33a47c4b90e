//! Indicator LED animation

use tubeclock_protocol::MAX_LED_CHANNELS;

/// Colour channels per LED (red, green, blue)
pub const LED_CHANNELS: usize = MAX_LED_CHANNELS;

/// How the LED reaches its target colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LedPolicy {
    /// Jump straight to the target
    #[default]
    Steady,
    /// Move each channel toward the target by at most `step` per frame
    Fade { step: u8 },
    /// Triangle-wave the target colour over `period` frames
    Breathe { period: u16 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LedAnimationState {
    levels: [u8; LED_CHANNELS],
    target: [u8; LED_CHANNELS],
    policy: LedPolicy,
}

impl LedAnimationState {
    pub const fn new() -> Self {
        Self {
            levels: [0; LED_CHANNELS],
            target: [0; LED_CHANNELS],
            policy: LedPolicy::Steady,
        }
    }

    pub fn set_target(&mut self, color: [u8; LED_CHANNELS]) {
        self.target = color;
    }

    pub fn target(&self) -> [u8; LED_CHANNELS] {
        self.target
    }

    pub fn set_policy(&mut self, policy: LedPolicy) {
        self.policy = policy;
    }

    pub fn policy(&self) -> LedPolicy {
        self.policy
    }

    /// Advance one frame; `frame` is the engine's frame counter
    pub fn advance(&mut self, frame: u32) {
        match self.policy {
            LedPolicy::Steady => self.levels = self.target,
            LedPolicy::Fade { step } => {
                let step = step.max(1);
                for (level, &target) in self.levels.iter_mut().zip(&self.target) {
                    *level = if *level < target {
                        level.saturating_add(step).min(target)
                    } else {
                        level.saturating_sub(step).max(target)
                    };
                }
            }
            LedPolicy::Breathe { period } => {
                let amplitude = breathe(frame, period);
                for (level, &target) in self.levels.iter_mut().zip(&self.target) {
                    *level = (u32::from(target) * u32::from(amplitude) / 255) as u8;
                }
            }
        }
    }

    /// Current level per colour channel
    pub fn levels(&self) -> &[u8; LED_CHANNELS] {
        &self.levels
    }
}

/// Triangle wave 0 -> 255 -> 0 over `period` frames
fn breathe(frame: u32, period: u16) -> u8 {
    let period = u32::from(period);
    if period < 2 {
        return 255;
    }
    let phase = frame % period;
    let half = period / 2;
    let level = if phase < half {
        255 * phase / half
    } else {
        255 * (period - phase) / (period - half)
    };
    level as u8
}

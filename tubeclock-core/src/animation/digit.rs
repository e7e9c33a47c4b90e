//! Digit cathode animation

use tubeclock_protocol::{Addressing, FrameLayout, MAX_TUBE_CHANNELS};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Intensity of a fully lit cathode
pub const FULL_ON: u8 = 255;

/// Which physical digit position ends the tube's two-character group
///
/// Positions 2 and 3 sit on the driver's alternate address. A new marker
/// is staged with [`DigitAnimationState::set_end_digit`] and only takes
/// effect at the next frame advance, so every channel of one frame is
/// sent under a single address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum EndDigit {
    #[default]
    Digit0,
    Digit1,
    Digit2,
    Digit3,
}

impl EndDigit {
    /// Marker from its numeric position
    pub const fn from_position(position: u8) -> Option<Self> {
        match position {
            0 => Some(EndDigit::Digit0),
            1 => Some(EndDigit::Digit1),
            2 => Some(EndDigit::Digit2),
            3 => Some(EndDigit::Digit3),
            _ => None,
        }
    }

    /// Addressing variant the opcode must carry
    pub const fn addressing(self) -> Addressing {
        match self {
            EndDigit::Digit2 | EndDigit::Digit3 => Addressing::Alternate,
            EndDigit::Digit0 | EndDigit::Digit1 => Addressing::Primary,
        }
    }
}

/// How a tube moves from one digit to the next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TransitionPolicy {
    /// Switch immediately
    Cut,
    /// Linear crossfade over `frames` render frames
    Crossfade { frames: u16 },
    /// Old digit fades out over the first half, new one fades in over the second
    FadeOutIn { frames: u16 },
}

impl Default for TransitionPolicy {
    fn default() -> Self {
        TransitionPolicy::Crossfade { frames: 20 }
    }
}

impl TransitionPolicy {
    /// Frames until the transition completes
    pub const fn frames(self) -> u16 {
        match self {
            TransitionPolicy::Cut => 0,
            TransitionPolicy::Crossfade { frames } | TransitionPolicy::FadeOutIn { frames } => {
                frames
            }
        }
    }

    /// Levels of the outgoing and incoming digit after `elapsed` frames
    fn levels(self, elapsed: u16) -> (u8, u8) {
        let frames = self.frames();
        if elapsed >= frames {
            return (0, FULL_ON);
        }
        match self {
            TransitionPolicy::Cut => (0, FULL_ON),
            TransitionPolicy::Crossfade { .. } => {
                let incoming = ramp(elapsed, frames);
                (FULL_ON - incoming, incoming)
            }
            TransitionPolicy::FadeOutIn { .. } => {
                let half = frames / 2;
                if elapsed < half {
                    (FULL_ON - ramp(elapsed, half), 0)
                } else {
                    (0, ramp(elapsed - half, frames - half))
                }
            }
        }
    }
}

/// `FULL_ON * n / d`, with `d > 0` and `n <= d`
fn ramp(n: u16, d: u16) -> u8 {
    (u32::from(FULL_ON) * u32::from(n) / u32::from(d)) as u8
}

/// Cathode and dot intensities for one tube
#[derive(Debug, Clone)]
pub struct DigitAnimationState {
    layout: FrameLayout,
    /// Current level per tube channel; digits first, then dots
    pwm: [u8; MAX_TUBE_CHANNELS],
    /// Dot levels to restore when a lamp test ends
    dots: [u8; MAX_TUBE_CHANNELS],
    end_digit: EndDigit,
    next_end_digit: EndDigit,
    policy: TransitionPolicy,
    previous: Option<u8>,
    target: Option<u8>,
    elapsed: u16,
    /// Lamp-test level overriding the digit animation
    hold: Option<u8>,
}

impl DigitAnimationState {
    /// Dark tube
    pub fn new(layout: FrameLayout, policy: TransitionPolicy) -> Self {
        Self {
            layout,
            pwm: [0; MAX_TUBE_CHANNELS],
            dots: [0; MAX_TUBE_CHANNELS],
            end_digit: EndDigit::default(),
            next_end_digit: EndDigit::default(),
            policy,
            previous: None,
            target: None,
            elapsed: 0,
            hold: None,
        }
    }

    /// Request a new digit
    ///
    /// Re-requesting the digit already targeted is a no-op so a steady
    /// digit never flickers. Anything else restarts the transition from the
    /// current target and ends a lamp test, putting the dots back to
    /// their levels from before the test.
    pub fn request_digit(&mut self, digit: u8) {
        if self.hold.is_none() && self.target == Some(digit) {
            return;
        }
        if self.hold.take().is_some() {
            let dots = self.layout.digits()..self.layout.tube_channels();
            self.pwm[dots.clone()].copy_from_slice(&self.dots[dots]);
            self.previous = None;
        } else {
            self.previous = self.target;
        }
        self.target = Some(digit);
        self.elapsed = 0;
    }

    /// Drive every digit and dot channel at `level` until the next request
    pub fn hold_all(&mut self, level: u8) {
        let dots = self.layout.digits()..self.layout.tube_channels();
        if self.hold.is_none() {
            self.dots[dots.clone()].copy_from_slice(&self.pwm[dots]);
        }
        self.hold = Some(level);
        let channels = self.layout.tube_channels();
        self.pwm[..channels].fill(level);
    }

    /// Set a dot to a steady level; out-of-range dots are ignored
    ///
    /// During a lamp test the new level is kept back until the test ends.
    pub fn set_dot(&mut self, dot: u8, level: u8) -> bool {
        match self.layout.dot_channel(dot) {
            Some(channel) if self.hold.is_some() => {
                self.dots[channel] = level;
                true
            }
            Some(channel) => {
                self.pwm[channel] = level;
                true
            }
            None => false,
        }
    }

    pub fn set_policy(&mut self, policy: TransitionPolicy) {
        self.policy = policy;
    }

    pub fn policy(&self) -> TransitionPolicy {
        self.policy
    }

    /// Stage the end-digit marker for the next frame
    pub fn set_end_digit(&mut self, end_digit: EndDigit) {
        self.next_end_digit = end_digit;
    }

    /// Marker of the frame last advanced
    pub fn end_digit(&self) -> EndDigit {
        self.end_digit
    }

    /// Digit the tube is moving to (or showing)
    pub fn target(&self) -> Option<u8> {
        self.target
    }

    /// True once the current transition has finished
    pub fn is_settled(&self) -> bool {
        self.elapsed >= self.policy.frames()
    }

    /// Advance one frame and recompute the digit channels
    pub fn advance(&mut self) {
        self.end_digit = self.next_end_digit;

        if let Some(level) = self.hold {
            self.pwm[..self.layout.digits()].fill(level);
            return;
        }

        self.elapsed = self.elapsed.saturating_add(1);
        let (outgoing, incoming) = self.policy.levels(self.elapsed);

        self.pwm[..self.layout.digits()].fill(0);
        if let Some(channel) = self.previous.and_then(|d| self.layout.digit_channel(d)) {
            self.pwm[channel] = outgoing;
        }
        if let Some(channel) = self.target.and_then(|d| self.layout.digit_channel(d)) {
            self.pwm[channel] = self.pwm[channel].saturating_add(incoming);
        }
    }

    /// Digit channels followed by dot channels
    pub fn channels(&self) -> &[u8] {
        &self.pwm[..self.layout.tube_channels()]
    }
}

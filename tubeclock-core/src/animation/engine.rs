//! Six-tube animation engine

use tubeclock_protocol::FrameLayout;

use crate::clock::DigitRequest;
use crate::tube::{TubeIndex, TUBE_COUNT};

use super::digit::{DigitAnimationState, EndDigit, TransitionPolicy};
use super::led::{LedAnimationState, LedPolicy, LED_CHANNELS};
use super::mode::DisplayMode;

#[derive(Debug, Clone)]
struct Tube {
    digit: DigitAnimationState,
    led: LedAnimationState,
}

/// Animation state for every tube plus the frame counter
///
/// Owned by the render task. Digit requests arrive as messages and are
/// applied between frames, so a request always overrides whatever
/// transition is in flight.
#[derive(Debug, Clone)]
pub struct AnimationEngine {
    tubes: [Tube; TUBE_COUNT],
    layout: FrameLayout,
    transition: TransitionPolicy,
    mode: DisplayMode,
    frame: u32,
}

impl AnimationEngine {
    /// All tubes dark
    pub fn new(layout: FrameLayout, transition: TransitionPolicy) -> Self {
        let tube = Tube {
            digit: DigitAnimationState::new(layout, transition),
            led: LedAnimationState::new(),
        };
        Self {
            tubes: core::array::from_fn(|_| tube.clone()),
            layout,
            transition,
            mode: DisplayMode::default(),
            frame: 0,
        }
    }

    pub fn layout(&self) -> FrameLayout {
        self.layout
    }

    /// Stage per-tube end-digit markers; they apply from the next frame
    pub fn set_end_digits(&mut self, end_digits: &[EndDigit; TUBE_COUNT]) {
        for (tube, &end) in self.tubes.iter_mut().zip(end_digits) {
            tube.digit.set_end_digit(end);
        }
    }

    /// Switch display mode
    pub fn set_mode(&mut self, mode: DisplayMode, fix_valid: bool) {
        self.mode = mode;
        let transition = mode.transition(self.transition);
        for tube in &mut self.tubes {
            tube.digit.set_policy(transition);
        }
        self.set_fix_status(fix_valid);
    }

    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    /// Update the LEDs for the current fix state
    pub fn set_fix_status(&mut self, fix_valid: bool) {
        let (policy, color) = self.mode.led(fix_valid);
        self.set_leds(policy, color);
    }

    /// Set every LED to the same policy and colour
    pub fn set_leds(&mut self, policy: LedPolicy, color: [u8; LED_CHANNELS]) {
        for tube in &mut self.tubes {
            tube.led.set_policy(policy);
            tube.led.set_target(color);
        }
    }

    /// Retarget every tube
    pub fn apply(&mut self, request: &DigitRequest) {
        for tube in TubeIndex::iter() {
            self.tubes[tube.get()].digit.request_digit(request.digit(tube));
        }
    }

    /// Lamp test: every digit and dot channel at `level`
    pub fn hold_all(&mut self, level: u8) {
        for tube in &mut self.tubes {
            tube.digit.hold_all(level);
        }
    }

    /// Set one dot on one tube
    pub fn set_dot(&mut self, tube: TubeIndex, dot: u8, level: u8) -> bool {
        self.tubes[tube.get()].digit.set_dot(dot, level)
    }

    /// Advance every tube one frame
    pub fn advance(&mut self) {
        self.frame = self.frame.wrapping_add(1);
        let frame = self.frame;
        for tube in &mut self.tubes {
            tube.digit.advance();
            tube.led.advance(frame);
        }
    }

    /// Frames advanced so far (wrapping)
    pub fn frame_count(&self) -> u32 {
        self.frame
    }

    pub fn digit_state(&self, tube: TubeIndex) -> &DigitAnimationState {
        &self.tubes[tube.get()].digit
    }

    pub fn led_state(&self, tube: TubeIndex) -> &LedAnimationState {
        &self.tubes[tube.get()].led
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::FULL_ON;

    fn engine() -> AnimationEngine {
        AnimationEngine::new(FrameLayout::TUBE_DRIVER, TransitionPolicy::Cut)
    }

    fn shown(engine: &AnimationEngine, tube: TubeIndex) -> Option<usize> {
        engine.digit_state(tube).channels()[..10]
            .iter()
            .position(|&l| l == FULL_ON)
    }

    #[test]
    fn test_apply_request() {
        let mut engine = engine();
        engine.apply(&DigitRequest::from_hms(9, 41, 7));
        engine.advance();

        // seconds ones = 7 -> channel 6; hour tens = 0 -> channel 9
        assert_eq!(shown(&engine, TubeIndex::ALL[0]), Some(6));
        assert_eq!(shown(&engine, TubeIndex::ALL[5]), Some(9));
        assert_eq!(engine.frame_count(), 1);
    }

    #[test]
    fn test_frame_counter_wraps() {
        let mut engine = engine();
        engine.frame = u32::MAX;
        engine.advance();
        assert_eq!(engine.frame_count(), 0);
    }

    #[test]
    fn test_mode_sets_policies() {
        let mut engine =
            AnimationEngine::new(FrameLayout::TUBE_DRIVER, TransitionPolicy::Crossfade { frames: 8 });
        engine.set_mode(DisplayMode::Cut, false);
        assert_eq!(
            engine.digit_state(TubeIndex::ALL[3]).policy(),
            TransitionPolicy::Cut
        );

        engine.set_mode(DisplayMode::FixStatus, true);
        assert_eq!(
            engine.digit_state(TubeIndex::ALL[3]).policy(),
            TransitionPolicy::Crossfade { frames: 8 }
        );
        assert_eq!(engine.led_state(TubeIndex::ALL[3]).target(), [0, 255, 0]);

        engine.set_fix_status(false);
        assert_eq!(engine.led_state(TubeIndex::ALL[0]).target(), [255, 0, 0]);
    }

    #[test]
    fn test_end_digits_applied() {
        let mut engine = engine();
        let ends = [
            EndDigit::Digit0,
            EndDigit::Digit2,
            EndDigit::Digit0,
            EndDigit::Digit3,
            EndDigit::Digit1,
            EndDigit::Digit0,
        ];
        engine.set_end_digits(&ends);
        assert_eq!(engine.digit_state(TubeIndex::ALL[1]).end_digit(), EndDigit::Digit0);

        engine.advance();
        assert_eq!(engine.digit_state(TubeIndex::ALL[1]).end_digit(), EndDigit::Digit2);
        assert_eq!(engine.digit_state(TubeIndex::ALL[4]).end_digit(), EndDigit::Digit1);
    }

    #[test]
    fn test_lamp_test_and_dots() {
        let mut engine = engine();
        engine.hold_all(120);
        assert!(engine.set_dot(TubeIndex::ALL[2], 0, 255));
        engine.advance();
        let channels = engine.digit_state(TubeIndex::ALL[2]).channels();
        assert!(channels.iter().all(|&l| l == 120));

        engine.apply(&DigitRequest::from_hms(12, 34, 56));
        for _ in 0..1000 {
            engine.advance();
        }
        for tube in TubeIndex::iter() {
            let dots = &engine.digit_state(tube).channels()[10..];
            let expected: &[u8] = if tube == TubeIndex::ALL[2] { &[255, 0] } else { &[0, 0] };
            assert_eq!(dots, expected);
        }
    }
}

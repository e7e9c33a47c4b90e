//! Per-frame render cycle

use tubeclock_hal::{OutputPin, SpiBus};
use tubeclock_protocol::{BrightnessScale, FrameEncoder, FrameLayout};

use crate::animation::AnimationEngine;
use crate::stats::{FaultCounters, FaultKind};
use crate::traits::BrightnessSource;
use crate::tube::TubeIndex;

use super::addressing::DeviceTable;

/// Outcome of one render cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CycleReport {
    /// Frames transmitted successfully
    pub sent: u8,
    /// Frames that could not be built or transmitted
    pub failed: u8,
    /// Brightness input was unusable; the previous scale is kept
    pub brightness_rejected: bool,
}

/// Turns animation state into frames on the wire
pub struct FrameRenderer {
    encoder: FrameEncoder,
    scale: BrightnessScale,
}

impl FrameRenderer {
    pub fn new(layout: FrameLayout, scale: BrightnessScale) -> Self {
        Self {
            encoder: FrameEncoder::new(layout),
            scale,
        }
    }

    /// Scale applied to the next cycle
    pub fn scale(&self) -> BrightnessScale {
        self.scale
    }

    /// Run one render cycle
    ///
    /// Advances the engine, then encodes and sends one frame per tube in
    /// tube order. A failed tube is counted and skipped; the cycle always
    /// runs to the end. The brightness source is read last and only
    /// affects the next cycle.
    pub async fn render_cycle<B, P, S>(
        &mut self,
        engine: &mut AnimationEngine,
        table: &mut DeviceTable<B, P>,
        brightness: &mut S,
        faults: &mut FaultCounters,
    ) -> CycleReport
    where
        B: SpiBus,
        P: OutputPin,
        S: BrightnessSource,
    {
        engine.advance();

        let mut report = CycleReport::default();
        for tube in TubeIndex::iter() {
            let digit = engine.digit_state(tube);
            let led = engine.led_state(tube);

            let frame = match self.encoder.encode(
                digit.end_digit().addressing(),
                digit.channels(),
                led.levels(),
                self.scale,
            ) {
                Ok(frame) => frame,
                Err(_) => {
                    faults.record(FaultKind::Encode);
                    report.failed += 1;
                    continue;
                }
            };

            match table.send_to(&frame, tube).await {
                Ok(()) => report.sent += 1,
                Err(e) => {
                    faults.record(e.fault_kind());
                    report.failed += 1;
                }
            }
        }

        match BrightnessScale::new(brightness.brightness()) {
            Some(scale) => self.scale = scale,
            None => report.brightness_rejected = true,
        }

        report
    }
}

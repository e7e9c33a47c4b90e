//! Render task
//!
//! Owns the device table and the animation engine. Every period it picks
//! up the newest digit request and fix status, then runs one render
//! cycle. At boot, unless disabled, all tubes are held lit for the lamp
//! test; the first request after the test ends it.

use defmt::*;
use embassy_rp::peripherals::SPI0;
use embassy_time::{Duration, Instant, Ticker};

use tubeclock_core::animation::AnimationEngine;
use tubeclock_core::config::{DisplayConfig, TimingConfig};
use tubeclock_core::render::{DeviceTable, FrameRenderer};
use tubeclock_core::stats::FaultCounters;
use tubeclock_hal_rp2040::{PushPull, TimedSpi};
use tubeclock_protocol::FrameLayout;

use crate::channels::{latest_request, merge_faults, SharedBrightness, FIX_STATUS};

/// The six tube drivers on SPI0
pub type Tubes = DeviceTable<TimedSpi<'static, SPI0>, PushPull<'static>>;

/// Render task
#[embassy_executor::task]
pub async fn render_task(mut tubes: Tubes, display: DisplayConfig, timing: TimingConfig) {
    info!("Render task started ({}ms)", timing.render_period_ms);

    let layout = match display.layout.frame_layout() {
        Ok(layout) => layout,
        Err(e) => {
            error!("Invalid frame layout ({:?}), using the tube driver default", e);
            FrameLayout::TUBE_DRIVER
        }
    };

    let mut engine = AnimationEngine::new(layout, display.transition);
    engine.set_end_digits(&display.end_digits);
    engine.set_mode(display.mode, false);
    let lamp_test_ms = if display.lamp_test {
        engine.hold_all(display.lamp_test_level);
        timing.lamp_test_ms
    } else {
        0
    };

    let mut renderer = FrameRenderer::new(layout, display.brightness_scale());
    let mut brightness = SharedBrightness;

    let lamp_test_end = Instant::now() + Duration::from_millis(u64::from(lamp_test_ms));
    let mut ticker = Ticker::every(Duration::from_millis(u64::from(timing.render_period_ms)));

    loop {
        ticker.next().await;

        if Instant::now() >= lamp_test_end {
            if let Some(request) = latest_request() {
                engine.apply(&request);
            }
        }

        if let Some(valid) = FIX_STATUS.try_take() {
            engine.set_fix_status(valid);
        }

        let mut faults = FaultCounters::new();
        let report = renderer
            .render_cycle(&mut engine, &mut tubes, &mut brightness, &mut faults)
            .await;

        if report.failed > 0 {
            warn!(
                "Render cycle: {} sent, {} failed ({:?})",
                report.sent, report.failed, faults
            );
        }
        if report.brightness_rejected {
            debug!("Brightness input rejected, keeping previous scale");
        }
        if faults.total() > 0 {
            merge_faults(&faults);
        }
    }
}

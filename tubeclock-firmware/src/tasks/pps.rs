//! 1PPS tick task
//!
//! Each rising edge on the receiver's pulse-per-second line advances the
//! clock by one second, recalibrating from the latest fix when it is
//! valid. The digit request and fix status produced by the tick are
//! handed to the render task.

use defmt::*;
use embassy_rp::gpio::Input;

use tubeclock_core::clock::{Calibration, FixCalibrator, TimeState, TimeSynchronizer};
use tubeclock_core::config::TimeConfig;
use tubeclock_core::stats::FaultKind;
use tubeclock_hal::OutputPin;
use tubeclock_hal_rp2040::PushPull;

use crate::channels::{latest_fix, record_fault, send_request, FIX_STATUS};

/// PPS task
///
/// `indicator` is driven high while the fix is invalid.
#[embassy_executor::task]
pub async fn pps_task(mut pps: Input<'static>, mut indicator: PushPull<'static>, config: TimeConfig) {
    info!("PPS task started");

    let state = match TimeState::new(config.initial_time, config.utc_offset_minutes) {
        Ok(state) => state,
        Err(e) => {
            warn!("Initial time out of range ({:?}), starting at the epoch", e);
            TimeState::default()
        }
    };
    let mut sync = TimeSynchronizer::new(FixCalibrator::default(), state);

    loop {
        pps.wait_for_rising_edge().await;

        let fix = latest_fix();
        let report = match sync.on_tick(&fix) {
            Ok(report) => report,
            Err(e) => {
                error!("Clock advance failed: {:?}", e);
                continue;
            }
        };

        match report.calibration {
            Calibration::Skipped => {}
            Calibration::Aligned(t) => trace!("Aligned to fix at {}", t),
            Calibration::Rejected(e) => {
                debug!("Fix rejected for calibration: {:?}", e);
                record_fault(FaultKind::CalibrationRejected);
            }
        }

        indicator.set_state(report.indicator_high());
        send_request(report.request);
        FIX_STATUS.signal(report.fix_valid);

        let c = report.calendar;
        trace!(
            "Tick {:04}-{:02}-{:02} {:02}:{:02}:{:02} fix={}",
            c.year,
            c.month,
            c.day,
            report.display_hour,
            c.minute,
            c.second,
            report.fix_valid
        );
    }
}

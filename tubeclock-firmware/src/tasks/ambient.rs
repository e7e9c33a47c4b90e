//! Ambient light sampling task
//!
//! Reads the light sensor on a fixed period and publishes the brightness
//! divisor for the render task. A failed conversion keeps the previous
//! divisor.

use defmt::*;
use embassy_rp::adc::{Adc, Async, Channel};
use embassy_time::{Duration, Ticker};

use tubeclock_core::brightness::scale_from_ambient;
use tubeclock_hal_rp2040::ADC_MAX;

use crate::channels::set_brightness;

/// Ambient task
#[embassy_executor::task]
pub async fn ambient_task(mut adc: Adc<'static, Async>, mut sensor: Channel<'static>, period_ms: u32) {
    info!("Ambient task started ({}ms)", period_ms);

    let mut ticker = Ticker::every(Duration::from_millis(u64::from(period_ms)));

    loop {
        match adc.read(&mut sensor).await {
            Ok(raw) => {
                let scale = scale_from_ambient(raw, ADC_MAX);
                trace!("Ambient {} -> divisor {}", raw, scale.value());
                set_brightness(scale.value());
            }
            Err(e) => {
                warn!("Light sensor read failed: {:?}", e);
            }
        }

        ticker.next().await;
    }
}

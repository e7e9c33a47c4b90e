//! SPI master with a bounded wait
//!
//! The tube drivers never answer, so a stuck transfer (DMA stalled, clock
//! misconfigured) would otherwise hang the render loop. Every write is
//! raced against a timer and reported as `SpiError::Timeout` if it loses.

use embassy_rp::spi::{self, Async, Instance, Spi};
use embassy_time::{with_timeout, Duration};
use tubeclock_hal::spi::{Phase, Polarity};
use tubeclock_hal::{SpiBus, SpiConfig, SpiError};

/// Translate the shared config into the embassy-rp one
pub fn spi_config(config: &SpiConfig) -> spi::Config {
    let (polarity, phase) = config.mode.into();
    let mut out = spi::Config::default();
    out.frequency = config.frequency;
    out.polarity = match polarity {
        Polarity::IdleLow => spi::Polarity::IdleLow,
        Polarity::IdleHigh => spi::Polarity::IdleHigh,
    };
    out.phase = match phase {
        Phase::CaptureOnFirstTransition => spi::Phase::CaptureOnFirstTransition,
        Phase::CaptureOnSecondTransition => spi::Phase::CaptureOnSecondTransition,
    };
    out
}

/// Async SPI with a per-write timeout
pub struct TimedSpi<'d, T: Instance> {
    spi: Spi<'d, T, Async>,
    timeout: Duration,
}

impl<'d, T: Instance> TimedSpi<'d, T> {
    /// Wrap a configured bus
    pub fn new(spi: Spi<'d, T, Async>, timeout_ms: u32) -> Self {
        Self {
            spi,
            timeout: Duration::from_millis(u64::from(timeout_ms)),
        }
    }
}

impl<T: Instance> SpiBus for TimedSpi<'_, T> {
    type Error = SpiError;

    async fn write(&mut self, data: &[u8]) -> Result<(), SpiError> {
        match with_timeout(self.timeout, self.spi.write(data)).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(_)) => Err(SpiError::Bus),
            Err(_) => Err(SpiError::Timeout),
        }
    }
}

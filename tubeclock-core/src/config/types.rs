//! Configuration type definitions

use tubeclock_hal::SpiConfig;
use tubeclock_protocol::{BrightnessScale, FrameError, FrameLayout};

use crate::animation::{DisplayMode, EndDigit, TransitionPolicy};
use crate::tube::TUBE_COUNT;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Channel counts of the tube drivers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LayoutConfig {
    pub digits: u8,
    pub dots: u8,
    pub leds: u8,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        let layout = FrameLayout::TUBE_DRIVER;
        Self {
            digits: layout.digits() as u8,
            dots: layout.dots() as u8,
            leds: layout.leds() as u8,
        }
    }
}

impl LayoutConfig {
    /// Validated frame layout
    pub fn frame_layout(&self) -> Result<FrameLayout, FrameError> {
        FrameLayout::new(self.digits, self.dots, self.leds)
    }
}

/// Display configuration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DisplayConfig {
    pub layout: LayoutConfig,
    /// Digit transition outside `DisplayMode::Cut`
    pub transition: TransitionPolicy,
    /// End-digit marker per tube, indexed by tube
    pub end_digits: [EndDigit; TUBE_COUNT],
    /// Persisted display mode read at boot
    pub mode: DisplayMode,
    /// Brightness divisor until the first ambient reading
    pub brightness: f64,
    /// Run the lamp test at boot
    pub lamp_test: bool,
    /// Level of the boot lamp test
    pub lamp_test_level: u8,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::default(),
            transition: TransitionPolicy::default(),
            end_digits: [EndDigit::Digit0; TUBE_COUNT],
            mode: DisplayMode::default(),
            brightness: 1.0,
            lamp_test: true,
            lamp_test_level: 255,
        }
    }
}

impl DisplayConfig {
    /// Starting brightness, unity if the configured value is unusable
    pub fn brightness_scale(&self) -> BrightnessScale {
        BrightnessScale::new(self.brightness).unwrap_or(BrightnessScale::UNITY)
    }
}

/// Task periods
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TimingConfig {
    /// Render period (~58 Hz)
    pub render_period_ms: u32,
    /// Sentence dispatch period
    pub dispatch_period_ms: u32,
    /// Ambient light sampling period
    pub ambient_period_ms: u32,
    /// Lamp test duration at boot
    pub lamp_test_ms: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            render_period_ms: 17,
            dispatch_period_ms: 100,
            ambient_period_ms: 500,
            lamp_test_ms: 1500,
        }
    }
}

/// Tube driver bus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BusConfig {
    /// SPI clock in Hz
    pub frequency: u32,
    /// Bounded wait per frame
    pub timeout_ms: u32,
}

impl Default for BusConfig {
    fn default() -> Self {
        let spi = SpiConfig::default();
        Self {
            frequency: spi.frequency,
            timeout_ms: spi.timeout_ms,
        }
    }
}

impl BusConfig {
    pub fn spi_config(&self) -> SpiConfig {
        SpiConfig {
            frequency: self.frequency,
            timeout_ms: self.timeout_ms,
            ..SpiConfig::default()
        }
    }
}

/// Timekeeping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TimeConfig {
    /// Fixed offset from UTC applied to the displayed time
    pub utc_offset_minutes: i16,
    /// Unix time the clock starts from before the first fix
    pub initial_time: i64,
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            utc_offset_minutes: 0,
            // 2024-01-01 00:00:00 UTC
            initial_time: 1_704_067_200,
        }
    }
}

/// Complete clock configuration
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ClockConfig {
    pub display: DisplayConfig,
    pub timing: TimingConfig,
    pub spi: BusConfig,
    pub time: TimeConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClockConfig::default();
        assert_eq!(config.display.layout.frame_layout(), Ok(FrameLayout::TUBE_DRIVER));
        assert_eq!(config.timing.render_period_ms, 17);
        assert_eq!(config.timing.dispatch_period_ms, 100);
        assert_eq!(config.time.utc_offset_minutes, 0);
        assert_eq!(config.display.brightness_scale(), BrightnessScale::UNITY);
    }

    #[test]
    fn test_bad_brightness_falls_back() {
        let display = DisplayConfig {
            brightness: 0.0,
            ..DisplayConfig::default()
        };
        assert_eq!(display.brightness_scale(), BrightnessScale::UNITY);
    }

    #[test]
    fn test_spi_config_carries_timeout() {
        let bus = BusConfig {
            frequency: 500_000,
            timeout_ms: 3,
        };
        let spi = bus.spi_config();
        assert_eq!(spi.frequency, 500_000);
        assert_eq!(spi.timeout_ms, 3);
    }
}

//! RP2040-specific HAL for the tube clock firmware
//!
//! This crate provides RP2040 implementations of the shared
//! `tubeclock-hal` traits:
//!
//! - Push-pull outputs for chip selects and the fix indicator
//! - Async SPI master with a bounded wait per transmission

#![no_std]

pub mod gpio;
pub mod spi;

pub use gpio::PushPull;
pub use spi::{spi_config, TimedSpi};

/// Full-scale reading of the 12-bit ADC
pub const ADC_MAX: u16 = 4095;

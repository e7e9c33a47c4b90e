//! Tubeclock Hardware Abstraction Layer
//!
//! This crate defines the hardware abstraction traits the clock core is
//! written against. Chip-specific HALs implement them so the display
//! pipeline can be exercised on the host with mocks and on the target
//! with real peripherals.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (tubeclock-firmware)       │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  tubeclock-core (render, addressing)    │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  tubeclock-hal (this crate - traits)    │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!             ┌───────────────┐
//!             │ tubeclock-hal-│
//!             │    rp2040     │
//!             └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`] - Chip-select and indicator lines
//! - [`spi::SpiBus`] - Shared synchronous serial bus to the tube drivers

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;
pub mod spi;

// Re-export key traits at crate root for convenience
pub use gpio::OutputPin;
pub use spi::{SpiBus, SpiConfig, SpiError};

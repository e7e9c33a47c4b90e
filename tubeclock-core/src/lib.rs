//! Board-agnostic core logic for the tube clock firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Validated tube indices and the device addressing table
//! - Per-tube digit and LED animation
//! - GPS sentence dispatch and time synchronization
//! - Frame rendering over the shared SPI bus
//! - Fault counters
//! - Configuration types and the `clock.toml` parser
//!
//! Data flow between the firmware tasks:
//!
//! ```text
//! UART bytes ──► SentenceDispatcher ──► FixRecord
//!                                          │
//! 1PPS edge ──────► TimeSynchronizer ◄─────┘
//!                         │ DigitRequest
//!                         ▼
//! render tick ────► AnimationEngine ──► FrameRenderer ──► DeviceTable ──► SPI
//!                                            ▲
//! ambient light ──► BrightnessSource ────────┘
//! ```

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod animation;
pub mod brightness;
pub mod clock;
pub mod config;
pub mod gps;
pub mod render;
pub mod stats;
pub mod traits;
pub mod tube;

pub use tube::{AddressError, TubeIndex, TUBE_COUNT};

//! Tubeclock wire formats
//!
//! This crate defines the two byte-level formats the clock speaks:
//!
//! - **Command frames** sent over SPI to each tube driver. Every frame has
//!   the same fixed layout:
//!
//! ```text
//! ┌────────┬───────────────┬─────────────┬──────────────┐
//! │ OPCODE │ DIGITS        │ DOTS        │ LEDS         │
//! │ 1B     │ D bytes       │ S bytes     │ L bytes      │
//! └────────┴───────────────┴─────────────┴──────────────┘
//! ```
//!
//!   Data bytes always carry bit 7 set so the driver can tell them apart
//!   from control bytes.
//!
//! - **GPS sentences** received over UART: newline-terminated ASCII lines
//!   accumulated by [`LineBuffer`] and decoded by [`NmeaDecoder`].

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod frame;
pub mod line;
pub mod nmea;

pub use frame::{
    encode_plain, encode_scaled, Addressing, BrightnessScale, CommandFrame,
    FrameEncoder, FrameError, FrameLayout, CMD_UPDATE, DATA_MARKER, MAX_FRAME_SIZE,
    MAX_LED_CHANNELS, MAX_TUBE_CHANNELS,
};
pub use line::{LineBuffer, LineError, GPS_LINE_CAPACITY, LINE_TERMINATOR};
pub use nmea::{
    GgaStatus, NmeaDate, NmeaDecoder, NmeaError, NmeaTime, Rmc, Sentence, SentenceDecoder,
    SentenceKind,
};

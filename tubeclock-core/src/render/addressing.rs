//! Tube index to chip-select mapping
//!
//! All six drivers share one SPI bus and are told apart by their select
//! line. The table owns the bus and every select, so holding `&mut` to it
//! is what serializes transmissions.

use tubeclock_hal::gpio::ActiveLow;
use tubeclock_hal::{OutputPin, SpiBus};
use tubeclock_protocol::CommandFrame;

use crate::stats::FaultKind;
use crate::tube::{AddressError, TubeIndex, TUBE_COUNT};

/// Errors from sending a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SendError<E> {
    /// Index outside the table; nothing was transmitted
    NoSuchDevice(usize),
    /// Bus reported an error or timed out
    Transport(E),
}

impl<E> From<AddressError> for SendError<E> {
    fn from(err: AddressError) -> Self {
        SendError::NoSuchDevice(err.0)
    }
}

impl<E> SendError<E> {
    /// Fault counter this error belongs to
    pub fn fault_kind(&self) -> FaultKind {
        match self {
            SendError::NoSuchDevice(_) => FaultKind::Range,
            SendError::Transport(_) => FaultKind::Transport,
        }
    }
}

/// Shared bus plus one active-low select per tube
pub struct DeviceTable<B, P> {
    bus: B,
    selects: [ActiveLow<P>; TUBE_COUNT],
}

impl<B: SpiBus, P: OutputPin> DeviceTable<B, P> {
    /// Take ownership of the bus and the selects (indexed by tube);
    /// every select is driven to its released level
    pub fn new(bus: B, selects: [P; TUBE_COUNT]) -> Self {
        Self {
            bus,
            selects: selects.map(ActiveLow::new),
        }
    }

    /// Transmit `frame` to the driver at `index`
    ///
    /// Out-of-range indices touch neither the bus nor any pin. Otherwise
    /// the select is asserted for exactly the duration of the write and
    /// released whether or not the write succeeded.
    pub async fn send(&mut self, frame: &CommandFrame, index: usize) -> Result<(), SendError<B::Error>> {
        let tube = TubeIndex::new(index)?;
        self.send_to(frame, tube).await
    }

    /// Transmit to an already validated tube
    pub async fn send_to(&mut self, frame: &CommandFrame, tube: TubeIndex) -> Result<(), SendError<B::Error>> {
        let select = &mut self.selects[tube.get()];
        select.assert();
        let result = self.bus.write(frame.as_bytes()).await;
        select.release();
        result.map_err(SendError::Transport)
    }

}

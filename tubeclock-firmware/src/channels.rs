//! Inter-task communication channels
//!
//! Static embassy-sync primitives shared by the firmware tasks. Values
//! that are read as "latest snapshot" live in blocking mutexes around a
//! `Cell`; values that are consumed once go through channels or signals.

use core::cell::Cell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::channel::{Channel, TrySendError};
use embassy_sync::pipe::Pipe;
use embassy_sync::signal::Signal;

use tubeclock_core::clock::DigitRequest;
use tubeclock_core::gps::FixRecord;
use tubeclock_core::stats::{FaultCounters, FaultKind};
use tubeclock_core::traits::BrightnessSource;

/// Bytes buffered between the UART and the dispatcher
const GPS_PIPE_SIZE: usize = 512;

/// Pending digit requests; only the newest one matters
const REQUEST_CHANNEL_SIZE: usize = 2;

/// Raw GPS bytes (UART RX task -> dispatch task)
pub static GPS_BYTES: Pipe<CriticalSectionRawMutex, GPS_PIPE_SIZE> = Pipe::new();

/// Most recent fix record (dispatch task -> PPS task)
pub static LATEST_FIX: Mutex<CriticalSectionRawMutex, Cell<FixRecord>> =
    Mutex::new(Cell::new(FixRecord::none()));

/// Digits to show (PPS task -> render task)
pub static DIGIT_REQUESTS: Channel<CriticalSectionRawMutex, DigitRequest, REQUEST_CHANNEL_SIZE> =
    Channel::new();

/// Fix validity at the last tick (PPS task -> render task)
pub static FIX_STATUS: Signal<CriticalSectionRawMutex, bool> = Signal::new();

/// Brightness divisor (ambient task -> render task)
pub static BRIGHTNESS: Mutex<CriticalSectionRawMutex, Cell<f64>> = Mutex::new(Cell::new(1.0));

/// Fault totals since boot
pub static FAULTS: Mutex<CriticalSectionRawMutex, Cell<FaultCounters>> =
    Mutex::new(Cell::new(FaultCounters::new()));

/// Publish a fix record
pub fn publish_fix(fix: FixRecord) {
    LATEST_FIX.lock(|cell| cell.set(fix));
}

/// Snapshot of the most recent fix record
pub fn latest_fix() -> FixRecord {
    LATEST_FIX.lock(|cell| cell.get())
}

/// Queue a digit request, replacing anything still pending
pub fn send_request(request: DigitRequest) {
    if let Err(TrySendError::Full(request)) = DIGIT_REQUESTS.try_send(request) {
        DIGIT_REQUESTS.clear();
        // Cannot fail: the channel was just emptied and we are its only sender
        let _ = DIGIT_REQUESTS.try_send(request);
    }
}

/// Newest pending digit request, discarding older ones
pub fn latest_request() -> Option<DigitRequest> {
    let mut latest = None;
    while let Ok(request) = DIGIT_REQUESTS.try_receive() {
        latest = Some(request);
    }
    latest
}

/// Count one fault
pub fn record_fault(kind: FaultKind) {
    FAULTS.lock(|cell| {
        let mut faults = cell.get();
        faults.record(kind);
        cell.set(faults);
    });
}

/// Add a batch of faults counted locally
pub fn merge_faults(local: &FaultCounters) {
    FAULTS.lock(|cell| {
        let mut faults = cell.get();
        faults.merge(local);
        cell.set(faults);
    });
}

/// Snapshot of the fault totals
pub fn faults() -> FaultCounters {
    FAULTS.lock(|cell| cell.get())
}

/// Store a new brightness divisor
pub fn set_brightness(divisor: f64) {
    BRIGHTNESS.lock(|cell| cell.set(divisor));
}

/// Brightness read from the shared cell
pub struct SharedBrightness;

impl BrightnessSource for SharedBrightness {
    fn brightness(&mut self) -> f64 {
        BRIGHTNESS.lock(|cell| cell.get())
    }
}

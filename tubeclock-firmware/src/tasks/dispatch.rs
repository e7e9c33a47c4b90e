//! Sentence dispatch task
//!
//! Runs one dispatch cycle per period. Each cycle pulls bytes from the GPS
//! pipe only until a line completes, so the line decoded is always the one
//! just finished; bytes behind it wait in the pipe for the next cycle
//! instead of being fed in and shadowing it.

use defmt::*;
use embassy_time::{Duration, Ticker};

use tubeclock_core::gps::{DispatchOutcome, SentenceDispatcher};
use tubeclock_core::stats::{FaultCounters, FaultKind};
use tubeclock_protocol::NmeaDecoder;

use crate::channels::{merge_faults, publish_fix, GPS_BYTES};

/// Bytes pulled from the pipe per read
const CHUNK_SIZE: usize = 64;

/// Dispatch task
#[embassy_executor::task]
pub async fn dispatch_task(period_ms: u32) {
    info!("Dispatch task started ({}ms)", period_ms);

    let mut dispatcher: SentenceDispatcher<NmeaDecoder> =
        SentenceDispatcher::new(NmeaDecoder::new());
    let mut ticker = Ticker::every(Duration::from_millis(u64::from(period_ms)));
    let mut chunk = [0u8; CHUNK_SIZE];
    // Unconsumed bytes of the last read carry over to the next cycle
    let (mut start, mut end) = (0usize, 0usize);

    loop {
        ticker.next().await;

        let mut faults = FaultCounters::new();
        while !dispatcher.line_available() {
            if start == end {
                match GPS_BYTES.try_read(&mut chunk) {
                    Ok(n) => {
                        start = 0;
                        end = n;
                    }
                    Err(_) => break,
                }
            }
            let (consumed, overflows) = dispatcher.feed_line(&chunk[start..end]);
            start += consumed;
            faults.record_n(FaultKind::BufferOverflow, overflows);
        }

        handle_outcome(dispatcher.poll(), &mut faults);

        if faults.total() > 0 {
            if faults.buffer_overflows > 0 {
                warn!("GPS line buffer overflowed {} times", faults.buffer_overflows);
            }
            merge_faults(&faults);
        }
    }
}

fn handle_outcome(outcome: DispatchOutcome, faults: &mut FaultCounters) {
    match outcome {
        DispatchOutcome::Idle => {}
        DispatchOutcome::Fix(fix) => {
            debug!("RMC: valid={} time={:?} date={:?}", fix.valid, fix.time, fix.date);
            publish_fix(fix);
        }
        DispatchOutcome::Status(status) => {
            trace!("GGA: quality={} satellites={}", status.quality, status.satellites);
        }
        DispatchOutcome::Ignored(kind) => {
            trace!("Ignored sentence {:?}", kind);
        }
        DispatchOutcome::Failed(e) => {
            debug!("Sentence decode failed: {:?}", e);
            faults.record(FaultKind::Decode);
        }
    }
}

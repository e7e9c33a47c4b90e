//! GPS UART receive task
//!
//! Moves bytes from the buffered UART into the pipe read by the dispatch
//! task. No parsing happens here.

use defmt::*;
use embassy_rp::uart::BufferedUartRx;
use embedded_io_async::Read;

use crate::channels::GPS_BYTES;

/// Buffer size for UART receive
const RX_BUF_SIZE: usize = 64;

/// GPS RX task
#[embassy_executor::task]
pub async fn gps_rx_task(mut rx: BufferedUartRx) {
    info!("GPS RX task started");

    let mut buf = [0u8; RX_BUF_SIZE];

    loop {
        match rx.read(&mut buf).await {
            Ok(n) if n > 0 => {
                trace!("GPS RX: {} bytes", n);
                GPS_BYTES.write_all(&buf[..n]).await;
            }
            Ok(_) => {}
            Err(e) => {
                warn!("GPS UART read error: {:?}", e);
            }
        }
    }
}

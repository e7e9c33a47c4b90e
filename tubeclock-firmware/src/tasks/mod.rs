//! Embassy async tasks
//!
//! Each task runs independently and communicates via channels/signals.

pub mod ambient;
pub mod dispatch;
pub mod gps_rx;
pub mod pps;
pub mod render;

pub use ambient::ambient_task;
pub use dispatch::dispatch_task;
pub use gps_rx::gps_rx_task;
pub use pps::pps_task;
pub use render::{render_task, Tubes};

//! Frame rendering and transmission

pub mod addressing;
pub mod renderer;

pub use addressing::{DeviceTable, SendError};
pub use renderer::{CycleReport, FrameRenderer};

//! GPS sentence ingestion
//!
//! Bytes from the receiver are accumulated into lines, decoded on a fixed
//! period and published as snapshot records for the time synchronizer.

pub mod dispatcher;
pub mod fix;

pub use dispatcher::{DispatchOutcome, SentenceDispatcher};
pub use fix::FixRecord;

//! Input/output helpers.
//!
//! - CSV ingest of daily rows (`ingest`)
//! - matrix CSV export (`export`)
//! - matrix JSON snapshots (`snapshot`)

pub mod export;
pub mod ingest;
pub mod snapshot;

pub use export::*;
pub use ingest::*;
pub use snapshot::*;

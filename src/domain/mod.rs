//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - parsed input rows (`DailyRecord`)
//! - the dense matrix (`YearRange`, `MonthBucket`, `MonthSummary`, `MatrixSnapshot`)
//! - run configuration (`ViewMode`, `MatrixConfig`)

pub mod types;

pub use types::*;

//! Data sources: the daily CSV location and the synthetic sample generator.

pub mod sample;
pub mod source;

pub use sample::{SampleConfig, SampleRow, generate_sample, write_sample_csv};
pub use source::{DEFAULT_DATA_FILE, DataSource};

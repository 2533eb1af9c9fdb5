pub mod error;
pub mod fixed;
pub mod asc;
pub mod lookup;
pub mod binning;
pub mod accumulator;
pub mod scan;
pub mod reduce;
pub mod config;
pub mod params;
pub mod pipeline;

pub use error::{ReduceError, Result};

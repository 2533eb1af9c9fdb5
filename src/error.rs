// error.rs - Failure modes of the epsilon reduction pipeline

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ReduceError>;

#[derive(Debug, Error)]
pub enum ReduceError {
    /// No bin in the reference table can hold `value`.
    #[error("matching bin for {value} not found")]
    InvalidBin { value: f64 },

    #[error("the step cannot be greater than one (got {0})")]
    StepTooLarge(f64),

    #[error("the step must be greater than zero (got {0})")]
    StepNotPositive(f64),

    #[error("{0} exceeds maximum step of 0.00001")]
    StepPrecision(f64),

    #[error("cannot access {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed ASC file {} at line {line}: {message}", .path.display())]
    Asc {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("malformed CSV file {}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("cannot parse YAML from {}", .path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("{name} raster is {}x{}, expected {}x{}", .found.0, .found.1, .expected.0, .expected.1)]
    GridShape {
        name: &'static str,
        expected: (usize, usize),
        found: (usize, usize),
    },
}

impl ReduceError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ReduceError::Io { path: path.into(), source }
    }

    pub(crate) fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        ReduceError::Csv { path: path.into(), source }
    }

    /// True for the step checks that must fail before any file is touched.
    pub fn is_parameter_range(&self) -> bool {
        matches!(
            self,
            ReduceError::StepTooLarge(_) | ReduceError::StepNotPositive(_) | ReduceError::StepPrecision(_)
        )
    }
}

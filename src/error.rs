//! Error handling for iqtools
//!
//! Every fallible operation in the crate returns [`Result`], whose error
//! type is [`IqError`].

use thiserror::Error;

/// Main error type for iqtools operations
#[derive(Error, Debug)]
pub enum IqError {
    /// Sample count does not fit the requested frame grid
    #[error("Shape error: cannot arrange {len} values as {nframes} x {lframes}")]
    Shape {
        len: usize,
        nframes: usize,
        lframes: usize,
    },

    /// Malformed file content, missing metadata, or a bad filename
    #[error("Parse error: {0}")]
    Parse(String),

    /// Argument outside the domain of the operation
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// No reader is registered for the file extension
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// Errors related to configuration loading/saving
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    /// Generic errors with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<IqError>,
    },
}

impl IqError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        IqError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Strip any context layers and return the underlying error.
    pub fn root(&self) -> &IqError {
        match self {
            IqError::WithContext { source, .. } => source.root(),
            other => other,
        }
    }

    pub fn is_parse(&self) -> bool {
        matches!(self.root(), IqError::Parse(_))
    }

    pub fn is_shape(&self) -> bool {
        matches!(self.root(), IqError::Shape { .. })
    }
}

/// Result type alias for iqtools operations
pub type Result<T> = std::result::Result<T, IqError>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error result
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context lazily to an error result
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<IqError>,
{
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.into().with_context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.into().with_context(f()))
    }
}

//! Organisation Builder Library
//!
//! A Rust library for reconciling records about UK public-sector organisations
//! drawn from multiple independently-maintained registers, geographic lookups
//! and curated override files into one canonical record per organisation.
//!
//! This library provides tools for:
//! - Loading tabular sources into ordered flat records with a declared join key
//! - Assigning stable compact identifiers (CURIEs) across source schemas
//! - Merging records field-by-field under a first-write-wins precedence policy
//! - Re-running patch sources over multiple passes to resolve join-key chains
//! - Validating records against category- and lifecycle-conditional rules
//! - Publishing the canonical table in a fixed, diffable column order

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod classifier;
        pub mod publisher;
        pub mod registry;
        pub mod source_adapter;
        pub mod validator;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{Curie, Organisation, SourceRow};
pub use app::services::registry::OrganisationRegistry;
pub use config::PipelineConfig;

/// Result type alias for organisation building operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for organisation building operations
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// CSV parsing error
    #[error("CSV parsing error in source '{source_name}': {message}")]
    CsvParsing {
        source_name: String,
        message: String,
        #[source]
        source: Option<csv::Error>,
    },

    /// Source file not found
    #[error("Source not found: {path}")]
    SourceNotFound { path: String },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Publishing error
    #[error("Publishing error: {message}")]
    Publishing {
        message: String,
        #[source]
        source: Option<csv::Error>,
    },
}

impl Error {
    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a CSV parsing error with context
    pub fn csv_parsing(
        source_name: impl Into<String>,
        message: impl Into<String>,
        source: Option<csv::Error>,
    ) -> Self {
        Self::CsvParsing {
            source_name: source_name.into(),
            message: message.into(),
            source,
        }
    }

    /// Create a source not found error
    pub fn source_not_found(path: impl Into<String>) -> Self {
        Self::SourceNotFound { path: path.into() }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a publishing error
    pub fn publishing(message: impl Into<String>, source: Option<csv::Error>) -> Self {
        Self::Publishing {
            message: message.into(),
            source,
        }
    }
}

// Automatic conversions from common error types
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}

impl From<csv::Error> for Error {
    fn from(error: csv::Error) -> Self {
        Self::CsvParsing {
            source_name: "unknown".to_string(),
            message: "CSV parsing failed".to_string(),
            source: Some(error),
        }
    }
}

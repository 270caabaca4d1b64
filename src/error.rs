//! Error types for module synthesis

use std::fmt;

/// Main error type for metamodule.
///
/// The synthesis-time conditions (duplicated symbols, save format
/// mismatches, execution requests on source-only modules) are
/// unrecoverable by contract: the generated artifact would be wrong, so
/// callers are expected to abort the build rather than retry.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum MetaError {
    // ===== Synthesis Errors =====
    /// Two units registered the same symbol during aggregation.
    DuplicatedSymbol(String),
    /// Requested save format does not match the module's declared format.
    UnsupportedSaveFormat { expected: String, got: String },
    /// Execution was requested on a module that only carries source or metadata.
    NonExecutableModule { fmt: String },

    // ===== IO Errors =====
    /// I/O operation failed.
    IoError(String),

    // ===== Serialization Errors =====
    /// Serialization failed.
    SerializationFailed(String),
    /// Deserialization failed.
    DeserializationFailed(String),

    // ===== Misc Errors =====
    /// Invalid argument provided.
    InvalidArgument(String),
    /// Operation not supported by this module variant.
    UnsupportedOperation(String),
}

impl fmt::Display for MetaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicatedSymbol(symbol) => {
                write!(f, "duplicated symbol: {}", symbol)
            },
            Self::UnsupportedSaveFormat { expected, got } => {
                write!(f, "can only save to format={}, got {}", expected, got)
            },
            Self::NonExecutableModule { fmt } => {
                write!(
                    f,
                    "source module cannot execute, to get an executable module rebuild with '{}' runtime support",
                    fmt
                )
            },
            Self::IoError(msg) => write!(f, "io error: {}", msg),
            Self::SerializationFailed(msg) => write!(f, "serialization failed: {}", msg),
            Self::DeserializationFailed(msg) => write!(f, "deserialization failed: {}", msg),
            Self::InvalidArgument(msg) => write!(f, "invalid argument: {}", msg),
            Self::UnsupportedOperation(msg) => write!(f, "unsupported operation: {}", msg),
        }
    }
}

impl std::error::Error for MetaError {}

impl From<std::io::Error> for MetaError {
    fn from(e: std::io::Error) -> Self {
        MetaError::IoError(e.to_string())
    }
}

/// Result type for metamodule operations
pub type MetaResult<T> = Result<T, MetaError>;

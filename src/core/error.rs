//! Error types for fasta-seek
//!
//! Defines all error types used throughout the library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for fasta-seek operations
#[derive(Debug, Error)]
pub enum FastaSeekError {
    /// Errors raised while opening a reader
    #[error("Open error: {0}")]
    Open(#[from] OpenError),

    /// Errors raised by a range query
    #[error("Query error: {0}")]
    Query(#[from] QueryError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur while opening a sequence file
#[derive(Debug, Error)]
pub enum OpenError {
    /// The backing file could not be opened or read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file is compressed and cannot be seeked
    #[error("Compressed input is not seekable: {0}")]
    Compressed(PathBuf),

    /// The data region could not be located
    #[error("Malformed input: {0}")]
    Malformed(#[from] MalformedInput),
}

/// Reasons the header/data boundary could not be established
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MalformedInput {
    /// Empty file, or nothing but header and comment lines
    #[error("no sequence line found")]
    NoSequenceLine,

    /// The first sequence line has no residues, so fixed-width arithmetic is undefined
    #[error("first sequence line at byte {offset} holds no residues")]
    ZeroWidthLine { offset: u64 },
}

/// Errors that can occur during a range query
#[derive(Debug, Error)]
pub enum QueryError {
    /// Start below 1 or start > end
    #[error("Invalid range: start ({start}) must be >= 1 and <= end ({end})")]
    InvalidRange { start: u64, end: u64 },

    /// The sequence ended before `end` was reached
    #[error("End coordinate out of bounds: {start}-{end} exceeds the available sequence")]
    OutOfBounds { start: u64, end: u64 },

    /// The reader was closed
    #[error("Reader is closed")]
    Closed,

    /// I/O error while seeking or reading
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl QueryError {
    /// Check if the error is a recoverable bounds violation
    pub fn is_out_of_bounds(&self) -> bool {
        matches!(self, QueryError::OutOfBounds { .. })
    }
}

/// Result type alias for fasta-seek operations
pub type Result<T> = std::result::Result<T, FastaSeekError>;

/// Result type alias for open operations
pub type OpenResult<T> = std::result::Result<T, OpenError>;

/// Result type alias for query operations
pub type QueryResult<T> = std::result::Result<T, QueryError>;

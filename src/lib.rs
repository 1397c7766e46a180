//! fasta-seek - Random-access range queries over FASTA files
//!
//! Reads a 1-based, inclusive range of residues from a single-record FASTA
//! file without loading the file into memory.
//!
//! # Features
//!
//! - O(1) arithmetic seeks on uniformly wrapped files
//! - Scanning fallback for irregular wrapping and embedded comment lines
//! - Automatic strategy selection by sampling line widths at open time
//! - Buffered or memory-mapped backing stream
//!
//! # Example
//!
//! ```ignore
//! use fasta_seek::{ReaderConfig, SequenceReader, PositioningStrategy};
//!
//! // Open with automatic strategy selection
//! let mut reader = SequenceReader::open("chrM.fa")?;
//!
//! // First 60 residues, uppercased
//! let seq = reader.get_sequence(1, 60, true)?;
//!
//! // Force the scanning strategy for an irregular file
//! let config = ReaderConfig::default().with_strategy(PositioningStrategy::Scanning);
//! let mut reader = SequenceReader::open_with("ragged.fa", config)?;
//! ```

pub mod core;

// Re-export commonly used types
pub use crate::core::{
    FastaSeekError, IoStrategy, MalformedInput, OpenError, Position, PositioningStrategy,
    QueryError, ReaderConfig, Result, SequenceReader,
};

//! Core random-access functionality
//!
//! This module contains the sequence alphabet, the data region layout
//! detection and the seeking reader built on top of them.

pub mod alphabet;
mod error;
pub mod io;
pub mod layout;
mod reader;

pub use error::{
    FastaSeekError, MalformedInput, OpenError, OpenResult, QueryError, QueryResult, Result,
};
pub use io::{
    CompressionFormat, IoStrategy, MappedReader, SmartReader, DEFAULT_BUFFER_SIZE,
    MMAP_THRESHOLD, SMALL_BUFFER_SIZE,
};
pub use layout::{Positioning, PositioningStrategy, DEFAULT_SAMPLE_LINES};
pub use reader::{Position, ReaderConfig, SequenceReader};

//! Data region layout
//!
//! Locates the first sequence byte behind the header/comment block, measures
//! the first sequence line and decides how logical positions are translated
//! into byte offsets.
//!
//! # File Layout
//!
//! ```text
//! >seq1 description        <- header line (structural)
//! ;free-text comment       <- comment line (structural)
//! ACGTACGTAC               <- first sequence line, width 10
//! ACGTACGTAC
//! ACGT                     <- last line may be shorter
//! ```

use crate::core::alphabet::{is_residue, is_sequence, is_structural};
use crate::core::error::{MalformedInput, OpenResult};
use std::io::{self, BufRead};

/// Default number of lines inspected after the first sequence line
pub const DEFAULT_SAMPLE_LINES: usize = 1024;

/// How logical positions are translated into byte offsets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PositioningStrategy {
    /// Direct arithmetic seek; assumes every line has the first line's width
    FixedWidth,
    /// Count residues forward from the data start
    Scanning,
    /// Validate a sample of lines at open time and pick the fastest safe strategy
    #[default]
    Auto,
}

impl PositioningStrategy {
    /// Parse from string (for CLI argument)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "fixed" | "fixed-width" => Some(PositioningStrategy::FixedWidth),
            "scan" | "scanning" => Some(PositioningStrategy::Scanning),
            "auto" => Some(PositioningStrategy::Auto),
            _ => None,
        }
    }
}

/// Resolved positioning for an open reader
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Positioning {
    /// Uniform lines of `line_width` residues, each `line_bytes` long on disk
    Fixed { line_width: u64, line_bytes: u64 },
    /// Irregular or unknown line widths
    Scan,
}

impl Positioning {
    /// The strategy this positioning implements
    pub fn strategy(&self) -> PositioningStrategy {
        match self {
            Positioning::Fixed { .. } => PositioningStrategy::FixedWidth,
            Positioning::Scan => PositioningStrategy::Scanning,
        }
    }

    /// Residues per line, when fixed
    pub fn line_width(&self) -> Option<u64> {
        match self {
            Positioning::Fixed { line_width, .. } => Some(*line_width),
            Positioning::Scan => None,
        }
    }
}

/// First sequence line, as measured at open time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FirstLine {
    /// Byte offset of the line
    pub offset: u64,
    /// Bytes before the terminator
    pub width: u64,
    /// 2 for `\r\n`, otherwise 1
    pub terminator_len: u64,
    /// Number of residue bytes on the line
    pub residues: u64,
    /// Whether every byte before the terminator is a residue
    pub residues_only: bool,
}

/// Everything learned about the file before the data region
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Boundary {
    /// Byte offset of the first sequence byte
    pub data_start: u64,
    /// Header and comment lines, terminators stripped
    pub header: Vec<String>,
    /// The first sequence line
    pub first_line: FirstLine,
}

/// Why a sampled data region cannot use fixed-width arithmetic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Irregularity {
    /// A line is wider than the first sequence line
    LongLine { line: usize },
    /// More sequence follows a line shorter than the first
    ShortInteriorLine { line: usize },
    /// A header or comment line inside the data region
    StructuralLine { line: usize },
    /// A data line holds bytes outside the alphabet
    ForeignBytes { line: usize },
    /// Line terminators differ from the first line's
    MixedTerminators { line: usize },
}

/// Split a raw line into its content and terminator length
fn split_terminator(line: &[u8]) -> (&[u8], Option<u64>) {
    match line {
        [content @ .., b'\r', b'\n'] => (content, Some(2)),
        [content @ .., b'\n'] => (content, Some(1)),
        _ => (line, None),
    }
}

/// Consume the header/comment block and the first sequence line
///
/// Blank lines before the first sequence line are skipped, so `data_start`
/// points at the first sequence byte. The reader must be positioned at byte 0.
/// On success it is positioned just past the first sequence line.
pub fn read_boundary<R: BufRead>(reader: &mut R) -> OpenResult<Boundary> {
    let mut buffer = Vec::with_capacity(256);
    let mut data_start = 0u64;
    let mut header = Vec::new();

    loop {
        buffer.clear();
        let n = reader.read_until(b'\n', &mut buffer)?;
        if n == 0 {
            return Err(MalformedInput::NoSequenceLine.into());
        }

        let (content, terminator) = split_terminator(&buffer);
        if is_structural(content) {
            header.push(String::from_utf8_lossy(content).into_owned());
            data_start += n as u64;
            continue;
        }
        if content.iter().all(u8::is_ascii_whitespace) {
            data_start += n as u64;
            continue;
        }

        let first_line = FirstLine {
            offset: data_start,
            width: content.len() as u64,
            terminator_len: terminator.unwrap_or(1),
            residues: content.iter().filter(|&&b| is_residue(b)).count() as u64,
            residues_only: is_sequence(content),
        };
        return Ok(Boundary {
            data_start,
            header,
            first_line,
        });
    }
}

/// Check up to `max_lines` lines following the first sequence line
///
/// The reader must be positioned just past the first sequence line.
pub fn check_uniform<R: BufRead>(
    reader: &mut R,
    first: &FirstLine,
    max_lines: usize,
) -> io::Result<Result<(), Irregularity>> {
    let mut buffer = Vec::with_capacity(first.width as usize + 2);
    let mut short_seen = first.width == 0;

    for index in 0..max_lines {
        // 1-based, counting the first sequence line as line 1
        let line = index + 2;
        buffer.clear();
        if reader.read_until(b'\n', &mut buffer)? == 0 {
            break;
        }

        let (content, terminator) = split_terminator(&buffer);
        if content.is_empty() {
            // Blank lines are only acceptable as trailing lines
            short_seen = true;
            continue;
        }
        if is_structural(content) {
            return Ok(Err(Irregularity::StructuralLine { line }));
        }
        if short_seen {
            return Ok(Err(Irregularity::ShortInteriorLine { line: line - 1 }));
        }
        if !is_sequence(content) {
            return Ok(Err(Irregularity::ForeignBytes { line }));
        }
        let width = content.len() as u64;
        if width > first.width {
            return Ok(Err(Irregularity::LongLine { line }));
        }
        if terminator.is_some_and(|len| len != first.terminator_len) {
            return Ok(Err(Irregularity::MixedTerminators { line }));
        }
        if width < first.width {
            short_seen = true;
        }
    }

    Ok(Ok(()))
}

/// Decide how positions are translated for the given boundary
///
/// The reader must be positioned just past the first sequence line; it is
/// only read from under [`PositioningStrategy::Auto`].
pub fn resolve<R: BufRead>(
    reader: &mut R,
    boundary: &Boundary,
    strategy: PositioningStrategy,
    sample_lines: usize,
) -> OpenResult<Positioning> {
    let first = &boundary.first_line;
    let fixed = Positioning::Fixed {
        line_width: first.width,
        line_bytes: first.width + first.terminator_len,
    };

    match strategy {
        PositioningStrategy::Scanning => Ok(Positioning::Scan),
        PositioningStrategy::FixedWidth => {
            if first.residues == 0 {
                return Err(MalformedInput::ZeroWidthLine {
                    offset: first.offset,
                }
                .into());
            }
            if !first.residues_only {
                log::warn!(
                    "first sequence line at byte {} holds non-residue bytes; fixed-width reads may be mispositioned",
                    first.offset
                );
            }
            Ok(fixed)
        }
        PositioningStrategy::Auto => {
            if !first.residues_only {
                log::debug!("first sequence line holds non-residue bytes, using scanning positioning");
                return Ok(Positioning::Scan);
            }
            match check_uniform(reader, first, sample_lines)? {
                Ok(()) => Ok(fixed),
                Err(irregularity) => {
                    log::debug!("irregular line layout ({:?}), using scanning positioning", irregularity);
                    Ok(Positioning::Scan)
                }
            }
        }
    }
}

/// Byte offset of a 1-based logical position under fixed-width layout
///
/// Returns `None` for position 0 or when the offset does not fit in a `u64`.
pub fn fixed_offset(data_start: u64, line_width: u64, line_bytes: u64, position: u64) -> Option<u64> {
    let index = position.checked_sub(1)?;
    let line = index.checked_div(line_width)?;
    let column = index % line_width;
    line.checked_mul(line_bytes)?
        .checked_add(column)?
        .checked_add(data_start)
}

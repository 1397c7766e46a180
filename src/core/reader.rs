//! Random-access sequence reader
//!
//! Answers 1-based, inclusive range queries over a single-record FASTA file
//! by seeking to the first requested residue and streaming forward.
//!
//! The reader follows this flow:
//! 1. At open, skip header/comment lines and measure the first sequence line
//! 2. Resolve a positioning strategy (fixed-width arithmetic or scanning)
//! 3. Per query, seek to the start residue and collect residues until the end

use crate::core::alphabet::{fold_case, is_residue, is_sequence, COMMENT_MARKER, HEADER_MARKER};
use crate::core::error::{OpenError, OpenResult, QueryError, QueryResult};
use crate::core::io::{CompressionFormat, IoStrategy, SmartReader};
use crate::core::layout::{self, Positioning, PositioningStrategy, DEFAULT_SAMPLE_LINES};
use memchr::memchr;
use std::fmt;
use std::io::{self, BufRead, Seek, SeekFrom};
use std::path::Path;

/// 1-based logical position within the ungapped sequence
pub type Position = u64;

/// Upper bound on the capacity reserved up front for one query
const MAX_RESERVE: u64 = 1 << 20;

/// Reader configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReaderConfig {
    /// Positioning strategy requested by the caller
    pub strategy: PositioningStrategy,
    /// Buffered or memory-mapped access (only used when opening a path)
    pub io: IoStrategy,
    /// Lines inspected after the first sequence line under `Auto`
    pub sample_lines: usize,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            strategy: PositioningStrategy::Auto,
            io: IoStrategy::Auto,
            sample_lines: DEFAULT_SAMPLE_LINES,
        }
    }
}

impl ReaderConfig {
    /// Set the positioning strategy
    pub fn with_strategy(mut self, strategy: PositioningStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set the I/O strategy
    pub fn with_io(mut self, io: IoStrategy) -> Self {
        self.io = io;
        self
    }

    /// Set how many lines `Auto` inspects
    pub fn with_sample_lines(mut self, sample_lines: usize) -> Self {
        self.sample_lines = sample_lines;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineState {
    /// Next byte opens a line
    Start,
    /// Inside a sequence line
    Data,
    /// Inside a comment line
    Comment,
}

/// Forward residue stream over the data region
///
/// Tracks the absolute byte offset of the underlying stream and whether the
/// next byte opens a line, so that structural lines can be recognised.
struct ResidueCursor<'a, R> {
    reader: &'a mut R,
    offset: u64,
    line: LineState,
}

impl<'a, R: BufRead> ResidueCursor<'a, R> {
    /// Advance to the next residue without consuming it
    ///
    /// Returns `None` at end of stream or at a header line opening the next
    /// record.
    fn peek(&mut self) -> io::Result<Option<u8>> {
        loop {
            let buf = self.reader.fill_buf()?;
            if buf.is_empty() {
                return Ok(None);
            }

            let mut used = 0;
            let mut found = None;
            let mut boundary = false;
            while used < buf.len() {
                let byte = buf[used];
                match self.line {
                    LineState::Start => match byte {
                        HEADER_MARKER => {
                            boundary = true;
                            break;
                        }
                        COMMENT_MARKER => {
                            self.line = LineState::Comment;
                            used += 1;
                        }
                        _ => self.line = LineState::Data,
                    },
                    LineState::Comment => match memchr(b'\n', &buf[used..]) {
                        Some(i) => {
                            used += i + 1;
                            self.line = LineState::Start;
                        }
                        None => used = buf.len(),
                    },
                    LineState::Data => {
                        if byte == b'\n' {
                            self.line = LineState::Start;
                            used += 1;
                        } else if is_residue(byte) {
                            found = Some(byte);
                            break;
                        } else {
                            used += 1;
                        }
                    }
                }
            }

            self.reader.consume(used);
            self.offset += used as u64;
            if boundary {
                log::trace!("record boundary at byte {}", self.offset);
                return Ok(None);
            }
            if found.is_some() {
                return Ok(found);
            }
        }
    }

    /// Consume up to `want` residues from the current line, feeding each to `sink`
    ///
    /// Must be called right after `peek` returned a residue.
    fn advance_in_line(&mut self, want: u64, mut sink: impl FnMut(u8)) -> io::Result<u64> {
        let buf = self.reader.fill_buf()?;
        let line_end = memchr(b'\n', buf).unwrap_or(buf.len());

        let mut used = 0;
        let mut taken = 0u64;
        for &byte in &buf[..line_end] {
            if taken == want {
                break;
            }
            used += 1;
            if is_residue(byte) {
                sink(byte);
                taken += 1;
            }
        }

        self.reader.consume(used);
        self.offset += used as u64;
        Ok(taken)
    }

    /// Skip `count` residues, returning how many were available
    fn skip(&mut self, count: u64) -> io::Result<u64> {
        let mut skipped = 0;
        while skipped < count {
            if self.peek()?.is_none() {
                break;
            }
            skipped += self.advance_in_line(count - skipped, |_| {})?;
        }
        Ok(skipped)
    }

    /// Append `count` residues to `out`, returning how many were available
    fn take_into(&mut self, count: u64, uppercase: bool, out: &mut Vec<u8>) -> io::Result<u64> {
        let mut taken = 0;
        while taken < count {
            if self.peek()?.is_none() {
                break;
            }
            taken += self.advance_in_line(count - taken, |b| out.push(fold_case(b, uppercase)))?;
        }
        Ok(taken)
    }

    /// Consume one byte, reporting whether it ends a line (true at EOF)
    fn ends_line(&mut self) -> io::Result<bool> {
        let ends = match self.reader.fill_buf()?.first() {
            None => return Ok(true),
            Some(&byte) => byte == b'\n',
        };
        self.reader.consume(1);
        self.offset += 1;
        Ok(ends)
    }

    /// Walk `column` bytes into a line reached by fixed-width arithmetic
    ///
    /// Must start at a line start. Returns false when the line is structural,
    /// holds non-residue bytes before the column, or the byte at the column is
    /// not a residue; the arithmetic cannot be trusted for such a line. Running
    /// out of input is not a mismatch: the position lies past the end.
    fn enter_column(&mut self, column: u64) -> io::Result<bool> {
        match self.reader.fill_buf()?.first() {
            None => return Ok(true),
            Some(&HEADER_MARKER) | Some(&COMMENT_MARKER) => return Ok(false),
            Some(_) => {}
        }

        let mut remaining = column;
        while remaining > 0 {
            let buf = self.reader.fill_buf()?;
            if buf.is_empty() {
                return Ok(true);
            }
            let n = remaining.min(buf.len() as u64) as usize;
            if !is_sequence(&buf[..n]) {
                return Ok(false);
            }
            self.reader.consume(n);
            self.offset += n as u64;
            remaining -= n as u64;
        }

        Ok(self.reader.fill_buf()?.first().map_or(true, |&b| is_residue(b)))
    }
}

/// Random-access reader over one FASTA record
///
/// # Example
///
/// ```no_run
/// use fasta_seek::SequenceReader;
///
/// let mut reader = SequenceReader::open("chr21.fa")?;
/// let seq = reader.get_sequence(5_010_001, 5_010_060, true)?;
/// assert_eq!(seq.len(), 60);
/// reader.close();
/// # Ok::<(), fasta_seek::FastaSeekError>(())
/// ```
pub struct SequenceReader<R> {
    stream: Option<R>,
    data_start: u64,
    positioning: Positioning,
    header: Vec<String>,
}

impl<R> fmt::Debug for SequenceReader<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SequenceReader")
            .field("data_start", &self.data_start)
            .field("positioning", &self.positioning)
            .field("header", &self.header)
            .field("closed", &self.stream.is_none())
            .finish()
    }
}

impl SequenceReader<SmartReader> {
    /// Open a FASTA file with the default configuration
    pub fn open<P: AsRef<Path>>(path: P) -> OpenResult<Self> {
        Self::open_with(path, ReaderConfig::default())
    }

    /// Open a FASTA file with an explicit configuration
    pub fn open_with<P: AsRef<Path>>(path: P, config: ReaderConfig) -> OpenResult<Self> {
        let path = path.as_ref();
        let mut stream = SmartReader::open(path, config.io)?;

        let format = stream.sniff_compression()?;
        if format != CompressionFormat::Plain {
            log::debug!("{:?} compression detected in {}", format, path.display());
            return Err(OpenError::Compressed(path.to_path_buf()));
        }

        log::debug!(
            "opened {} ({})",
            path.display(),
            if stream.is_mapped() { "memory-mapped" } else { "buffered" }
        );
        Self::from_reader(stream, config)
    }
}

impl<R: BufRead + Seek> SequenceReader<R> {
    /// Build a reader over any seekable buffered stream
    ///
    /// The stream is rewound to byte 0 before the boundary is located.
    pub fn from_reader(mut stream: R, config: ReaderConfig) -> OpenResult<Self> {
        stream.rewind()?;
        let boundary = layout::read_boundary(&mut stream)?;
        let positioning =
            layout::resolve(&mut stream, &boundary, config.strategy, config.sample_lines)?;

        log::debug!(
            "data starts at byte {}, first line width {}, {:?} positioning",
            boundary.data_start,
            boundary.first_line.width,
            positioning.strategy()
        );

        Ok(Self {
            stream: Some(stream),
            data_start: boundary.data_start,
            positioning,
            header: boundary.header,
        })
    }

    /// Get the residues from `start` to `end`, both 1-based and inclusive
    ///
    /// With `uppercase`, lowercase residues are folded to uppercase;
    /// otherwise case is preserved.
    ///
    /// # Errors
    ///
    /// - `InvalidRange` if `start` is 0 or `start > end`
    /// - `OutOfBounds` if the sequence ends before `end`
    /// - `Closed` if the reader was closed
    pub fn get_sequence(&mut self, start: Position, end: Position, uppercase: bool) -> QueryResult<String> {
        let mut buffer = Vec::new();
        self.get_sequence_bytes(start, end, uppercase, &mut buffer)?;
        // Residues are ASCII
        Ok(buffer.into_iter().map(char::from).collect())
    }

    /// Like [`get_sequence`](Self::get_sequence), filling a caller-supplied buffer
    ///
    /// `out` is cleared first and left empty on error.
    pub fn get_sequence_bytes(
        &mut self,
        start: Position,
        end: Position,
        uppercase: bool,
        out: &mut Vec<u8>,
    ) -> QueryResult<()> {
        out.clear();
        let len = range_len(start, end)?;

        let mut cursor = self.position_at(start, end)?;
        log::trace!("{}-{}: start residue at byte {}", start, end, cursor.offset);

        out.reserve(len.min(MAX_RESERVE) as usize);
        let taken = cursor.take_into(len, uppercase, out)?;
        if taken < len {
            out.clear();
            return Err(QueryError::OutOfBounds { start, end });
        }
        Ok(())
    }

    /// Byte offset of the residue at a logical position
    pub fn byte_offset(&mut self, position: Position) -> QueryResult<u64> {
        range_len(position, position)?;
        Ok(self.position_at(position, position)?.offset)
    }

    /// Seek to the residue at `start`; `end` only labels errors
    fn position_at(&mut self, start: Position, end: Position) -> QueryResult<ResidueCursor<'_, R>> {
        let data_start = self.data_start;
        let positioning = self.positioning;
        let stream = self.stream.as_mut().ok_or(QueryError::Closed)?;

        let mut cursor = match positioning {
            Positioning::Fixed { line_width, line_bytes } => {
                let offset = layout::fixed_offset(data_start, line_width, line_bytes, start)
                    .ok_or(QueryError::OutOfBounds { start, end })?;
                let column = (start - 1) % line_width;
                let line_start = offset - column;
                // The computed line must follow a terminator to be a real line start
                let from = if line_start > data_start { line_start - 1 } else { line_start };
                stream.seek(SeekFrom::Start(from))?;

                let mut walker = ResidueCursor {
                    reader: &mut *stream,
                    offset: from,
                    line: LineState::Start,
                };
                let aligned = (from == line_start || walker.ends_line()?) && walker.enter_column(column)?;

                if aligned {
                    let line = if column == 0 {
                        LineState::Start
                    } else {
                        LineState::Data
                    };
                    ResidueCursor { reader: stream, offset, line }
                } else {
                    log::debug!(
                        "line at byte {} breaks the fixed-width layout, rescanning for position {}",
                        line_start,
                        start
                    );
                    scan_to(stream, data_start, start, end)?
                }
            }
            Positioning::Scan => scan_to(stream, data_start, start, end)?,
        };

        // Land exactly on the start residue
        if cursor.peek()?.is_none() {
            return Err(QueryError::OutOfBounds { start, end });
        }
        Ok(cursor)
    }

    /// Release the underlying stream; calling it again has no effect
    pub fn close(&mut self) {
        if self.stream.take().is_some() {
            log::trace!("reader closed");
        }
    }

    /// Check if the reader was closed
    pub fn is_closed(&self) -> bool {
        self.stream.is_none()
    }

    /// Byte offset of the first sequence byte
    pub fn data_start(&self) -> u64 {
        self.data_start
    }

    /// Residues per line, when fixed-width positioning is in use
    pub fn line_width(&self) -> Option<u64> {
        self.positioning.line_width()
    }

    /// The resolved positioning strategy (never `Auto`)
    pub fn strategy(&self) -> PositioningStrategy {
        self.positioning.strategy()
    }

    /// Header and comment lines preceding the sequence
    pub fn header(&self) -> &[String] {
        &self.header
    }
}

/// Count residues forward from the data start up to `start`
fn scan_to<R: BufRead + Seek>(
    stream: &mut R,
    data_start: u64,
    start: Position,
    end: Position,
) -> QueryResult<ResidueCursor<'_, R>> {
    stream.seek(SeekFrom::Start(data_start))?;
    let mut cursor = ResidueCursor {
        reader: stream,
        offset: data_start,
        line: LineState::Start,
    };
    let wanted = start - 1;
    if cursor.skip(wanted)? < wanted {
        return Err(QueryError::OutOfBounds { start, end });
    }
    Ok(cursor)
}

/// Number of residues in a 1-based inclusive range
fn range_len(start: Position, end: Position) -> QueryResult<u64> {
    if start == 0 || start > end {
        return Err(QueryError::InvalidRange { start, end });
    }
    // start >= 1, so this cannot overflow
    Ok(end - start + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::MalformedInput;
    use std::io::{Cursor, Write};
    use tempfile::NamedTempFile;

    const STRATEGIES: [PositioningStrategy; 3] = [
        PositioningStrategy::Auto,
        PositioningStrategy::FixedWidth,
        PositioningStrategy::Scanning,
    ];

    fn reader(data: &[u8], strategy: PositioningStrategy) -> SequenceReader<Cursor<Vec<u8>>> {
        let config = ReaderConfig::default().with_strategy(strategy);
        SequenceReader::from_reader(Cursor::new(data.to_vec()), config).unwrap()
    }

    fn assert_out_of_bounds<T: fmt::Debug>(result: QueryResult<T>) {
        match result {
            Err(QueryError::OutOfBounds { .. }) => {}
            other => panic!("expected OutOfBounds, got {:?}", other),
        }
    }

    #[test]
    fn test_basic_scenario() {
        for strategy in STRATEGIES {
            let mut r = reader(b">seq1\nACGTACGT\nACGT\n", strategy);
            assert_eq!(r.get_sequence(1, 4, false).unwrap(), "ACGT");
            assert_eq!(r.get_sequence(5, 12, false).unwrap(), "ACGTACGT");
            assert_eq!(r.get_sequence(9, 12, true).unwrap(), "ACGT");
            assert_out_of_bounds(r.get_sequence(1, 13, false));
        }
    }

    #[test]
    fn test_mixed_case_scenario() {
        for strategy in STRATEGIES {
            let mut r = reader(b">s\nacgtACGT\n", strategy);
            assert_eq!(r.get_sequence(1, 8, true).unwrap(), "ACGTACGT");
            assert_eq!(r.get_sequence(1, 8, false).unwrap(), "acgtACGT");
        }
    }

    #[test]
    fn test_invalid_range() {
        let mut r = reader(b">s\nACGT\n", PositioningStrategy::Auto);
        match r.get_sequence(0, 1, false) {
            Err(QueryError::InvalidRange { start: 0, end: 1 }) => {}
            other => panic!("expected InvalidRange, got {:?}", other),
        }
        match r.get_sequence(3, 2, false) {
            Err(QueryError::InvalidRange { start: 3, end: 2 }) => {}
            other => panic!("expected InvalidRange, got {:?}", other),
        }
        assert!(matches!(r.byte_offset(0), Err(QueryError::InvalidRange { .. })));
    }

    #[test]
    fn test_start_beyond_sequence() {
        for strategy in STRATEGIES {
            let mut r = reader(b">s\nACGT\nAC\n", strategy);
            assert_eq!(r.get_sequence(6, 6, false).unwrap(), "C");
            assert_out_of_bounds(r.get_sequence(7, 7, false));
            assert_out_of_bounds(r.get_sequence(100, 200, false));
            assert_out_of_bounds(r.get_sequence(u64::MAX, u64::MAX, false));
        }
    }

    #[test]
    fn test_no_header() {
        for strategy in STRATEGIES {
            let mut r = reader(b"ACGTAC\nGTA\n", strategy);
            assert_eq!(r.data_start(), 0);
            assert!(r.header().is_empty());
            assert_eq!(r.get_sequence(5, 9, false).unwrap(), "ACGTA");
        }
    }

    #[test]
    fn test_no_trailing_newline() {
        for strategy in STRATEGIES {
            let mut r = reader(b">s\nACGT\nTT", strategy);
            assert_eq!(r.get_sequence(4, 6, false).unwrap(), "TTT");
            assert_out_of_bounds(r.get_sequence(4, 7, false));
        }
    }

    #[test]
    fn test_crlf_line_endings() {
        for strategy in STRATEGIES {
            let mut r = reader(b">s\r\nACGTAC\r\nGTACGT\r\nAA\r\n", strategy);
            assert_eq!(r.get_sequence(5, 9, false).unwrap(), "ACGTA");
            assert_eq!(r.get_sequence(13, 14, false).unwrap(), "AA");
            assert_out_of_bounds(r.get_sequence(14, 15, false));
        }
    }

    #[test]
    fn test_irregular_widths_resolve_to_scanning() {
        let mut r = reader(b">s\nACG\nTACGTA\nC\nGT\n", PositioningStrategy::Auto);
        assert_eq!(r.strategy(), PositioningStrategy::Scanning);
        assert_eq!(r.line_width(), None);
        assert_eq!(r.get_sequence(3, 8, false).unwrap(), "GTACGT");
        assert_eq!(r.get_sequence(10, 12, false).unwrap(), "CGT");
    }

    #[test]
    fn test_uniform_widths_resolve_to_fixed() {
        let r = reader(b">s\nACGT\nACGT\nA\n", PositioningStrategy::Auto);
        assert_eq!(r.strategy(), PositioningStrategy::FixedWidth);
        assert_eq!(r.line_width(), Some(4));
    }

    #[test]
    fn test_comment_lines_inside_data() {
        for strategy in [PositioningStrategy::Auto, PositioningStrategy::Scanning] {
            let mut r = reader(b">s\n;top\nACGT\n;middle ACGT\nTTGG\n", strategy);
            assert_eq!(r.get_sequence(1, 8, false).unwrap(), "ACGTTTGG");
            assert_eq!(r.get_sequence(5, 5, false).unwrap(), "T");
            assert_eq!(r.header(), &[">s".to_string(), ";top".to_string()]);
        }
    }

    #[test]
    fn test_stops_at_second_record() {
        for strategy in STRATEGIES {
            let mut r = reader(b">a\nACGT\nAC\n>b\nTTTT\n", strategy);
            assert_eq!(r.get_sequence(1, 6, false).unwrap(), "ACGTAC");
            assert_out_of_bounds(r.get_sequence(1, 7, false));
            assert_out_of_bounds(r.get_sequence(7, 7, false));
            assert_out_of_bounds(r.get_sequence(8, 8, false));
            assert_out_of_bounds(r.get_sequence(9, 9, false));
            assert_out_of_bounds(r.byte_offset(8));
        }
    }

    #[test]
    fn test_fixed_width_skips_comment_lines_in_data() {
        let mut r = reader(b">s\nACGT\n;xyz\nACGT\n", PositioningStrategy::FixedWidth);
        assert_eq!(r.strategy(), PositioningStrategy::FixedWidth);
        assert_eq!(r.get_sequence(6, 7, false).unwrap(), "CG");
        assert_eq!(r.get_sequence(5, 8, false).unwrap(), "ACGT");
        assert_eq!(r.byte_offset(5).unwrap(), 13);
    }

    #[test]
    fn test_comment_beyond_auto_sample() {
        let config = ReaderConfig::default().with_sample_lines(1);
        let data = b">s\nACGT\nACGT\n;xyz\nACGT\n".to_vec();
        let mut r = SequenceReader::from_reader(Cursor::new(data), config).unwrap();
        assert_eq!(r.strategy(), PositioningStrategy::FixedWidth);
        assert_eq!(r.get_sequence(10, 11, false).unwrap(), "CG");
        assert_eq!(r.get_sequence(1, 12, false).unwrap(), "ACGTACGTACGT");
    }

    #[test]
    fn test_stray_bytes_are_skipped() {
        let mut r = reader(b">s\nAC GT\tAC\nG1T\n", PositioningStrategy::Auto);
        assert_eq!(r.strategy(), PositioningStrategy::Scanning);
        assert_eq!(r.get_sequence(1, 8, false).unwrap(), "ACGTACGT");
        assert_eq!(r.get_sequence(3, 3, false).unwrap(), "G");
    }

    #[test]
    fn test_stop_and_gap_codes() {
        let mut r = reader(b">p\nMKV-L*\n", PositioningStrategy::Auto);
        assert_eq!(r.get_sequence(3, 6, false).unwrap(), "V-L*");
    }

    #[test]
    fn test_blank_first_line() {
        for strategy in STRATEGIES {
            let mut r = reader(b">s\n\nACGT\n", strategy);
            assert_eq!(r.data_start(), 4);
            assert_eq!(r.get_sequence(2, 4, false).unwrap(), "CGT");
        }
    }

    #[test]
    fn test_first_line_without_residues() {
        let config = ReaderConfig::default().with_strategy(PositioningStrategy::FixedWidth);
        match SequenceReader::from_reader(Cursor::new(b">s\n....\nACGT\n".to_vec()), config) {
            Err(OpenError::Malformed(MalformedInput::ZeroWidthLine { offset: 3 })) => {}
            other => panic!("expected ZeroWidthLine, got {:?}", other),
        }

        let mut r = reader(b">s\n....\nACGT\n", PositioningStrategy::Auto);
        assert_eq!(r.strategy(), PositioningStrategy::Scanning);
        assert_eq!(r.get_sequence(1, 4, false).unwrap(), "ACGT");
    }

    #[test]
    fn test_header_only_fails_open() {
        let result = SequenceReader::from_reader(Cursor::new(b">s\n;c\n".to_vec()), ReaderConfig::default());
        assert!(matches!(
            result,
            Err(OpenError::Malformed(MalformedInput::NoSequenceLine))
        ));
    }

    #[test]
    fn test_byte_offset_agrees_between_strategies() {
        let data = b">seq1\nACGTACGT\nACGT\n";
        let mut fixed = reader(data, PositioningStrategy::FixedWidth);
        let mut scan = reader(data, PositioningStrategy::Scanning);
        for p in 1..=12 {
            assert_eq!(fixed.byte_offset(p).unwrap(), scan.byte_offset(p).unwrap());
        }
        assert_eq!(fixed.byte_offset(1).unwrap(), 6);
        assert_eq!(fixed.byte_offset(9).unwrap(), 15);
        assert!(scan.byte_offset(13).unwrap_err().is_out_of_bounds());
    }

    #[test]
    fn test_queries_in_any_order() {
        let mut r = reader(b">s\nAACCGGTT\nACGT\n", PositioningStrategy::Scanning);
        assert_eq!(r.get_sequence(9, 10, false).unwrap(), "AC");
        assert_eq!(r.get_sequence(1, 2, false).unwrap(), "AA");
        assert_eq!(r.get_sequence(7, 9, false).unwrap(), "TTA");
    }

    #[test]
    fn test_bytes_buffer_is_cleared() {
        let mut r = reader(b">s\nACGT\n", PositioningStrategy::Auto);
        let mut buffer = b"stale".to_vec();
        r.get_sequence_bytes(2, 3, false, &mut buffer).unwrap();
        assert_eq!(buffer, b"CG");
        assert!(r.get_sequence_bytes(2, 9, false, &mut buffer).is_err());
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_debug_shows_layout() {
        let mut r = reader(b">s\nACGTACGT\nACGT\n", PositioningStrategy::Auto);
        let shown = format!("{:?}", r);
        assert!(shown.contains("data_start: 3"), "{}", shown);
        assert!(shown.contains("line_width: 8"), "{}", shown);
        assert!(shown.contains("\">s\""), "{}", shown);
        assert!(shown.contains("closed: false"), "{}", shown);

        r.close();
        assert!(format!("{:?}", r).contains("closed: true"));
    }

    #[test]
    fn test_close_is_idempotent() {
        let mut r = reader(b">s\nACGT\n", PositioningStrategy::Auto);
        assert!(!r.is_closed());
        r.close();
        r.close();
        assert!(r.is_closed());
        assert!(matches!(r.get_sequence(1, 1, false), Err(QueryError::Closed)));
    }

    #[test]
    fn test_open_file_buffered_and_mapped() -> std::io::Result<()> {
        let mut temp = NamedTempFile::new()?;
        temp.write_all(b">chr1 test\nacgtacgtac\nGTACGTACGT\nNNNN\n")?;
        temp.flush()?;

        for io in [IoStrategy::Buffered(16), IoStrategy::MemoryMapped, IoStrategy::Auto] {
            let config = ReaderConfig::default().with_io(io);
            let mut r = SequenceReader::open_with(temp.path(), config).unwrap();
            assert_eq!(r.data_start(), 11);
            assert_eq!(r.header(), &[">chr1 test".to_string()]);
            assert_eq!(r.get_sequence(9, 12, false).unwrap(), "acGT");
            assert_eq!(r.get_sequence(9, 12, true).unwrap(), "ACGT");
            assert_eq!(r.get_sequence(21, 24, false).unwrap(), "NNNN");
            assert_out_of_bounds(r.get_sequence(21, 25, false));
        }
        Ok(())
    }

    #[test]
    fn test_open_missing_file() {
        let result = SequenceReader::open("/nonexistent/definitely/missing.fa");
        assert!(matches!(result, Err(OpenError::Io(_))));
    }

    #[test]
    fn test_open_rejects_gzip() -> std::io::Result<()> {
        let mut temp = NamedTempFile::new()?;
        temp.write_all(&[0x1f, 0x8b, 0x08, 0x00, 0x00])?;
        temp.flush()?;

        assert!(matches!(
            SequenceReader::open(temp.path()),
            Err(OpenError::Compressed(_))
        ));
        Ok(())
    }

    #[test]
    fn test_open_empty_file() -> std::io::Result<()> {
        let temp = NamedTempFile::new()?;
        assert!(matches!(
            SequenceReader::open(temp.path()),
            Err(OpenError::Malformed(MalformedInput::NoSequenceLine))
        ));
        Ok(())
    }
}

//! Seekable I/O abstraction layer
//!
//! Provides buffered or memory-mapped access to a sequence file. Both
//! variants implement `BufRead + Seek`, which is all the reader needs.

use memmap2::Mmap;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read, Seek, SeekFrom};
use std::path::Path;

/// Default buffer size for BufReader (128KB)
pub const DEFAULT_BUFFER_SIZE: usize = 128 * 1024;

/// Small buffer size for short random-access reads (8KB)
pub const SMALL_BUFFER_SIZE: usize = 8 * 1024;

/// Threshold for using memory mapping (100MB)
pub const MMAP_THRESHOLD: u64 = 100 * 1024 * 1024;

/// I/O strategy selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IoStrategy {
    /// Use buffered reading with configurable buffer size
    Buffered(usize),
    /// Use memory mapping for the entire file
    MemoryMapped,
    /// Automatically select based on file size
    #[default]
    Auto,
}

impl IoStrategy {
    /// Parse from string (for CLI argument)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "auto" => Some(IoStrategy::Auto),
            "buffered" | "buf" => Some(IoStrategy::Buffered(DEFAULT_BUFFER_SIZE)),
            "mmap" | "mapped" => Some(IoStrategy::MemoryMapped),
            _ => None,
        }
    }
}

/// Compression format detected from leading magic bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionFormat {
    /// Plain text (uncompressed)
    Plain,
    /// Gzip or BGZF compressed
    Gzip,
    /// Bzip2 compressed
    Bzip2,
}

/// Detect compression from the first bytes of a stream
///
/// Bzip2 requires the block-size digit after `BZh`, so a plain sequence line
/// starting with the residues `BZh` is not mistaken for it.
pub fn detect_compression(magic: &[u8]) -> CompressionFormat {
    match magic {
        [0x1f, 0x8b, ..] => CompressionFormat::Gzip,
        [b'B', b'Z', b'h', b'1'..=b'9', ..] => CompressionFormat::Bzip2,
        _ => CompressionFormat::Plain,
    }
}

/// A reader that selects buffered or memory-mapped access
pub enum SmartReader {
    /// Buffered reader for smaller files
    Buffered(BufReader<File>),
    /// Memory-mapped reader for large files
    Mapped(MappedReader),
}

/// Memory-mapped file reader
pub struct MappedReader {
    mmap: Mmap,
    position: u64,
}

impl MappedReader {
    /// Create a new memory-mapped reader
    pub fn new(file: &File) -> io::Result<Self> {
        // SAFETY: We assume the file won't be modified while mapped
        let mmap = unsafe { Mmap::map(file)? };
        Ok(Self { mmap, position: 0 })
    }

    /// Get remaining bytes from current position
    fn remaining(&self) -> &[u8] {
        let start = usize::try_from(self.position)
            .unwrap_or(usize::MAX)
            .min(self.mmap.len());
        &self.mmap[start..]
    }
}

impl Read for MappedReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let remaining = self.remaining();
        let to_read = std::cmp::min(buf.len(), remaining.len());
        buf[..to_read].copy_from_slice(&remaining[..to_read]);
        self.position += to_read as u64;
        Ok(to_read)
    }
}

impl BufRead for MappedReader {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        Ok(self.remaining())
    }

    fn consume(&mut self, amt: usize) {
        self.position = std::cmp::min(self.position + amt as u64, self.mmap.len() as u64);
    }
}

impl Seek for MappedReader {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let target = match pos {
            SeekFrom::Start(offset) => Some(offset),
            SeekFrom::End(delta) => (self.mmap.len() as u64).checked_add_signed(delta),
            SeekFrom::Current(delta) => self.position.checked_add_signed(delta),
        };
        match target {
            Some(position) => {
                // Seeking past the end is allowed; reads there return EOF
                self.position = position;
                Ok(position)
            }
            None => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "invalid seek to a negative or overflowing position",
            )),
        }
    }
}

impl SmartReader {
    /// Open a file with the specified I/O strategy
    pub fn open<P: AsRef<Path>>(path: P, strategy: IoStrategy) -> io::Result<Self> {
        let file = File::open(path.as_ref())?;
        let file_size = file.metadata()?.len();

        let mapped = match strategy {
            IoStrategy::Buffered(_) => false,
            IoStrategy::MemoryMapped => true,
            IoStrategy::Auto => file_size >= MMAP_THRESHOLD,
        };

        if mapped {
            return Ok(SmartReader::Mapped(MappedReader::new(&file)?));
        }

        let buf_size = match strategy {
            IoStrategy::Buffered(size) => size.max(1),
            // Range queries touch short windows; a large buffer only costs refills after seeks
            _ => SMALL_BUFFER_SIZE,
        };
        Ok(SmartReader::Buffered(BufReader::with_capacity(buf_size, file)))
    }

    /// Check if using memory mapping
    pub fn is_mapped(&self) -> bool {
        matches!(self, SmartReader::Mapped(_))
    }

    /// Peek the leading bytes of the stream and rewind
    pub fn sniff_compression(&mut self) -> io::Result<CompressionFormat> {
        let mut magic = [0u8; 4];
        let mut filled = 0;
        while filled < magic.len() {
            match self.read(&mut magic[filled..])? {
                0 => break,
                n => filled += n,
            }
        }
        self.rewind()?;
        Ok(detect_compression(&magic[..filled]))
    }
}

impl Read for SmartReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            SmartReader::Buffered(reader) => reader.read(buf),
            SmartReader::Mapped(reader) => reader.read(buf),
        }
    }
}

impl BufRead for SmartReader {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        match self {
            SmartReader::Buffered(reader) => reader.fill_buf(),
            SmartReader::Mapped(reader) => reader.fill_buf(),
        }
    }

    fn consume(&mut self, amt: usize) {
        match self {
            SmartReader::Buffered(reader) => reader.consume(amt),
            SmartReader::Mapped(reader) => reader.consume(amt),
        }
    }
}

impl Seek for SmartReader {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        match self {
            SmartReader::Buffered(reader) => reader.seek(pos),
            SmartReader::Mapped(reader) => reader.seek(pos),
        }
    }
}

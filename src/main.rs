//! fasta-seek CLI entry point
//!
//! Prints residue ranges from a single-record FASTA file.

use anyhow::Context;
use clap::{Parser, ValueEnum};
use fasta_seek::core::DEFAULT_BUFFER_SIZE;
use fasta_seek::{IoStrategy, Position, PositioningStrategy, ReaderConfig, SequenceReader};
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::time::Instant;

/// Positioning strategy (CLI enum)
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
enum StrategyArg {
    /// Sample line widths at open time and pick fixed or scan
    #[default]
    #[value(name = "auto")]
    Auto,
    /// Arithmetic seek assuming uniform line width
    #[value(name = "fixed")]
    Fixed,
    /// Count residues from the start of the sequence
    #[value(name = "scan")]
    Scan,
}

impl From<StrategyArg> for PositioningStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Auto => PositioningStrategy::Auto,
            StrategyArg::Fixed => PositioningStrategy::FixedWidth,
            StrategyArg::Scan => PositioningStrategy::Scanning,
        }
    }
}

/// I/O strategy (CLI enum)
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
enum IoArg {
    /// Memory-map large files, buffer small ones
    #[default]
    #[value(name = "auto")]
    Auto,
    /// Always use a buffered reader
    #[value(name = "buffered")]
    Buffered,
    /// Always memory-map the file
    #[value(name = "mmap")]
    Mmap,
}

impl From<IoArg> for IoStrategy {
    fn from(arg: IoArg) -> Self {
        match arg {
            IoArg::Auto => IoStrategy::Auto,
            IoArg::Buffered => IoStrategy::Buffered(DEFAULT_BUFFER_SIZE),
            IoArg::Mmap => IoStrategy::MemoryMapped,
        }
    }
}

#[derive(Parser)]
#[command(name = "fasta-seek")]
#[command(about = "Print residue ranges from a FASTA file without loading it")]
#[command(version)]
#[command(author = "fasta-seek Contributors")]
struct Cli {
    /// Input FASTA file (single record, uncompressed)
    fasta: PathBuf,
    /// First residue, 1-based
    start: Option<Position>,
    /// Last residue, inclusive
    end: Option<Position>,
    /// Additional ranges as START-END (repeatable)
    #[arg(short = 'r', long = "region", value_parser = parse_region)]
    regions: Vec<(Position, Position)>,
    /// Uppercase the output
    #[arg(short = 'u', long)]
    uppercase: bool,
    /// Positioning strategy
    #[arg(long, default_value = "auto")]
    strategy: StrategyArg,
    /// I/O strategy
    #[arg(long, default_value = "auto")]
    io: IoArg,
    /// Lines sampled at open time by the auto strategy
    #[arg(long, default_value_t = fasta_seek::core::DEFAULT_SAMPLE_LINES)]
    sample_lines: usize,
}

/// Parse a START-END region
fn parse_region(s: &str) -> Result<(Position, Position), String> {
    let (start, end) = s
        .split_once('-')
        .ok_or_else(|| format!("expected START-END, got '{}'", s))?;
    let start = start
        .trim()
        .replace(',', "")
        .parse()
        .map_err(|e| format!("invalid start '{}': {}", start, e))?;
    let end = end
        .trim()
        .replace(',', "")
        .parse()
        .map_err(|e| format!("invalid end '{}': {}", end, e))?;
    Ok((start, end))
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let started = Instant::now();

    let mut regions = Vec::with_capacity(cli.regions.len() + 1);
    match (cli.start, cli.end) {
        (Some(start), Some(end)) => regions.push((start, end)),
        (Some(start), None) => regions.push((start, start)),
        (None, _) => {}
    }
    regions.extend(cli.regions.iter().copied());
    if regions.is_empty() {
        anyhow::bail!("no range given; pass START [END] or --region START-END");
    }

    let config = ReaderConfig::default()
        .with_strategy(cli.strategy.into())
        .with_io(cli.io.into())
        .with_sample_lines(cli.sample_lines);
    let mut reader = SequenceReader::open_with(&cli.fasta, config)
        .with_context(|| format!("Failed to open {}", cli.fasta.display()))?;
    log::info!(
        "{}: data at byte {}, {:?} positioning",
        cli.fasta.display(),
        reader.data_start(),
        reader.strategy()
    );

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let mut buffer = Vec::new();
    for (start, end) in regions {
        reader
            .get_sequence_bytes(start, end, cli.uppercase, &mut buffer)
            .with_context(|| format!("Failed to read {}-{}", start, end))?;
        out.write_all(&buffer)?;
        out.write_all(b"\n")?;
    }
    out.flush()?;
    reader.close();

    log::info!("done in {:.3}s", started.elapsed().as_secs_f64());
    Ok(())
}

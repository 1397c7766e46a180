//! Sequence alphabet
//!
//! Byte classification for FASTA data lines: which bytes are residue or
//! nucleotide codes, and which mark structural lines.

/// Marker byte that opens a header line
pub const HEADER_MARKER: u8 = b'>';

/// Marker byte that opens a comment line
pub const COMMENT_MARKER: u8 = b';';

/// Stop codon / translation terminator
pub const STOP: u8 = b'*';

/// Alignment gap
pub const GAP: u8 = b'-';

const RESIDUE_TABLE: [bool; 256] = build_residue_table();

const fn build_residue_table() -> [bool; 256] {
    let mut table = [false; 256];
    let mut b = b'A';
    while b <= b'Z' {
        table[b as usize] = true;
        table[(b + 32) as usize] = true;
        b += 1;
    }
    table[STOP as usize] = true;
    table[GAP as usize] = true;
    table
}

/// Check if a byte is a valid sequence character
///
/// Accepts every single-letter amino acid or nucleotide code in either case,
/// plus `*` (stop) and `-` (gap).
///
/// # Examples
/// ```
/// use fasta_seek::core::alphabet::is_residue;
///
/// assert!(is_residue(b'A'));
/// assert!(is_residue(b'n'));
/// assert!(is_residue(b'*'));
/// assert!(!is_residue(b'\n'));
/// assert!(!is_residue(b'>'));
/// ```
#[inline]
pub fn is_residue(byte: u8) -> bool {
    RESIDUE_TABLE[byte as usize]
}

/// Check if every byte of a slice is a valid sequence character
///
/// # Examples
/// ```
/// use fasta_seek::core::alphabet::is_sequence;
///
/// assert!(is_sequence(b"ACGTacgt"));
/// assert!(is_sequence(b"MKV*"));
/// assert!(!is_sequence(b"ACGT\r"));
/// assert!(is_sequence(b""));
/// ```
pub fn is_sequence(seq: &[u8]) -> bool {
    seq.iter().all(|&b| is_residue(b))
}

/// Check if a line is structural (header or comment)
#[inline]
pub fn is_structural(line: &[u8]) -> bool {
    matches!(line.first(), Some(&HEADER_MARKER) | Some(&COMMENT_MARKER))
}

/// Apply the optional uppercase transform to a residue
#[inline]
pub fn fold_case(byte: u8, uppercase: bool) -> u8 {
    if uppercase {
        byte.to_ascii_uppercase()
    } else {
        byte
    }
}

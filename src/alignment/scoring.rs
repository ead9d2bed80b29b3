//! Scoring schemes for pairwise sequence alignment
//!
//! A scheme maps an ordered pair of residue symbols to a substitution score.
//! [`SubstitutionMatrix`] covers tabular matrices (BLOSUM-style files or the
//! built-in BLOSUM62); [`NucleotideMatrix`] is a uniform match/mismatch
//! scheme for DNA.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::trace;

use crate::error::{GlobalignError, GlobalignResult};

/// Pairwise substitution scoring over a fixed residue alphabet.
///
/// `score` must return `Some` for every ordered pair of symbols in the
/// alphabet and `None` for anything outside it. Lookups are case-insensitive.
pub trait SubstitutionScheme {
    /// Score for aligning symbol `a` against symbol `b`.
    fn score(&self, a: u8, b: u8) -> Option<f64>;

    /// The residue alphabet this scheme is defined over (upper-case).
    fn alphabet(&self) -> &[u8];

    /// Whether `symbol` is part of the alphabet.
    fn contains(&self, symbol: u8) -> bool {
        self.alphabet().contains(&symbol.to_ascii_uppercase())
    }
}

/// A substitution matrix backed by a dense score table.
///
/// Scores are stored by exact ordered pair: the file format keys each value
/// by (column symbol, row symbol), and no symmetry is assumed even though
/// standard matrices are symmetric by construction.
#[derive(Debug, Clone)]
pub struct SubstitutionMatrix {
    alphabet: Vec<u8>,
    /// Byte value -> alphabet position, -1 for symbols outside the alphabet.
    index: [i16; 256],
    /// Row-major |alphabet| x |alphabet| table.
    scores: Vec<f64>,
}

impl SubstitutionMatrix {
    /// Parse a substitution matrix from tabular text.
    ///
    /// Lines starting with `#` (after trimming) are comments and skipped
    /// until the first non-comment line, which is the whitespace-separated
    /// alphabet. Each following line is one row of numeric scores, one row
    /// per alphabet symbol; parsing stops once all rows are consumed.
    pub fn parse<R: BufRead>(reader: R) -> GlobalignResult<Self> {
        let mut alphabet: Vec<u8> = Vec::new();
        let mut scores: Vec<f64> = Vec::new();
        let mut rows_read = 0usize;

        for line in reader.lines() {
            let line = line?;
            let trimmed = line.trim();

            if alphabet.is_empty() {
                if trimmed.starts_with('#') || trimmed.is_empty() {
                    continue;
                }
                for token in trimmed.split_whitespace() {
                    let mut chars = token.bytes();
                    match (chars.next(), chars.next()) {
                        (Some(c), None) => alphabet.push(c.to_ascii_uppercase()),
                        _ => {
                            return Err(GlobalignError::Format(format!(
                                "alphabet symbol '{}' is not a single character",
                                token
                            )))
                        }
                    }
                }
                continue;
            }

            if rows_read == alphabet.len() {
                break;
            }

            let fields: Vec<&str> = trimmed.split_whitespace().collect();
            if fields.len() != alphabet.len() {
                return Err(GlobalignError::Format(format!(
                    "score row {} has {} fields, expected {}",
                    rows_read + 1,
                    fields.len(),
                    alphabet.len()
                )));
            }
            for field in fields {
                let value: f64 = field.parse().map_err(|_| {
                    GlobalignError::Format(format!("non-numeric score field '{}'", field))
                })?;
                scores.push(value);
            }
            rows_read += 1;
        }

        if alphabet.is_empty() {
            return Err(GlobalignError::Format("empty alphabet".to_string()));
        }
        if rows_read < alphabet.len() {
            return Err(GlobalignError::Format(format!(
                "expected {} score rows, found {}",
                alphabet.len(),
                rows_read
            )));
        }

        trace!(symbols = alphabet.len(), "parsed substitution matrix");
        Self::from_parts(alphabet, scores)
    }

    /// Read a substitution matrix from a file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> GlobalignResult<Self> {
        let file = File::open(path)?;
        Self::parse(BufReader::new(file))
    }

    /// Built-in BLOSUM62 matrix (NCBI reference values, 24 symbols).
    pub fn blosum62() -> Self {
        let scores = BLOSUM62.iter().map(|&s| s as f64).collect();
        // The built-in table is well-formed; from_parts cannot fail on it.
        Self::from_parts(BLOSUM62_ALPHABET.to_vec(), scores)
            .unwrap_or_else(|_| unreachable!("built-in BLOSUM62 table is square"))
    }

    fn from_parts(alphabet: Vec<u8>, scores: Vec<f64>) -> GlobalignResult<Self> {
        let mut index = [-1i16; 256];
        for (pos, &symbol) in alphabet.iter().enumerate() {
            if index[symbol as usize] != -1 {
                return Err(GlobalignError::Format(format!(
                    "duplicate alphabet symbol '{}'",
                    symbol as char
                )));
            }
            index[symbol as usize] = pos as i16;
        }
        Ok(Self {
            alphabet,
            index,
            scores,
        })
    }

    fn position(&self, symbol: u8) -> Option<usize> {
        let pos = self.index[symbol.to_ascii_uppercase() as usize];
        (pos >= 0).then_some(pos as usize)
    }
}

impl SubstitutionScheme for SubstitutionMatrix {
    fn score(&self, a: u8, b: u8) -> Option<f64> {
        // Pair key is (column symbol, row symbol): `a` indexes the column,
        // `b` the row, matching the file layout.
        let col = self.position(a)?;
        let row = self.position(b)?;
        Some(self.scores[row * self.alphabet.len() + col])
    }

    fn alphabet(&self) -> &[u8] {
        &self.alphabet
    }

    fn contains(&self, symbol: u8) -> bool {
        self.position(symbol).is_some()
    }
}

/// A uniform match/mismatch scheme over the DNA alphabet ACGT.
#[derive(Debug, Clone, Copy)]
pub struct NucleotideMatrix {
    match_score: f64,
    mismatch_score: f64,
}

impl NucleotideMatrix {
    /// Default nucleotide scoring: +2 match, -1 mismatch.
    pub fn new() -> Self {
        Self {
            match_score: 2.0,
            mismatch_score: -1.0,
        }
    }

    /// Custom match/mismatch scores. Match must be positive, mismatch negative.
    pub fn with_scores(match_score: f64, mismatch_score: f64) -> GlobalignResult<Self> {
        if !(match_score > 0.0) {
            return Err(GlobalignError::InvalidParameter(
                "match score must be positive".to_string(),
            ));
        }
        if !(mismatch_score < 0.0) {
            return Err(GlobalignError::InvalidParameter(
                "mismatch score must be negative".to_string(),
            ));
        }
        Ok(Self {
            match_score,
            mismatch_score,
        })
    }
}

impl Default for NucleotideMatrix {
    fn default() -> Self {
        Self::new()
    }
}

impl SubstitutionScheme for NucleotideMatrix {
    fn score(&self, a: u8, b: u8) -> Option<f64> {
        let a = a.to_ascii_uppercase();
        let b = b.to_ascii_uppercase();
        if !self.contains(a) || !self.contains(b) {
            return None;
        }
        Some(if a == b {
            self.match_score
        } else {
            self.mismatch_score
        })
    }

    fn alphabet(&self) -> &[u8] {
        b"ACGT"
    }
}

/// BLOSUM62 alphabet in NCBI column order.
const BLOSUM62_ALPHABET: &[u8; 24] = b"ARNDCQEGHILKMFPSTWYVBZX*";

/// BLOSUM62 scores, 24x24 row-major, NCBI reference values.
#[rustfmt::skip]
const BLOSUM62: [i32; 24 * 24] = [
//   A   R   N   D   C   Q   E   G   H   I   L   K   M   F   P   S   T   W   Y   V   B   Z   X   *
     4, -1, -2, -2,  0, -1, -1,  0, -2, -1, -1, -1, -1, -2, -1,  1,  0, -3, -2,  0, -2, -1,  0, -4, // A
    -1,  5,  0, -2, -3,  1,  0, -2,  0, -3, -2,  2, -1, -3, -2, -1, -1, -3, -2, -3, -1,  0, -1, -4, // R
    -2,  0,  6,  1, -3,  0,  0,  0,  1, -3, -3,  0, -2, -3, -2,  1,  0, -4, -2, -3,  3,  0, -1, -4, // N
    -2, -2,  1,  6, -3,  0,  2, -1, -1, -3, -4, -1, -3, -3, -1,  0, -1, -4, -3, -3,  4,  1, -1, -4, // D
     0, -3, -3, -3,  9, -3, -4, -3, -3, -1, -1, -3, -1, -2, -3, -1, -1, -2, -2, -1, -3, -3, -2, -4, // C
    -1,  1,  0,  0, -3,  5,  2, -2,  0, -3, -2,  1,  0, -3, -1,  0, -1, -2, -1, -2,  0,  3, -1, -4, // Q
    -1,  0,  0,  2, -4,  2,  5, -2,  0, -3, -3,  1, -2, -3, -1,  0, -1, -3, -2, -2,  1,  4, -1, -4, // E
     0, -2,  0, -1, -3, -2, -2,  6, -2, -4, -4, -2, -3, -3, -2,  0, -2, -2, -3, -3, -1, -2, -1, -4, // G
    -2,  0,  1, -1, -3,  0,  0, -2,  8, -3, -3, -1, -2, -1, -2, -1, -2, -2,  2, -3,  0,  0, -1, -4, // H
    -1, -3, -3, -3, -1, -3, -3, -4, -3,  4,  2, -3,  1,  0, -3, -2, -1, -3, -1,  3, -3, -3, -1, -4, // I
    -1, -2, -3, -4, -1, -2, -3, -4, -3,  2,  4, -2,  2,  0, -3, -2, -1, -2, -1,  1, -4, -3, -1, -4, // L
    -1,  2,  0, -1, -3,  1,  1, -2, -1, -3, -2,  5, -1, -3, -1,  0, -1, -3, -2, -2,  0,  1, -1, -4, // K
    -1, -1, -2, -3, -1,  0, -2, -3, -2,  1,  2, -1,  5,  0, -2, -1, -1, -1, -1,  1, -3, -1, -1, -4, // M
    -2, -3, -3, -3, -2, -3, -3, -3, -1,  0,  0, -3,  0,  6, -4, -2, -2,  1,  3, -1, -3, -3, -1, -4, // F
    -1, -2, -2, -1, -3, -1, -1, -2, -2, -3, -3, -1, -2, -4,  7, -1, -1, -4, -3, -2, -2, -1, -2, -4, // P
     1, -1,  1,  0, -1,  0,  0,  0, -1, -2, -2,  0, -1, -2, -1,  4,  1, -3, -2, -2,  0,  0,  0, -4, // S
     0, -1,  0, -1, -1, -1, -1, -2, -2, -1, -1, -1, -1, -2, -1,  1,  5, -2, -2,  0, -1, -1,  0, -4, // T
    -3, -3, -4, -4, -2, -2, -3, -2, -2, -3, -2, -3, -1,  1, -4, -3, -2, 11,  2, -3, -4, -3, -2, -4, // W
    -2, -2, -2, -3, -2, -1, -2, -3,  2, -1, -1, -2, -1,  3, -3, -2, -2,  2,  7, -1, -3, -2, -1, -4, // Y
     0, -3, -3, -3, -1, -2, -2, -3, -3,  3,  1, -2,  1, -1, -2, -2,  0, -3, -1,  4, -3, -2, -1, -4, // V
    -2, -1,  3,  4, -3,  0,  1, -1,  0, -3, -4,  0, -3, -3, -2,  0, -1, -4, -3, -3,  4,  1, -1, -4, // B
    -1,  0,  0,  1, -3,  3,  4, -2,  0, -3, -3,  1, -1, -3, -1,  0, -1, -3, -2, -2,  1,  4, -1, -4, // Z
     0, -1, -1, -1, -2, -1, -1, -1, -1, -1, -1, -1, -1, -1, -2,  0,  0, -2, -1, -1, -1, -1, -1, -4, // X
    -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4,  1, // *
];

//! Needleman-Wunsch global alignment with affine gap penalties
//!
//! Three-matrix formulation (Gotoh, 1982): `M` holds the best score for an
//! alignment ending in a match/mismatch, `Ga` the best score ending with a
//! gap in sequence A (a B residue consumed opposite `-`), `Gb` the best score
//! ending with a gap in sequence B. A pointer matrix per state records which
//! predecessor state won each cell, so the backtrace replays the fill's
//! decisions exactly instead of re-deriving them.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::alignment::scoring::SubstitutionScheme;
use crate::error::{GlobalignError, GlobalignResult};

/// Gap character used in aligned output.
pub const GAP: u8 = b'-';

/// Which of the three matrices a cell (or a backtrace step) belongs to.
/// Tie-breaks always resolve in declaration order: Match, then GapA, then GapB.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Match,
    GapA,
    GapB,
}

/// Pick the best of the three candidate scores, resolving ties by the fixed
/// Match > GapA > GapB priority.
fn best3(m: f64, ga: f64, gb: f64) -> (State, f64) {
    let mut state = State::Match;
    let mut best = m;
    if ga > best {
        state = State::GapA;
        best = ga;
    }
    if gb > best {
        state = State::GapB;
        best = gb;
    }
    (state, best)
}

/// Result of a global alignment: the optimal score and the two gapped
/// sequences, equal in length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignmentResult {
    pub score: f64,
    pub aligned_a: Vec<u8>,
    pub aligned_b: Vec<u8>,
}

impl AlignmentResult {
    /// Number of alignment columns.
    pub fn len(&self) -> usize {
        self.aligned_a.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aligned_a.is_empty()
    }

    /// Column markers: '|' for match, 'X' for mismatch, ' ' for gap.
    pub fn alignment_string(&self) -> Vec<u8> {
        self.aligned_a
            .iter()
            .zip(self.aligned_b.iter())
            .map(|(&a, &b)| {
                if a == GAP || b == GAP {
                    b' '
                } else if a == b {
                    b'|'
                } else {
                    b'X'
                }
            })
            .collect()
    }

    /// Fraction of columns that are exact matches (0.0 to 1.0).
    pub fn identity(&self) -> f64 {
        let matches = self
            .alignment_string()
            .iter()
            .filter(|&&c| c == b'|')
            .count();
        matches as f64 / self.len().max(1) as f64
    }
}

/// Per-call dynamic programming state: three score matrices and the three
/// pointer matrices the backtrace reads. Flat row-major buffers of shape
/// (|seqA|+1) x (|seqB|+1); cells outside the recurrence domain stay at
/// negative infinity.
struct DpMatrices {
    cols: usize,
    m: Vec<f64>,
    ga: Vec<f64>,
    gb: Vec<f64>,
    back_m: Vec<State>,
    back_ga: Vec<State>,
    back_gb: Vec<State>,
}

impl DpMatrices {
    fn new(rows: usize, cols: usize) -> Self {
        let cells = rows * cols;
        Self {
            cols,
            m: vec![f64::NEG_INFINITY; cells],
            ga: vec![f64::NEG_INFINITY; cells],
            gb: vec![f64::NEG_INFINITY; cells],
            back_m: vec![State::Match; cells],
            back_ga: vec![State::Match; cells],
            back_gb: vec![State::Match; cells],
        }
    }

    fn idx(&self, i: usize, j: usize) -> usize {
        i * self.cols + j
    }
}

/// Global aligner bound to a substitution scheme and affine gap penalties.
///
/// Immutable after construction; `align` allocates its own matrices per call,
/// so one aligner can be shared across threads.
#[derive(Debug)]
pub struct NeedlemanWunsch<S: SubstitutionScheme> {
    scoring: S,
    gap_open: f64,
    gap_extend: f64,
}

impl<S: SubstitutionScheme> NeedlemanWunsch<S> {
    /// Bind a scheme and gap penalties. Both penalties must be strictly
    /// negative.
    pub fn new(scoring: S, gap_open: f64, gap_extend: f64) -> GlobalignResult<Self> {
        if !(gap_open < 0.0) {
            return Err(GlobalignError::InvalidParameter(format!(
                "gap opening penalty must be negative, got {}",
                gap_open
            )));
        }
        if !(gap_extend < 0.0) {
            return Err(GlobalignError::InvalidParameter(format!(
                "gap extension penalty must be negative, got {}",
                gap_extend
            )));
        }
        Ok(Self {
            scoring,
            gap_open,
            gap_extend,
        })
    }

    /// Globally align `seq_a` against `seq_b`.
    ///
    /// Empty sequences are valid and produce an all-gap alignment. Fails with
    /// `UnknownSymbol` if either sequence contains a residue outside the
    /// scheme's alphabet; the aligner itself stays usable after a failed call.
    pub fn align(&self, seq_a: &[u8], seq_b: &[u8]) -> GlobalignResult<AlignmentResult> {
        self.check_symbols(seq_a, "seqA")?;
        self.check_symbols(seq_b, "seqB")?;

        let dp = self.fill(seq_a, seq_b);
        let (score, aligned_a, aligned_b) = self.backtrace(&dp, seq_a, seq_b);

        debug!(
            score,
            len_a = seq_a.len(),
            len_b = seq_b.len(),
            columns = aligned_a.len(),
            "global alignment complete"
        );

        Ok(AlignmentResult {
            score,
            aligned_a,
            aligned_b,
        })
    }

    fn check_symbols(&self, seq: &[u8], label: &str) -> GlobalignResult<()> {
        for (position, &symbol) in seq.iter().enumerate() {
            if !self.scoring.contains(symbol) {
                return Err(GlobalignError::UnknownSymbol(format!(
                    "'{}' at position {} in {}",
                    symbol as char, position, label
                )));
            }
        }
        Ok(())
    }

    /// Forward fill of the three score matrices and their pointer matrices.
    fn fill(&self, seq_a: &[u8], seq_b: &[u8]) -> DpMatrices {
        let rows = seq_a.len() + 1;
        let cols = seq_b.len() + 1;
        let mut dp = DpMatrices::new(rows, cols);

        let gap_open = self.gap_open;
        let gap_extend = self.gap_extend;
        let open_extend = gap_open + gap_extend;

        // Boundary: only the corner of M is reachable. An all-gap prefix of
        // length k costs one open plus k extensions.
        dp.m[0] = 0.0;
        for j in 0..cols {
            dp.ga[j] = gap_open + j as f64 * gap_extend;
        }
        for i in 0..rows {
            dp.gb[i * cols] = gap_open + i as f64 * gap_extend;
        }

        for i in 1..rows {
            for j in 1..cols {
                let cur = i * cols + j;
                let up = cur - cols;
                let left = cur - 1;
                let diag = up - 1;

                // Symbols were validated before the fill started.
                let sub = self
                    .scoring
                    .score(seq_a[i - 1], seq_b[j - 1])
                    .unwrap_or(f64::NEG_INFINITY);

                let (state, best) = best3(dp.m[diag], dp.ga[diag], dp.gb[diag]);
                dp.back_m[cur] = state;
                dp.m[cur] = sub + best;

                // Ga consumes seq_b[j-1] opposite a gap in seq_a.
                let (state, best) = best3(
                    open_extend + dp.m[left],
                    gap_extend + dp.ga[left],
                    open_extend + dp.gb[left],
                );
                dp.back_ga[cur] = state;
                dp.ga[cur] = best;

                // Gb consumes seq_a[i-1] opposite a gap in seq_b.
                let (state, best) = best3(
                    open_extend + dp.m[up],
                    open_extend + dp.ga[up],
                    gap_extend + dp.gb[up],
                );
                dp.back_gb[cur] = state;
                dp.gb[cur] = best;
            }
        }

        dp
    }

    /// Reconstruct the optimal path from the bottom-right corner, following
    /// the recorded pointers, then finish the forced boundary gaps once one
    /// sequence is exhausted.
    fn backtrace(
        &self,
        dp: &DpMatrices,
        seq_a: &[u8],
        seq_b: &[u8],
    ) -> (f64, Vec<u8>, Vec<u8>) {
        let mut i = seq_a.len();
        let mut j = seq_b.len();

        let corner = dp.idx(i, j);
        let (mut state, score) = best3(dp.m[corner], dp.ga[corner], dp.gb[corner]);

        let mut aligned_a = Vec::with_capacity(i + j);
        let mut aligned_b = Vec::with_capacity(i + j);

        while i > 0 && j > 0 {
            let cur = dp.idx(i, j);
            match state {
                State::Match => {
                    aligned_a.push(seq_a[i - 1]);
                    aligned_b.push(seq_b[j - 1]);
                    state = dp.back_m[cur];
                    i -= 1;
                    j -= 1;
                }
                State::GapA => {
                    aligned_a.push(GAP);
                    aligned_b.push(seq_b[j - 1]);
                    state = dp.back_ga[cur];
                    j -= 1;
                }
                State::GapB => {
                    aligned_a.push(seq_a[i - 1]);
                    aligned_b.push(GAP);
                    state = dp.back_gb[cur];
                    i -= 1;
                }
            }
        }

        // One index hit zero: the rest of the path is forced gap columns.
        while j > 0 {
            aligned_a.push(GAP);
            aligned_b.push(seq_b[j - 1]);
            j -= 1;
        }
        while i > 0 {
            aligned_a.push(seq_a[i - 1]);
            aligned_b.push(GAP);
            i -= 1;
        }

        aligned_a.reverse();
        aligned_b.reverse();

        (score, aligned_a, aligned_b)
    }
}

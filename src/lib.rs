//! Global pairwise sequence alignment with affine gap penalties

pub mod alignment;
pub mod error;
pub mod formats;
pub mod sequence;

// Re-export commonly used types
pub use alignment::{
    AlignmentResult, NeedlemanWunsch, NucleotideMatrix, SubstitutionMatrix, SubstitutionScheme,
};
pub use error::{GlobalignError, GlobalignResult};
// Re-export fasta functions
pub use formats::{parse_fasta, read_fasta};
pub use sequence::{Sequence, SequenceType};

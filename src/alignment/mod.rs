pub mod nw_aligner;
pub mod scoring;

pub use nw_aligner::{AlignmentResult, NeedlemanWunsch, GAP};
pub use scoring::{NucleotideMatrix, SubstitutionMatrix, SubstitutionScheme};

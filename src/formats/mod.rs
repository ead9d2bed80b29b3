pub mod fasta;

// Re-export commonly used functions
pub use fasta::{parse_fasta, read_fasta};

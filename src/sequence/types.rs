use serde::{Deserialize, Serialize};

/// A named biological sequence as read from a FASTA record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Sequence {
    pub id: String,
    pub description: Option<String>,
    pub sequence: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SequenceType {
    Protein,
    Nucleotide,
}

impl Sequence {
    pub fn new(id: String, sequence: Vec<u8>) -> Self {
        Self {
            id,
            description: None,
            sequence,
        }
    }

    pub fn with_description(mut self, description: String) -> Self {
        self.description = Some(description);
        self
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    /// Heuristic type detection: residues unique to the amino acid alphabet
    /// mark the sequence as protein.
    pub fn detect_type(&self) -> SequenceType {
        let protein_chars = b"EFILPQXZ";
        let has_protein = self
            .sequence
            .iter()
            .any(|&c| protein_chars.contains(&c.to_ascii_uppercase()));

        if has_protein {
            SequenceType::Protein
        } else {
            SequenceType::Nucleotide
        }
    }

    /// FASTA header line for this sequence (without trailing newline).
    pub fn header(&self) -> String {
        match &self.description {
            Some(desc) => format!(">{} {}", self.id, desc),
            None => format!(">{}", self.id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_construction() {
        let seq = Sequence::new("sp|P25440|BRD2".to_string(), b"MLQNVT".to_vec())
            .with_description("Bromodomain-containing protein 2".to_string());
        assert_eq!(seq.len(), 6);
        assert!(!seq.is_empty());
        assert_eq!(
            seq.header(),
            ">sp|P25440|BRD2 Bromodomain-containing protein 2"
        );
    }

    #[test]
    fn test_header_without_description() {
        let seq = Sequence::new("query1".to_string(), b"ACGT".to_vec());
        assert_eq!(seq.header(), ">query1");
    }

    #[test]
    fn test_detect_type() {
        let dna = Sequence::new("dna".to_string(), b"ATGCATGC".to_vec());
        assert_eq!(dna.detect_type(), SequenceType::Nucleotide);

        let protein = Sequence::new("prot".to_string(), b"MAVHQLIRRP".to_vec());
        assert_eq!(protein.detect_type(), SequenceType::Protein);
    }
}

/// Integration tests for global alignment functionality
use globalign::{
    GlobalignError, NeedlemanWunsch, NucleotideMatrix, SubstitutionMatrix, SubstitutionScheme,
};
use pretty_assertions::assert_eq;

fn blosum_aligner() -> NeedlemanWunsch<SubstitutionMatrix> {
    NeedlemanWunsch::new(SubstitutionMatrix::blosum62(), -10.0, -1.0).unwrap()
}

fn strip_gaps(aligned: &[u8]) -> Vec<u8> {
    aligned.iter().copied().filter(|&c| c != b'-').collect()
}

#[test]
fn test_brd2_style_reference_alignment() {
    // Reference fixture: a three-residue deletion is bridged by one opened
    // gap extended twice, not three separate opens.
    let aligner = blosum_aligner();
    let result = aligner.align(b"MAVHQLIRRP", b"MQLIRHP").unwrap();

    assert_eq!(result.score, 17.0);
    assert_eq!(result.aligned_a, b"MAVHQLIRRP".to_vec());
    assert_eq!(result.aligned_b, b"M---QLIRHP".to_vec());
}

#[test]
fn test_short_peptide_alignment() {
    let aligner = blosum_aligner();
    let result = aligner.align(b"MYQR", b"MQR").unwrap();

    assert_eq!(result.score, 4.0);
    assert_eq!(result.aligned_a, b"MYQR".to_vec());
    assert_eq!(result.aligned_b, b"M-QR".to_vec());
}

#[test]
fn test_empty_against_nonempty() {
    // All-gap alignment of length k costs one open plus k extensions.
    let aligner = blosum_aligner();
    let result = aligner.align(b"", b"AAA").unwrap();

    assert_eq!(result.score, -13.0);
    assert_eq!(result.aligned_a, b"---".to_vec());
    assert_eq!(result.aligned_b, b"AAA".to_vec());
}

#[test]
fn test_empty_against_empty() {
    let aligner = blosum_aligner();
    let result = aligner.align(b"", b"").unwrap();

    assert_eq!(result.score, 0.0);
    assert_eq!(result.aligned_a, Vec::<u8>::new());
    assert_eq!(result.aligned_b, Vec::<u8>::new());
}

#[test]
fn test_score_is_symmetric_in_argument_order() {
    let aligner = blosum_aligner();
    let forward = aligner.align(b"MAVHQLIRRP", b"MQLIRHP").unwrap();
    let reverse = aligner.align(b"MQLIRHP", b"MAVHQLIRRP").unwrap();

    assert_eq!(forward.score, reverse.score);
    // The reverse alignment is the transpose of the forward one.
    assert_eq!(forward.aligned_a, reverse.aligned_b);
    assert_eq!(forward.aligned_b, reverse.aligned_a);
}

#[test]
fn test_gap_stripping_round_trips_inputs() {
    let aligner = blosum_aligner();
    let pairs: &[(&[u8], &[u8])] = &[
        (b"MAVHQLIRRP", b"MQLIRHP"),
        (b"MYQR", b"MQR"),
        (b"HEAGAWGHEE", b"PAWHEAE"),
        (b"", b"MKT"),
    ];

    for (seq_a, seq_b) in pairs {
        let result = aligner.align(seq_a, seq_b).unwrap();
        assert_eq!(result.aligned_a.len(), result.aligned_b.len());
        assert_eq!(strip_gaps(&result.aligned_a), seq_a.to_vec());
        assert_eq!(strip_gaps(&result.aligned_b), seq_b.to_vec());
    }
}

#[test]
fn test_repeated_calls_are_bit_identical() {
    let aligner = blosum_aligner();
    let first = aligner.align(b"MAVHQLIRRP", b"MQLIRHP").unwrap();

    for _ in 0..20 {
        let again = aligner.align(b"MAVHQLIRRP", b"MQLIRHP").unwrap();
        assert_eq!(first.score.to_bits(), again.score.to_bits());
        assert_eq!(first.aligned_a, again.aligned_a);
        assert_eq!(first.aligned_b, again.aligned_b);
    }
}

#[test]
fn test_aligner_reusable_across_sequence_pairs() {
    let aligner = blosum_aligner();
    let first = aligner.align(b"MYQR", b"MQR").unwrap();
    let second = aligner.align(b"MAVHQLIRRP", b"MQLIRHP").unwrap();
    let third = aligner.align(b"MYQR", b"MQR").unwrap();

    assert_eq!(first.score, 4.0);
    assert_eq!(second.score, 17.0);
    assert_eq!(first, third);
}

#[test]
fn test_unknown_symbol_is_call_fatal_only() {
    let aligner = blosum_aligner();
    // '1' is not in the BLOSUM62 alphabet.
    let err = aligner.align(b"M1QR", b"MQR").unwrap_err();
    assert!(matches!(err, GlobalignError::UnknownSymbol(_)));

    // The aligner is still usable afterwards.
    let result = aligner.align(b"MYQR", b"MQR").unwrap();
    assert_eq!(result.score, 4.0);
}

#[test]
fn test_gap_penalty_validation_at_construction() {
    let err = NeedlemanWunsch::new(SubstitutionMatrix::blosum62(), 10.0, -1.0).unwrap_err();
    assert!(matches!(err, GlobalignError::InvalidParameter(_)));

    let err = NeedlemanWunsch::new(SubstitutionMatrix::blosum62(), -10.0, 0.0).unwrap_err();
    assert!(matches!(err, GlobalignError::InvalidParameter(_)));
}

#[test]
fn test_nucleotide_alignment_with_gap() {
    let aligner = NeedlemanWunsch::new(NucleotideMatrix::new(), -5.0, -2.0).unwrap();
    let result = aligner.align(b"ACGTACGT", b"ACGTCGT").unwrap();

    assert_eq!(result.score, 7.0);
    assert_eq!(result.aligned_a, b"ACGTACGT".to_vec());
    assert_eq!(result.aligned_b, b"ACGT-CGT".to_vec());
    assert_eq!(result.alignment_string(), b"|||| |||".to_vec());
}

#[test]
fn test_completely_different_nucleotides() {
    let aligner = NeedlemanWunsch::new(NucleotideMatrix::new(), -5.0, -2.0).unwrap();
    let result = aligner.align(b"AAAA", b"TTTT").unwrap();

    // Four mismatches beat any gapped arrangement.
    assert_eq!(result.score, -4.0);
    assert_eq!(result.identity(), 0.0);
}

#[test]
fn test_shared_aligner_across_threads() {
    // One read-only aligner, concurrent independent align calls.
    let aligner = blosum_aligner();
    let expected = aligner.align(b"MAVHQLIRRP", b"MQLIRHP").unwrap();

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let aligner = &aligner;
                scope.spawn(move || aligner.align(b"MAVHQLIRRP", b"MQLIRHP").unwrap())
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}

#[test]
fn test_custom_matrix_drives_scoring() {
    // A toy matrix that rewards A-A strongly; checks the engine consults the
    // bound scheme rather than anything built in.
    let source = "A B\n10 -5\n-5 10\n";
    let matrix = SubstitutionMatrix::parse(source.as_bytes()).unwrap();
    assert_eq!(matrix.score(b'A', b'A'), Some(10.0));

    let aligner = NeedlemanWunsch::new(matrix, -3.0, -1.0).unwrap();
    let result = aligner.align(b"AB", b"AB").unwrap();
    assert_eq!(result.score, 20.0);
}

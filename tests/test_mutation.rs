mod common;

use common::mutation;
use mutwick::error::MutationError;
use mutwick::model::{Mutation, Nucleotide, NucleotideCode, ReferenceMismatch, overlay};
use proptest::prelude::*;

const REFERENCE: &str = "ACGTACGTAC";

// --- NOTATION ---
#[test]
fn test_parse_and_display() {
    let m = mutation("C241T");
    assert_eq!(m.position(), 241);
    assert_eq!(m.reference(), Nucleotide::C);
    assert!(m.mutant().is(Nucleotide::T));
    assert_eq!(m.parent(), Nucleotide::C);
    assert_eq!(m.to_string(), "C241T");

    let ambiguous = mutation("g10y");
    assert_eq!(ambiguous.to_string(), "G10Y");
    assert_eq!(
        ambiguous.mutant().nucleotides().collect::<Vec<_>>(),
        vec![Nucleotide::C, Nucleotide::T]
    );
}

#[test]
fn test_invalid_notation() {
    assert_eq!("C0T".parse::<Mutation>(), Err(MutationError::InvalidPosition(0)));
    assert_eq!(
        "CT".parse::<Mutation>(),
        Err(MutationError::InvalidNotation("CT".to_string()))
    );
    assert_eq!(
        "C2x4T".parse::<Mutation>(),
        Err(MutationError::InvalidNotation("C2x4T".to_string()))
    );
    assert_eq!("X12T".parse::<Mutation>(), Err(MutationError::InvalidNucleotide('X')));
}

#[test]
fn test_position_limited_to_wire_range() {
    assert_eq!(
        "C3000000000T".parse::<Mutation>(),
        Err(MutationError::InvalidPosition(3_000_000_000))
    );
    assert_eq!(
        Mutation::new(Mutation::MAX_POSITION + 1, Nucleotide::C, Nucleotide::T),
        Err(MutationError::InvalidPosition(2_147_483_648))
    );
    let last = Mutation::new(Mutation::MAX_POSITION, Nucleotide::C, Nucleotide::T).unwrap();
    assert_eq!(last.to_string(), "C2147483647T");
}

#[test]
fn test_mutations_order_by_position() {
    let mut mutations = vec![mutation("T30A"), mutation("C241T"), mutation("A3G")];
    mutations.sort();
    let positions: Vec<u32> = mutations.iter().map(Mutation::position).collect();
    assert_eq!(positions, vec![3, 30, 241]);
}

#[test]
fn test_silent_mutation() {
    let silent = Mutation::new(4, Nucleotide::T, Nucleotide::T).unwrap();
    assert!(silent.is_silent());
    let ambiguous = Mutation::new(4, Nucleotide::T, NucleotideCode::from_byte(b'Y').unwrap()).unwrap();
    assert!(!ambiguous.is_silent());
}

// --- OVERLAY ---
#[test]
fn test_overlay_without_mutations_is_identity() {
    let result = overlay(REFERENCE, &[]).unwrap();
    assert_eq!(result.sequence, REFERENCE);
    assert!(result.mismatches.is_empty());
}

#[test]
fn test_overlay_applies_in_order() {
    let mutations = [mutation("A1G"), mutation("G3N"), mutation("A1T")];
    let result = overlay(REFERENCE, &mutations).unwrap();

    // A1T finds the G written by A1G
    assert_eq!(result.sequence, "TCNTACGTAC");
    assert_eq!(result.mismatches.len(), 1);
}

#[test]
fn test_overlay_records_reference_mismatch() {
    let result = overlay(REFERENCE, &[mutation("T2A")]).unwrap();

    assert_eq!(result.sequence, "AAGTACGTAC");
    assert_eq!(
        result.mismatches,
        vec![ReferenceMismatch {
            position: 2,
            expected: Nucleotide::T,
            found: 'C',
        }]
    );
}

#[test]
fn test_overlay_position_out_of_range() {
    assert_eq!(
        overlay(REFERENCE, &[mutation("A11C")]),
        Err(MutationError::PositionOutOfRange {
            position: 11,
            len: 10
        })
    );
    assert_eq!(
        overlay("ACGTÄ", &[mutation("A1C")]),
        Err(MutationError::NonAsciiReference)
    );
}

#[test]
fn test_overlay_skips_silent_mutations() {
    let silent = Mutation::new(1, Nucleotide::C, Nucleotide::C).unwrap();
    let result = overlay(REFERENCE, &[silent]).unwrap();
    assert_eq!(result.sequence, REFERENCE);
    assert!(result.mismatches.is_empty());
}

// --- PROPERTIES ---
fn arb_nucleotide() -> impl Strategy<Value = Nucleotide> {
    prop::sample::select(Nucleotide::ALL.to_vec())
}

proptest! {
    #[test]
    fn prop_overlay_replaces_single_position(
        reference in prop::collection::vec(arb_nucleotide(), 1..200),
        position in any::<prop::sample::Index>(),
        mutant in arb_nucleotide(),
    ) {
        let reference: String = reference.iter().map(|n| char::from(n.as_byte())).collect();
        let i = position.index(reference.len());
        let found = Nucleotide::from_byte(reference.as_bytes()[i]).unwrap();
        let m = Mutation::new(i as u32 + 1, found, mutant).unwrap();

        let result = overlay(&reference, &[m]).unwrap();

        let mut expected = reference.clone().into_bytes();
        expected[i] = mutant.as_byte();
        prop_assert_eq!(result.sequence.into_bytes(), expected);
        prop_assert!(result.mismatches.is_empty());
    }
}

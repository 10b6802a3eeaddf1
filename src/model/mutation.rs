//! Mutations attached to tree edges.
//!
//! A [Mutation] records that at a (1-based) genome position the reference
//! [Nucleotide] was replaced by a [NucleotideCode], which is either a single
//! nucleotide or an IUPAC ambiguity code for a set of them.
//! [overlay] applies a collection of mutations to a reference sequence.

use crate::error::MutationError;
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// Nucleotides in wire order, i.e. `A=0, C=1, G=2, T=3`.
pub const NUCLEOTIDES: [u8; 4] = *b"ACGT";

/// IUPAC code for each non-empty set of nucleotides,
/// indexed by bit set (bit `i` stands for `NUCLEOTIDES[i]`).
const IUPAC_BY_BITS: [u8; 16] = *b"-ACMGRSVTWYHKDBN";

// =#========================================================================#=
// NUCLEOTIDE
// =#========================================================================$=
/// One of the four unambiguous nucleotides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Nucleotide {
    A,
    C,
    G,
    T,
}

impl Nucleotide {
    /// All nucleotides in wire order.
    pub const ALL: [Nucleotide; 4] = [Nucleotide::A, Nucleotide::C, Nucleotide::G, Nucleotide::T];

    /// Returns the nucleotide for a wire index (`A=0, C=1, G=2, T=3`).
    pub fn from_index(index: i32) -> Result<Self, MutationError> {
        usize::try_from(index)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
            .ok_or(MutationError::InvalidNucleotideIndex(index))
    }

    /// Returns the nucleotide for an (upper or lower case) ASCII letter.
    pub fn from_byte(byte: u8) -> Result<Self, MutationError> {
        match byte.to_ascii_uppercase() {
            b'A' => Ok(Nucleotide::A),
            b'C' => Ok(Nucleotide::C),
            b'G' => Ok(Nucleotide::G),
            b'T' => Ok(Nucleotide::T),
            _ => Err(MutationError::InvalidNucleotide(char::from(byte))),
        }
    }

    /// Wire index of this nucleotide.
    pub fn index(self) -> i32 {
        self as i32
    }

    /// Upper case ASCII letter of this nucleotide.
    pub fn as_byte(self) -> u8 {
        NUCLEOTIDES[self as usize]
    }
}

impl fmt::Display for Nucleotide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", char::from(self.as_byte()))
    }
}

// =#========================================================================#=
// NUCLEOTIDE CODE
// =#========================================================================$=
/// Non-empty set of nucleotides, displayed as IUPAC code
/// (e.g. `{A, G}` is `R`, all four are `N`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NucleotideCode {
    bits: u8,
}

impl NucleotideCode {
    /// Code for the given nucleotides; duplicates are ignored.
    ///
    /// # Errors
    /// [MutationError::EmptyMutant] if `nucleotides` is empty.
    pub fn from_nucleotides<I>(nucleotides: I) -> Result<Self, MutationError>
    where
        I: IntoIterator<Item = Nucleotide>,
    {
        let bits = nucleotides
            .into_iter()
            .fold(0u8, |bits, n| bits | (1 << n as u8));
        if bits == 0 {
            return Err(MutationError::EmptyMutant);
        }
        Ok(Self { bits })
    }

    /// Code for wire indices (as stored in `mut_nuc`).
    pub fn from_indices(indices: &[i32]) -> Result<Self, MutationError> {
        let nucleotides = indices
            .iter()
            .map(|&i| Nucleotide::from_index(i))
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_nucleotides(nucleotides)
    }

    /// Code for an IUPAC letter (case-insensitive).
    pub fn from_byte(byte: u8) -> Result<Self, MutationError> {
        let upper = byte.to_ascii_uppercase();
        match IUPAC_BY_BITS.iter().position(|&c| c == upper) {
            Some(bits) if bits > 0 => Ok(Self { bits: bits as u8 }),
            _ => Err(MutationError::InvalidNucleotide(char::from(byte))),
        }
    }

    /// IUPAC letter of this code.
    pub fn as_byte(self) -> u8 {
        IUPAC_BY_BITS[self.bits as usize]
    }

    /// Nucleotides of this code in wire order.
    pub fn nucleotides(self) -> impl Iterator<Item = Nucleotide> {
        Nucleotide::ALL
            .into_iter()
            .filter(move |&n| self.bits & (1 << n as u8) != 0)
    }

    /// Whether this code stands for exactly the given nucleotide.
    pub fn is(self, nucleotide: Nucleotide) -> bool {
        self.bits == 1 << nucleotide as u8
    }
}

impl From<Nucleotide> for NucleotideCode {
    fn from(nucleotide: Nucleotide) -> Self {
        Self {
            bits: 1 << nucleotide as u8,
        }
    }
}

impl fmt::Display for NucleotideCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", char::from(self.as_byte()))
    }
}

// =#========================================================================#=
// MUTATION
// =#========================================================================$=
/// A single substitution on the edge from a parent to a node.
///
/// Ordered by position first, so sets of mutations iterate along the genome.
/// Besides the reference nucleotide, the nucleotide the parent carried at
/// this position is stored, which defaults to the reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Mutation {
    position: u32,
    reference: Nucleotide,
    mutant: NucleotideCode,
    parent: Nucleotide,
}

impl Mutation {
    /// Largest position a mutation tree file can hold.
    pub const MAX_POSITION: u32 = i32::MAX as u32;

    /// Creates a new mutation.
    ///
    /// # Errors
    /// [MutationError::InvalidPosition] if `position` is 0 or above
    /// [Mutation::MAX_POSITION].
    pub fn new(
        position: u32,
        reference: Nucleotide,
        mutant: impl Into<NucleotideCode>,
    ) -> Result<Self, MutationError> {
        if position == 0 || position > Self::MAX_POSITION {
            return Err(MutationError::InvalidPosition(i64::from(position)));
        }
        Ok(Self {
            position,
            reference,
            mutant: mutant.into(),
            parent: reference,
        })
    }

    /// Sets the nucleotide of the parent at this position.
    pub fn with_parent(mut self, parent: Nucleotide) -> Self {
        self.parent = parent;
        self
    }

    /// 1-based genome position.
    pub fn position(&self) -> u32 {
        self.position
    }

    pub fn reference(&self) -> Nucleotide {
        self.reference
    }

    pub fn mutant(&self) -> NucleotideCode {
        self.mutant
    }

    pub fn parent(&self) -> Nucleotide {
        self.parent
    }

    /// Whether this mutation leaves the reference unchanged.
    pub fn is_silent(&self) -> bool {
        self.mutant.is(self.reference)
    }
}

impl fmt::Display for Mutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.reference, self.position, self.mutant)
    }
}

/// Parses the usual `C241T` notation (reference, position, mutant code).
impl FromStr for Mutation {
    type Err = MutationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || MutationError::InvalidNotation(s.to_string());
        let bytes = s.as_bytes();
        if bytes.len() < 3 || !s.is_ascii() {
            return Err(invalid());
        }

        let reference = Nucleotide::from_byte(bytes[0])?;
        let mutant = NucleotideCode::from_byte(bytes[bytes.len() - 1])?;
        let position: u32 = s[1..s.len() - 1].parse().map_err(|_| invalid())?;
        Mutation::new(position, reference, mutant)
    }
}

// =#========================================================================#=
// OVERLAY
// =#========================================================================$=
/// Reference base found at a position that differs from a mutation's
/// stated reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceMismatch {
    pub position: u32,
    /// Reference nucleotide stated by the mutation
    pub expected: Nucleotide,
    /// Character found in the sequence
    pub found: char,
}

/// Result of [overlay]: the mutated sequence and all reference mismatches
/// encountered on the way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Overlay {
    pub sequence: String,
    pub mismatches: Vec<ReferenceMismatch>,
}

/// Applies mutations to a reference sequence.
///
/// Each non-silent mutation replaces the character at its position with the
/// IUPAC letter of its mutant code. If the character currently at that
/// position differs from the mutation's reference, a [ReferenceMismatch] is
/// recorded and a warning logged, and the mutation is applied anyway.
///
/// # Errors
/// * [MutationError::NonAsciiReference] if `reference` is not ASCII
/// * [MutationError::PositionOutOfRange] for positions beyond the sequence
///
/// # Example
/// ```
/// use mutwick::model::mutation::{overlay, Mutation};
///
/// let mutations = ["A2T".parse::<Mutation>().unwrap()];
/// let result = overlay("CAG", &mutations).unwrap();
/// assert_eq!(result.sequence, "CTG");
/// assert!(result.mismatches.is_empty());
/// ```
pub fn overlay<'a, I>(reference: &str, mutations: I) -> Result<Overlay, MutationError>
where
    I: IntoIterator<Item = &'a Mutation>,
{
    if !reference.is_ascii() {
        return Err(MutationError::NonAsciiReference);
    }

    let mut sequence = reference.as_bytes().to_vec();
    let mut mismatches = Vec::new();
    for mutation in mutations {
        if mutation.is_silent() {
            continue;
        }

        let slot = (mutation.position as usize)
            .checked_sub(1)
            .and_then(|i| sequence.get_mut(i))
            .ok_or(MutationError::PositionOutOfRange {
                position: mutation.position,
                len: reference.len(),
            })?;

        if !slot.eq_ignore_ascii_case(&mutation.reference.as_byte()) {
            warn!(
                position = mutation.position,
                "invalid reference: {} vs {}",
                mutation.reference,
                char::from(*slot)
            );
            mismatches.push(ReferenceMismatch {
                position: mutation.position,
                expected: mutation.reference,
                found: char::from(*slot),
            });
        }
        *slot = mutation.mutant.as_byte();
    }

    // Only ASCII bytes were written into an ASCII buffer
    let sequence = String::from_utf8_lossy(&sequence).into_owned();
    Ok(Overlay {
        sequence,
        mismatches,
    })
}

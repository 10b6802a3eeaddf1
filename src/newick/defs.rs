//! Constants for Newick parsing and writing.

/// Newick label delimiters: parentheses, brackets, comma, colon, semicolon, whitespace
pub(crate) const NEWICK_LABEL_DELIMITERS: &[u8] = b"([,:; \n\t\r)]";

/// Estimated characters per node in a written Newick string
/// (name or punctuation plus a short branch length)
pub(crate) const CHARS_PER_NODE_GUESS: usize = 12;

//! Newick format parser and writer for mutation trees.
//!
//! This module provides [NewickParser] to parse Newick strings into a
//! [MutationTree] and [to_newick] to write one back. The Newick string is
//! the topology part of the wire format (see [crate::usher]); per-node
//! annotations travel in arrays aligned with the pre-order of this topology.
//!
//! # Format
//! The accepted grammar:
//! * `tree ::= node ';'`
//! * `node ::= [ '(' node (',' node)* ')' ] [name] [':' number]`
//!
//! Furthermore:
//! * Vertices may have any number of children, including one
//! * Internal vertices may carry names (e.g. `node_12`)
//! * Whitespace can occur between elements, just not within an unquoted
//!   name or a branch length
//! * Names can be single-quoted, with `''` standing for a quote
//! * Comments are square brackets and can occur wherever whitespace can;
//!   they are skipped

mod defs;
pub mod parser;
pub mod writer;

pub use parser::NewickParser;
pub use writer::to_newick;

use crate::model::MutationTree;
use crate::parser::ByteParser;
use crate::parser::ParsingError;

/// Parses a single Newick string into a [MutationTree].
///
/// Trailing whitespace and comments after the `;` are allowed,
/// anything else is an error.
///
/// # Example
/// ```
/// use mutwick::newick::parse_str;
///
/// let tree = parse_str("(Fratercula_cirrhata,(Fratercula_arctica,Fratercula_corniculata));")?;
/// assert_eq!(tree.num_leaves(), 3);
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn parse_str<S: AsRef<str>>(newick: S) -> Result<MutationTree, ParsingError> {
    let mut byte_parser = ByteParser::for_str(newick.as_ref());
    let tree = NewickParser::new().parse_str(&mut byte_parser)?;

    byte_parser.skip_comment_and_whitespace()?;
    if !byte_parser.is_eof() {
        return Err(ParsingError::invalid_newick_string(
            &byte_parser,
            "Unexpected content after ';'".to_string(),
        ));
    }
    Ok(tree)
}

//! Parsing of Newick strings into a [MutationTree].
//!
//! The parser is iterative and keeps an explicit stack of open internal
//! nodes, so deep (e.g. ladder-like) trees cannot overflow the call stack.
//! Nodes are created when their first byte is seen, hence in pre-order.

use crate::model::{MutationTree, NodeIndex};
use crate::newick::defs::NEWICK_LABEL_DELIMITERS;
use crate::parser::ByteParser;
use crate::parser::ParsingError;

// =#========================================================================#=
// NEWICK PARSER
// =#========================================================================$=
/// Parser for a single Newick tree with arbitrary degree, internal
/// node names and branch lengths.
///
/// # Example
/// ```
/// use mutwick::newick::NewickParser;
/// use mutwick::parser::ByteParser;
///
/// let mut byte_parser = ByteParser::for_str("((A:1,B:2)node_1:0.5,C:4,D:1)root;");
/// let tree = NewickParser::new().parse_str(&mut byte_parser).unwrap();
/// assert_eq!(tree.num_nodes(), 6);
/// assert_eq!(tree.num_leaves(), 4);
/// ```
#[derive(Debug, Default)]
pub struct NewickParser {
    expected_num_nodes: usize,
}

/// What the parser expects to see next.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Expect {
    /// Start of a node: `(` or a leaf name
    Node,
    /// After a complete node: `,`, `)` or `;`
    Separator,
}

impl NewickParser {
    /// Creates a new [NewickParser].
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the expected number of nodes, used to pre-allocate the arena.
    pub fn with_num_nodes(mut self, num_nodes: usize) -> Self {
        self.expected_num_nodes = num_nodes;
        self
    }

    /// Parses a single Newick tree, up to and including its `;`.
    ///
    /// # Errors
    /// [ParsingError] if the string is not a valid Newick tree.
    pub fn parse_str(&self, parser: &mut ByteParser<'_>) -> Result<MutationTree, ParsingError> {
        let mut tree = MutationTree::with_capacity(self.expected_num_nodes);
        let mut open: Vec<NodeIndex> = Vec::new();
        let mut expect = Expect::Node;

        loop {
            parser.skip_comment_and_whitespace()?;
            match expect {
                Expect::Node => {
                    let index = match open.last() {
                        None if tree.is_root_set() => {
                            return Err(ParsingError::invalid_newick_string(
                                parser,
                                "Expected a single tree".to_string(),
                            ));
                        }
                        None => tree.add_root(),
                        Some(&parent) => tree.add_child(parent),
                    }
                    .map_err(|e| ParsingError::invalid_newick_string(parser, e.to_string()))?;

                    if parser.consume_if(b'(') {
                        open.push(index);
                    } else {
                        self.parse_name_and_length(parser, &mut tree, index)?;
                        expect = Expect::Separator;
                    }
                }
                Expect::Separator => match parser.peek() {
                    Some(b',') if !open.is_empty() => {
                        parser.next_byte();
                        expect = Expect::Node;
                    }
                    Some(b')') => {
                        parser.next_byte();
                        let index = open.pop().ok_or_else(|| {
                            ParsingError::invalid_newick_string(
                                parser,
                                "Unbalanced ')'".to_string(),
                            )
                        })?;
                        self.parse_name_and_length(parser, &mut tree, index)?;
                    }
                    Some(b';') if open.is_empty() => {
                        parser.next_byte();
                        return Ok(tree);
                    }
                    None => return Err(ParsingError::unexpected_eof(parser)),
                    Some(other) => {
                        return Err(ParsingError::invalid_newick_string(
                            parser,
                            format!(
                                "Expected ',', ')' or ';' but found {:?}",
                                char::from(other)
                            ),
                        ));
                    }
                },
            }
        }
    }

    /// Parses optional `name` and `:branch_length` of a node and sets them.
    fn parse_name_and_length(
        &self,
        parser: &mut ByteParser<'_>,
        tree: &mut MutationTree,
        index: NodeIndex,
    ) -> Result<(), ParsingError> {
        parser.skip_comment_and_whitespace()?;
        let name = parser.parse_label(NEWICK_LABEL_DELIMITERS)?;
        let branch_length = Self::parse_branch_length(parser)?;

        let node = &mut tree[index];
        node.set_name((!name.is_empty()).then_some(name));
        node.set_branch_length(branch_length);
        Ok(())
    }

    /// Parses optional branch length `[:number]`:
    /// - Skips comments/whitespace before and after `:`
    /// - Supports scientific notation (e.g., `1.5e-10`)
    ///
    /// # Returns
    /// - `Ok(Some(branch_length))` if found a branch length and was able to parse it
    /// - `Ok(None)` if no branch length found
    /// - [ParsingError] if it couldn't parse branch length value or it is negative
    fn parse_branch_length(parser: &mut ByteParser<'_>) -> Result<Option<f64>, ParsingError> {
        parser.skip_comment_and_whitespace()?;
        if !parser.consume_if(b':') {
            return Ok(None);
        }
        parser.skip_comment_and_whitespace()?;

        let branch_length_str =
            parser.take_while(|b| b.is_ascii_digit() || matches!(b, b'.' | b'-' | b'+' | b'e' | b'E'));
        let value: f64 = branch_length_str.parse().map_err(|_| {
            ParsingError::invalid_newick_string(
                parser,
                format!("Invalid branch length: {:?}", branch_length_str),
            )
        })?;
        if value < 0.0 || !value.is_finite() {
            return Err(ParsingError::invalid_newick_string(
                parser,
                format!("Branch length must be non-negative, found {}", value),
            ));
        }
        Ok(Some(value))
    }
}

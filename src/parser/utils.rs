//! Utility functions for label escaping in Newick strings.
//!
//! Labels written by [crate::newick::to_newick] must read back verbatim
//! through [ByteParser::parse_label](crate::parser::ByteParser::parse_label),
//! so any label containing a delimiter is single-quoted.

/// Characters that end an unquoted label or otherwise carry Newick meaning.
const SPECIAL_CHARACTERS: &[char] = &[' ', ',', ';', '\t', '\n', '\r', '(', ')', ':', '[', ']', '\''];

/// Checks if a label can be written as is, i.e. is non-empty and
/// contains no whitespace or special characters.
///
/// # Examples
/// ```
/// # use mutwick::parser::utils::is_plain;
/// assert!(is_plain("node_1"));
/// assert!(is_plain("England/MILK-9E05B3/2020|2020-09-20"));
/// assert!(!is_plain("Australasian Swamphen"));
/// assert!(!is_plain("Baillon's_Crake"));
/// assert!(!is_plain(""));
/// ```
pub fn is_plain(label: &str) -> bool {
    !label.is_empty() && !label.contains(SPECIAL_CHARACTERS)
}

/// Escapes a label for safe use in Newick strings.
///
/// Labels containing special characters are wrapped in single quotes and
/// internal single quotes are doubled. Plain labels are returned unchanged.
///
/// # Examples
/// ```
/// # use mutwick::parser::utils::escape_label;
/// assert_eq!(escape_label("Pukeko"), "Pukeko");
/// assert_eq!(escape_label("Pu[ke]ko"), "'Pu[ke]ko'");
/// assert_eq!(escape_label("Australasian Swamphen"), "'Australasian Swamphen'");
/// assert_eq!(escape_label("Baillon's Crake"), "'Baillon''s Crake'");
/// ```
pub fn escape_label(label: &str) -> String {
    if is_plain(label) {
        return label.to_string();
    }
    format!("'{}'", label.replace('\'', "''"))
}

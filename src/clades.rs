//! Loading of flat sample-to-lineage assignments.
//!
//! Each line maps a sample name to its lineage, separated by a tab:
//! ```text
//! sample_1	B.1.1.7
//! sample_2	B.1.1.161*|B.1.1(2/3),B.1.1.161(1/3)
//! ```
//! The second form is an uncertain assignment: the point estimate marked
//! with `*`, then after `|` the candidate lineages with their support.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::error::Error;
use crate::parser::{ParsingError, ParsingErrorType};

/// Lineage assignment of one sample.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CladeAssignment {
    /// Point estimate
    pub lineage: String,
    /// All candidate lineages, comma separated, without their support
    pub lineages: String,
}

/// Reads a tab separated sample-to-lineage map.
///
/// Blank lines are skipped. If a sample occurs twice, the later line wins.
///
/// # Errors
/// [Error::Parsing] with [ParsingErrorType::InvalidCladeLine] for lines
/// without tab, plain values containing `*` or `|`, and malformed uncertain
/// assignments. [Error::Io] if reading fails, including invalid UTF-8.
///
/// # Example
/// ```
/// use mutwick::clades::load_clades;
///
/// let input = "s1\tB.1.1.161*|B.1.1(2/3),B.1.1.161(1/3)\ns2\tA.1\n";
/// let clades = load_clades(input.as_bytes()).unwrap();
/// assert_eq!(clades["s1"].lineage, "B.1.1.161");
/// assert_eq!(clades["s1"].lineages, "B.1.1,B.1.1.161");
/// assert_eq!(clades["s2"].lineages, "A.1");
/// ```
pub fn load_clades<R: BufRead>(reader: R) -> Result<BTreeMap<String, CladeAssignment>, Error> {
    let mut clades = BTreeMap::new();
    let mut offset = 0;

    for line in reader.lines() {
        let line = line?;
        let line_offset = offset;
        offset += line.len() + 1;

        let trimmed = line.trim_end_matches('\r');
        if trimmed.trim().is_empty() {
            continue;
        }

        let invalid = |msg: &str| {
            ParsingError::in_line(
                ParsingErrorType::InvalidCladeLine(msg.to_string()),
                line_offset,
                trimmed,
            )
        };

        let (name, value) = trimmed
            .split_once('\t')
            .ok_or_else(|| invalid("expected tab between sample and lineage"))?;
        let assignment = parse_assignment(value.trim()).map_err(invalid)?;
        clades.insert(name.to_string(), assignment);
    }

    Ok(clades)
}

/// Reads a sample-to-lineage map from a file; see [load_clades].
pub fn load_clades_file<P: AsRef<Path>>(path: P) -> Result<BTreeMap<String, CladeAssignment>, Error> {
    let file = File::open(path.as_ref())?;
    let clades = load_clades(BufReader::new(file))?;
    info!(
        path = %path.as_ref().display(),
        num_samples = clades.len(),
        "Loaded clade assignments"
    );
    Ok(clades)
}

fn parse_assignment(value: &str) -> Result<CladeAssignment, &'static str> {
    if value.is_empty() {
        return Err("empty lineage");
    }

    let Some((estimate, candidates)) = value.split_once('|') else {
        if value.contains('*') {
            return Err("'*' outside of uncertain assignment");
        }
        return Ok(CladeAssignment {
            lineage: value.to_string(),
            lineages: value.to_string(),
        });
    };

    let lineage = estimate
        .strip_suffix('*')
        .ok_or("point estimate must end with '*'")?;
    if lineage.is_empty() || lineage.contains('*') {
        return Err("invalid point estimate");
    }

    let lineages = candidates
        .split(',')
        .map(|candidate| {
            // Support in trailing parentheses, e.g. B.1.1(2/3)
            let name = candidate.split_once('(').map_or(candidate, |(name, _)| name).trim();
            if name.is_empty() || name.contains(['*', '|']) {
                Err("invalid candidate lineage")
            } else {
                Ok(name)
            }
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CladeAssignment {
        lineage: lineage.to_string(),
        lineages: lineages.join(","),
    })
}

//! Underlay dataset parsing.
//!
//! A dataset is a text file with one `nodeA nodeB latency` row per line,
//! fields separated by whitespace. Any malformed row fails the whole load.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use log::debug;

use super::model::{NodeId, UnderlayLink};

/// Errors raised while reading an underlay dataset
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("line {line}: expected 3 fields, found {found}")]
    FieldCount { line: usize, found: usize },

    #[error("line {line}: invalid {field} '{value}'")]
    InvalidNumber {
        line: usize,
        field: &'static str,
        value: String,
    },

    #[error("node {node} is linked to itself")]
    SelfLink { node: NodeId },

    #[error("node ids must be dense: highest id is {max_id} but only {distinct} distinct ids appear")]
    SparseNodeIds { max_id: NodeId, distinct: usize },

    #[error("link {first}-{second} appears more than once")]
    DuplicateLink { first: NodeId, second: NodeId },

    #[error("dataset contains no links")]
    Empty,

    #[error("failed to read dataset: {0}")]
    Io(#[from] std::io::Error),
}

fn parse_field<T: std::str::FromStr>(
    raw: &str,
    line: usize,
    field: &'static str,
) -> Result<T, DatasetError> {
    raw.trim().parse().map_err(|_| DatasetError::InvalidNumber {
        line,
        field,
        value: raw.to_string(),
    })
}

/// Parse dataset rows from any buffered reader
pub fn parse_dataset<R: BufRead>(reader: R) -> Result<Vec<UnderlayLink>, DatasetError> {
    let mut links = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line_number = index + 1;
        if line.trim().is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != 3 {
            return Err(DatasetError::FieldCount {
                line: line_number,
                found: fields.len(),
            });
        }

        links.push(UnderlayLink {
            first: parse_field(fields[0], line_number, "node id")?,
            second: parse_field(fields[1], line_number, "node id")?,
            latency: parse_field(fields[2], line_number, "latency")?,
        });
    }

    Ok(links)
}

/// Load dataset rows from a file
pub fn load_dataset(path: &Path) -> Result<Vec<UnderlayLink>> {
    let file = File::open(path)
        .wrap_err_with(|| format!("Failed to open dataset '{}'", path.display()))?;

    let links = parse_dataset(BufReader::new(file))
        .wrap_err_with(|| format!("Malformed dataset '{}'", path.display()))?;

    debug!("Read {} links from {}", links.len(), path.display());
    Ok(links)
}

//! Dataset discovery under the configured data directory.

use std::fs;
use std::path::{Path, PathBuf};

use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use log::debug;
use regex::Regex;

use crate::config::DatasetConfig;

/// Recursively finds dataset files, sorted by path.
///
/// A file qualifies when its name matches `file_pattern` and its full path
/// does not match `exclude_pattern`.
pub fn find_datasets(data_path: &Path, patterns: &DatasetConfig) -> Result<Vec<PathBuf>> {
    let include = patterns.file_regex()?;
    let exclude = patterns.exclude_regex()?;

    let mut found = Vec::new();
    walk(data_path, &include, exclude.as_ref(), &mut found)?;
    found.sort();

    debug!("Found {} datasets under {}", found.len(), data_path.display());
    Ok(found)
}

fn walk(dir: &Path, include: &Regex, exclude: Option<&Regex>, found: &mut Vec<PathBuf>) -> Result<()> {
    let entries = fs::read_dir(dir)
        .wrap_err_with(|| format!("Failed to read data directory '{}'", dir.display()))?;

    for entry in entries {
        let path = entry
            .wrap_err_with(|| format!("Failed to list '{}'", dir.display()))?
            .path();

        if path.is_dir() {
            walk(&path, include, exclude, found)?;
            continue;
        }

        let name_matches = path
            .file_name()
            .and_then(|name| name.to_str())
            .map_or(false, |name| include.is_match(name));
        let excluded = exclude.map_or(false, |re| re.is_match(&path.to_string_lossy()));

        if name_matches && !excluded {
            found.push(path);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_find_datasets_recursively() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("king").join("100");
        fs::create_dir_all(&nested).unwrap();
        let skipped = dir.path().join("qqcap");
        fs::create_dir_all(&skipped).unwrap();

        fs::write(dir.path().join("b-edges.dat"), "0 1 1\n").unwrap();
        fs::write(nested.join("a-edges.dat"), "0 1 1\n").unwrap();
        fs::write(nested.join("a-nodes.dat"), "").unwrap();
        fs::write(skipped.join("c-edges.dat"), "0 1 1\n").unwrap();

        let found = find_datasets(dir.path(), &DatasetConfig::default()).unwrap();
        assert_eq!(found, vec![dir.path().join("b-edges.dat"), nested.join("a-edges.dat")]);
    }

    #[test]
    fn test_missing_directory_fails() {
        let result = find_datasets(Path::new("/nonexistent/data"), &DatasetConfig::default());
        assert!(result.is_err());
    }
}

use crate::error::{DorkError, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// reads lines from a file, trimmed, blank lines skipped
///
/// # Example
/// ```rust,ignore
///     let x: Vec<String> = file_util::read_lines("./foo.txt").unwrap();
///     for i in x {
///         println!("{i}");
///     }
/// ```
pub fn read_lines<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| DorkError::MissingFile {
        path: path.to_path_buf(),
        source,
    })?;

    let reader = BufReader::new(file);
    let mut lines = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if !line.is_empty() {
            lines.push(line.to_string());
        }
    }

    Ok(lines)
}

use std::fs;
use std::path::Path;
use log::{info, warn};

use crate::errors::StoreError;

/// Reads company names, one per line. Blank lines are dropped, everything else
/// is kept verbatim since the name is the key into the progress file.
pub fn load_names<P: AsRef<Path>>(filename: P) -> Result<Vec<String>, StoreError> {
    let path = filename.as_ref();
    let content = fs::read_to_string(path).map_err(|e| StoreError::io(path, e))?;
    let names = parse_names(&content);

    if names.is_empty() {
        warn!("Input file {:?} contains no company names.", path);
    }
    info!("Loaded {} company names from {:?}", names.len(), path);
    Ok(names)
}

fn parse_names(content: &str) -> Vec<String> {
    content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect()
}

use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use log::{info, warn};

use crate::classifier::{SizeCode, StaffCount, SIZE_NOT_FOUND};
use crate::errors::StoreError;
use crate::registry::{CompanyRecord, CompanyRegistry, PageId, PAGE_NOT_FOUND};

const COLUMNS: usize = 4;

/// Append-only CSV log of resolved companies.
///
/// Rows are `size_code, size_range_start, page_identifier, name` with no header.
/// The number of rows found at startup is the resume cursor: a record whose
/// 1-based position is at or below it is already on disk and is never written
/// again.
#[derive(Debug)]
pub struct ProgressStore {
    path: PathBuf,
    cursor: usize,
}

impl ProgressStore {
    /// Creates the progress file, or replays an existing one into `registry`.
    ///
    /// Any row that cannot be parsed aborts startup.
    pub fn initialize<P: AsRef<Path>>(
        path: P,
        registry: &mut CompanyRegistry,
    ) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();

        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(_) => {
                info!("No progress file found at {:?}. Starting fresh.", path);
                return Ok(ProgressStore { path, cursor: 0 });
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {}
            Err(e) => return Err(StoreError::io(&path, e)),
        }

        let file = File::open(&path).map_err(|e| StoreError::io(&path, e))?;
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(file);

        let mut rows = 0;
        for result in rdr.records() {
            let row = result?;
            rows += 1;

            let parsed = parse_row(&row).map_err(|reason| StoreError::MalformedRow {
                path: path.clone(),
                row: rows,
                reason,
            })?;
            if registry.get(&parsed.name).is_none() {
                return Err(StoreError::UnknownCompany {
                    path,
                    row: rows,
                    name: parsed.name,
                });
            }
            // Row k must be the k-th input entry, otherwise the cursor points elsewhere.
            let record = match registry.at_mut(rows - 1) {
                Some(record) if record.name == parsed.name => record,
                other => {
                    return Err(StoreError::OutOfOrder {
                        path,
                        row: rows,
                        expected: other.map(|r| r.name.clone()).unwrap_or_default(),
                        found: parsed.name,
                    })
                }
            };
            *record = parsed;
        }

        info!(
            "Resumed previous session from {:?}: {} companies already recorded.",
            path, rows
        );
        Ok(ProgressStore { path, cursor: rows })
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes `record` unless its 1-based `position` is covered by the cursor.
    /// Returns whether a row was written.
    pub fn append(
        &mut self,
        position: usize,
        record: &CompanyRecord,
    ) -> Result<bool, StoreError> {
        self.ensure_trailing_newline()?;

        if position <= self.cursor {
            return Ok(false);
        }

        let file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .map_err(|e| StoreError::io(&self.path, e))?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(file);

        writer.write_record(&to_row(record))?;
        writer.flush().map_err(|e| StoreError::io(&self.path, e))?;
        Ok(true)
    }

    /// A run killed mid-write can leave the last row unterminated.
    fn ensure_trailing_newline(&self) -> Result<(), StoreError> {
        let mut file = OpenOptions::new()
            .read(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| StoreError::io(&self.path, e))?;

        let len = file
            .metadata()
            .map_err(|e| StoreError::io(&self.path, e))?
            .len();
        if len == 0 {
            return Ok(());
        }

        let mut last = [0u8; 1];
        file.seek(SeekFrom::End(-1))
            .and_then(|_| file.read_exact(&mut last))
            .map_err(|e| StoreError::io(&self.path, e))?;

        if last[0] != b'\n' {
            warn!("Progress file {:?} did not end with a newline. Repairing.", self.path);
            file.write_all(b"\n")
                .map_err(|e| StoreError::io(&self.path, e))?;
        }
        Ok(())
    }
}

fn to_row(record: &CompanyRecord) -> [String; COLUMNS] {
    let text = |value: Option<String>| value.unwrap_or_default();
    [
        text(record.size_code.map(|c| c.to_string())),
        text(record.size_range_start.map(|s| s.to_string())),
        text(record.page_identifier.as_ref().map(|p| p.to_string())),
        record.name.clone(),
    ]
}

fn parse_row(row: &csv::StringRecord) -> Result<CompanyRecord, String> {
    if row.len() != COLUMNS {
        return Err(format!("expected {} columns, found {}", COLUMNS, row.len()));
    }

    let size_code = match &row[0] {
        "" | SIZE_NOT_FOUND => SizeCode::NotFound,
        code => code
            .parse::<u8>()
            .ok()
            .and_then(SizeCode::from_ordinal)
            .ok_or_else(|| format!("unrecognized size code '{}'", code))?,
    };

    let size_range_start = match &row[1] {
        "" | SIZE_NOT_FOUND => StaffCount::NotFound,
        start if start.bytes().all(|b| b.is_ascii_digit()) => start
            .parse::<i64>()
            .map(StaffCount::Start)
            .map_err(|e| format!("staff count '{}': {}", start, e))?,
        start => return Err(format!("unrecognized staff count '{}'", start)),
    };

    let page_identifier = match &row[2] {
        "" | PAGE_NOT_FOUND => PageId::NotFound,
        slug => PageId::Slug(slug.to_string()),
    };

    Ok(CompanyRecord {
        name: row[3].to_string(),
        page_identifier: Some(page_identifier),
        size_code: Some(size_code),
        size_range_start: Some(size_range_start),
    })
}

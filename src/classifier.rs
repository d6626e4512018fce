use std::fmt;

use crate::errors::SizeError;

pub const SIZE_NOT_FOUND: &str = "size not found";

/// Lower bound of a provider staff-count range, or the "not found" sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaffCount {
    Start(i64),
    NotFound,
}

impl fmt::Display for StaffCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StaffCount::Start(n) => write!(f, "{}", n),
            StaffCount::NotFound => f.write_str(SIZE_NOT_FOUND),
        }
    }
}

/// Ordinal staff-size bucket.
///
/// Buckets follow LinkedIn's company size codes, collapsed to four ranges:
/// 0-50, 51-1000, 1001-10000 and anything above.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeCode {
    Small,
    Medium,
    Large,
    Enterprise,
    NotFound,
}

impl SizeCode {
    pub fn ordinal(self) -> Option<u8> {
        match self {
            SizeCode::Small => Some(1),
            SizeCode::Medium => Some(2),
            SizeCode::Large => Some(3),
            SizeCode::Enterprise => Some(4),
            SizeCode::NotFound => None,
        }
    }

    pub fn from_ordinal(ordinal: u8) -> Option<Self> {
        match ordinal {
            1 => Some(SizeCode::Small),
            2 => Some(SizeCode::Medium),
            3 => Some(SizeCode::Large),
            4 => Some(SizeCode::Enterprise),
            _ => None,
        }
    }
}

impl fmt::Display for SizeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.ordinal() {
            Some(n) => write!(f, "{}", n),
            None => f.write_str(SIZE_NOT_FOUND),
        }
    }
}

pub fn classify(start: Option<StaffCount>) -> Result<SizeCode, SizeError> {
    match start {
        None | Some(StaffCount::NotFound) => Ok(SizeCode::NotFound),
        Some(StaffCount::Start(n)) => match n {
            0..=50 => Ok(SizeCode::Small),
            51..=1_000 => Ok(SizeCode::Medium),
            1_001..=10_000 => Ok(SizeCode::Large),
            n if n > 10_000 => Ok(SizeCode::Enterprise),
            n => Err(SizeError::Negative(n)),
        },
    }
}

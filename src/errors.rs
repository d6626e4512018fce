use std::error::Error as StdError;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Startup configuration problems (missing credentials, bad values).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("environment variable {0} is not set")]
    Missing(&'static str),
    #[error("environment variable {name} has an invalid value '{value}': {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Failures of the input list or the progress file.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error("{path} row {row}: {reason}")]
    MalformedRow {
        path: PathBuf,
        row: usize,
        reason: String,
    },
    #[error("{path} row {row}: found '{found}' where the input list has '{expected}'")]
    OutOfOrder {
        path: PathBuf,
        row: usize,
        expected: String,
        found: String,
    },
    #[error("{path} row {row}: company '{name}' is not in the input list")]
    UnknownCompany {
        path: PathBuf,
        row: usize,
        name: String,
    },
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Failures of a single company lookup. All of them are retryable by the operator.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("request failed")]
    Http(#[from] reqwest::Error),
    #[error("could not decode provider response")]
    Decode(#[from] serde_json::Error),
    #[error("could not build request URL")]
    Url(#[from] url::ParseError),
    #[error("provider answered with status {status}: {message}")]
    Status { status: u16, message: String },
    #[error("authentication failed: {0}")]
    Auth(String),
    #[error("no company page found for '{0}'")]
    NoSuchPage(String),
    #[error("provider reported a negative staff count ({0})")]
    InvalidStaffCount(i64),
    #[error("malformed page URL '{0}': expected at least five '/'-separated segments")]
    MalformedUrl(String),
}

/// The classifier only accepts non-negative staff counts.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SizeError {
    #[error("unrecognized starting number for staff size range: {0}")]
    Negative(i64),
}

/// Errors that end a resolution run early.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Size(#[from] SizeError),
    #[error("operator prompt failed")]
    Prompt(#[source] io::Error),
    #[error("operator input closed")]
    InputClosed,
}

/// Renders an error followed by its `source()` chain, for operator reports.
pub fn error_chain(err: &dyn StdError) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        out.push_str(": ");
        out.push_str(&cause.to_string());
        source = cause.source();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_chain_includes_sources() {
        let err = StoreError::io("sizes.csv", io::Error::new(io::ErrorKind::Other, "disk full"));
        let wrapped = ResolveError::Store(err);
        assert_eq!(error_chain(&wrapped), "I/O error on \"sizes.csv\": disk full");
    }
}

//! Error types for the wifi-locator-core crate.
//!
//! The position estimator itself is infallible: unmatched access points are
//! skipped and an empty match set yields the `UNKNOWN` result. Errors only
//! arise at the edges, when loading reference data and when querying an
//! empty scan history.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading the fingerprint database or coordinate table.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum LoadError {
    /// The reference file could not be opened or read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The fingerprint CSV is not well-formed.
    #[error("malformed fingerprint CSV: {0}")]
    Csv(#[from] csv::Error),

    /// The coordinate table is not a JSON object of `{lat, lng}` entries.
    #[error("malformed coordinate table: {0}")]
    Json(#[from] serde_json::Error),
}

impl LoadError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Errors returned by scan history queries.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryError {
    /// `latest()` was called before any scan was recorded.
    #[error("scan history is empty")]
    Empty,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        assert_eq!(HistoryError::Empty.to_string(), "scan history is empty");

        let err = LoadError::io(
            "missing.csv",
            std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        );
        assert_eq!(err.to_string(), "failed to read missing.csv: no such file");
    }
}

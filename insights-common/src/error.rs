use std::path::PathBuf;

use thiserror::Error;

use crate::tables::TableKind;

/// Enumeration of errors raised while reading a table from the data directory.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to open {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode {path}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

impl LoadError {
    pub fn path(&self) -> &PathBuf {
        match self {
            LoadError::Io { path, .. } | LoadError::Csv { path, .. } => path,
        }
    }
}

/// A table a view depends on is not part of the loaded snapshot.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("missing file: {}", .0.file_name())]
pub struct MissingTable(pub TableKind);

/// A table exists on disk but could not be read. Keeps the rendered cause so it can be shown
/// next to the panel that needed it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unreadable file: {}", .table.file_name())]
pub struct UnreadableTable {
    pub table: TableKind,
    pub reason: String,
}

impl UnreadableTable {
    pub fn new(table: TableKind, err: &LoadError) -> Self {
        let reason = match err {
            LoadError::Io { source, .. } => source.to_string(),
            LoadError::Csv { source, .. } => source.to_string(),
        };
        Self { table, reason }
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("spend range is inverted: {min} > {max}")]
    InvertedSpendRange { min: f64, max: f64 },
    #[error("{0} must be greater than zero")]
    ZeroSize(&'static str),
}

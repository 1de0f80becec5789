use std::fs::File;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use tracing::{info, instrument, warn};

use crate::error::{LoadError, MissingTable};
use crate::tables::{
    CategoryTranslationRow, CategoryTranslations, CustomerSegment, OrderHistoryEntry,
    ProductAffinity, ProductNameRow, ProductNames, RawTable, SegmentAffinity, TableKind,
};

/// Immutable view of every table found in the data directory.
///
/// Built once before the interactive loop starts and shared by reference afterwards. Any table
/// may be absent, consumers go through the accessors and degrade on [`MissingTable`].
#[derive(Debug, Default)]
pub struct Snapshot {
    pub data_dir: PathBuf,
    pub customers: Option<Vec<CustomerSegment>>,
    pub affinity: Option<Vec<SegmentAffinity>>,
    pub history: Option<Vec<OrderHistoryEntry>>,
    pub product_names: Option<ProductNames>,
    pub product_segments: Option<RawTable>,
    pub translations: Option<CategoryTranslations>,
    pub issues: Vec<LoadError>,
}

impl Snapshot {
    #[instrument(skip_all, fields(data_dir = %data_dir.as_ref().display()))]
    pub fn load(data_dir: impl AsRef<Path>) -> Self {
        let data_dir = data_dir.as_ref().to_path_buf();
        let mut issues = Vec::new();
        let path = |kind: TableKind| data_dir.join(kind.file_name());

        let customers = settle(
            TableKind::CustomerSegments,
            read_rows(&path(TableKind::CustomerSegments)),
            &mut issues,
        );
        let affinity = settle(
            TableKind::SegmentAffinity,
            read_rows(&path(TableKind::SegmentAffinity)),
            &mut issues,
        );
        let history = settle(
            TableKind::OrderHistory,
            read_rows(&path(TableKind::OrderHistory)),
            &mut issues,
        );
        let product_names = settle(
            TableKind::ProductNames,
            read_rows::<ProductNameRow>(&path(TableKind::ProductNames)),
            &mut issues,
        )
        .map(ProductNames::from);
        let product_segments = settle(
            TableKind::ProductSegments,
            read_raw(&path(TableKind::ProductSegments)),
            &mut issues,
        );
        let translations = settle(
            TableKind::CategoryTranslation,
            read_rows::<CategoryTranslationRow>(&path(TableKind::CategoryTranslation)),
            &mut issues,
        )
        .map(CategoryTranslations::from);

        let snapshot = Self {
            data_dir,
            customers,
            affinity,
            history,
            product_names,
            product_segments,
            translations,
            issues,
        };
        for (kind, rows) in snapshot.row_counts() {
            info!(table = kind.file_name(), rows, "table loaded");
        }
        snapshot
    }

    pub fn customers(&self) -> Result<&[CustomerSegment], MissingTable> {
        self.customers
            .as_deref()
            .ok_or(MissingTable(TableKind::CustomerSegments))
    }

    pub fn affinity(&self) -> Result<&[SegmentAffinity], MissingTable> {
        self.affinity
            .as_deref()
            .ok_or(MissingTable(TableKind::SegmentAffinity))
    }

    pub fn history(&self) -> Result<&[OrderHistoryEntry], MissingTable> {
        self.history
            .as_deref()
            .ok_or(MissingTable(TableKind::OrderHistory))
    }

    pub fn product_names(&self) -> Result<&ProductNames, MissingTable> {
        self.product_names
            .as_ref()
            .ok_or(MissingTable(TableKind::ProductNames))
    }

    /// Translations are optional enrichment, callers fall back to raw codes without them.
    pub fn translations(&self) -> Option<&CategoryTranslations> {
        self.translations.as_ref()
    }

    /// Reads `product_affinity_v2.csv` from disk. Not cached: the file is checked every time a
    /// customer detail is built so that it can appear or disappear while the dashboard runs.
    pub fn read_product_affinity(&self) -> Result<Option<Vec<ProductAffinity>>, LoadError> {
        read_rows(&self.data_dir.join(TableKind::ProductAffinity.file_name()))
    }

    /// Row counts of the tables present in the snapshot, in load order.
    pub fn row_counts(&self) -> Vec<(TableKind, usize)> {
        TableKind::PRELOADED
            .into_iter()
            .filter_map(|kind| Some((kind, self.row_count(kind)?)))
            .collect()
    }

    fn row_count(&self, kind: TableKind) -> Option<usize> {
        match kind {
            TableKind::CustomerSegments => self.customers.as_ref().map(Vec::len),
            TableKind::SegmentAffinity => self.affinity.as_ref().map(Vec::len),
            TableKind::OrderHistory => self.history.as_ref().map(Vec::len),
            TableKind::ProductNames => self.product_names.as_ref().map(ProductNames::len),
            TableKind::ProductSegments => self.product_segments.as_ref().map(|t| t.rows.len()),
            TableKind::CategoryTranslation => {
                self.translations.as_ref().map(CategoryTranslations::len)
            }
            TableKind::ProductAffinity => None,
        }
    }
}

fn settle<T>(
    kind: TableKind,
    result: Result<Option<T>, LoadError>,
    issues: &mut Vec<LoadError>,
) -> Option<T> {
    match result {
        Ok(Some(table)) => Some(table),
        Ok(None) => {
            warn!(table = kind.file_name(), "table not found, skipping");
            None
        }
        Err(err) => {
            warn!(table = kind.file_name(), error = ?err, "failed to load table, skipping");
            issues.push(err);
            None
        }
    }
}

fn open(path: &Path) -> Result<Option<csv::Reader<File>>, LoadError> {
    if !path.exists() {
        return Ok(None);
    }
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Some(csv::Reader::from_reader(file)))
}

pub(crate) fn read_rows<T: DeserializeOwned>(path: &Path) -> Result<Option<Vec<T>>, LoadError> {
    let Some(mut reader) = open(path)? else {
        return Ok(None);
    };
    let rows = reader
        .deserialize()
        .collect::<Result<Vec<T>, _>>()
        .map_err(|source| LoadError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(Some(rows))
}

fn read_raw(path: &Path) -> Result<Option<RawTable>, LoadError> {
    let Some(mut reader) = open(path)? else {
        return Ok(None);
    };
    let csv_err = |source| LoadError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let headers = reader
        .headers()
        .map_err(csv_err)?
        .iter()
        .map(str::to_string)
        .collect();
    let rows = reader
        .records()
        .map(|record| record.map(|r| r.iter().map(str::to_string).collect()))
        .collect::<Result<Vec<Vec<String>>, _>>()
        .map_err(csv_err)?;
    Ok(Some(RawTable { headers, rows }))
}

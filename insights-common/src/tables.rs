use std::collections::HashMap;

use serde::Deserialize;

/// The fixed set of files the loader knows about, relative to the data directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableKind {
    CustomerSegments,
    SegmentAffinity,
    OrderHistory,
    ProductNames,
    ProductSegments,
    CategoryTranslation,
    ProductAffinity,
}

impl TableKind {
    /// Tables read once at startup. `ProductAffinity` is left out, it is read per detail view.
    pub const PRELOADED: [TableKind; 6] = [
        TableKind::CustomerSegments,
        TableKind::SegmentAffinity,
        TableKind::OrderHistory,
        TableKind::ProductNames,
        TableKind::ProductSegments,
        TableKind::CategoryTranslation,
    ];

    pub fn file_name(&self) -> &'static str {
        match self {
            TableKind::CustomerSegments => "customer_segments.csv",
            TableKind::SegmentAffinity => "segment_affinity.csv",
            TableKind::OrderHistory => "customer_order_history.csv",
            TableKind::ProductNames => "olist_products_dataset.csv",
            TableKind::ProductSegments => "product_segments.csv",
            TableKind::CategoryTranslation => "product_category_name_translation.csv",
            TableKind::ProductAffinity => "product_affinity_v2.csv",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CustomerSegment {
    pub customer_unique_id: String,
    pub customer_segment: Option<String>,
    pub total_spend: f64,
    pub n_orders: u32,
    pub recency_days: u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SegmentAffinity {
    pub customer_segment: String,
    pub product_id: String,
    pub match_score: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProductAffinity {
    pub customer_segment: String,
    pub display_name: String,
    pub product_id: String,
    pub match_score: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OrderHistoryEntry {
    pub customer_unique_id: String,
    pub order_purchase_timestamp: String,
    pub product_category_name: Option<String>,
    pub price: f64,
}

// Only the two columns below are kept, the rest of the products dataset is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductNameRow {
    pub product_id: String,
    pub product_category_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CategoryTranslationRow {
    pub product_category_name: String,
    pub product_category_name_english: Option<String>,
}

/// `product_id` -> raw category code. Products without a category are not kept.
#[derive(Debug, Clone, Default)]
pub struct ProductNames(HashMap<String, String>);

impl ProductNames {
    pub fn category_of(&self, product_id: &str) -> Option<&str> {
        self.0.get(product_id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, String)> for ProductNames {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<Vec<ProductNameRow>> for ProductNames {
    fn from(rows: Vec<ProductNameRow>) -> Self {
        rows.into_iter()
            .filter_map(|row| Some((row.product_id, row.product_category_name?)))
            .collect()
    }
}

/// Raw category code -> English category name.
#[derive(Debug, Clone, Default)]
pub struct CategoryTranslations(HashMap<String, String>);

impl CategoryTranslations {
    pub fn english_name(&self, raw: &str) -> Option<&str> {
        self.0.get(raw).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, String)> for CategoryTranslations {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<Vec<CategoryTranslationRow>> for CategoryTranslations {
    fn from(rows: Vec<CategoryTranslationRow>) -> Self {
        rows.into_iter()
            .filter_map(|row| Some((row.product_category_name, row.product_category_name_english?)))
            .collect()
    }
}

/// A table kept with its on-disk shape, no typed columns.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

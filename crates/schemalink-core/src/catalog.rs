//! Table catalog: the data feed cards are dropped from.

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Catalog loading errors.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Malformed catalog: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Result type for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// A detail row under a column. Keys become the header row.
pub type DetailRow = serde_json::Map<String, serde_json::Value>;

/// A column of a catalog table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDef {
    #[serde(rename = "column_id", deserialize_with = "deserialize_id")]
    pub id: String,
    pub name: String,
    /// Optional detail rows shown on a dropped card.
    #[serde(default, rename = "columns")]
    pub details: Vec<DetailRow>,
}

impl ColumnDef {
    /// Header names for the detail rows, taken from the first row.
    pub fn headers(&self) -> Vec<&str> {
        self.details
            .first()
            .map(|row| row.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }
}

/// A catalog table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableDef {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub columns: Vec<ColumnDef>,
}

impl TableDef {
    pub fn column(&self, column_id: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.id == column_id)
    }
}

/// Ids arrive as strings or bare numbers.
fn deserialize_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Integer(i64),
        Float(f64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(text) => text,
        RawId::Integer(n) => n.to_string(),
        RawId::Float(n) => n.to_string(),
    })
}

/// Every table available for dropping, in feed order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    tables: Vec<TableDef>,
}

impl Catalog {
    pub fn new(tables: Vec<TableDef>) -> Self {
        Self { tables }
    }

    /// Parse a grouped feed: `{ "table 1": [...], "table 2": [...] }`.
    /// Groups are concatenated in feed order.
    pub fn from_json(json: &str) -> CatalogResult<Self> {
        let groups: serde_json::Map<String, serde_json::Value> = serde_json::from_str(json)?;
        let mut tables = Vec::new();
        for (_, group) in groups {
            tables.extend(serde_json::from_value::<Vec<TableDef>>(group)?);
        }
        Ok(Self { tables })
    }

    /// Like [`from_json`](Self::from_json), but a malformed feed yields an
    /// empty catalog.
    pub fn load_or_empty(json: &str) -> Self {
        match Self::from_json(json) {
            Ok(catalog) => {
                log::info!("Loaded catalog with {} table(s)", catalog.len());
                catalog
            }
            Err(e) => {
                log::warn!("Failed to load catalog: {}", e);
                Self::default()
            }
        }
    }

    pub fn table(&self, table_id: &str) -> Option<&TableDef> {
        self.tables.iter().find(|t| t.id == table_id)
    }

    pub fn column(&self, table_id: &str, column_id: &str) -> Option<&ColumnDef> {
        self.table(table_id)?.column(column_id)
    }

    pub fn tables(&self) -> &[TableDef] {
        &self.tables
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

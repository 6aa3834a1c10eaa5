//! Table metadata returned to callers.

use serde::{Deserialize, Serialize};

/// One column as reported by `PRAGMA table_info`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnInfo {
    pub name: String,
    /// Declared SQL type, e.g. `INTEGER` or `TEXT`.
    #[serde(rename = "type")]
    pub kind: String,
    pub not_null: bool,
    /// Default expression as written in the DDL.
    pub default_value: Option<String>,
    pub primary_key: bool,
}

/// Row count and columns of a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableInfo {
    pub rows: u64,
    pub schema: Vec<ColumnInfo>,
}

/// Raw `PRAGMA table_info` row.
#[derive(Debug, Deserialize)]
pub(crate) struct PragmaColumn {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub notnull: i64,
    pub dflt_value: Option<String>,
    pub pk: i64,
}

impl From<PragmaColumn> for ColumnInfo {
    fn from(col: PragmaColumn) -> Self {
        Self {
            name: col.name,
            kind: col.kind,
            not_null: col.notnull != 0,
            default_value: col.dflt_value,
            primary_key: col.pk != 0,
        }
    }
}

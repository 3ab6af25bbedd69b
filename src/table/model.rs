//! Deserializable representation of `data/department_categories.json`.
//!
//! Entries are kept as an ordered list rather than a JSON object so duplicate
//! department names survive parsing and can be rejected by
//! `CategoryResolver`. Use these structs when the raw file is needed; use the
//! resolver for lookups.

use crate::table::identity::{CategoryLabel, DepartmentName};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Clone, Debug, Deserialize, Serialize)]
/// Department table as stored on disk.
pub struct DepartmentTable {
    pub schema_version: String,
    #[serde(default)]
    pub description: Option<String>,
    pub departments: Vec<DepartmentEntry>,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
/// One department and the category it reports under.
pub struct DepartmentEntry {
    pub name: DepartmentName,
    pub category: CategoryLabel,
}

/// Parse a department table from JSON text without additional validation.
pub fn load_table_from_str(data: &str) -> Result<DepartmentTable> {
    let table: DepartmentTable =
        serde_json::from_str(data).context("parsing department table")?;
    Ok(table)
}

/// Read and parse a department table from disk without additional validation.
pub fn load_table_from_path(path: &Path) -> Result<DepartmentTable> {
    let data = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    load_table_from_str(&data).with_context(|| format!("loading {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_entries_survive_parsing() {
        let table = load_table_from_str(
            r#"{
                "schema_version": "department_categories_v1",
                "departments": [
                    {"name": "Department of Physics", "category": "Science and Solutions"},
                    {"name": "Department of Physics", "category": "Health Futures"}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(table.departments.len(), 2);
        assert!(table.description.is_none());
    }

    #[test]
    fn unknown_category_fails_to_parse() {
        let err = load_table_from_str(
            r#"{
                "schema_version": "department_categories_v1",
                "departments": [{"name": "Department of History", "category": "Humanities"}]
            }"#,
        )
        .unwrap_err();
        assert!(format!("{err:#}").contains("unknown category label"));
    }
}

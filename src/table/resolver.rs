//! Indexed, immutable view of a department table.
//!
//! The resolver enforces the table schema version and builds an exact-match
//! index keyed by department name. It is intentionally strict about duplicates
//! and malformed names so a bad data edit fails at startup instead of quietly
//! changing which category a department reports under.

use crate::schema_loader::{TABLE_SCHEMA_VERSION, validate_table_value};
use crate::table::identity::{CategoryLabel, DepartmentName};
use crate::table::model::{DepartmentEntry, DepartmentTable};
use anyhow::{Context, Result, bail};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

const BUILTIN_TABLE: &str = include_str!("../../data/department_categories.json");

#[derive(Clone, Debug)]
/// Department name → category index.
///
/// Lookups are exact string comparisons. The index never changes after
/// construction, so a shared reference (or an `Arc`) can be read from any
/// number of threads without locking.
pub struct CategoryResolver {
    by_name: BTreeMap<DepartmentName, CategoryLabel>,
}

impl CategoryResolver {
    /// Build the resolver from the table embedded in the crate.
    pub fn builtin() -> Result<Self> {
        Self::from_json_str(BUILTIN_TABLE).context("loading built-in department table")
    }

    /// Load and validate a table from disk.
    ///
    /// Validates against the table schema, then rejects duplicate or malformed
    /// names before building the index.
    pub fn load(path: &Path) -> Result<Self> {
        let data =
            fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        Self::from_json_str(&data).with_context(|| format!("loading {}", path.display()))
    }

    /// Validate and index a table supplied as JSON text.
    pub fn from_json_str(data: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(data).context("parsing department table")?;
        validate_table_value(&value)?;
        let table: DepartmentTable =
            serde_json::from_value(value).context("decoding department table")?;
        Self::from_table(&table)
    }

    /// Index an already-parsed table.
    pub fn from_table(table: &DepartmentTable) -> Result<Self> {
        if table.schema_version != TABLE_SCHEMA_VERSION {
            bail!(
                "schema_version '{}' not supported (expected '{}')",
                table.schema_version,
                TABLE_SCHEMA_VERSION
            );
        }
        Self::from_entries(table.departments.iter().cloned())
    }

    /// Index entries built in code. Applies the same invariants as file loads.
    pub fn from_entries<I>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = DepartmentEntry>,
    {
        let by_name = build_index(entries)?;
        tracing::debug!(departments = by_name.len(), "department table indexed");
        Ok(Self { by_name })
    }

    /// Resolve a department to its category.
    ///
    /// Returns `None` for names that are not exact keys; callers decide whether
    /// that is fatal or whether a fallback label applies.
    pub fn resolve(&self, department: &str) -> Option<CategoryLabel> {
        self.by_name.get(department).copied()
    }

    /// Resolve a department, substituting `fallback` when it is unknown.
    pub fn resolve_or<'a>(&self, department: &str, fallback: &'a str) -> &'a str {
        match self.resolve(department) {
            Some(label) => label.as_str(),
            None => fallback,
        }
    }

    /// Distinct category labels present in the table.
    pub fn categories(&self) -> BTreeSet<CategoryLabel> {
        self.by_name.values().copied().collect()
    }

    /// Iterates departments and their labels in stable (sorted) order.
    pub fn departments(&self) -> impl Iterator<Item = (&DepartmentName, CategoryLabel)> {
        self.by_name.iter().map(|(name, label)| (name, *label))
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

fn build_index<I>(entries: I) -> Result<BTreeMap<DepartmentName, CategoryLabel>>
where
    I: IntoIterator<Item = DepartmentEntry>,
{
    let mut map: BTreeMap<DepartmentName, CategoryLabel> = BTreeMap::new();
    for entry in entries {
        let name = &entry.name.0;
        if name.trim().is_empty() {
            bail!("encountered department with no name");
        }
        if name.trim() != name {
            bail!("department name '{name}' has leading or trailing whitespace");
        }
        if let Some(existing) = map.get(&entry.name) {
            bail!(
                "duplicate department name '{}' (already mapped to {}, redefined as {})",
                name,
                existing,
                entry.category
            );
        }
        map.insert(entry.name, entry.category);
    }
    if map.is_empty() {
        bail!("department table contains no departments");
    }
    Ok(map)
}

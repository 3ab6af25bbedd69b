//! JSON Schema handling for department tables.
//!
//! The schema ships inside the crate so table files are validated the same way
//! whether they come from the embedded default or a path supplied at startup.
//! Validation runs on the raw JSON value before typed deserialization, which
//! keeps schema errors (missing fields, labels outside the enumeration)
//! reported together instead of stopping at the first serde failure.

use anyhow::{Context, Result, anyhow, bail};
use jsonschema::JSONSchema;
use serde_json::Value;

/// Schema version every accepted table must declare.
pub const TABLE_SCHEMA_VERSION: &str = "department_categories_v1";

const TABLE_SCHEMA: &str = include_str!("../schema/department_table.schema.json");
const SCHEMA_VERSION_POINTER: &str = "/properties/schema_version/const";

/// Result of loading and compiling the table schema.
pub(crate) struct SchemaLoadResult {
    pub schema_version: String,
    pub compiled: JSONSchema,
}

/// Parse and compile the embedded table schema.
///
/// Fails when the embedded const disagrees with `TABLE_SCHEMA_VERSION`; that
/// would mean the schema file and the loader drifted apart.
pub(crate) fn load_table_schema() -> Result<SchemaLoadResult> {
    let schema: Value =
        serde_json::from_str(TABLE_SCHEMA).context("parsing embedded department table schema")?;

    let schema_version = extract_schema_version(&schema, SCHEMA_VERSION_POINTER)
        .ok_or_else(|| anyhow!("table schema missing schema_version const"))?;
    if schema_version != TABLE_SCHEMA_VERSION {
        bail!(
            "embedded table schema declares '{}', expected '{}'",
            schema_version,
            TABLE_SCHEMA_VERSION
        );
    }

    let compiled = JSONSchema::compile(&schema)
        .map_err(|err| anyhow!("compiling department table schema: {err}"))?;

    Ok(SchemaLoadResult {
        schema_version,
        compiled,
    })
}

/// Validate a raw table payload, collecting every schema violation.
pub(crate) fn validate_table_value(value: &Value) -> Result<()> {
    let schema = load_table_schema()?;
    tracing::debug!(schema_version = %schema.schema_version, "validating department table");

    if let Err(errors) = schema.compiled.validate(value) {
        let details = errors
            .map(|err| err.to_string())
            .collect::<Vec<_>>()
            .join("\n");
        bail!("department table failed schema validation:\n{details}");
    }
    Ok(())
}

fn extract_schema_version(schema: &Value, pointer: &str) -> Option<String> {
    let version = schema.pointer(pointer).and_then(Value::as_str)?;
    if version
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
    {
        Some(version.to_string())
    } else {
        None
    }
}

//! Attach category labels to publication records.
//!
//! Reporting scripts hand over records that carry a department field; this
//! module resolves each one and writes the label back, substituting the
//! caller's fallback label for departments the table does not know.

use crate::table::CategoryResolver;
use anyhow::{Context, Result, bail};
use serde_json::Value;
use std::collections::BTreeSet;

pub const DEFAULT_DEPARTMENT_POINTER: &str = "/department";
pub const DEFAULT_CATEGORY_FIELD: &str = "category";

#[derive(Clone, Debug)]
pub struct EnrichOptions {
    /// JSON Pointer to the department name inside each record.
    pub department_pointer: String,
    /// Top-level key the resolved label is written to.
    pub category_field: String,
    pub fallback_label: String,
}

impl EnrichOptions {
    pub fn with_fallback(fallback_label: impl Into<String>) -> Self {
        Self {
            department_pointer: DEFAULT_DEPARTMENT_POINTER.to_string(),
            category_field: DEFAULT_CATEGORY_FIELD.to_string(),
            fallback_label: fallback_label.into(),
        }
    }

    fn validate(&self) -> Result<()> {
        if !self.department_pointer.is_empty() && !self.department_pointer.starts_with('/') {
            bail!(
                "department pointer must be empty (root) or start with '/', got '{}'",
                self.department_pointer
            );
        }
        if self.category_field.is_empty() {
            bail!("category field must not be empty");
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct EnrichSummary {
    pub total: usize,
    pub matched: usize,
    pub fallback: usize,
    /// Department strings that did not resolve, deduplicated.
    pub unknown_departments: BTreeSet<String>,
    /// Records with no string at the department pointer.
    pub missing_department: usize,
}

/// Parse a record stream, accepting a JSON array, a single object, or NDJSON.
///
/// Empty input is an error, as is any record that is not a JSON object.
pub fn parse_record_stream(input: &str) -> Result<Vec<Value>> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        bail!("No records provided");
    }

    let records = if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        match value {
            Value::Array(items) => items,
            Value::Object(_) => vec![value],
            _ => bail!("Unsupported JSON input; expected object or array"),
        }
    } else {
        let mut records = Vec::new();
        for (idx, line) in trimmed.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let record: Value = serde_json::from_str(line)
                .with_context(|| format!("Unable to parse record from line {}", idx + 1))?;
            records.push(record);
        }
        records
    };

    if records.is_empty() {
        bail!("No records found in input stream");
    }
    if let Some(idx) = records.iter().position(|record| !record.is_object()) {
        bail!("record {} is not a JSON object", idx + 1);
    }
    Ok(records)
}

/// Resolve and attach a category label to every record in place.
///
/// Options and record shapes are checked before anything is written, so an
/// `Err` leaves `records` untouched.
pub fn enrich_records(
    resolver: &CategoryResolver,
    records: &mut [Value],
    options: &EnrichOptions,
) -> Result<EnrichSummary> {
    options.validate()?;
    if let Some(idx) = records.iter().position(|record| !record.is_object()) {
        bail!("record {} is not a JSON object", idx + 1);
    }

    let mut summary = EnrichSummary::default();
    for (idx, record) in records.iter_mut().enumerate() {
        let department = record
            .pointer(&options.department_pointer)
            .and_then(Value::as_str)
            .map(str::to_string);

        let label = match department {
            Some(name) => match resolver.resolve(&name) {
                Some(label) => {
                    summary.matched += 1;
                    label.as_str()
                }
                None => {
                    if summary.unknown_departments.insert(name.clone()) {
                        tracing::warn!(department = %name, "unknown department; applying fallback");
                    }
                    summary.fallback += 1;
                    options.fallback_label.as_str()
                }
            },
            None => {
                tracing::debug!(record = idx + 1, "record has no department");
                summary.missing_department += 1;
                summary.fallback += 1;
                options.fallback_label.as_str()
            }
        };

        if let Some(object) = record.as_object_mut() {
            object.insert(
                options.category_field.clone(),
                Value::String(label.to_string()),
            );
        }
        summary.total += 1;
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn resolver() -> CategoryResolver {
        CategoryResolver::builtin().unwrap()
    }

    #[test]
    fn parses_array_object_and_ndjson() {
        assert_eq!(parse_record_stream(r#"[{"a":1},{"a":2}]"#).unwrap().len(), 2);
        assert_eq!(parse_record_stream(r#"{"a":1}"#).unwrap().len(), 1);
        let ndjson = "{\"a\":1}\n\n{\"a\":2}\n{\"a\":3}\n";
        assert_eq!(parse_record_stream(ndjson).unwrap().len(), 3);
    }

    #[test]
    fn rejects_empty_and_scalar_input() {
        assert!(parse_record_stream("   \n").is_err());
        assert!(parse_record_stream("[]").is_err());
        assert!(parse_record_stream("42").is_err());
        let err = parse_record_stream(r#"[{"a":1}, "text"]"#).unwrap_err();
        assert!(err.to_string().contains("record 2"));
    }

    #[test]
    fn ndjson_errors_name_the_line() {
        let err = parse_record_stream("{\"a\":1}\n{broken\n").unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn enriches_known_and_unknown_departments() {
        let mut records = vec![
            json!({"title": "A", "department": "Department of Computing"}),
            json!({"title": "B", "department": "Department of Physics"}),
            json!({"title": "C", "department": "department of physics"}),
            json!({"title": "D", "department": "Department of Alchemy"}),
            json!({"title": "E", "department": "Department of Alchemy"}),
            json!({"title": "F"}),
        ];
        let summary = enrich_records(
            &resolver(),
            &mut records,
            &EnrichOptions::with_fallback("Uncategorized"),
        )
        .unwrap();

        assert_eq!(records[0]["category"], "Engineering Futures");
        assert_eq!(records[1]["category"], "Science and Solutions");
        assert_eq!(records[2]["category"], "Uncategorized");
        assert_eq!(records[5]["category"], "Uncategorized");
        assert_eq!(summary.total, 6);
        assert_eq!(summary.matched, 2);
        assert_eq!(summary.fallback, 4);
        assert_eq!(summary.missing_department, 1);
        assert_eq!(
            summary.unknown_departments.into_iter().collect::<Vec<_>>(),
            vec![
                "Department of Alchemy".to_string(),
                "department of physics".to_string()
            ]
        );
    }

    #[test]
    fn honours_custom_pointer_and_field() {
        let mut records = vec![json!({"org": {"unit": "Data Science Institute"}})];
        let options = EnrichOptions {
            department_pointer: "/org/unit".to_string(),
            category_field: "theme".to_string(),
            fallback_label: "Other".to_string(),
        };
        enrich_records(&resolver(), &mut records, &options).unwrap();
        assert_eq!(records[0]["theme"], "Digital & AI");
        assert!(records[0].get("category").is_none());
    }

    #[test]
    fn non_object_record_leaves_batch_untouched() {
        let mut records = vec![json!({"department": "Department of Physics"}), json!("text")];
        let before = records.clone();
        let err = enrich_records(
            &resolver(),
            &mut records,
            &EnrichOptions::with_fallback("Uncategorized"),
        )
        .unwrap_err();
        assert!(err.to_string().contains("record 2"));
        assert_eq!(records, before);
        assert!(records[0].get("category").is_none());
    }

    #[test]
    fn rejects_malformed_pointer() {
        let mut records = vec![json!({"department": "Business School"})];
        let options = EnrichOptions {
            department_pointer: "department".to_string(),
            ..EnrichOptions::with_fallback("Other")
        };
        let before = records.clone();
        assert!(enrich_records(&resolver(), &mut records, &options).is_err());
        assert_eq!(records, before);
    }
}

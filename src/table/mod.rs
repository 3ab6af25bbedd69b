//! Department table wiring.
//!
//! This module wraps the JSON table under `data/department_categories.json` so
//! callers can load a validated snapshot and resolve department names. Types
//! here mirror the table file; callers use `CategoryResolver` for lookups.

pub mod identity;
pub mod model;
pub mod resolver;

pub use identity::{CategoryLabel, DepartmentName};
pub use model::{DepartmentEntry, DepartmentTable, load_table_from_path, load_table_from_str};
pub use resolver::CategoryResolver;

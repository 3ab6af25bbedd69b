//! Department → category resolution.
//!
//! The crate owns a fixed table mapping academic department names to one of a
//! small set of thematic category labels. Public functions here form the
//! contract consumers depend on: building the resolver (built-in table or a
//! schema-validated file), exact-match lookups that report unknown names as
//! `None`, explicit publication into a shared host namespace, and the record
//! enrichment used by reporting scripts.

pub mod config;
pub mod enrich;
pub mod host;
pub mod logging;
mod schema_loader;
pub mod table;

pub use config::{HostMode, ResolverConfig};
pub use enrich::{EnrichOptions, EnrichSummary, enrich_records, parse_record_stream};
pub use host::{
    HOST_BINDING, HostEnvironment, HostNamespace, Publication, SharedNamespace,
    process_namespace, publish_to_host,
};
pub use schema_loader::TABLE_SCHEMA_VERSION;
pub use table::{
    CategoryLabel, CategoryResolver, DepartmentEntry, DepartmentName, DepartmentTable,
    load_table_from_path,
};


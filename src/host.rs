//! Shared host namespace for loosely coupled consumers.
//!
//! Some runtimes expose a global registry where independently loaded
//! components find each other by name. Whether such a registry exists is
//! decided once at startup (see `ResolverConfig::host_environment`) and handed
//! to `publish_to_host`; nothing in the crate checks for it ad hoc.

use crate::table::CategoryResolver;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, OnceLock, RwLock};

/// Well-known identifier the resolver is published under.
pub const HOST_BINDING: &str = "departmentCategoryMap";

/// A shared registry that other components in the same process can read.
pub trait HostNamespace: Send + Sync {
    /// Bind `resolver` under `name` unless something is already bound there.
    ///
    /// Returns true when the binding was inserted.
    fn bind(&self, name: &str, resolver: Arc<CategoryResolver>) -> bool;

    /// Fetch the resolver bound under `name`, if any.
    fn get(&self, name: &str) -> Option<Arc<CategoryResolver>>;
}

#[derive(Default)]
/// In-memory namespace keyed by binding name.
pub struct SharedNamespace {
    bindings: RwLock<BTreeMap<String, Arc<CategoryResolver>>>,
}

impl SharedNamespace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Names currently bound, in sorted order.
    pub fn names(&self) -> Vec<String> {
        let bindings = self.bindings.read().unwrap_or_else(|err| err.into_inner());
        bindings.keys().cloned().collect()
    }
}

impl HostNamespace for SharedNamespace {
    fn bind(&self, name: &str, resolver: Arc<CategoryResolver>) -> bool {
        let mut bindings = self.bindings.write().unwrap_or_else(|err| err.into_inner());
        if bindings.contains_key(name) {
            return false;
        }
        bindings.insert(name.to_string(), resolver);
        true
    }

    fn get(&self, name: &str) -> Option<Arc<CategoryResolver>> {
        let bindings = self.bindings.read().unwrap_or_else(|err| err.into_inner());
        bindings.get(name).cloned()
    }
}

/// The process-wide namespace used when configuration selects a shared host.
pub fn process_namespace() -> Arc<SharedNamespace> {
    static NAMESPACE: OnceLock<Arc<SharedNamespace>> = OnceLock::new();
    NAMESPACE
        .get_or_init(|| Arc::new(SharedNamespace::new()))
        .clone()
}

#[derive(Clone)]
/// Host capability selected at startup.
pub enum HostEnvironment {
    /// No shared registry; publishing is a no-op.
    Detached,
    Shared(Arc<dyn HostNamespace>),
}

impl HostEnvironment {
    /// Shared environment backed by the process-wide namespace.
    pub fn process() -> Self {
        HostEnvironment::Shared(process_namespace())
    }

    pub fn is_shared(&self) -> bool {
        matches!(self, HostEnvironment::Shared(_))
    }
}

impl fmt::Debug for HostEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostEnvironment::Detached => f.write_str("Detached"),
            HostEnvironment::Shared(_) => f.write_str("Shared"),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
/// What `publish_to_host` did.
pub enum Publication {
    Published,
    /// Something was already bound under `HOST_BINDING`; it was left in place.
    AlreadyPublished,
    /// No shared namespace; nothing happened.
    Skipped,
}

/// Register `resolver` under `HOST_BINDING` when the host has a shared namespace.
///
/// Call once during startup. Repeated calls are harmless: an existing binding
/// is never replaced, and a detached host is never an error.
pub fn publish_to_host(resolver: &Arc<CategoryResolver>, host: &HostEnvironment) -> Publication {
    let HostEnvironment::Shared(namespace) = host else {
        tracing::debug!("no shared host namespace; skipping publish");
        return Publication::Skipped;
    };
    if namespace.bind(HOST_BINDING, Arc::clone(resolver)) {
        tracing::debug!(binding = HOST_BINDING, "published department resolver");
        Publication::Published
    } else {
        tracing::debug!(binding = HOST_BINDING, "department resolver already published");
        Publication::AlreadyPublished
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::CategoryLabel;

    fn resolver() -> Arc<CategoryResolver> {
        Arc::new(CategoryResolver::builtin().unwrap())
    }

    #[test]
    fn detached_host_skips_publish() {
        assert_eq!(
            publish_to_host(&resolver(), &HostEnvironment::Detached),
            Publication::Skipped
        );
    }

    #[test]
    fn publish_is_idempotent() {
        let namespace = Arc::new(SharedNamespace::new());
        let host = HostEnvironment::Shared(namespace.clone());
        let first = resolver();
        let second = resolver();

        assert_eq!(publish_to_host(&first, &host), Publication::Published);
        assert_eq!(publish_to_host(&second, &host), Publication::AlreadyPublished);
        assert_eq!(publish_to_host(&first, &host), Publication::AlreadyPublished);

        let bound = namespace.get(HOST_BINDING).expect("binding present");
        assert!(Arc::ptr_eq(&bound, &first));
        assert_eq!(namespace.names(), vec![HOST_BINDING.to_string()]);
    }

    #[test]
    fn published_resolver_is_usable_by_other_readers() {
        let namespace = Arc::new(SharedNamespace::new());
        let host = HostEnvironment::Shared(namespace.clone());
        publish_to_host(&resolver(), &host);

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let namespace = namespace.clone();
                std::thread::spawn(move || {
                    namespace
                        .get(HOST_BINDING)
                        .and_then(|r| r.resolve("Department of Computing"))
                })
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), Some(CategoryLabel::EngineeringFutures));
        }
    }

    #[test]
    fn process_namespace_is_a_singleton() {
        let a = process_namespace();
        let b = process_namespace();
        assert!(Arc::ptr_eq(&a, &b));
        assert!(HostEnvironment::process().is_shared());
        assert!(!HostEnvironment::Detached.is_shared());
    }
}

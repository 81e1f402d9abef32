//! Inventory collection from homelab platforms
//!
//! Collectors turn platform-specific records into an
//! [`InventorySnapshot`]. The bundled adapters read a fixture dataset when
//! one is supplied and fall back to a small simulated inventory otherwise.
//! Adapters are looked up by source name through [`CollectorRegistry`], so
//! a new platform only needs to be registered.

mod platform;

pub use platform::{
    simulated_docker, simulated_kubernetes, simulated_libvirt, simulated_proxmox, PlatformCollector,
};

use crate::inventory::InventoryError;
use crate::models::InventorySnapshot;
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors raised while selecting or running a collector
#[derive(Debug, Error)]
pub enum CollectorError {
    #[error("unknown source `{0}` (available: {1})")]
    UnknownSource(String, String),

    #[error(transparent)]
    Inventory(#[from] InventoryError),
}

/// Trait for inventory collection implementations
pub trait Collector: Send + Sync {
    /// Name of the platform this collector reads
    fn source(&self) -> &str;

    /// Produce a normalized snapshot
    fn collect(&self) -> Result<InventorySnapshot, CollectorError>;
}

/// Constructor stored in the registry; receives the optional fixture dataset
pub type CollectorFactory = fn(Option<Value>) -> Box<dyn Collector>;

/// Source-name keyed collector constructors
#[derive(Clone, Default)]
pub struct CollectorRegistry {
    factories: BTreeMap<String, CollectorFactory>,
}

impl CollectorRegistry {
    /// Registry with no collectors
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the bundled platform adapters
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register("proxmox", |dataset| Box::new(PlatformCollector::proxmox(dataset)));
        registry.register("libvirt", |dataset| Box::new(PlatformCollector::libvirt(dataset)));
        registry.register("docker", |dataset| Box::new(PlatformCollector::docker(dataset)));
        registry.register("k8s", |dataset| Box::new(PlatformCollector::kubernetes(dataset)));
        registry.register("kubernetes", |dataset| Box::new(PlatformCollector::kubernetes(dataset)));
        registry
    }

    /// Register (or replace) a constructor; names are case-insensitive
    pub fn register(&mut self, source: &str, factory: CollectorFactory) {
        self.factories.insert(source.to_lowercase(), factory);
    }

    /// Registered source names in sorted order
    pub fn sources(&self) -> Vec<&str> {
        self.factories.keys().map(String::as_str).collect()
    }

    /// Instantiate the collector registered for `source`
    pub fn create(&self, source: &str, dataset: Option<Value>) -> Result<Box<dyn Collector>, CollectorError> {
        let factory = self
            .factories
            .get(&source.to_lowercase())
            .ok_or_else(|| CollectorError::UnknownSource(source.to_string(), self.sources().join(", ")))?;

        tracing::debug!(source = %source, fixture = dataset.is_some(), "Creating collector");
        Ok(factory(dataset))
    }
}

impl std::fmt::Debug for CollectorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollectorRegistry")
            .field("sources", &self.sources())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct StaticCollector;

    impl Collector for StaticCollector {
        fn source(&self) -> &str {
            "static"
        }

        fn collect(&self) -> Result<InventorySnapshot, CollectorError> {
            Ok(InventorySnapshot::default())
        }
    }

    #[test]
    fn test_builtin_sources() {
        let registry = CollectorRegistry::with_builtin();
        assert_eq!(
            registry.sources(),
            vec!["docker", "k8s", "kubernetes", "libvirt", "proxmox"]
        );
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let registry = CollectorRegistry::with_builtin();
        let collector = registry.create("Proxmox", None).unwrap();
        assert_eq!(collector.source(), "proxmox");
    }

    #[test]
    fn test_kubernetes_alias() {
        let registry = CollectorRegistry::with_builtin();
        assert_eq!(registry.create("k8s", None).unwrap().source(), "kubernetes");
        assert_eq!(registry.create("kubernetes", None).unwrap().source(), "kubernetes");
    }

    #[test]
    fn test_unknown_source() {
        let err = CollectorRegistry::with_builtin().create("vmware", None).err().unwrap();
        match err {
            CollectorError::UnknownSource(name, available) => {
                assert_eq!(name, "vmware");
                assert!(available.contains("proxmox"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_register_custom_collector() {
        let mut registry = CollectorRegistry::new();
        registry.register("static", |_| Box::new(StaticCollector));

        let snapshot = registry.create("STATIC", None).unwrap().collect().unwrap();
        assert!(snapshot.nodes.is_empty());
    }

    #[test]
    fn test_fixture_errors_propagate() {
        let collector = CollectorRegistry::with_builtin()
            .create("docker", Some(json!({"nodes": [{"kind": "docker"}]})))
            .unwrap();
        assert!(matches!(
            collector.collect(),
            Err(CollectorError::Inventory(InventoryError::MissingField { .. }))
        ));
    }
}

//! Plant registries
//!
//! Two registries cooperate at dispatch time:
//!
//! 1. **Plant array** ([`build_plant_array`]): a scan of the discovery
//!    location mapping each namespace-like directory entry to its plant
//!    identifier (`Fan` → `"fan": "FanPlant"`). Rebuilt per dispatch, so a
//!    freshly installed plant is visible without a restart.
//! 2. **[`PlantRegistry`]**: the compiled-in set of plant factories,
//!    populated explicitly at process start. This is what actually
//!    constructs a plant; a bare identifier string never resolves to code
//!    on its own.

use crate::errors::RegistryError;
use crate::plant::{Plant, PlantContext};
use indexmap::IndexMap;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::warn;

/// Scans the discovery location and maps lower-cased entry names to plant
/// identifiers.
///
/// Entries whose names contain a `.` are excluded (files rather than
/// namespace-like directories). Fails only when the directory itself cannot
/// be opened; an empty or fully filtered listing is a valid empty registry.
/// Case-insensitive collisions resolve last-write-wins in enumeration order.
pub fn build_plant_array(dir: &Path) -> Result<IndexMap<String, String>, RegistryError> {
    let entries = fs::read_dir(dir).map_err(|source| RegistryError::Unavailable {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut plant_array = IndexMap::new();
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(error) => {
                warn!(%error, "skipping unreadable discovery entry");
                continue;
            }
        };
        let name = entry.file_name();
        // Non-UTF-8 entry names cannot name a plant type
        let Some(name) = name.to_str() else { continue };
        if name.contains('.') {
            continue;
        }
        plant_array.insert(name.to_lowercase(), format!("{name}Plant"));
    }
    Ok(plant_array)
}

/// Factory constructing one plant from its dispatch context
pub type PlantFactory = Arc<dyn Fn(PlantContext) -> Box<dyn Plant> + Send + Sync>;

/// Typed registry of plant factories, keyed by lower-cased request type
///
/// Built once at startup and shared behind an `Arc`; lookup never mutates.
#[derive(Clone, Default)]
pub struct PlantRegistry {
    factories: HashMap<String, PlantFactory>,
}

impl PlantRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a factory under a request-type name. The key is trimmed
    /// and lower-cased; re-registering a name replaces the old factory.
    pub fn register<F>(&mut self, name: &str, factory: F)
    where
        F: Fn(PlantContext) -> Box<dyn Plant> + Send + Sync + 'static,
    {
        self.factories
            .insert(name.trim().to_lowercase(), Arc::new(factory));
    }

    pub fn contains(&self, key: &str) -> bool {
        self.factories.contains_key(key)
    }

    /// Constructs the plant registered under `key`, which the caller is
    /// expected to have normalized already.
    pub fn construct(&self, key: &str, ctx: PlantContext) -> Option<Box<dyn Plant>> {
        self.factories.get(key).map(|factory| factory(ctx))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

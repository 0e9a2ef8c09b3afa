//! Engine Registry
//!
//! The [`EngineRegistry`] is an in-memory catalog of engines with
//! multi-index lookup (by id, by domain, by capability) and
//! dependency-order resolution.
//!
//! # Usage
//!
//! ```ignore
//! let mut registry = EngineRegistry::new();
//! registry
//!     .register(Arc::new(LogicEngine::new()))?
//!     .register(functional_engine(profile, callback))?;
//!
//! let ethics = registry.get_by_domain("ethics");
//! let order = registry.resolve_dependencies("risk")?;
//! ```
//!
//! # Indices
//!
//! Four structures are kept consistent on every `register`/`unregister`:
//! id → engine, domain → ids (domain and every subdomain), capability → ids,
//! id → declared dependency ids. Mutation is single-threaded per instance;
//! share a registry across tasks through [`SharedRegistry`].

mod dependency;
mod handle;

pub use handle::{EngineSnapshot, RegisteredEngine};

use crate::ports::engine::Engine;
use council_domain::EngineStatus;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Arc, OnceLock, RwLock};
use thiserror::Error;
use tracing::{debug, info};

/// Errors raised by registry mutation and dependency resolution
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Engine already registered: {0}")]
    Duplicate(String),

    #[error("Engine not found: {0}")]
    NotFound(String),

    #[error("Circular dependency: {}", .0.join(" -> "))]
    CircularDependency(Vec<String>),

    #[error("Engine `{engine}` depends on unregistered engine `{dependency}`")]
    MissingDependency { engine: String, dependency: String },
}

/// A registry shared between the orchestrator and the code that builds it
pub type SharedRegistry = Arc<RwLock<EngineRegistry>>;

/// Filter for [`EngineRegistry::query`]; all given filters must match
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EngineQuery {
    pub domain: Option<String>,
    pub capabilities: Vec<String>,
    pub tradition: Option<String>,
    pub status: Option<EngineStatus>,
}

impl EngineQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    pub fn capability(mut self, tag: impl Into<String>) -> Self {
        self.capabilities.push(tag.into());
        self
    }

    pub fn capabilities<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.capabilities.extend(tags.into_iter().map(Into::into));
        self
    }

    pub fn tradition(mut self, tradition: impl Into<String>) -> Self {
        self.tradition = Some(tradition.into());
        self
    }

    pub fn status(mut self, status: EngineStatus) -> Self {
        self.status = Some(status);
        self
    }

    fn matches(&self, engine: &RegisteredEngine) -> bool {
        let profile = engine.profile();
        self.domain.as_deref().is_none_or(|d| profile.in_domain(d))
            && self.capabilities.iter().all(|c| profile.has_capability(c))
            && self
                .tradition
                .as_deref()
                .is_none_or(|t| profile.tradition() == Some(t))
            && self.status.is_none_or(|s| engine.status() == s)
    }
}

/// In-memory engine catalog
#[derive(Debug, Default)]
pub struct EngineRegistry {
    /// id -> engine
    engines: HashMap<String, Arc<RegisteredEngine>>,
    /// Registration order of ids
    order: Vec<String>,
    /// domain or subdomain -> ids
    by_domain: HashMap<String, BTreeSet<String>>,
    /// capability tag -> ids
    by_capability: HashMap<String, BTreeSet<String>>,
    /// id -> declared dependency ids
    dependencies: HashMap<String, Vec<String>>,
}

impl EngineRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap into a [`SharedRegistry`]
    pub fn into_shared(self) -> SharedRegistry {
        Arc::new(RwLock::new(self))
    }

    /// Process-wide default registry.
    ///
    /// A convenience only; orchestrators take any [`SharedRegistry`].
    pub fn global() -> SharedRegistry {
        static GLOBAL: OnceLock<SharedRegistry> = OnceLock::new();
        Arc::clone(GLOBAL.get_or_init(|| EngineRegistry::new().into_shared()))
    }

    /// Register an engine.
    ///
    /// Fails with [`RegistryError::Duplicate`] if the id is taken, in which
    /// case no index is touched.
    pub fn register(&mut self, engine: Arc<dyn Engine>) -> Result<&mut Self, RegistryError> {
        let id = engine.profile().id().to_string();
        if self.engines.contains_key(&id) {
            return Err(RegistryError::Duplicate(id));
        }

        let handle = Arc::new(RegisteredEngine::new(engine));
        let profile = handle.profile();

        for label in profile.domain_labels() {
            self.by_domain
                .entry(label.to_string())
                .or_default()
                .insert(id.clone());
        }
        for tag in profile.capabilities() {
            self.by_capability
                .entry(tag.clone())
                .or_default()
                .insert(id.clone());
        }
        self.dependencies
            .insert(id.clone(), profile.dependencies().to_vec());

        info!(
            engine = %id,
            domain = %profile.domain(),
            capabilities = profile.capabilities().len(),
            "Registered engine"
        );

        self.order.push(id.clone());
        self.engines.insert(id, handle);
        Ok(self)
    }

    /// Register a concrete engine value
    pub fn register_engine<E: Engine + 'static>(
        &mut self,
        engine: E,
    ) -> Result<&mut Self, RegistryError> {
        self.register(Arc::new(engine))
    }

    /// Remove an engine from every index. Returns whether it existed.
    pub fn unregister(&mut self, id: &str) -> bool {
        let Some(handle) = self.engines.remove(id) else {
            return false;
        };
        let profile = handle.profile();

        for label in profile.domain_labels() {
            remove_from_index(&mut self.by_domain, label, id);
        }
        for tag in profile.capabilities() {
            remove_from_index(&mut self.by_capability, tag, id);
        }
        self.dependencies.remove(id);
        self.order.retain(|o| o != id);

        info!(engine = %id, "Unregistered engine");
        true
    }

    pub fn get(&self, id: &str) -> Option<Arc<RegisteredEngine>> {
        self.engines.get(id).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.engines.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.engines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.engines.is_empty()
    }

    /// Ids in registration order
    pub fn ids(&self) -> Vec<String> {
        self.order.clone()
    }

    /// All engines in registration order
    pub fn all(&self) -> Vec<Arc<RegisteredEngine>> {
        self.order
            .iter()
            .filter_map(|id| self.engines.get(id).cloned())
            .collect()
    }

    /// Engines discoverable under the domain (including subdomains), by id
    pub fn get_by_domain(&self, domain: &str) -> Vec<Arc<RegisteredEngine>> {
        self.collect_index(self.by_domain.get(domain))
    }

    /// Engines advertising the capability, by id
    pub fn get_by_capability(&self, tag: &str) -> Vec<Arc<RegisteredEngine>> {
        self.collect_index(self.by_capability.get(tag))
    }

    fn collect_index(&self, ids: Option<&BTreeSet<String>>) -> Vec<Arc<RegisteredEngine>> {
        ids.into_iter()
            .flatten()
            .filter_map(|id| self.engines.get(id).cloned())
            .collect()
    }

    /// Engines matching every filter of the query.
    ///
    /// Domain-filtered results come in id order; otherwise registration order.
    pub fn query(&self, query: &EngineQuery) -> Vec<Arc<RegisteredEngine>> {
        let candidates = match &query.domain {
            Some(domain) => self.get_by_domain(domain),
            None => self.all(),
        };
        let matched: Vec<_> = candidates
            .into_iter()
            .filter(|engine| query.matches(engine))
            .collect();
        debug!(?query, matched = matched.len(), "Registry query");
        matched
    }

    /// Dependency-respecting order ending with `id` itself.
    ///
    /// Advisory only (suggested load order); dispatch does not use it.
    pub fn resolve_dependencies(&self, id: &str) -> Result<Vec<String>, RegistryError> {
        dependency::resolve(&self.dependencies, id)
    }

    /// Dependency-respecting order over every registered engine
    pub fn resolve_load_order(&self) -> Result<Vec<String>, RegistryError> {
        dependency::resolve_all(&self.dependencies, self.order.iter().map(String::as_str))
    }

    /// Ids that declare `id` as a dependency, in registration order
    pub fn get_dependents(&self, id: &str) -> Vec<String> {
        self.order
            .iter()
            .filter(|candidate| {
                self.dependencies
                    .get(*candidate)
                    .is_some_and(|deps| deps.iter().any(|d| d == id))
            })
            .cloned()
            .collect()
    }

    /// Enable or disable an engine
    pub fn set_enabled(&self, id: &str, enabled: bool) -> Result<(), RegistryError> {
        let engine = self
            .engines
            .get(id)
            .ok_or_else(|| RegistryError::NotFound(id.to_string()))?;
        engine.set_enabled(enabled);
        info!(engine = %id, enabled, "Engine availability changed");
        Ok(())
    }

    /// Every known domain and subdomain label
    pub fn domains(&self) -> Vec<String> {
        let mut domains: Vec<String> = self.by_domain.keys().cloned().collect();
        domains.sort();
        domains
    }

    /// Every known capability tag
    pub fn capabilities(&self) -> Vec<String> {
        let mut tags: Vec<String> = self.by_capability.keys().cloned().collect();
        tags.sort();
        tags
    }

    /// Serializable snapshot of every engine, in registration order
    pub fn snapshot(&self) -> Vec<EngineSnapshot> {
        self.all().iter().map(|e| e.snapshot()).collect()
    }

    /// Get statistics about registered engines
    pub fn stats(&self) -> RegistryStats {
        let mut engines_per_domain = BTreeMap::new();
        for engine in self.engines.values() {
            *engines_per_domain
                .entry(engine.profile().domain().to_string())
                .or_insert(0) += 1;
        }

        let mut engines_per_status = BTreeMap::new();
        for engine in self.engines.values() {
            *engines_per_status
                .entry(engine.status().to_string())
                .or_insert(0) += 1;
        }

        RegistryStats {
            total_engines: self.engines.len(),
            total_capabilities: self.by_capability.len(),
            engines_per_domain,
            engines_per_status,
        }
    }
}

fn remove_from_index(index: &mut HashMap<String, BTreeSet<String>>, key: &str, id: &str) {
    if let Some(ids) = index.get_mut(key) {
        ids.remove(id);
        if ids.is_empty() {
            index.remove(key);
        }
    }
}

/// Statistics about the registry
#[derive(Debug, Clone, PartialEq)]
pub struct RegistryStats {
    pub total_engines: usize,
    pub total_capabilities: usize,
    pub engines_per_domain: BTreeMap<String, usize>,
    pub engines_per_status: BTreeMap<String, usize>,
}

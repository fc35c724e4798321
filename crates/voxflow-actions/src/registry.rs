//! Action catalog port and the in-memory component registry.
//!
//! The voice layer only ever reads the catalog through [`ActionCatalog`].
//! Mutation belongs to the hosting UI, which mounts and unmounts components
//! through [`ActionRegistry`].
//!
//! # Example
//!
//! ```rust
//! # use voxflow_actions::{ActionCatalog, ActionItem, ActionRegistry, ComponentConfig, handler_fn};
//! let registry = ActionRegistry::new();
//! registry.register_component(
//!     ComponentConfig::new("form1", "Patient form")
//!         .with_action(ActionItem::new("save", "Save", handler_fn(|_| async { Ok(None) }))),
//! );
//!
//! let actions = registry.all_action_items();
//! assert_eq!(actions[0].action_id, "save");
//! assert_eq!(actions[0].component_id, "form1");
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use crate::error::{ActionError, Result};
use crate::types::{ActionMetadata, ComponentConfig};

// ---------------------------------------------------------------------------
// Read port
// ---------------------------------------------------------------------------

/// Read-only view of the registered UI components.
///
/// Every call returns a fresh snapshot. Components are reported in
/// registration order and actions in declaration order, so matcher tie
/// breaking is deterministic.
pub trait ActionCatalog: Send + Sync {
    /// Look up a component by id.
    fn component_config(&self, component_id: &str) -> Option<ComponentConfig>;

    /// Flattened metadata for every action of every registered component.
    fn all_action_items(&self) -> Vec<ActionMetadata>;

    /// Components not explicitly marked non-interactable.
    fn voice_interactable_components(&self) -> Vec<ComponentConfig>;
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
struct Registered {
    config: ComponentConfig,
    seq: u64,
    registered_at: DateTime<Utc>,
}

/// Concurrent component registry backed by [`DashMap`].
///
/// The registry is cheaply cloneable (`Arc`-backed) and `Send + Sync`.
#[derive(Clone, Default)]
pub struct ActionRegistry {
    inner: Arc<DashMap<String, Registered>>,
    next_seq: Arc<AtomicU64>,
}

impl ActionRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (mount) a component.
    ///
    /// Re-registering an existing id replaces its configuration but keeps its
    /// original position in the iteration order.
    pub fn register_component(&self, config: ComponentConfig) {
        let id = config.id.clone();
        let action_count = config.actions.as_ref().map_or(0, Vec::len);

        match self.inner.entry(id.clone()) {
            Entry::Occupied(mut slot) => {
                slot.get_mut().config = config;
                tracing::debug!(component_id = %id, action_count, "component re-registered");
            }
            Entry::Vacant(slot) => {
                slot.insert(Registered {
                    config,
                    seq: self.next_seq.fetch_add(1, Ordering::Relaxed),
                    registered_at: Utc::now(),
                });
                tracing::info!(component_id = %id, action_count, "component registered");
            }
        }
    }

    /// Remove (unmount) a component, returning its configuration if present.
    pub fn unregister_component(&self, component_id: &str) -> Option<ComponentConfig> {
        let removed = self.inner.remove(component_id).map(|(_, e)| e.config);
        if removed.is_some() {
            tracing::info!(component_id = %component_id, "component unregistered");
        }
        removed
    }

    /// Toggle whether a component may be driven by voice.
    pub fn set_voice_interactable(&self, component_id: &str, interactable: bool) -> Result<()> {
        let mut entry =
            self.inner
                .get_mut(component_id)
                .ok_or_else(|| ActionError::ComponentNotFound {
                    component_id: component_id.to_string(),
                })?;
        entry.config.voice_interactable = Some(interactable);

        tracing::debug!(component_id = %component_id, interactable, "voice interactivity changed");
        Ok(())
    }

    /// When the component was first registered.
    pub fn registered_at(&self, component_id: &str) -> Option<DateTime<Utc>> {
        self.inner.get(component_id).map(|e| e.registered_at)
    }

    /// Number of registered components.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Registered components in registration order.
    pub fn components(&self) -> Vec<ComponentConfig> {
        let mut entries: Vec<(u64, ComponentConfig)> = self
            .inner
            .iter()
            .map(|e| (e.seq, e.config.clone()))
            .collect();
        entries.sort_by_key(|(seq, _)| *seq);
        entries.into_iter().map(|(_, c)| c).collect()
    }
}

impl ActionCatalog for ActionRegistry {
    fn component_config(&self, component_id: &str) -> Option<ComponentConfig> {
        self.inner.get(component_id).map(|e| e.config.clone())
    }

    fn all_action_items(&self) -> Vec<ActionMetadata> {
        self.components()
            .iter()
            .flat_map(|component| {
                component
                    .actions
                    .iter()
                    .flatten()
                    .map(move |action| ActionMetadata::from_parts(component, action))
            })
            .collect()
    }

    fn voice_interactable_components(&self) -> Vec<ComponentConfig> {
        self.components()
            .into_iter()
            .filter(ComponentConfig::is_voice_interactable)
            .collect()
    }
}

impl std::fmt::Debug for ActionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionRegistry")
            .field("components", &self.inner.len())
            .finish()
    }
}

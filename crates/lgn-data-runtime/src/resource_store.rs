use std::{any::Any, collections::HashMap, io};

use log::{debug, warn};

use crate::{
    LifecycleOp, Resource, ResourceError, ResourceId, ResourceLifecycle, ResourceState,
    ResourceTypeAndId,
};

struct Entry {
    state: ResourceState,
    resource: Box<dyn Any + Send + Sync>,
}

/// Loaded resource instances, keyed by kind and id.
///
/// The store owns every instance between `load` and `unload` and is the
/// lookup `online`/`offline` go through to find the instance to transition.
/// Every operation validates the transition before touching the instance.
#[derive(Default)]
pub struct ResourceStore {
    entries: HashMap<ResourceTypeAndId, Entry>,
}

impl ResourceStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads an instance of `T` from a compiled container.
    ///
    /// # Errors
    ///
    /// Fails if the id is already loaded or the container is rejected by
    /// [`ResourceLifecycle::load`]. Nothing is stored on failure.
    pub fn load<T: ResourceLifecycle>(
        &mut self,
        id: ResourceId,
        reader: &mut dyn io::Read,
    ) -> Result<(), ResourceError> {
        let key = ResourceTypeAndId::new(T::TYPE, id);
        if self.entries.contains_key(&key) {
            return Err(ResourceError::AlreadyLoaded(key));
        }

        let resource = T::load(reader).map_err(|err| {
            warn!("Failed to load resource {}: {}", key, err);
            err
        })?;
        self.entries.insert(
            key,
            Entry {
                state: ResourceState::Loaded,
                resource: Box::new(resource),
            },
        );
        debug!("{} loaded", key);
        Ok(())
    }

    /// Brings a `Loaded` or `Offline` resource online.
    ///
    /// # Errors
    ///
    /// Fails if the resource is missing, of another type or already online.
    pub fn online<T: ResourceLifecycle>(
        &mut self,
        id: ResourceId,
        device: &mut T::Device,
    ) -> Result<(), ResourceError> {
        self.apply::<T>(id, LifecycleOp::Online, |resource| resource.online(device))
    }

    /// Takes an `Online` resource offline.
    ///
    /// # Errors
    ///
    /// Fails if the resource is missing, of another type or not online.
    pub fn offline<T: ResourceLifecycle>(
        &mut self,
        id: ResourceId,
        device: &mut T::Device,
    ) -> Result<(), ResourceError> {
        self.apply::<T>(id, LifecycleOp::Offline, |resource| resource.offline(device))
    }

    /// Releases a `Loaded` or `Offline` resource.
    ///
    /// # Errors
    ///
    /// Fails if the resource is missing, of another type or still online.
    pub fn unload<T: ResourceLifecycle>(&mut self, id: ResourceId) -> Result<(), ResourceError> {
        let key = ResourceTypeAndId::new(T::TYPE, id);
        let entry = self
            .entries
            .get(&key)
            .ok_or(ResourceError::ResourceNotFound(key))?;
        if entry.state.transition(LifecycleOp::Unload).is_none() {
            return Err(ResourceError::InvalidTransition {
                id: key,
                state: entry.state,
                op: LifecycleOp::Unload,
            });
        }
        if !entry.resource.is::<T>() {
            return Err(ResourceError::TypeMismatch(key));
        }

        if let Some(entry) = self.entries.remove(&key) {
            if let Ok(resource) = entry.resource.downcast::<T>() {
                T::unload(*resource);
            }
        }
        debug!("{} unloaded", key);
        Ok(())
    }

    /// Returns a loaded instance of `T`.
    pub fn get<T: Resource>(&self, id: ResourceId) -> Option<&T> {
        self.entries
            .get(&ResourceTypeAndId::new(T::TYPE, id))
            .and_then(|entry| entry.resource.downcast_ref::<T>())
    }

    /// Returns the instance stored under `key`, whatever its type.
    pub fn get_untyped(&self, key: ResourceTypeAndId) -> Option<&(dyn Any + Send + Sync)> {
        self.entries.get(&key).map(|entry| entry.resource.as_ref())
    }

    /// Returns the lifecycle state of a loaded resource.
    pub fn state(&self, key: ResourceTypeAndId) -> Option<ResourceState> {
        self.entries.get(&key).map(|entry| entry.state)
    }

    /// Number of loaded resources.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when no resource is loaded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn apply<T: ResourceLifecycle>(
        &mut self,
        id: ResourceId,
        op: LifecycleOp,
        func: impl FnOnce(&mut T),
    ) -> Result<(), ResourceError> {
        let key = ResourceTypeAndId::new(T::TYPE, id);
        let entry = self
            .entries
            .get_mut(&key)
            .ok_or(ResourceError::ResourceNotFound(key))?;

        let next = match entry.state.transition(op) {
            Some(Some(next)) => next,
            _ => {
                return Err(ResourceError::InvalidTransition {
                    id: key,
                    state: entry.state,
                    op,
                })
            }
        };
        let resource = entry
            .resource
            .downcast_mut::<T>()
            .ok_or(ResourceError::TypeMismatch(key))?;

        func(resource);
        entry.state = next;
        debug!("{} {}", key, next);
        Ok(())
    }
}

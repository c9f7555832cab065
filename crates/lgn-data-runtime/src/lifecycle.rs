use std::{any::Any, fmt, io};

use crate::{ResourceError, ResourceTag, ResourceType};

/// Types implementing `Resource` are runtime instances of a compiled resource.
pub trait Resource: Any + Send + Sync {
    /// Kind of the resource.
    const TYPE: ResourceType;

    /// Data version of the compiled container. Bumping it invalidates
    /// previously compiled containers.
    const VERSION: u16;

    /// Tag the compiled container of this resource kind carries.
    fn tag() -> ResourceTag {
        ResourceTag::new(Self::TYPE, Self::VERSION)
    }
}

/// The four operations driving a resource through its runtime life.
///
/// `load` and `unload` happen exactly once per instance; `online` and
/// `offline` may alternate any number of times in between. Callers go
/// through [`crate::ResourceStore`], which rejects illegal sequences.
///
/// `online`, `offline` and `unload` must not run concurrently on the same
/// instance and must be called from the context owning `Device`.
pub trait ResourceLifecycle: Resource + Sized {
    /// Device the resource is realized on when online.
    type Device: ?Sized;

    /// Creates an instance from a compiled container.
    ///
    /// # Errors
    ///
    /// A malformed or mismatching header aborts construction.
    fn load(reader: &mut dyn io::Read) -> Result<Self, ResourceError>;

    /// Creates the device side object from the owned data.
    fn online(&mut self, device: &mut Self::Device);

    /// Destroys the device side object, keeping the owned data.
    fn offline(&mut self, device: &mut Self::Device);

    /// Releases the instance.
    fn unload(self) {}
}

/// Runtime state of a loaded resource.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ResourceState {
    /// Data is resident in memory, no device object.
    Loaded,
    /// A device object derived from the data exists.
    Online,
    /// The device object was destroyed, data is still resident.
    Offline,
}

impl fmt::Display for ResourceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Loaded => write!(f, "loaded"),
            Self::Online => write!(f, "online"),
            Self::Offline => write!(f, "offline"),
        }
    }
}

/// Lifecycle operations applied to an already loaded resource.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LifecycleOp {
    /// See [`ResourceLifecycle::online`].
    Online,
    /// See [`ResourceLifecycle::offline`].
    Offline,
    /// See [`ResourceLifecycle::unload`].
    Unload,
}

impl fmt::Display for LifecycleOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Online => write!(f, "online"),
            Self::Offline => write!(f, "offline"),
            Self::Unload => write!(f, "unload"),
        }
    }
}

impl ResourceState {
    /// Returns the state following `op`, or `None` if `op` is illegal in
    /// this state. Unloading leaves no state behind.
    pub fn transition(self, op: LifecycleOp) -> Option<Option<Self>> {
        match (self, op) {
            (Self::Loaded | Self::Offline, LifecycleOp::Online) => Some(Some(Self::Online)),
            (Self::Online, LifecycleOp::Offline) => Some(Some(Self::Offline)),
            (Self::Loaded | Self::Offline, LifecycleOp::Unload) => Some(None),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legal_transitions() {
        use LifecycleOp::{Offline, Online, Unload};
        use ResourceState as S;

        assert_eq!(S::Loaded.transition(Online), Some(Some(S::Online)));
        assert_eq!(S::Offline.transition(Online), Some(Some(S::Online)));
        assert_eq!(S::Online.transition(Offline), Some(Some(S::Offline)));
        assert_eq!(S::Loaded.transition(Unload), Some(None));
        assert_eq!(S::Offline.transition(Unload), Some(None));

        assert_eq!(S::Online.transition(Online), None);
        assert_eq!(S::Loaded.transition(Offline), None);
        assert_eq!(S::Offline.transition(Offline), None);
        assert_eq!(S::Online.transition(Unload), None);
    }
}

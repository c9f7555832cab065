use std::sync::Arc;

use crate::{LifecycleOp, ResourceState, ResourceTag, ResourceTypeAndId};

/// Error type of resource loading and lifecycle operations.
#[derive(thiserror::Error, Debug, Clone)]
pub enum ResourceError {
    /// The container was produced for another resource kind or version.
    #[error("Wrong version: expected tag {expected}, found {found}")]
    WrongVersion {
        /// Tag the loader expects.
        expected: ResourceTag,
        /// Tag read from the container.
        found: ResourceTag,
    },

    /// The payload does not fit the container length field.
    #[error("Payload of {0} bytes does not fit in a resource container")]
    PayloadTooLarge(usize),

    /// General IO error when reading or writing a container.
    #[error("IO error: {0}")]
    Io(Arc<std::io::Error>),

    /// No resource with this key is loaded.
    #[error("Resource '{0}' was not found")]
    ResourceNotFound(ResourceTypeAndId),

    /// A resource with this key is already loaded.
    #[error("Resource '{0}' is already loaded")]
    AlreadyLoaded(ResourceTypeAndId),

    /// The stored instance is not of the requested type.
    #[error("Resource '{0}' is not of the requested type")]
    TypeMismatch(ResourceTypeAndId),

    /// The lifecycle operation is not legal in the current state.
    #[error("Cannot {op} resource '{id}' while {state}")]
    InvalidTransition {
        /// Resource being transitioned.
        id: ResourceTypeAndId,
        /// State of the resource.
        state: ResourceState,
        /// Rejected operation.
        op: LifecycleOp,
    },
}

impl From<std::io::Error> for ResourceError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(Arc::new(err))
    }
}

//! Runtime side of the data pipeline.
//!
//! A data compiler produces a *compiled container* for every resource: a
//! fixed size [`ResourceHeader`] stamped with the resource kind and data
//! version, followed by an opaque payload. At runtime the container is turned
//! back into a resource instance which then goes through four lifecycle
//! operations:
//!
//! ```markdown
//! load -> online <-> offline -> unload
//! ```
//!
//! * `load` validates the header and takes ownership of the payload.
//! * `online` realizes a device object from the payload.
//! * `offline` destroys the device object, keeping the payload.
//! * `unload` releases the instance and its payload.
//!
//! Resource kinds implement [`ResourceLifecycle`]; [`ResourceStore`] owns the
//! instances and rejects illegal operation sequences with
//! [`ResourceError::InvalidTransition`].

// crate-specific lint exceptions:
#![warn(missing_docs)]

mod errors;
pub use errors::ResourceError;

mod header;
pub use header::*;

mod lifecycle;
pub use lifecycle::*;

mod resource_store;
pub use resource_store::ResourceStore;

mod types;
pub use types::*;

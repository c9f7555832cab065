//! Graphics Data Definition
//!
//! Data shared by the texture compiler and the runtime:
//!
//! * [`TextureFormat`] - hardware encodings the texture encoder produces.
//! * `offline` feature - [`OutputSettings`] and the parser of texture
//!   source descriptions.
//! * `runtime` feature - [`TextureResource`] and the [`TextureDevice`] it is
//!   realized on.

// crate-specific lint exceptions:
#![warn(missing_docs)]

mod texture_format;
pub use texture_format::*;

#[cfg(feature = "offline")]
#[path = "offline/texture.rs"]
pub mod offline_texture;
#[cfg(feature = "offline")]
pub use offline_texture::*;

#[cfg(feature = "runtime")]
#[path = "runtime/texture.rs"]
pub mod runtime_texture;
#[cfg(feature = "runtime")]
pub use runtime_texture::*;

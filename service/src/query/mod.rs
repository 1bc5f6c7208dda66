//! [`Query`] definition.

pub mod offices;

#[cfg(doc)]
use crate::Engine;

/// [`Query`] of the [`Engine`].
pub use common::Handler as Query;

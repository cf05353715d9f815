//! Stratum Engine - manifest templates and rendering
//!
//! Turns a resolved `Deployable` into the set of manifest documents its
//! workload kind and service exposure call for. Rendering is pure text
//! substitution over embedded MiniJinja templates.

pub mod error;
pub mod filters;
pub mod renderer;
pub mod templates;

pub use error::{EngineError, Result};
pub use renderer::{required_manifests, Engine, ManifestKind, RenderedApp};

//! Stratum Core - types and resolution pipeline for the layered manifest
//! generator
//!
//! This crate provides everything up to (but not including) rendering:
//! - `AppSpec` and friends: user-authored partial configuration
//! - `MixinTemplate`: overlay fragments with a well-defined merge algebra
//! - `EnvCatalog` / `ResourceCatalog`: selector-resolved lookup tables
//! - `ProductSet` / `ReleaseSpec`: release-level identity and defaulting
//! - `enrich`: folds all of the above into a render-ready `Deployable`

pub mod context;
pub mod deployable;
pub mod enrich;
pub mod envset;
pub mod error;
pub mod loader;
pub mod mixin;
pub mod release;
pub mod resources;
pub mod spec;

pub use context::RunContext;
pub use deployable::{ArtifactInfo, Deployable, Healthcheck, Metadata, MountSpec, PortType, ServiceInfo, TargetInfo};
pub use enrich::enrich;
pub use envset::{load_env_sets, EnvCatalog, EnvironmentDoc};
pub use error::{CoreError, Result};
pub use mixin::{load_mixins, MixinCatalog, MixinDoc, MixinTemplate};
pub use release::{AppOutcome, DeploymentSummary, OutcomeStatus, ProductSet, ReleaseSpec, Task};
pub use resources::{fold_profiles, load_resources, ResourceCatalog, ResourceDoc, Resources, ResourceValue};
pub use spec::{AppSpec, ArgsSpec, EnvEntry, SecurityContextSpec, ServiceSpec, WorkloadSpec};

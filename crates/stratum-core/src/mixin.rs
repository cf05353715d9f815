//! Mixin overlays and the overlay merge algebra
//!
//! A mixin is a named, reusable fragment of deployment configuration. Apps
//! reference mixins by name; the referenced templates are folded left to
//! right and the result fills any field the app spec left absent. Mixins
//! are never deployed on their own.

use std::collections::BTreeMap;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::loader::{self, DocMetadata};
use crate::spec::{
    AppSpec, ArgsSpec, SecretSpec, SecurityContextSpec, ServiceSpec, SidecarSpec, WorkloadSpec,
};

pub const MIXIN_KIND: &str = "Mixin";

/// A partial overlay with the same optional-field shape as the overridable
/// parts of an [`AppSpec`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MixinTemplate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secrets: Option<SecretSpec>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sidecar: Vec<SidecarSpec>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<ServiceSpec>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workload: Option<WorkloadSpec>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resources: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security_context: Option<SecurityContextSpec>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args: Option<ArgsSpec>,
}

impl MixinTemplate {
    /// Combine two partial templates. The overlay wins for singular fields
    /// (workload, secrets, service, security context, args). Resource
    /// profile names accumulate, base entries first. Sidecars merge by
    /// name in first-seen order: an overlay sidecar replaces a base
    /// sidecar of the same name in place, new names append.
    pub fn merge(&self, overlay: &MixinTemplate) -> MixinTemplate {
        let mut sidecars: IndexMap<String, SidecarSpec> = IndexMap::new();
        for sidecar in self.sidecar.iter().chain(overlay.sidecar.iter()) {
            sidecars.insert(sidecar.name.clone(), sidecar.clone());
        }

        let mut resources = self.resources.clone();
        resources.extend(overlay.resources.iter().cloned());

        MixinTemplate {
            secrets: overlay.secrets.clone().or_else(|| self.secrets.clone()),
            sidecar: sidecars.into_values().collect(),
            service: overlay.service.clone().or_else(|| self.service.clone()),
            workload: overlay.workload.clone().or_else(|| self.workload.clone()),
            resources,
            security_context: overlay
                .security_context
                .clone()
                .or_else(|| self.security_context.clone()),
            args: overlay.args.clone().or_else(|| self.args.clone()),
        }
    }

    /// Fold an ordered sequence of templates with [`merge`](Self::merge).
    /// Later templates take precedence for singular fields. Returns `None`
    /// for an empty sequence.
    pub fn fold(templates: &[MixinTemplate]) -> Option<MixinTemplate> {
        let mut iter = templates.iter();
        let first = iter.next()?.clone();
        Some(iter.fold(first, |acc, next| acc.merge(next)))
    }

    /// Fill fields the app spec left absent. The spec itself is the
    /// ultimate override layer: anything it sets explicitly is untouched.
    pub fn apply_to(&self, spec: &mut AppSpec) {
        if spec.service.is_none() {
            spec.service = self.service.clone();
        }
        if spec.workload.is_none() {
            spec.workload = self.workload.clone();
        }
        if spec.security_context.is_none() {
            spec.security_context = self.security_context.clone();
        }
        if spec.resources.is_empty() {
            spec.resources.extend(self.resources.iter().cloned());
        }
        if spec.secrets.is_none() {
            spec.secrets = self.secrets.clone();
        }
        if spec.args.is_none() {
            spec.args = self.args.clone();
        }
    }
}

/// On-disk mixin document, discriminated by `kind: Mixin`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MixinDoc {
    #[serde(default)]
    pub kind: String,

    pub metadata: DocMetadata,

    pub spec: MixinSpec,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MixinSpec {
    pub template: MixinTemplate,
}

/// Name-keyed mixin lookup, loaded once per run.
pub type MixinCatalog = BTreeMap<String, MixinTemplate>;

/// Load all mixin documents from `files`. Documents whose `kind` tag is
/// not `Mixin` are skipped; unparseable files are reported and skipped
/// without failing the collection.
pub fn load_mixins(files: &[impl AsRef<Path>]) -> MixinCatalog {
    let mut catalog = MixinCatalog::new();
    for file in files {
        let doc: MixinDoc = match loader::load_yaml(file.as_ref()) {
            Ok(doc) => doc,
            Err(err) => {
                tracing::warn!(file = %file.as_ref().display(), error = %err, "skipping mixin file");
                continue;
            }
        };
        if doc.kind != MIXIN_KIND {
            continue;
        }
        catalog.insert(doc.metadata.name, doc.spec.template);
    }
    catalog
}

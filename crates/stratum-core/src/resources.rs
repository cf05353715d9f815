//! Resource profiles: named CPU/memory request and limit bundles
//!
//! Profiles carry no selector and are never merged at load time. Folding
//! happens at consumption: each profile in an app's list overwrites only
//! the attributes it defines, so later profiles win per attribute.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::loader::{self, DocMetadata};

pub const RESOURCE_KIND: &str = "Resource";

/// Resolved CPU/memory requests and limits.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resources {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requests: Option<ResourceValue>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limits: Option<ResourceValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceValue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory: Option<String>,
}

impl Resources {
    pub fn is_empty(&self) -> bool {
        self.requests.is_none() && self.limits.is_none()
    }

    /// Overwrite only the attributes `profile` defines; everything else is
    /// left as previously accumulated.
    fn absorb(&mut self, profile: &Resources) {
        if let Some(limits) = &profile.limits {
            let target = self.limits.get_or_insert_with(ResourceValue::default);
            if limits.cpu.is_some() {
                target.cpu = limits.cpu.clone();
            }
            if limits.memory.is_some() {
                target.memory = limits.memory.clone();
            }
        }
        if let Some(requests) = &profile.requests {
            let target = self.requests.get_or_insert_with(ResourceValue::default);
            if requests.cpu.is_some() {
                target.cpu = requests.cpu.clone();
            }
            if requests.memory.is_some() {
                target.memory = requests.memory.clone();
            }
        }
    }
}

/// On-disk resource-profile document, discriminated by `kind: Resource`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceDoc {
    #[serde(default)]
    pub kind: String,

    pub metadata: DocMetadata,

    pub spec: ResourceSpec,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceSpec {
    #[serde(default)]
    pub data: Resources,
}

/// Name-keyed resource-profile lookup, loaded once per run.
pub type ResourceCatalog = BTreeMap<String, Resources>;

/// Fold the named profiles left to right. Unknown names are reported and
/// contribute nothing. Returns `None` when no attribute was set at all.
pub fn fold_profiles(names: &[String], catalog: &ResourceCatalog) -> Option<Resources> {
    let mut resolved = Resources::default();
    for name in names {
        match catalog.get(name) {
            Some(profile) => resolved.absorb(profile),
            None => {
                tracing::warn!(profile = %name, "resource profile not found");
            }
        }
    }
    if resolved.is_empty() {
        None
    } else {
        Some(resolved)
    }
}

/// Load all resource-profile documents from `files`. Documents whose
/// `kind` tag is not `Resource` are skipped; unparseable files are
/// reported and skipped without failing the collection.
pub fn load_resources(files: &[impl AsRef<Path>]) -> ResourceCatalog {
    let mut catalog = ResourceCatalog::new();
    for file in files {
        let doc: ResourceDoc = match loader::load_yaml(file.as_ref()) {
            Ok(doc) => doc,
            Err(err) => {
                tracing::warn!(file = %file.as_ref().display(), error = %err, "skipping resource file");
                continue;
            }
        };
        if doc.kind != RESOURCE_KIND {
            continue;
        }
        catalog.insert(doc.metadata.name, doc.spec.data);
    }
    catalog
}

//! Product sets, release specs and run metadata
//!
//! A product set is the release-level list of applications with optional
//! image/version overrides. Defaulting runs once at load time, before any
//! app is enriched: after [`ProductSet::from_file`] returns, every release
//! spec has a namespace, an image and a version.

use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::loader;

/// The release-level description of what to generate.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,

    #[serde(
        default,
        rename = "container_namespace",
        skip_serializing_if = "Option::is_none"
    )]
    pub container_namespace: Option<String>,

    #[serde(default)]
    pub apps: Vec<ReleaseSpec>,
}

/// One application reference inside a product set. Image, version and
/// namespace are resolved during product-set loading.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReleaseSpec {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(default)]
    pub namespace: String,
}

impl ProductSet {
    /// Load a product set and apply the defaulting rules. The namespace
    /// override argument takes precedence over the file's namespace, which
    /// takes precedence over `default`.
    pub fn from_file(path: &Path, namespace_override: Option<&str>) -> Result<ProductSet> {
        let mut product_set: ProductSet = loader::load_yaml(path)?;
        product_set.resolve(namespace_override);
        Ok(product_set)
    }

    /// Apply the defaulting rules to a hand-built product set. Called by
    /// [`from_file`](Self::from_file); exposed for callers that assemble
    /// a set without a file.
    pub fn resolve(&mut self, namespace_override: Option<&str>) {
        if let Some(namespace) = namespace_override {
            if !namespace.is_empty() {
                self.namespace = Some(namespace.to_string());
            }
        }
        let namespace = self
            .namespace
            .get_or_insert_with(|| "default".to_string())
            .clone();

        let prefix = self
            .container_namespace
            .as_ref()
            .map(|ns| format!("{}/", ns))
            .unwrap_or_default();

        for app in &mut self.apps {
            app.namespace = namespace.clone();
            if app.image.is_none() {
                let version = app.version.as_deref().unwrap_or("latest");
                app.image = Some(format!("{}:{}", app.name, version));
            }
            if !prefix.is_empty() {
                if let Some(image) = &app.image {
                    app.image = Some(format!("{}{}", prefix, image));
                }
            }
            if app.version.is_none() {
                if let Some(image) = &app.image {
                    if let Some((_, tag)) = image.split_once(':') {
                        app.version = Some(tag.to_string());
                    }
                }
            }
        }
    }
}

impl ReleaseSpec {
    /// Resolved image reference. Defaulting guarantees presence after
    /// load; the fallback covers hand-built specs.
    pub fn image_ref(&self) -> String {
        self.image
            .clone()
            .unwrap_or_else(|| format!("{}:latest", self.name))
    }

    /// Resolved version, `latest` for hand-built specs.
    pub fn version_ref(&self) -> String {
        self.version.clone().unwrap_or_else(|| "latest".to_string())
    }
}

/// Metadata about the run, attached to every rendered manifest as an
/// annotation. Constructed once at process start and never mutated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub user: String,
    pub release_id: String,
    pub action: String,
    pub command: String,
    pub created: String,
    pub change_ref: String,
}

impl Task {
    /// Build a deploy task stamped with the current time.
    pub fn deploy(release_file: &str, change_ref: &str) -> Self {
        let now = Utc::now();
        Self {
            user: std::env::var("USER").unwrap_or_default(),
            release_id: now.format("%Y%m%d%H%M").to_string(),
            action: "deploy".to_string(),
            command: format!("deploy {}", release_file),
            created: now.to_rfc3339_opts(SecondsFormat::Secs, true),
            change_ref: change_ref.to_string(),
        }
    }
}

/// Run-level summary covering every app, success or failure. The item
/// list is never truncated by an app-scoped error.
#[derive(Debug, Clone, Serialize)]
pub struct DeploymentSummary {
    pub namespace: String,
    pub items: Vec<AppOutcome>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AppOutcome {
    pub name: String,
    pub status: OutcomeStatus,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum OutcomeStatus {
    Generated { kind: String, path: PathBuf },
    Failed { error: String },
}

impl AppOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self.status, OutcomeStatus::Failed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product_set(yaml: &str, namespace_override: Option<&str>) -> ProductSet {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("release.yaml");
        std::fs::write(&path, yaml).unwrap();
        ProductSet::from_file(&path, namespace_override).unwrap()
    }

    #[test]
    fn test_image_defaults_with_container_namespace() {
        let set = product_set(
            r#"
container_namespace: acme
apps:
  - name: web
"#,
            None,
        );
        let web = &set.apps[0];
        assert_eq!(web.image.as_deref(), Some("acme/web:latest"));
        assert_eq!(web.version.as_deref(), Some("latest"));
        assert_eq!(web.namespace, "default");
    }

    #[test]
    fn test_explicit_version_feeds_image() {
        let set = product_set(
            r#"
namespace: payments
apps:
  - name: ledger
    version: 1.2.0
"#,
            None,
        );
        let ledger = &set.apps[0];
        assert_eq!(ledger.image.as_deref(), Some("ledger:1.2.0"));
        assert_eq!(ledger.namespace, "payments");
    }

    #[test]
    fn test_version_derived_from_image_tag() {
        let set = product_set(
            r#"
apps:
  - name: web
    image: registry.local/web:2.4.1
"#,
            None,
        );
        assert_eq!(set.apps[0].version.as_deref(), Some("2.4.1"));
    }

    #[test]
    fn test_namespace_override_wins_over_file() {
        let set = product_set("namespace: payments\napps:\n  - name: web\n", Some("uat"));
        assert_eq!(set.namespace.as_deref(), Some("uat"));
        assert_eq!(set.apps[0].namespace, "uat");
    }
}

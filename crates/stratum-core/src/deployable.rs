//! The fully resolved, render-ready deployment descriptor
//!
//! Every field a manifest template consumes must be resolved by the time a
//! [`Deployable`] reaches rendering; no further lookups happen there. A
//! descriptor is built once per app per run and never mutated afterwards.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::spec::{ArgsSpec, IngressSpec, SecurityContextSpec};
use crate::resources::Resources;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deployable {
    /// Workload kind; absent means `Deployment`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    pub namespace: String,

    pub artifact: ArtifactInfo,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checks: Option<Healthcheck>,

    pub target: TargetInfo,

    #[serde(default)]
    pub env: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub service: Vec<ServiceInfo>,

    pub metadata: Metadata,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_account_name: Option<String>,

    pub service_enabled: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<Resources>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security_context: Option<SecurityContextSpec>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingress: Option<IngressSpec>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mounts: Vec<MountSpec>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args: Option<ArgsSpec>,
}

impl Deployable {
    /// Distinct container ports across all service entries, each port
    /// number exactly once, in first-seen order.
    pub fn ports(&self) -> Vec<PortType> {
        let mut seen: BTreeSet<u16> = BTreeSet::new();
        let mut ports = Vec::new();
        for service in &self.service {
            for port in &service.port {
                if seen.insert(port.port) {
                    ports.push(port.clone());
                }
            }
        }
        ports
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactInfo {
    pub name: String,

    #[serde(default)]
    pub image: String,
}

impl ArtifactInfo {
    /// Chart version derived from the image tag: a semver tag (with an
    /// optional `v` prefix) is used as-is, any other tag maps to `1.0.0`,
    /// and a tagless or empty image yields an empty version.
    pub fn chart_version(&self) -> String {
        let Some((_, tag)) = self.image.split_once(':') else {
            return String::new();
        };
        let tag = tag.strip_prefix('v').unwrap_or(tag);
        match semver::Version::parse(tag) {
            Ok(version) if version.pre.is_empty() && version.build.is_empty() => {
                version.to_string()
            }
            _ => "1.0.0".to_string(),
        }
    }
}

/// Labels, annotations and selector labels generated for one app.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub selector_labels: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceInfo {
    #[serde(default)]
    pub headless: bool,

    #[serde(default)]
    pub port: Vec<PortType>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortType {
    pub name: String,

    pub port: u16,

    pub target_port: String,

    pub protocol: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Healthcheck {
    pub port: String,
    pub path: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetInfo {
    pub replica: u32,

    #[serde(default)]
    pub node_selector: BTreeMap<String, String>,
}

/// A resolved volume mount parsed from a `path[:type]` declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MountSpec {
    pub name: String,

    pub path: String,

    #[serde(rename = "type")]
    pub mount_type: String,
}

impl MountSpec {
    /// Parse a `path[:type]` declaration. The type defaults to `emptyDir`
    /// and the name is the path with `/` replaced by `-`, leading dash
    /// stripped.
    pub fn parse(declaration: &str) -> Self {
        let (path, mount_type) = match declaration.split_once(':') {
            Some((path, mount_type)) => (path, mount_type),
            None => (declaration, "emptyDir"),
        };
        let name = path.replace('/', "-");
        let name = name.strip_prefix('-').unwrap_or(&name).to_string();
        Self {
            name,
            path: path.to_string(),
            mount_type: mount_type.to_string(),
        }
    }

    /// The default ephemeral `/tmp` mount applied when a spec declares no
    /// mounts.
    pub fn default_tmp() -> Self {
        Self {
            name: "tmp-volume".to_string(),
            path: "/tmp".to_string(),
            mount_type: "emptyDir".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn port(name: &str, number: u16) -> PortType {
        PortType {
            name: name.to_string(),
            port: number,
            target_port: name.to_string(),
            protocol: "TCP".to_string(),
        }
    }

    #[test]
    fn test_ports_dedup_first_seen_order() {
        let deployable = Deployable {
            service: vec![
                ServiceInfo {
                    headless: false,
                    port: vec![port("http", 8080), port("metrics", 9100)],
                },
                ServiceInfo {
                    headless: true,
                    port: vec![port("http", 8080), port("metrics", 9100)],
                },
            ],
            ..Deployable::default()
        };
        let ports = deployable.ports();
        assert_eq!(ports.len(), 2);
        assert_eq!(ports[0].name, "http");
        assert_eq!(ports[1].name, "metrics");
    }

    #[test]
    fn test_chart_version_from_semver_tag() {
        let artifact = ArtifactInfo {
            name: "web".to_string(),
            image: "acme/web:1.2.3".to_string(),
        };
        assert_eq!(artifact.chart_version(), "1.2.3");

        let artifact = ArtifactInfo {
            name: "web".to_string(),
            image: "acme/web:v2.0.1".to_string(),
        };
        assert_eq!(artifact.chart_version(), "2.0.1");
    }

    #[test]
    fn test_chart_version_fallbacks() {
        let artifact = ArtifactInfo {
            name: "web".to_string(),
            image: "acme/web:latest".to_string(),
        };
        assert_eq!(artifact.chart_version(), "1.0.0");

        let artifact = ArtifactInfo {
            name: "web".to_string(),
            image: "web".to_string(),
        };
        assert_eq!(artifact.chart_version(), "");
    }

    #[test]
    fn test_mount_parse_with_type() {
        let mount = MountSpec::parse("/data:persistentVolumeClaim");
        assert_eq!(
            mount,
            MountSpec {
                name: "data".to_string(),
                path: "/data".to_string(),
                mount_type: "persistentVolumeClaim".to_string(),
            }
        );
    }

    #[test]
    fn test_mount_parse_default_type() {
        let mount = MountSpec::parse("/var/cache");
        assert_eq!(mount.name, "var-cache");
        assert_eq!(mount.mount_type, "emptyDir");
    }
}

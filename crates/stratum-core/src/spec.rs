//! User-authored application specifications
//!
//! An [`AppSpec`] is a partial description of one application. Every
//! optional field means "not specified, inherit" and may be filled in from
//! mixins during enrichment.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Partial, user-authored configuration for one application.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSpec {
    pub name: String,

    #[serde(default)]
    pub image: String,

    /// Workload kind, `Deployment` when absent. `Job` selects the job
    /// manifest instead.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub env: Vec<EnvEntry>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secrets: Option<SecretSpec>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<ServiceSpec>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workload: Option<WorkloadSpec>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_account: Option<String>,

    /// Resource profile names, folded attribute-wise at enrichment time.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resources: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security_context: Option<SecurityContextSpec>,

    /// Mixin names applied in order; later mixins win for singular fields.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mixins: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingress: Option<IngressSpec>,

    /// Mount declarations of the form `path[:type]`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mounts: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args: Option<ArgsSpec>,
}

/// One environment entry: either a reference to a named environment set or
/// a literal name/value pair.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnvEntry {
    #[serde(
        default,
        rename = "env-set",
        skip_serializing_if = "Option::is_none"
    )]
    pub env_set: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl EnvEntry {
    pub fn set(name: &str) -> Self {
        Self {
            env_set: Some(name.to_string()),
            ..Self::default()
        }
    }

    pub fn literal(name: &str, value: &str) -> Self {
        Self {
            env_set: None,
            name: Some(name.to_string()),
            value: Some(value.to_string()),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretSpec {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<String>,
}

/// Sidecar contributed by a mixin overlay.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SidecarSpec {
    pub name: String,

    #[serde(default)]
    pub image: String,

    #[serde(default)]
    pub template: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceSpec {
    /// Named ports in declaration order.
    #[serde(default)]
    pub port: IndexMap<String, u16>,

    #[serde(
        default,
        rename = "healthCheck",
        skip_serializing_if = "Option::is_none"
    )]
    pub health_check: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headless: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkloadSpec {
    pub target: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scaling: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityContextSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_as_user: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_privilege_escalation: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_only_root_filesystem: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_as_non_root: Option<bool>,
}

impl SecurityContextSpec {
    /// Hardened default applied when a spec declares no security context.
    pub fn hardened() -> Self {
        Self {
            run_as_user: Some("1000".to_string()),
            allow_privilege_escalation: Some(false),
            read_only_root_filesystem: Some(true),
            run_as_non_root: Some(true),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngressSpec {
    pub name: String,

    #[serde(default)]
    pub group: String,
}

/// Container entrypoint/argument overrides.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArgsSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entrypoint: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<Vec<String>>,
}

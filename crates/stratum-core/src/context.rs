//! Run context: the environment signals a generation run executes under
//!
//! The context is constructed once at process start and threaded by value
//! into selector resolution and enrichment. The core never reads process
//! environment variables itself, which keeps resolution pure and testable.

use serde::{Deserialize, Serialize};

/// Immutable per-run environment information.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunContext {
    /// Logical environment name, e.g. `dev`, `uat`, `prod`.
    pub env_name: String,

    /// Two-letter location code the run was launched with.
    pub location: String,

    /// Cloud region derived from the location code.
    pub region: String,

    /// Target cluster name.
    pub cluster: String,
}

impl RunContext {
    /// Create a context from explicit values. The region is derived from
    /// the location code.
    pub fn new(env_name: &str, location: &str, cluster: &str) -> Self {
        Self {
            env_name: env_name.to_string(),
            location: location.to_string(),
            region: decode_location(location).to_string(),
            cluster: cluster.to_string(),
        }
    }

    /// Build a context from the `ENV_NAME`, `LOCATION` and `CLUSTER`
    /// process environment variables. Missing variables resolve to empty
    /// strings, matching an unconstrained local run.
    pub fn from_env() -> Self {
        let get = |key: &str| std::env::var(key).unwrap_or_default();
        Self::new(&get("ENV_NAME"), &get("LOCATION"), &get("CLUSTER"))
    }

    /// True when the run targets a production environment.
    pub fn is_prod(&self) -> bool {
        self.env_name == "prod" || self.env_name == "prd"
    }
}

fn decode_location(code: &str) -> &'static str {
    match code {
        "hk" => "ap-east-1",
        "us" => "us-east-1",
        "ie" => "eu-west-1",
        "ap" => "ap-southeast-1",
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_from_location() {
        assert_eq!(RunContext::new("dev", "hk", "blue").region, "ap-east-1");
        assert_eq!(RunContext::new("dev", "ie", "blue").region, "eu-west-1");
        assert_eq!(RunContext::new("dev", "zz", "blue").region, "");
    }

    #[test]
    fn test_is_prod() {
        assert!(RunContext::new("prod", "us", "c1").is_prod());
        assert!(RunContext::new("prd", "us", "c1").is_prod());
        assert!(!RunContext::new("uat", "us", "c1").is_prod());
    }
}

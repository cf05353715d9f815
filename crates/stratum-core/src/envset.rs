//! Environment sets and selector resolution
//!
//! An environment set is a named, selector-guarded collection of
//! variables. Selectors are conjunctive: when `ENV_NAME` or `LOCATION`
//! constraints are present, all of them must match the run context for the
//! set's variables to be included. A set that fails its selector keeps its
//! name slot with an empty variable map, so references to it resolve
//! cleanly to nothing.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::context::RunContext;
use crate::loader::{self, DocMetadata};

pub const ENVIRONMENT_KIND: &str = "Environment";

/// On-disk environment-set document, discriminated by `kind: Environment`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentDoc {
    #[serde(default)]
    pub kind: String,

    pub metadata: DocMetadata,

    pub spec: EnvironmentSpec,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnvironmentSpec {
    /// Optional conjunction of `ENV_NAME` / `LOCATION` constraints.
    #[serde(default)]
    pub selector: BTreeMap<String, String>,

    #[serde(default)]
    pub data: Vec<KeyValue>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyValue {
    pub name: String,
    pub value: String,
}

impl EnvironmentSpec {
    /// True when every selector constraint matches the run context. An
    /// empty selector always matches.
    pub fn matches(&self, ctx: &RunContext) -> bool {
        if let Some(target_env) = self.selector.get("ENV_NAME") {
            if target_env != &ctx.env_name {
                return false;
            }
        }
        if let Some(location) = self.selector.get("LOCATION") {
            if location != &ctx.region {
                return false;
            }
        }
        true
    }
}

/// Name-keyed environment-set lookup after selector filtering.
#[derive(Debug, Clone, Default)]
pub struct EnvCatalog {
    sets: BTreeMap<String, BTreeMap<String, String>>,
}

impl EnvCatalog {
    /// Variables of the named set, `None` when the set does not exist. An
    /// excluded set resolves to an empty map, not `None`.
    pub fn get(&self, name: &str) -> Option<&BTreeMap<String, String>> {
        self.sets.get(name)
    }

    pub fn insert(&mut self, name: String, vars: BTreeMap<String, String>) {
        self.sets.insert(name, vars);
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Fold every set into one flat table. Set names are visited in
    /// lexicographic order; a variable defined by two sets is overwritten
    /// by the later set and the collision reported as a warning. The
    /// computed `REGION`, `ENV_NAME` and `CLUSTER` keys are written last
    /// and may override user-declared variables.
    pub fn flatten(&self, ctx: &RunContext) -> BTreeMap<String, String> {
        let mut flat = BTreeMap::new();
        for (set_name, vars) in &self.sets {
            for (key, value) in vars {
                if let Some(previous) = flat.insert(key.clone(), value.clone()) {
                    tracing::warn!(
                        set = %set_name,
                        key = %key,
                        prev_value = %previous,
                        new_value = %value,
                        "variable already defined, keeping later value"
                    );
                }
            }
        }
        flat.insert("REGION".to_string(), ctx.region.clone());
        flat.insert("ENV_NAME".to_string(), ctx.env_name.clone());
        flat.insert("CLUSTER".to_string(), ctx.cluster.clone());
        flat
    }
}

/// Load all environment-set documents from `files`, applying selector
/// filtering against `ctx`. Unparseable files are reported and skipped.
pub fn load_env_sets(files: &[impl AsRef<Path>], ctx: &RunContext) -> EnvCatalog {
    let mut catalog = EnvCatalog::default();
    for file in files {
        let doc: EnvironmentDoc = match loader::load_yaml(file.as_ref()) {
            Ok(doc) => doc,
            Err(err) => {
                tracing::warn!(file = %file.as_ref().display(), error = %err, "skipping environment file");
                continue;
            }
        };
        if doc.kind != ENVIRONMENT_KIND {
            continue;
        }
        let mut vars = BTreeMap::new();
        if doc.spec.matches(ctx) {
            for kv in doc.spec.data {
                vars.insert(kv.name, kv.value);
            }
        }
        catalog.insert(doc.metadata.name, vars);
    }
    catalog
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> RunContext {
        RunContext::new("dev", "hk", "blue")
    }

    fn set(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_empty_selector_always_matches() {
        let spec = EnvironmentSpec::default();
        assert!(spec.matches(&ctx()));
    }

    #[test]
    fn test_selector_is_conjunctive() {
        let spec = EnvironmentSpec {
            selector: set(&[("ENV_NAME", "dev"), ("LOCATION", "ap-east-1")]),
            data: vec![],
        };
        assert!(spec.matches(&ctx()));

        let spec = EnvironmentSpec {
            selector: set(&[("ENV_NAME", "dev"), ("LOCATION", "us-east-1")]),
            data: vec![],
        };
        assert!(!spec.matches(&ctx()));
    }

    #[test]
    fn test_flatten_later_set_wins_collisions() {
        let mut catalog = EnvCatalog::default();
        catalog.insert("a".to_string(), set(&[("FOO", "from-a")]));
        catalog.insert("b".to_string(), set(&[("FOO", "from-b")]));
        let flat = catalog.flatten(&ctx());
        assert_eq!(flat.get("FOO").unwrap(), "from-b");
    }

    #[test]
    fn test_flatten_adds_computed_keys_last() {
        let mut catalog = EnvCatalog::default();
        catalog.insert("a".to_string(), set(&[("REGION", "user-declared")]));
        let flat = catalog.flatten(&ctx());
        assert_eq!(flat.get("REGION").unwrap(), "ap-east-1");
        assert_eq!(flat.get("ENV_NAME").unwrap(), "dev");
        assert_eq!(flat.get("CLUSTER").unwrap(), "blue");
    }

    #[test]
    fn test_load_env_sets_excluded_set_keeps_name_slot() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("regional.yaml"),
            r#"
kind: Environment
metadata:
  name: regional
spec:
  selector:
    LOCATION: us-east-1
  data:
    - name: EDGE
      value: east
"#,
        )
        .unwrap();
        let files = loader::list_files(dir.path(), "yaml");
        let catalog = load_env_sets(&files, &ctx());
        assert_eq!(catalog.get("regional"), Some(&BTreeMap::new()));
    }

    #[test]
    fn test_load_env_sets_skips_other_kinds() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("res.yaml"),
            "kind: Resource\nmetadata:\n  name: small\nspec:\n  data: []\n",
        )
        .unwrap();
        let files = loader::list_files(dir.path(), "yaml");
        let catalog = load_env_sets(&files, &ctx());
        assert!(catalog.is_empty());
    }
}

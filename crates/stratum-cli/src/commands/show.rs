//! Show command - resolve one app and print its deployable descriptor

use std::path::Path;

use miette::{IntoDiagnostic, Result, WrapErr};
use stratum_core::{
    enrich, load_env_sets, load_mixins, load_resources, loader, AppSpec, ProductSet, ReleaseSpec,
    RunContext, Task,
};

pub fn run(
    app: &str,
    spec_dir: &Path,
    release_file: Option<&Path>,
    namespace: Option<&str>,
) -> Result<()> {
    let ctx = RunContext::from_env();

    let release = resolve_release(app, release_file, namespace)?;
    let spec_path = spec_dir.join("apps").join(format!("{}.yaml", app));
    let spec: AppSpec = loader::load_yaml(&spec_path)
        .into_diagnostic()
        .wrap_err_with(|| format!("failed to load app spec for '{}'", app))?;

    let env_sets = load_env_sets(&loader::list_files(spec_dir.join("env-sets"), "yaml"), &ctx);
    let resources = load_resources(&loader::list_files(spec_dir.join("resources"), "yaml"));
    let mixins = load_mixins(&loader::list_files(spec_dir.join("mixins"), "yaml"));

    let task = Task::deploy("show", "");
    let deployable = enrich(&spec, &env_sets, &resources, &mixins, &release, &task, &ctx)
        .into_diagnostic()
        .wrap_err_with(|| format!("failed to resolve app '{}'", app))?;

    let yaml = serde_yaml::to_string(&deployable)
        .into_diagnostic()
        .wrap_err("failed to serialize deployable")?;
    println!("{}", yaml);
    Ok(())
}

/// Find the app's release spec in the product set, or synthesize one with
/// default image/version rules when no release file is given.
fn resolve_release(
    app: &str,
    release_file: Option<&Path>,
    namespace: Option<&str>,
) -> Result<ReleaseSpec> {
    if let Some(path) = release_file {
        let product_set = ProductSet::from_file(path, namespace)
            .into_diagnostic()
            .wrap_err_with(|| format!("failed to load product set {}", path.display()))?;
        if let Some(release) = product_set.apps.iter().find(|a| a.name == app) {
            return Ok(release.clone());
        }
        miette::bail!("app '{}' not found in {}", app, path.display());
    }

    let mut product_set = ProductSet {
        apps: vec![ReleaseSpec {
            name: app.to_string(),
            ..ReleaseSpec::default()
        }],
        ..ProductSet::default()
    };
    product_set.resolve(namespace);
    Ok(product_set.apps.remove(0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_release_synthesizes_defaults() {
        let release = resolve_release("web", None, Some("uat")).unwrap();
        assert_eq!(release.image.as_deref(), Some("web:latest"));
        assert_eq!(release.namespace, "uat");
    }
}

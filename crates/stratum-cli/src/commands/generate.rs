//! Generate command - render manifests for every app in a product set
//!
//! Apps are processed one at a time in product-set order; each app's
//! outcome (generated or failed) is collected so the summary always
//! covers the whole set. Cancellation is cooperative, checked before
//! each app begins.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use miette::{IntoDiagnostic, Result, WrapErr};
use stratum_core::{
    enrich, load_env_sets, load_mixins, load_resources, loader, AppOutcome, AppSpec,
    DeploymentSummary, EnvCatalog, MixinCatalog, OutcomeStatus, ProductSet, ReleaseSpec,
    ResourceCatalog, RunContext, Task,
};
use stratum_engine::Engine;

use crate::display;
use crate::error::AppError;

pub fn run(
    release_file: &Path,
    spec_dir: &Path,
    output_dir: &Path,
    namespace: Option<&str>,
    change_ref: &str,
) -> Result<()> {
    let ctx = RunContext::from_env();
    let cancel = AtomicBool::new(false);
    let summary = generate(
        release_file,
        spec_dir,
        output_dir,
        namespace,
        change_ref,
        &ctx,
        &cancel,
    )?;
    display::print_summary(&summary);

    let failed = summary.items.iter().filter(|i| i.is_failure()).count();
    if failed > 0 {
        miette::bail!("{} of {} apps failed", failed, summary.items.len());
    }
    Ok(())
}

/// Run the full pipeline and collect a per-app outcome for every app in
/// the product set. Only a product-set load failure is fatal.
pub fn generate(
    release_file: &Path,
    spec_dir: &Path,
    output_dir: &Path,
    namespace: Option<&str>,
    change_ref: &str,
    ctx: &RunContext,
    cancel: &AtomicBool,
) -> Result<DeploymentSummary> {
    let product_set = ProductSet::from_file(release_file, namespace)
        .into_diagnostic()
        .wrap_err_with(|| format!("failed to load product set {}", release_file.display()))?;

    let env_sets = load_env_sets(&loader::list_files(spec_dir.join("env-sets"), "yaml"), ctx);
    let resources = load_resources(&loader::list_files(spec_dir.join("resources"), "yaml"));
    let mixins = load_mixins(&loader::list_files(spec_dir.join("mixins"), "yaml"));
    tracing::debug!(vars = ?env_sets.flatten(ctx), "flattened environment table");

    let task = Task::deploy(&release_file.display().to_string(), change_ref);
    let engine = Engine::new();

    let mut items = Vec::new();
    for app in &product_set.apps {
        if cancel.load(Ordering::Relaxed) {
            tracing::warn!(app = %app.name, "run cancelled, skipping remaining apps");
            break;
        }
        tracing::debug!(app = %app.name, "generating app");
        let status = match process_app(
            app, spec_dir, output_dir, &env_sets, &resources, &mixins, &task, ctx, &engine,
        ) {
            Ok((kind, path)) => OutcomeStatus::Generated { kind, path },
            Err(err) => {
                tracing::warn!(app = %app.name, error = %err, "app generation failed");
                OutcomeStatus::Failed {
                    error: err.to_string(),
                }
            }
        };
        items.push(AppOutcome {
            name: app.name.clone(),
            status,
        });
    }

    Ok(DeploymentSummary {
        namespace: product_set
            .namespace
            .clone()
            .unwrap_or_else(|| "default".to_string()),
        items,
    })
}

#[allow(clippy::too_many_arguments)]
fn process_app(
    release: &ReleaseSpec,
    spec_dir: &Path,
    output_dir: &Path,
    env_sets: &EnvCatalog,
    resources: &ResourceCatalog,
    mixins: &MixinCatalog,
    task: &Task,
    ctx: &RunContext,
    engine: &Engine,
) -> std::result::Result<(String, PathBuf), AppError> {
    let spec_path = spec_dir.join("apps").join(format!("{}.yaml", release.name));
    let spec: AppSpec = loader::load_yaml(&spec_path)?;

    let deployable = enrich(&spec, env_sets, resources, mixins, release, task, ctx)?;
    let rendered = engine.render(&deployable)?;

    let app_dir = output_dir.join(&release.name);
    std::fs::create_dir_all(&app_dir).map_err(|source| AppError::Write {
        path: app_dir.display().to_string(),
        source,
    })?;
    for (file_name, content) in &rendered.files {
        let file_path = app_dir.join(file_name);
        std::fs::write(&file_path, content).map_err(|source| AppError::Write {
            path: file_path.display().to_string(),
            source,
        })?;
    }
    Ok((rendered.kind, app_dir))
}

//! Template selection and rendering
//!
//! The manifest set for an app depends only on its workload kind and on
//! whether a service is exposed. Everything the templates consume is
//! already resolved on the `Deployable`.

use indexmap::IndexMap;
use minijinja::{context, Environment, UndefinedBehavior};
use stratum_core::Deployable;

use crate::error::{EngineError, Result};
use crate::filters;
use crate::templates;

/// The manifest documents the engine knows how to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestKind {
    Chart,
    ServiceAccount,
    Deployment,
    Job,
    Service,
}

impl ManifestKind {
    pub fn template_name(&self) -> &'static str {
        match self {
            Self::Chart => "chart",
            Self::ServiceAccount => "serviceaccount",
            Self::Deployment => "deployment",
            Self::Job => "job",
            Self::Service => "service",
        }
    }

    fn source(&self) -> &'static str {
        match self {
            Self::Chart => templates::CHART,
            Self::ServiceAccount => templates::SERVICE_ACCOUNT,
            Self::Deployment => templates::DEPLOYMENT,
            Self::Job => templates::JOB,
            Self::Service => templates::SERVICE,
        }
    }

    /// Output file name for the given app.
    pub fn file_name(&self, app: &str) -> String {
        match self {
            Self::Chart => "Chart.yaml".to_string(),
            Self::ServiceAccount => format!("{}-serviceaccount.yaml", app),
            Self::Deployment => format!("{}-deployment.yaml", app),
            Self::Job => format!("{}-job.yaml", app),
            Self::Service => format!("{}-service.yaml", app),
        }
    }
}

/// Manifests rendered for one app, in render order.
#[derive(Debug)]
pub struct RenderedApp {
    /// Workload kind label for the run summary: `deployment`, `job`, or
    /// empty when the kind was unrecognized.
    pub kind: String,

    /// Rendered documents by output file name.
    pub files: IndexMap<String, String>,
}

/// Select the manifest set for a descriptor: always the chart descriptor
/// and service account, a workload manifest per the kind state machine,
/// and a service manifest when a service is exposed. An unknown kind
/// degrades to no workload manifest, with a warning.
pub fn required_manifests(deployable: &Deployable) -> (Vec<ManifestKind>, String) {
    let mut manifests = vec![ManifestKind::Chart, ManifestKind::ServiceAccount];
    let kind = deployable.kind.as_deref().unwrap_or("");
    let workload = if kind.is_empty() || kind == "Deployment" {
        manifests.push(ManifestKind::Deployment);
        "deployment"
    } else if kind.eq_ignore_ascii_case("Job") {
        manifests.push(ManifestKind::Job);
        "job"
    } else {
        tracing::warn!(kind = %kind, app = %deployable.artifact.name, "unknown workload kind, skipping workload manifest");
        ""
    };
    if deployable.service_enabled {
        manifests.push(ManifestKind::Service);
    }
    (manifests, workload.to_string())
}

/// The manifest rendering engine. Cheap to construct; templates are
/// compiled per render.
#[derive(Debug, Default)]
pub struct Engine;

impl Engine {
    pub fn new() -> Self {
        Self
    }

    fn environment(&self) -> Result<Environment<'static>> {
        let mut env = Environment::new();
        // Absent optional fields are omitted from the context, so
        // undefined lookups are expected and resolve falsy.
        env.set_undefined_behavior(UndefinedBehavior::Lenient);
        env.add_filter("quote", filters::quote);
        env.add_filter("squote", filters::squote);
        env.add_filter("indent", filters::indent);
        env.add_filter("nindent", filters::nindent);
        for kind in [
            ManifestKind::Chart,
            ManifestKind::ServiceAccount,
            ManifestKind::Deployment,
            ManifestKind::Job,
            ManifestKind::Service,
        ] {
            env.add_template(kind.template_name(), kind.source())
                .map_err(|err| EngineError::template(kind.template_name(), err))?;
        }
        Ok(env)
    }

    /// Render every required manifest for `deployable`.
    pub fn render(&self, deployable: &Deployable) -> Result<RenderedApp> {
        let env = self.environment()?;
        let (manifests, kind) = required_manifests(deployable);

        let ctx = context! {
            artifact => &deployable.artifact,
            version => deployable.artifact.chart_version(),
            namespace => &deployable.namespace,
            metadata => &deployable.metadata,
            target => &deployable.target,
            env => &deployable.env,
            ports => deployable.ports(),
            checks => &deployable.checks,
            service_enabled => deployable.service_enabled,
            service_account_name => &deployable.service_account_name,
            resources => &deployable.resources,
            security_context => &deployable.security_context,
            mounts => &deployable.mounts,
            args => &deployable.args,
        };

        let mut files = IndexMap::new();
        for manifest in manifests {
            let template = env
                .get_template(manifest.template_name())
                .map_err(|err| EngineError::template(manifest.template_name(), err))?;
            let rendered = template
                .render(&ctx)
                .map_err(|err| EngineError::template(manifest.template_name(), err))?;
            files.insert(manifest.file_name(&deployable.artifact.name), rendered);
        }
        Ok(RenderedApp { kind, files })
    }
}

//! Enrichment pipeline: partial app spec to render-ready descriptor
//!
//! [`enrich`] folds the app's mixins into a working copy of its spec, then
//! resolves placement, health checks, service ports, environment
//! variables, resources, identity, metadata, security context, mounts and
//! args into a [`Deployable`]. Reference problems (unknown mixin, profile
//! or environment set) follow one uniform policy: warn and continue with
//! empty defaults.

use std::collections::BTreeMap;

use crate::context::RunContext;
use crate::deployable::{
    ArtifactInfo, Deployable, Healthcheck, Metadata, MountSpec, PortType, ServiceInfo, TargetInfo,
};
use crate::envset::EnvCatalog;
use crate::error::Result;
use crate::mixin::{MixinCatalog, MixinTemplate};
use crate::release::{ReleaseSpec, Task};
use crate::resources::{self, ResourceCatalog};
use crate::spec::{AppSpec, EnvEntry, SecurityContextSpec, ServiceSpec, WorkloadSpec};

const DEFAULT_TARGET: &str = "tools";
const PLACEMENT_LABEL: &str = "eks.amazonaws.com/nodegroup";

/// Resolve one application into a render-ready [`Deployable`].
pub fn enrich(
    spec: &AppSpec,
    env_sets: &EnvCatalog,
    resource_catalog: &ResourceCatalog,
    mixins: &MixinCatalog,
    release: &ReleaseSpec,
    task: &Task,
    ctx: &RunContext,
) -> Result<Deployable> {
    let mut spec = spec.clone();
    merge_mixins(&mut spec, mixins);

    let target = create_target(&spec, ctx);
    let checks = create_checks(spec.service.as_ref());
    let service = create_services(spec.service.as_ref());
    let service_enabled = !service.is_empty();
    let env = create_env(&spec.env, env_sets);
    let profile_names = if spec.resources.is_empty() {
        vec!["small".to_string()]
    } else {
        spec.resources.clone()
    };
    let resolved_resources = resources::fold_profiles(&profile_names, resource_catalog);

    Ok(Deployable {
        kind: spec.kind.clone(),
        // Release identity is authoritative over spec identity.
        namespace: release.namespace.clone(),
        artifact: ArtifactInfo {
            name: release.name.clone(),
            image: release.image_ref(),
        },
        checks,
        target,
        env,
        service,
        metadata: create_metadata(release, task)?,
        service_account_name: spec.service_account.clone(),
        service_enabled,
        resources: resolved_resources,
        security_context: Some(
            spec.security_context
                .clone()
                .unwrap_or_else(SecurityContextSpec::hardened),
        ),
        ingress: spec.ingress.clone(),
        mounts: create_mounts(&spec.mounts),
        args: spec.args.clone(),
    })
}

/// Fold the spec's declared mixins and fill its absent fields. Unknown
/// mixin names are reported and contribute nothing.
fn merge_mixins(spec: &mut AppSpec, mixins: &MixinCatalog) {
    let mut templates: Vec<MixinTemplate> = Vec::new();
    for name in &spec.mixins {
        match mixins.get(name) {
            Some(template) => templates.push(template.clone()),
            None => {
                tracing::warn!(mixin = %name, app = %spec.name, "mixin not found");
            }
        }
    }
    if let Some(folded) = MixinTemplate::fold(&templates) {
        folded.apply_to(spec);
    }
}

fn create_target(spec: &AppSpec, ctx: &RunContext) -> TargetInfo {
    let workload = spec.workload.clone().unwrap_or_else(|| WorkloadSpec {
        target: DEFAULT_TARGET.to_string(),
        scaling: Some(DEFAULT_TARGET.to_string()),
    });
    let scaling = workload.scaling.as_deref().unwrap_or(DEFAULT_TARGET);
    let mut node_selector = BTreeMap::new();
    node_selector.insert(PLACEMENT_LABEL.to_string(), workload.target.clone());
    TargetInfo {
        replica: replicas_for_scaling_group(scaling, ctx),
        node_selector,
    }
}

fn replicas_for_scaling_group(group: &str, ctx: &RunContext) -> u32 {
    match group {
        "microservices" if ctx.is_prod() => 3,
        _ => 1,
    }
}

fn create_checks(service: Option<&ServiceSpec>) -> Option<Healthcheck> {
    let path = service?.health_check.clone()?;
    Some(Healthcheck {
        port: "http".to_string(),
        path,
    })
}

fn create_services(service: Option<&ServiceSpec>) -> Vec<ServiceInfo> {
    let Some(service) = service else {
        return Vec::new();
    };
    let ports: Vec<PortType> = service
        .port
        .iter()
        .map(|(name, number)| PortType {
            name: name.clone(),
            port: *number,
            target_port: name.clone(),
            protocol: "TCP".to_string(),
        })
        .collect();

    let mut services = vec![ServiceInfo {
        headless: false,
        port: ports.clone(),
    }];
    if service.headless.unwrap_or(false) {
        services.push(ServiceInfo {
            headless: true,
            port: ports,
        });
    }
    services
}

/// Expand env-set references first, in declaration order, then apply
/// literal entries after and overriding, also in declaration order.
fn create_env(entries: &[EnvEntry], env_sets: &EnvCatalog) -> BTreeMap<String, String> {
    let mut env = BTreeMap::new();
    for entry in entries {
        if let Some(set_name) = &entry.env_set {
            match env_sets.get(set_name) {
                Some(vars) => {
                    for (key, value) in vars {
                        env.insert(key.clone(), value.clone());
                    }
                }
                None => {
                    tracing::warn!(env_set = %set_name, "environment set not found");
                }
            }
        }
    }
    for entry in entries {
        if let (Some(name), Some(value)) = (&entry.name, &entry.value) {
            env.insert(name.clone(), value.clone());
        }
    }
    env
}

fn create_metadata(release: &ReleaseSpec, task: &Task) -> Result<Metadata> {
    let version = release.version_ref();
    let mut labels = BTreeMap::new();
    labels.insert(
        "helm.sh/chart".to_string(),
        format!("{}-{}", release.name, version),
    );
    labels.insert("app.kubernetes.io/name".to_string(), release.name.clone());
    labels.insert(
        "app.kubernetes.io/instance".to_string(),
        release.name.clone(),
    );
    labels.insert(
        "app.kubernetes.io/managed-by".to_string(),
        "Helm".to_string(),
    );
    labels.insert("app.kubernetes.io/version".to_string(), version);
    labels.insert(
        "app.kubernetes.io/release".to_string(),
        release.name.clone(),
    );

    let mut annotations = BTreeMap::new();
    annotations.insert(
        "app.kubernetes.io/artifact-info".to_string(),
        serde_json::to_string(release)?,
    );
    annotations.insert(
        "app.kubernetes.io/deployment-info".to_string(),
        serde_json::to_string(task)?,
    );

    let mut selector_labels = BTreeMap::new();
    selector_labels.insert("app.kubernetes.io/name".to_string(), release.name.clone());
    selector_labels.insert(
        "app.kubernetes.io/instance".to_string(),
        release.name.clone(),
    );

    Ok(Metadata {
        labels,
        annotations,
        selector_labels,
    })
}

fn create_mounts(declarations: &[String]) -> Vec<MountSpec> {
    if declarations.is_empty() {
        return vec![MountSpec::default_tmp()];
    }
    declarations
        .iter()
        .map(|declaration| MountSpec::parse(declaration))
        .collect()
}

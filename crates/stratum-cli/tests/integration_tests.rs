//! Integration tests for CLI commands

use std::path::Path;
use std::process::Command;

/// Helper to run stratum with a fixed run context
fn stratum(args: &[&str]) -> std::process::Output {
    stratum_with_env(args, &[("ENV_NAME", "dev"), ("LOCATION", "hk"), ("CLUSTER", "blue")])
}

fn stratum_with_env(args: &[&str], env: &[(&str, &str)]) -> std::process::Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_stratum"));
    cmd.args(args);
    for (key, value) in env {
        cmd.env(key, value);
    }
    cmd.output().expect("Failed to execute stratum")
}

/// Get the fixtures path
fn fixtures_path() -> &'static str {
    concat!(env!("CARGO_MANIFEST_DIR"), "/../../fixtures/demo")
}

fn read(dir: &Path, rel: &str) -> String {
    std::fs::read_to_string(dir.join(rel))
        .unwrap_or_else(|_| panic!("expected output file {}", rel))
}

mod generate_command {
    use super::*;

    fn generate_ok(out: &Path) -> std::process::Output {
        stratum(&[
            "generate",
            &format!("{}/release-ok.yaml", fixtures_path()),
            "--spec-dir",
            fixtures_path(),
            "--output-dir",
            &out.to_string_lossy(),
            "--change-ref",
            "CRQ000042",
        ])
    }

    #[test]
    fn test_generate_writes_expected_manifests() {
        let out = tempfile::tempdir().unwrap();
        let output = generate_ok(out.path());
        assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains("namespace: demo"));
        assert!(stdout.contains("web"));

        for file in [
            "web/Chart.yaml",
            "web/web-serviceaccount.yaml",
            "web/web-deployment.yaml",
            "web/web-service.yaml",
            "worker/Chart.yaml",
            "worker/worker-serviceaccount.yaml",
            "worker/worker-job.yaml",
        ] {
            assert!(out.path().join(file).exists(), "missing {}", file);
        }
        assert!(!out.path().join("worker/worker-service.yaml").exists());
    }

    #[test]
    fn test_generate_deployment_contents() {
        let out = tempfile::tempdir().unwrap();
        let output = generate_ok(out.path());
        assert!(output.status.success());

        let deployment = read(out.path(), "web/web-deployment.yaml");
        assert!(deployment.contains("image: acme/web:latest"));
        assert!(deployment.contains("replicas: 1"));
        assert!(deployment.contains("eks.amazonaws.com/nodegroup: apps"));
        assert!(deployment.contains("containerPort: 8080"));
        assert!(deployment.contains("path: /health"));
        // Literal env entries override env-set values; the excluded
        // regional set contributes nothing.
        assert!(deployment.contains("value: \"standard\""));
        assert!(deployment.contains("name: \"LOG_FORMAT\""));
        assert!(!deployment.contains("EDGE"));
        // Mixin resource profile resolved via the small profile.
        assert!(deployment.contains("cpu: \"100m\""));
        // Default mount applied when the spec declares none.
        assert!(deployment.contains("mountPath: /tmp"));

        let service = read(out.path(), "web/web-service.yaml");
        assert!(service.contains("targetPort: metrics"));
    }

    #[test]
    fn test_generate_prod_scaling() {
        let out = tempfile::tempdir().unwrap();
        let output = stratum_with_env(
            &[
                "generate",
                &format!("{}/release-ok.yaml", fixtures_path()),
                "--spec-dir",
                fixtures_path(),
                "--output-dir",
                &out.path().to_string_lossy(),
            ],
            &[("ENV_NAME", "prod"), ("LOCATION", "us"), ("CLUSTER", "green")],
        );
        assert!(output.status.success());
        let deployment = read(out.path(), "web/web-deployment.yaml");
        assert!(deployment.contains("replicas: 3"));
    }

    #[test]
    fn test_generate_job_manifest() {
        let out = tempfile::tempdir().unwrap();
        let output = generate_ok(out.path());
        assert!(output.status.success());

        let job = read(out.path(), "worker/worker-job.yaml");
        assert!(job.contains("kind: Job"));
        assert!(job.contains("image: acme/worker:1.2.0"));
        assert!(job.contains("- '/bin/worker'"));
        assert!(job.contains("- '--once'"));
        assert!(job.contains("restartPolicy: Never"));
        // Profiles fold attribute-wise: large only overrides memory.
        assert!(job.contains("cpu: \"100m\""));
        assert!(job.contains("memory: \"1Gi\""));
        assert!(job.contains("mountPath: /data"));
        // Only emptyDir mounts materialize an inline volume source.
        assert!(job.contains("- name: scratch\n          emptyDir: { }"));
    }

    #[test]
    fn test_generate_reports_every_app_on_partial_failure() {
        let out = tempfile::tempdir().unwrap();
        let output = stratum(&[
            "generate",
            &format!("{}/release.yaml", fixtures_path()),
            "--spec-dir",
            fixtures_path(),
            "--output-dir",
            &out.path().to_string_lossy(),
        ]);
        // ghost has no app spec, so the run exits nonzero ...
        assert!(!output.status.success());
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains("FAILED"));
        assert!(stdout.contains("ghost"));
        // ... but the other apps are still generated and reported.
        assert!(stdout.contains("web"));
        assert!(out.path().join("web/web-deployment.yaml").exists());
        assert!(out.path().join("worker/worker-job.yaml").exists());
    }

    #[test]
    fn test_generate_namespace_override() {
        let out = tempfile::tempdir().unwrap();
        let output = stratum(&[
            "generate",
            &format!("{}/release-ok.yaml", fixtures_path()),
            "--spec-dir",
            fixtures_path(),
            "--output-dir",
            &out.path().to_string_lossy(),
            "--namespace",
            "uat",
        ]);
        assert!(output.status.success());
        let deployment = read(out.path(), "web/web-deployment.yaml");
        assert!(deployment.contains("namespace: uat"));
    }
}

mod show_command {
    use super::*;

    #[test]
    fn test_show_prints_resolved_descriptor() {
        let output = stratum(&[
            "show",
            "web",
            "--spec-dir",
            fixtures_path(),
            "--release",
            &format!("{}/release-ok.yaml", fixtures_path()),
        ]);
        assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains("image: acme/web:latest"));
        assert!(stdout.contains("serviceEnabled: true"));
        assert!(stdout.contains("LOG_FORMAT: json"));
    }

    #[test]
    fn test_show_without_release_synthesizes_identity() {
        let output = stratum(&["show", "web", "--spec-dir", fixtures_path()]);
        assert!(output.status.success());
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains("image: web:latest"));
        assert!(stdout.contains("namespace: default"));
    }

    #[test]
    fn test_show_unknown_app_fails() {
        let output = stratum(&["show", "ghost", "--spec-dir", fixtures_path()]);
        assert!(!output.status.success());
    }
}

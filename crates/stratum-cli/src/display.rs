//! Styled run summary output

use console::style;
use stratum_core::{DeploymentSummary, OutcomeStatus};

pub fn print_summary(summary: &DeploymentSummary) {
    println!(
        "{} namespace: {}",
        style("Release").cyan().bold(),
        summary.namespace
    );
    for item in &summary.items {
        match &item.status {
            OutcomeStatus::Generated { kind, path } => {
                println!(
                    "  {} {} [{}] -> {}",
                    style("OK").green(),
                    item.name,
                    if kind.is_empty() { "none" } else { kind },
                    path.display()
                );
            }
            OutcomeStatus::Failed { error } => {
                println!("  {} {}: {}", style("FAILED").red().bold(), item.name, error);
            }
        }
    }
}

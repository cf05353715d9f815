//! Stratum CLI - turns layered app specs into Kubernetes manifests

use clap::{Parser, Subcommand};
use miette::Result;
use std::path::PathBuf;

mod commands;
mod display;
mod error;

#[derive(Parser)]
#[command(name = "stratum")]
#[command(version)]
#[command(about = "Render layered application specs into Kubernetes manifests", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug output
    #[arg(long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate manifests for every app in a product set
    Generate {
        /// Product-set (release) file
        release: PathBuf,

        /// Directory holding env-sets/, resources/, mixins/ and apps/
        #[arg(long, default_value = "spec")]
        spec_dir: PathBuf,

        /// Directory to write per-app manifests into
        #[arg(short, long, default_value = "output")]
        output_dir: PathBuf,

        /// Override the product set's namespace
        #[arg(short, long)]
        namespace: Option<String>,

        /// Change reference recorded in manifest annotations
        #[arg(long, default_value = "")]
        change_ref: String,
    },

    /// Resolve one app and print its deployable descriptor as YAML
    Show {
        /// App name (expects <spec-dir>/apps/<name>.yaml)
        app: String,

        /// Directory holding env-sets/, resources/, mixins/ and apps/
        #[arg(long, default_value = "spec")]
        spec_dir: PathBuf,

        /// Product-set file supplying image/version overrides
        #[arg(long)]
        release: Option<PathBuf>,

        /// Target namespace
        #[arg(short, long)]
        namespace: Option<String>,
    },
}

fn init_tracing(debug: bool) {
    use tracing_subscriber::EnvFilter;

    let default = if debug { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    miette::set_panic_hook();

    let cli = Cli::parse();
    init_tracing(cli.debug);

    match cli.command {
        Commands::Generate {
            release,
            spec_dir,
            output_dir,
            namespace,
            change_ref,
        } => commands::generate::run(
            &release,
            &spec_dir,
            &output_dir,
            namespace.as_deref(),
            &change_ref,
        ),
        Commands::Show {
            app,
            spec_dir,
            release,
            namespace,
        } => commands::show::run(&app, &spec_dir, release.as_deref(), namespace.as_deref()),
    }
}

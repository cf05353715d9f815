//! App-scoped errors collected into the run summary

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] stratum_core::CoreError),

    #[error(transparent)]
    Engine(#[from] stratum_engine::EngineError),

    #[error("failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

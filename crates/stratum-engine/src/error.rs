//! Engine error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("template {name}: {source}")]
    Template {
        name: String,
        #[source]
        source: minijinja::Error,
    },
}

impl EngineError {
    pub fn template(name: &str, source: minijinja::Error) -> Self {
        Self::Template {
            name: name.to_string(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;

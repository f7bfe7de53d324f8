//! Errors raised outside the catalog store: local files the CLI writes itself.

use std::path::PathBuf;

use thiserror::Error;

use crate::application::ApplicationError;

#[derive(Error, Debug)]
pub enum InfraError {
    #[error("{0}")]
    Application(#[from] ApplicationError),

    #[error("I/O error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// `config init` never overwrites an existing file
    #[error("config file already exists: {}", .0.display())]
    ConfigExists(PathBuf),
}

impl InfraError {
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}

pub type InfraResult<T> = Result<T, InfraError>;

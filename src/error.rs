use std::path::{Path, PathBuf};

use thiserror::Error;

pub type Result<A> = std::result::Result<A, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Failed to read `{0}`: `{1}`")]
    ReadError(PathBuf, std::io::Error),
    #[error("Failed to write `{0}`: `{1}`")]
    WriteError(PathBuf, std::io::Error),
    #[error("Failed to create directory `{0}`: `{1}`")]
    CreateDirError(PathBuf, std::io::Error),
    #[error("Failed to list directory `{0}`: `{1}`")]
    ReadDirError(PathBuf, std::io::Error),
    #[error("Unexpected path for a page: `{0}`")]
    PageError(PathBuf),
    #[error("Error with templating: `{0}`")]
    JinjaError(minijinja::Error),
    #[error("Table of contents must be a plain file name, got `{0}`")]
    TocNameError(String),
    #[error("Invalid configuration: `{0}`")]
    ConfigError(Box<figment::Error>),
    #[error("Error watching files: `{0}`")]
    NotifyError(notify::Error),
    #[error("Error serving files: `{0}`")]
    ServeError(std::io::Error),
    #[error("Page conversion task failed: `{0}`")]
    TaskError(tokio::task::JoinError),
}

impl Error {
    pub fn read(path: impl AsRef<Path>, err: std::io::Error) -> Self {
        Self::ReadError(path.as_ref().into(), err)
    }

    pub fn write(path: impl AsRef<Path>, err: std::io::Error) -> Self {
        Self::WriteError(path.as_ref().into(), err)
    }

    pub fn create_dir(path: impl AsRef<Path>, err: std::io::Error) -> Self {
        Self::CreateDirError(path.as_ref().into(), err)
    }

    pub fn read_dir(path: impl AsRef<Path>, err: std::io::Error) -> Self {
        Self::ReadDirError(path.as_ref().into(), err)
    }
}

impl From<minijinja::Error> for Error {
    fn from(value: minijinja::Error) -> Self {
        Self::JinjaError(value)
    }
}

impl From<figment::Error> for Error {
    fn from(value: figment::Error) -> Self {
        Self::ConfigError(Box::new(value))
    }
}

impl From<notify::Error> for Error {
    fn from(value: notify::Error) -> Self {
        Self::NotifyError(value)
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(value: tokio::task::JoinError) -> Self {
        Self::TaskError(value)
    }
}

//! Error types for resource generation.
//!
//! All fallible functions in this crate return [`Result<T>`], which uses [`Error`]
//! as the error type. Every error is fatal to the generation run of the target
//! it occurred in; nothing is retried.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while generating resource accessors.
#[derive(Error, Debug)]
pub enum Error {
    /// Two source sets contributed the same relative path under
    /// [`OverrideStrategy::Fail`](kres_project::OverrideStrategy::Fail).
    #[error(
        "Duplicate resource found: {path} (provided by '{existing_source_set}' and '{incoming_source_set}')"
    )]
    DuplicateResource {
        path: String,
        existing_source_set: String,
        incoming_source_set: String,
    },

    /// Reading a resource or writing generated output failed.
    #[error("IO error at {path}: {source}")]
    Io {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Walking a resource directory failed.
    #[error("Failed to walk resource directory: {0}")]
    Walk(#[from] walkdir::Error),

    /// A relative resource path has no file name segment.
    #[error("Invalid resource path: '{0}'")]
    InvalidResourcePath(String),

    /// A resource path is not valid UTF-8.
    #[error("Resource path is not valid UTF-8: {}", .0.display())]
    NonUtf8Path(std::path::PathBuf),

    /// The hierarchy references a source set that was never declared.
    #[error("Unknown source set: {0}")]
    UnknownSourceSet(String),

    /// A target was requested that the project does not declare.
    #[error("Unknown target: {0}")]
    UnknownTarget(String),

    /// Test targets and test source sets never get accessors.
    #[error("Target '{0}' is a test target and is excluded from generation")]
    TestTarget(String),

    /// The project configuration failed validation.
    #[error("Invalid project: {0}")]
    Project(#[from] kres_project::ProjectError),
}

impl Error {
    pub(crate) fn io(path: impl Into<Utf8PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

use miette::{Diagnostic, SourceSpan};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum CliError {
    #[error("Configuration file not found")]
    #[diagnostic(
        code(config::not_found),
        help("Run `kres init` or create a kres.config.json or kres.config.toml file in your project directory")
    )]
    ConfigNotFound { search_path: PathBuf },

    #[error("Configuration file already exists: {path}")]
    #[diagnostic(
        code(config::already_exists),
        help("Remove the existing file or edit it by hand")
    )]
    ConfigAlreadyExists { path: PathBuf },

    #[error("Invalid package name: {name}")]
    #[diagnostic(
        code(project::invalid_package_name),
        help("Package names are dot separated identifiers (e.g., dev.limebeck.res)")
    )]
    InvalidPackageName {
        name: String,
        #[label("invalid package name")]
        span: Option<SourceSpan>,
    },

    #[error("Unknown target: {name}")]
    #[diagnostic(
        code(project::unknown_target),
        help("Declared targets: {available}")
    )]
    UnknownTarget { name: String, available: String },

    #[error("Configuration file error")]
    #[diagnostic(
        code(config::parse_error),
        help("Check your kres.config.json or kres.config.toml file for syntax errors")
    )]
    ConfigParseError {
        #[source]
        source: kres_project::ProjectError,
    },

    #[error("Resource generation failed")]
    #[diagnostic(code(codegen::failed))]
    Generation {
        #[source]
        source: kres_codegen::Error,
    },

    #[error("Duplicate resource: {path}")]
    #[diagnostic(
        code(codegen::duplicate_resource),
        help("'{existing_source_set}' and '{incoming_source_set}' both provide this file. Remove one of them or change `override_strategy` to OVERRIDE or USE_COMMON")
    )]
    DuplicateResource {
        path: String,
        existing_source_set: String,
        incoming_source_set: String,
    },

    #[error("IO operation failed")]
    #[diagnostic(code(io::operation_failed))]
    IoError {
        #[from]
        source: std::io::Error,
    },
}

impl CliError {
    pub fn config_not_found(search_path: PathBuf) -> Self {
        Self::ConfigNotFound { search_path }
    }

    pub fn invalid_package_name(name: String, span: Option<SourceSpan>) -> Self {
        Self::InvalidPackageName { name, span }
    }

    pub fn unknown_target(name: String, available: &[String]) -> Self {
        Self::UnknownTarget {
            name,
            available: available.join(", "),
        }
    }
}

impl From<kres_project::ProjectError> for CliError {
    fn from(source: kres_project::ProjectError) -> Self {
        Self::ConfigParseError { source }
    }
}

impl From<kres_codegen::Error> for CliError {
    fn from(source: kres_codegen::Error) -> Self {
        match source {
            kres_codegen::Error::DuplicateResource {
                path,
                existing_source_set,
                incoming_source_set,
            } => Self::DuplicateResource {
                path,
                existing_source_set,
                incoming_source_set,
            },
            kres_codegen::Error::Project(source) => Self::ConfigParseError { source },
            source => Self::Generation { source },
        }
    }
}

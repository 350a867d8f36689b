//! Project file lookup shared by the commands.

use camino::{Utf8Path, Utf8PathBuf};
use kres_project::ResourcesProject;
use miette::{IntoDiagnostic, Result, WrapErr};

use crate::errors::CliError;

/// Explicit `--config` path, otherwise `kres.config.json` or `kres.config.toml`
/// in the current directory.
pub fn resolve_config_path(config_path: Option<String>) -> Result<Utf8PathBuf> {
    match config_path {
        Some(path) => Ok(Utf8PathBuf::from(path)),
        None => {
            let cwd = current_dir()?;
            ResourcesProject::find_config(&cwd)
                .ok_or_else(|| CliError::config_not_found(cwd.into_std_path_buf()).into())
        }
    }
}

/// Load and validate a project file.
pub fn load_project(config_path: &Utf8Path) -> Result<ResourcesProject> {
    let project = ResourcesProject::load(config_path)
        .map_err(CliError::from)
        .wrap_err_with(|| format!("Failed to load {}", config_path))?;
    project.validate().map_err(CliError::from)?;
    Ok(project)
}

/// Directory holding the project file. Relative resource dirs resolve against it.
pub fn project_root(config_path: &Utf8Path) -> Result<Utf8PathBuf> {
    match config_path.parent() {
        Some(parent) if !parent.as_str().is_empty() => Ok(parent.to_path_buf()),
        _ => current_dir(),
    }
}

/// Relative output directories are placed under the project root.
pub fn resolve_output_dir(output_dir: &str, project_root: &Utf8Path) -> Utf8PathBuf {
    let output_dir = Utf8PathBuf::from(output_dir);
    match output_dir.is_absolute() {
        true => output_dir,
        false => project_root.join(output_dir),
    }
}

pub fn current_dir() -> Result<Utf8PathBuf> {
    let cwd = std::env::current_dir().into_diagnostic()?;
    Utf8PathBuf::from_path_buf(cwd)
        .map_err(|path| miette::miette!("Current directory is not valid UTF-8: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn relative_output_dir_is_under_project_root() {
        let root = Utf8Path::new("/work/app");
        assert_eq!(
            resolve_output_dir("build/generated/kres", root),
            Utf8PathBuf::from("/work/app/build/generated/kres")
        );
    }

    #[test]
    fn absolute_output_dir_is_kept() {
        let root = Utf8Path::new("/work/app");
        assert_eq!(
            resolve_output_dir("/tmp/out", root),
            Utf8PathBuf::from("/tmp/out")
        );
    }

    #[test]
    fn project_root_is_config_parent() {
        assert_eq!(
            project_root(Utf8Path::new("/work/app/kres.config.json")).unwrap(),
            Utf8PathBuf::from("/work/app")
        );
    }

    #[test]
    fn load_project_rejects_unknown_source_set() {
        let dir = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::from_path_buf(dir.path().join("kres.config.json")).unwrap();
        fs::write(
            &path,
            r#"{ "source_sets": [{ "name": "commonMain" }], "targets": [{ "name": "jvm" }] }"#,
        )
        .unwrap();

        assert!(load_project(&path).is_err());
    }
}

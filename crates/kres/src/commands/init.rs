use camino::{Utf8Path, Utf8PathBuf};
use colored::Colorize;
use inquire::{validator::Validation, Text};
use kres_project::{is_valid_package_name, ResourcesProject, CONFIG_FILE_NAMES, DEFAULT_PACKAGE_NAME};
use miette::IntoDiagnostic;

use crate::errors::CliError;
use crate::println_pad;
use crate::utils::config::current_dir;

#[derive(Debug, Clone)]
pub struct InitProjectArgs {
    pub package_name: Option<String>,
    pub output_dir: Option<String>,
}

pub fn init_project(args: InitProjectArgs) -> miette::Result<()> {
    let package_name = match args.package_name {
        Some(name) => {
            if !is_valid_package_name(&name) {
                return Err(CliError::invalid_package_name(name, None).into());
            }
            name
        }
        None => prompt_package_name()?,
    };

    let project_dir = match args.output_dir {
        Some(ref output_dir) => Utf8PathBuf::from(output_dir),
        None => current_dir()?,
    };

    println_pad!(
        "{} {}",
        "🚀 Initializing resources for package:".bright_blue().bold(),
        package_name.bright_cyan().bold()
    );

    let config_path = write_default_project(&project_dir, &package_name)?;
    println_pad!(
        "{} {}",
        "📝 Wrote project file:".bright_yellow(),
        config_path.as_str().bright_white().bold()
    );

    let resources_dir = prepare_common_resources_dir(&project_dir)?;
    println_pad!(
        "{} {}",
        "📁 Put shared resources in:".bright_yellow(),
        resources_dir.as_str().bright_white().bold()
    );

    println_pad!(
        "{}\n{} {}",
        "Project initialized successfully!".bright_green().bold(),
        "Next:".bright_green(),
        "kres generate".bright_white().bold()
    );

    Ok(())
}

fn create_default_project(package_name: &str) -> ResourcesProject {
    ResourcesProject {
        package_name: package_name.to_string(),
        ..ResourcesProject::default()
    }
}

/// Write `kres.config.json`, refusing to replace any existing project file.
fn write_default_project(project_dir: &Utf8Path, package_name: &str) -> miette::Result<Utf8PathBuf> {
    if let Some(existing) = ResourcesProject::find_config(project_dir) {
        return Err(CliError::ConfigAlreadyExists {
            path: existing.into_std_path_buf(),
        }
        .into());
    }

    std::fs::create_dir_all(project_dir).map_err(CliError::from)?;

    let project = create_default_project(package_name);
    let content = serde_json::to_string_pretty(&project).into_diagnostic()?;
    let config_path = project_dir.join(CONFIG_FILE_NAMES[0]);
    std::fs::write(&config_path, content).map_err(CliError::from)?;

    Ok(config_path)
}

fn prepare_common_resources_dir(project_dir: &Utf8Path) -> Result<Utf8PathBuf, CliError> {
    let project = ResourcesProject::default();
    let resources_dir = project_dir
        .join("src")
        .join(&project.common_source_set)
        .join(&project.resources_folder_name);
    std::fs::create_dir_all(&resources_dir)?;

    Ok(resources_dir)
}

fn prompt_package_name() -> miette::Result<String> {
    let validator = |input: &str| {
        if is_valid_package_name(input) {
            Ok(Validation::Valid)
        } else {
            Ok(Validation::Invalid(
                "Package name must be dot separated identifiers (e.g. dev.limebeck.res)".into(),
            ))
        }
    };

    let name = Text::new("Enter the package of the generated sources:")
        .with_validator(validator)
        .with_default(DEFAULT_PACKAGE_NAME)
        .with_placeholder(DEFAULT_PACKAGE_NAME)
        .prompt()
        .into_diagnostic()?;

    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_project_dir() -> (tempfile::TempDir, Utf8PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        (dir, path)
    }

    #[test]
    fn writes_loadable_default_project() {
        let (_dir, project_dir) = temp_project_dir();

        let config_path = write_default_project(&project_dir, "com.example.res").unwrap();
        assert_eq!(config_path, project_dir.join("kres.config.json"));

        let project = ResourcesProject::load(&config_path).unwrap();
        assert_eq!(project.package_name, "com.example.res");
        assert!(project.source_set("commonMain").is_some());
        assert!(project.target("linuxX64").is_some());
        project.validate().unwrap();
    }

    #[test]
    fn refuses_to_overwrite_existing_project() {
        let (_dir, project_dir) = temp_project_dir();
        std::fs::write(project_dir.join("kres.config.toml"), "").unwrap();

        assert!(write_default_project(&project_dir, "com.example.res").is_err());
    }

    #[test]
    fn creates_common_resources_dir() {
        let (_dir, project_dir) = temp_project_dir();

        let resources_dir = prepare_common_resources_dir(&project_dir).unwrap();
        assert_eq!(resources_dir, project_dir.join("src/commonMain/resources"));
        assert!(resources_dir.is_dir());
    }

    #[test]
    fn resources_dir_under_a_file_is_io_error() {
        let (_dir, project_dir) = temp_project_dir();
        std::fs::write(project_dir.join("src"), "not a directory").unwrap();

        assert!(matches!(
            prepare_common_resources_dir(&project_dir),
            Err(CliError::IoError { .. })
        ));
    }
}

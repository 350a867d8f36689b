//! Resource project definitions.
//!
//! A project describes the source-set hierarchy of a multiplatform build, where
//! each source set keeps its resource directories, and which targets resources
//! should be generated for. Projects are stored as `kres.config.json` or
//! `kres.config.toml` next to the sources.

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use thiserror::Error;

/// Config file names, in lookup order.
pub const CONFIG_FILE_NAMES: [&str; 2] = ["kres.config.json", "kres.config.toml"];

pub const DEFAULT_PACKAGE_NAME: &str = "dev.limebeck.res";
pub const DEFAULT_RESOURCES_FOLDER_NAME: &str = "resources";
pub const DEFAULT_COMMON_SOURCE_SET: &str = "commonMain";

/// Errors produced while loading or validating a project.
#[derive(Error, Debug)]
pub enum ProjectError {
    #[error("failed to read project file {path}: {source}")]
    Io {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("unsupported project file {0}, expected kres.config.json or kres.config.toml")]
    UnsupportedFormat(Utf8PathBuf),

    #[error("invalid package name: '{0}'")]
    InvalidPackageName(String),

    #[error("source set '{0}' is declared more than once")]
    DuplicateSourceSet(String),

    #[error("target '{0}' is declared more than once")]
    DuplicateTarget(String),

    #[error("'{referenced_by}' references unknown source set '{name}'")]
    UnknownSourceSet { referenced_by: String, name: String },
}

/// What happens when two source sets contribute the same relative resource path.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Copy, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OverrideStrategy {
    /// The source set processed later replaces the earlier file.
    #[default]
    Override,
    /// The first contribution is kept, later ones are dropped.
    UseCommon,
    /// Any duplicate aborts generation.
    Fail,
}

impl fmt::Display for OverrideStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OverrideStrategy::Override => "OVERRIDE",
            OverrideStrategy::UseCommon => "USE_COMMON",
            OverrideStrategy::Fail => "FAIL",
        })
    }
}

/// Describes a resource project configuration file
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
pub struct ResourcesProject {
    /// Package of the generated sources
    ///
    /// Example: `dev.limebeck.res`
    #[serde(default = "default_package_name")]
    pub package_name: String,

    /// Name of the folder holding resources inside `src/<source set>/`
    #[serde(default = "default_resources_folder_name")]
    pub resources_folder_name: String,

    /// Conflict resolution between source sets
    #[serde(default)]
    pub override_strategy: OverrideStrategy,

    /// The shared source set every other source set eventually depends on
    #[serde(default = "default_common_source_set")]
    pub common_source_set: String,

    /// Additional target name keywords that require embedded resources
    ///
    /// Example: `["js", "wasm"]`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub embedding_keywords: Vec<String>,

    /// The source set hierarchy
    #[serde(default)]
    pub source_sets: Vec<SourceSetDef>,

    /// Targets to generate accessors for
    #[serde(default)]
    pub targets: Vec<TargetDef>,
}

/// A single source set of the hierarchy.
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
pub struct SourceSetDef {
    /// Example: `linuxX64Main`
    pub name: String,

    /// Parent source sets
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,

    /// Resource roots, relative to the project directory.
    /// If empty, `src/<name>/<resources_folder_name>` is used.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resource_dirs: Vec<Utf8PathBuf>,
}

/// A compilation target.
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
pub struct TargetDef {
    /// Platform identifier, e.g. `jvm`, `linuxX64` or `metadata`
    pub name: String,

    /// Default source set of the target's main compilation.
    /// Defaults to `<name>Main`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_set: Option<String>,
}

impl SourceSetDef {
    pub fn new(name: impl Into<String>, depends_on: &[&str]) -> Self {
        Self {
            name: name.into(),
            depends_on: depends_on.iter().map(|s| s.to_string()).collect(),
            resource_dirs: Vec::new(),
        }
    }
}

impl TargetDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source_set: None,
        }
    }

    pub fn with_source_set(mut self, source_set: impl Into<String>) -> Self {
        self.source_set = Some(source_set.into());
        self
    }

    /// Name of the source set the target compiles.
    pub fn source_set_name(&self) -> String {
        match &self.source_set {
            Some(name) => name.clone(),
            None => format!("{}Main", self.name),
        }
    }
}

fn default_package_name() -> String {
    DEFAULT_PACKAGE_NAME.to_string()
}

fn default_resources_folder_name() -> String {
    DEFAULT_RESOURCES_FOLDER_NAME.to_string()
}

fn default_common_source_set() -> String {
    DEFAULT_COMMON_SOURCE_SET.to_string()
}

impl Default for ResourcesProject {
    /// A `commonMain` tier with `jvm` and `linuxX64` targets.
    fn default() -> Self {
        Self {
            package_name: default_package_name(),
            resources_folder_name: default_resources_folder_name(),
            override_strategy: OverrideStrategy::default(),
            common_source_set: default_common_source_set(),
            embedding_keywords: Vec::new(),
            source_sets: vec![
                SourceSetDef::new(DEFAULT_COMMON_SOURCE_SET, &[]),
                SourceSetDef::new("jvmMain", &[DEFAULT_COMMON_SOURCE_SET]),
                SourceSetDef::new("linuxX64Main", &[DEFAULT_COMMON_SOURCE_SET]),
            ],
            targets: vec![
                TargetDef::new("metadata").with_source_set(DEFAULT_COMMON_SOURCE_SET),
                TargetDef::new("jvm"),
                TargetDef::new("linuxX64"),
            ],
        }
    }
}

impl ResourcesProject {
    /// Looks for a project file in `dir`, JSON first, then TOML.
    pub fn find_config(dir: &Utf8Path) -> Option<Utf8PathBuf> {
        CONFIG_FILE_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.as_std_path().exists())
    }

    /// Loads a project from a `.json` or `.toml` file.
    pub fn load(path: &Utf8Path) -> Result<Self, ProjectError> {
        let content = std::fs::read_to_string(path.as_std_path()).map_err(|source| {
            ProjectError::Io {
                path: path.to_path_buf(),
                source,
            }
        })?;

        match path.extension() {
            Some("json") => Ok(serde_json::from_str(&content)?),
            Some("toml") => Ok(toml::from_str(&content)?),
            _ => Err(ProjectError::UnsupportedFormat(path.to_path_buf())),
        }
    }

    pub fn source_set(&self, name: &str) -> Option<&SourceSetDef> {
        self.source_sets.iter().find(|ss| ss.name == name)
    }

    pub fn target(&self, name: &str) -> Option<&TargetDef> {
        self.targets.iter().find(|t| t.name == name)
    }

    /// Source set name -> parent source set names.
    pub fn hierarchy(&self) -> BTreeMap<String, Vec<String>> {
        self.source_sets
            .iter()
            .map(|ss| (ss.name.clone(), ss.depends_on.clone()))
            .collect()
    }

    /// Source set name -> absolute resource roots under `project_root`.
    pub fn resource_dirs(&self, project_root: &Utf8Path) -> BTreeMap<String, Vec<Utf8PathBuf>> {
        self.source_sets
            .iter()
            .map(|ss| {
                let dirs = if ss.resource_dirs.is_empty() {
                    vec![project_root
                        .join("src")
                        .join(&ss.name)
                        .join(&self.resources_folder_name)]
                } else {
                    ss.resource_dirs
                        .iter()
                        .map(|dir| match dir.is_absolute() {
                            true => dir.clone(),
                            false => project_root.join(dir),
                        })
                        .collect()
                };
                (ss.name.clone(), dirs)
            })
            .collect()
    }

    /// Checks the package name and that every reference resolves to a declared source set.
    pub fn validate(&self) -> Result<(), ProjectError> {
        if !is_valid_package_name(&self.package_name) {
            return Err(ProjectError::InvalidPackageName(self.package_name.clone()));
        }

        let mut seen = HashSet::new();
        for ss in &self.source_sets {
            if !seen.insert(ss.name.as_str()) {
                return Err(ProjectError::DuplicateSourceSet(ss.name.clone()));
            }
        }

        for ss in &self.source_sets {
            for parent in &ss.depends_on {
                if !seen.contains(parent.as_str()) {
                    return Err(ProjectError::UnknownSourceSet {
                        referenced_by: ss.name.clone(),
                        name: parent.clone(),
                    });
                }
            }
        }

        let mut targets = HashSet::new();
        for target in &self.targets {
            if !targets.insert(target.name.as_str()) {
                return Err(ProjectError::DuplicateTarget(target.name.clone()));
            }
            let source_set = target.source_set_name();
            if !seen.contains(source_set.as_str()) {
                return Err(ProjectError::UnknownSourceSet {
                    referenced_by: target.name.clone(),
                    name: source_set,
                });
            }
        }

        Ok(())
    }
}

/// `a.b.c` where every segment is an identifier.
pub fn is_valid_package_name(name: &str) -> bool {
    !name.is_empty()
        && name.split('.').all(|segment| {
            let mut chars = segment.chars();
            match chars.next() {
                Some(c) if c.is_ascii_alphabetic() || c == '_' => {
                    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
                }
                _ => false,
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_example_project() -> ResourcesProject {
        ResourcesProject {
            package_name: "dev.limebeck.example.res".to_string(),
            resources_folder_name: "resources".to_string(),
            override_strategy: OverrideStrategy::UseCommon,
            common_source_set: "commonMain".to_string(),
            embedding_keywords: vec!["js".to_string()],
            source_sets: vec![
                SourceSetDef::new("commonMain", &[]),
                SourceSetDef {
                    name: "linuxX64Main".to_string(),
                    depends_on: vec!["commonMain".to_string()],
                    resource_dirs: vec![Utf8PathBuf::from("assets/linux")],
                },
            ],
            targets: vec![
                TargetDef::new("metadata").with_source_set("commonMain"),
                TargetDef::new("linuxX64"),
            ],
        }
    }

    #[test]
    fn test_json_parsing() {
        let project: ResourcesProject =
            serde_json::from_str(include_str!("../test-data/kres.config.json")).unwrap();

        assert_eq!(project, create_example_project());
    }

    #[test]
    fn test_toml_parsing() {
        let project: ResourcesProject =
            toml::from_str(include_str!("../test-data/kres.config.toml")).unwrap();

        assert_eq!(project, create_example_project());
    }

    #[test]
    fn test_defaults_applied() {
        let project: ResourcesProject = serde_json::from_str("{}").unwrap();

        assert_eq!(project.package_name, DEFAULT_PACKAGE_NAME);
        assert_eq!(project.resources_folder_name, "resources");
        assert_eq!(project.override_strategy, OverrideStrategy::Override);
        assert_eq!(project.common_source_set, "commonMain");
        assert!(project.source_sets.is_empty());
    }

    #[test]
    fn test_override_strategy_serialization() {
        let strategies = vec![
            OverrideStrategy::Override,
            OverrideStrategy::UseCommon,
            OverrideStrategy::Fail,
        ];

        let json = serde_json::to_string(&strategies).unwrap();
        assert_eq!(json, r#"["OVERRIDE","USE_COMMON","FAIL"]"#);
        assert_eq!(OverrideStrategy::UseCommon.to_string(), "USE_COMMON");
    }

    #[test]
    fn test_target_source_set_name() {
        assert_eq!(TargetDef::new("jvm").source_set_name(), "jvmMain");
        assert_eq!(
            TargetDef::new("metadata")
                .with_source_set("commonMain")
                .source_set_name(),
            "commonMain"
        );
    }

    #[test]
    fn test_resource_dirs_defaults_and_overrides() {
        let project = create_example_project();
        let dirs = project.resource_dirs(Utf8Path::new("/project"));

        assert_eq!(
            dirs["commonMain"],
            vec![Utf8PathBuf::from("/project/src/commonMain/resources")]
        );
        assert_eq!(
            dirs["linuxX64Main"],
            vec![Utf8PathBuf::from("/project/assets/linux")]
        );
    }

    #[test]
    fn test_validate_default_project() {
        assert!(ResourcesProject::default().validate().is_ok());
    }

    #[test]
    fn test_validate_unknown_parent() {
        let mut project = ResourcesProject::default();
        project
            .source_sets
            .push(SourceSetDef::new("iosMain", &["appleMain"]));

        let err = project.validate().unwrap_err();
        assert!(matches!(
            err,
            ProjectError::UnknownSourceSet { ref referenced_by, ref name }
                if referenced_by == "iosMain" && name == "appleMain"
        ));
    }

    #[test]
    fn test_validate_unknown_target_source_set() {
        let mut project = ResourcesProject::default();
        project.targets.push(TargetDef::new("js"));

        assert!(matches!(
            project.validate(),
            Err(ProjectError::UnknownSourceSet { .. })
        ));
    }

    #[test]
    fn test_validate_duplicate_source_set() {
        let mut project = ResourcesProject::default();
        project.source_sets.push(SourceSetDef::new("jvmMain", &[]));

        assert!(matches!(
            project.validate(),
            Err(ProjectError::DuplicateSourceSet(name)) if name == "jvmMain"
        ));
    }

    #[test]
    fn test_validate_duplicate_target() {
        let mut project = ResourcesProject::default();
        project.targets.push(TargetDef::new("jvm"));

        assert!(matches!(
            project.validate(),
            Err(ProjectError::DuplicateTarget(name)) if name == "jvm"
        ));
    }

    #[test]
    fn test_package_name_validation() {
        assert!(is_valid_package_name("dev.limebeck.res"));
        assert!(is_valid_package_name("res"));
        assert!(!is_valid_package_name(""));
        assert!(!is_valid_package_name("dev..res"));
        assert!(!is_valid_package_name("dev.1res"));
        assert!(!is_valid_package_name("dev.my-res"));
    }

    #[test]
    fn test_hierarchy() {
        let hierarchy = ResourcesProject::default().hierarchy();
        assert_eq!(hierarchy["linuxX64Main"], vec!["commonMain".to_string()]);
        assert!(hierarchy["commonMain"].is_empty());
    }
}

//! Per-target generation pipeline.
//!
//! The [`ResourceGenerator`] turns a [`ResourcesProject`] into one generated
//! `Res.kt` per target.
//!
//! # Generation Algorithm
//!
//! 1. Resolve the target's source set and walk the hierarchy breadth-first from
//!    it, prepending every newly seen source set. The common tier ends up first
//!    and the target's own source set last. Test source sets are skipped.
//! 2. Wipe the target's output directory.
//! 3. List the resource files of every source set in that order and insert them
//!    into a fresh [`ResourceTree`]. Contributions of the common source set are
//!    shared. Conflicts are settled by the project's override strategy.
//! 4. Pick the emission mode: the common source set gets `expect` declarations
//!    plus the interface contracts, every other source set gets `actual`
//!    values, embedding payloads when the source set name matches an
//!    embedding keyword.
//! 5. Write `<output>/<package path>/Res.kt`.
//!
//! Targets share nothing, so [`ResourceGenerator::generate_all`] runs them in
//! parallel.

use crate::classify::{is_test_tier, requires_embedding_with};
use crate::content::{FsResourceSource, ResourceSource};
use crate::emitter::{emit_accessors, EmissionMode};
use crate::error::{Error, Result};
use crate::interfaces::emit_interfaces;
use crate::tree::{Contribution, ResourceNode, ResourceTree};
use crate::writer::KotlinFileWriter;
use camino::{Utf8Path, Utf8PathBuf};
use kres_project::ResourcesProject;
use rayon::prelude::*;
use std::collections::{BTreeMap, VecDeque};
use std::sync::Arc;

/// File name of the generated source inside the package directory.
pub const GENERATED_FILE_NAME: &str = "Res.kt";

/// Progress information emitted while generating a target.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationProgress {
    /// Target being generated.
    pub target: String,
    /// Current stage for that target.
    pub stage: GenerationStage,
}

/// Stages of a target's generation, emitted in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub enum GenerationStage {
    /// Listing resource files of every source set in the hierarchy.
    Collecting,
    /// Inserting the files into the resource tree.
    Merging,
    /// Writing the generated source.
    Emitting,
    /// Generation finished successfully.
    Complete,
}

/// Summary of one generated target.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetOutput {
    pub target: String,
    pub source_set: String,
    /// Path of the generated `Res.kt`.
    pub file: Utf8PathBuf,
    /// Number of file accessors written.
    pub resources: usize,
    /// `true` when payloads were embedded rather than looked up at runtime.
    pub embedded: bool,
    /// `true` for the declaration-only shared tier.
    pub declarations_only: bool,
}

type ProgressCallback = Arc<dyn Fn(GenerationProgress) + Send + Sync>;

/// Ordered `(source set, relative path -> file)` listing for one target.
type Contributions = Vec<(String, BTreeMap<String, Utf8PathBuf>)>;

/// Generates typed resource accessors for the targets of a project.
///
/// Create with [`new`](Self::new), optionally swap the resource source with
/// [`with_source`](Self::with_source) or observe stages with
/// [`with_progress`](Self::with_progress), then call
/// [`generate_target`](Self::generate_target) or
/// [`generate_all`](Self::generate_all).
pub struct ResourceGenerator {
    project: ResourcesProject,
    project_root: Utf8PathBuf,
    output_root: Utf8PathBuf,
    source: Box<dyn ResourceSource>,
    progress_callback: Option<ProgressCallback>,
}

impl ResourceGenerator {
    /// Create a generator for a validated project.
    ///
    /// * `project_root`: base for relative resource directories.
    /// * `output_root`: each target writes below `output_root/<target>`, which is
    ///   wiped on every run.
    pub fn new(
        project: ResourcesProject,
        project_root: Utf8PathBuf,
        output_root: Utf8PathBuf,
    ) -> Result<Self> {
        project.validate()?;
        Ok(Self {
            project,
            project_root,
            output_root,
            source: Box::new(FsResourceSource::new()),
            progress_callback: None,
        })
    }

    /// Replace the filesystem resource source.
    pub fn with_source(mut self, source: impl ResourceSource + 'static) -> Self {
        self.source = Box::new(source);
        self
    }

    /// Register a progress callback. It may be called from several threads.
    pub fn with_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(GenerationProgress) + Send + Sync + 'static,
    {
        self.progress_callback = Some(Arc::new(callback));
        self
    }

    /// Output directory of a target.
    pub fn output_dir(&self, target: &str) -> Utf8PathBuf {
        self.output_root.join(target)
    }

    /// Source sets contributing to `source_set`, common tier first, `source_set` last.
    pub fn source_set_order(&self, source_set: &str) -> Result<Vec<String>> {
        let hierarchy = self.project.hierarchy();
        let mut order = VecDeque::new();
        let mut skipped = Vec::new();
        let mut queue = VecDeque::from([source_set.to_string()]);

        while let Some(current) = queue.pop_front() {
            if order.contains(&current) || skipped.contains(&current) {
                continue;
            }
            let parents = hierarchy
                .get(&current)
                .ok_or_else(|| Error::UnknownSourceSet(current.clone()))?;
            queue.extend(parents.iter().cloned());
            if is_test_tier(&current) {
                tracing::debug!("Skipping test source set {}", current);
                skipped.push(current);
                continue;
            }
            order.push_front(current);
        }

        Ok(order.into())
    }

    /// Merge every resource visible from `source_set` into one tree.
    pub fn collect_resources(&self, source_set: &str) -> Result<ResourceNode> {
        let order = self.source_set_order(source_set)?;
        let contributions = self.list_contributions(&order)?;
        self.merge(contributions)
    }

    /// Generate `Res.kt` for one target.
    pub fn generate_target(&self, target_name: &str) -> Result<TargetOutput> {
        let target = self
            .project
            .target(target_name)
            .ok_or_else(|| Error::UnknownTarget(target_name.to_string()))?;
        let source_set = target.source_set_name();
        if is_test_tier(&target.name) || is_test_tier(&source_set) {
            return Err(Error::TestTarget(target.name.clone()));
        }

        let out_dir = self.output_dir(&target.name);
        tracing::info!("Generating resources for target={} source_set={}", target.name, source_set);
        tracing::debug!("Output dir: {}", out_dir);
        reset_dir(&out_dir)?;

        self.emit_progress(&target.name, GenerationStage::Collecting);
        let order = self.source_set_order(&source_set)?;
        tracing::debug!("Source set order: {}", order.join(" -> "));
        let contributions = self.list_contributions(&order)?;

        self.emit_progress(&target.name, GenerationStage::Merging);
        let root = self.merge(contributions)?;

        self.emit_progress(&target.name, GenerationStage::Emitting);
        let declarations_only = source_set == self.project.common_source_set;
        let embedded =
            !declarations_only && requires_embedding_with(&source_set, &self.project.embedding_keywords);
        let mode = match declarations_only {
            true => EmissionMode::Declare,
            false => EmissionMode::Materialize { embedding: embedded },
        };

        let mut writer = KotlinFileWriter::new(&self.project.package_name);
        if declarations_only {
            emit_interfaces(&mut writer);
        }
        let stats = emit_accessors(&mut writer, &root, mode)?;

        let package_dir = self
            .project
            .package_name
            .split('.')
            .fold(out_dir, |dir, segment| dir.join(segment));
        std::fs::create_dir_all(package_dir.as_std_path())
            .map_err(|source| Error::io(&package_dir, source))?;
        let file = package_dir.join(GENERATED_FILE_NAME);
        std::fs::write(file.as_std_path(), writer.finish())
            .map_err(|source| Error::io(&file, source))?;

        tracing::info!(
            "Target={} wrote {} resources in {} directories to {} ({})",
            target.name,
            stats.files,
            stats.directories,
            file,
            match mode {
                EmissionMode::Declare => "declarations",
                EmissionMode::Materialize { embedding: true } => "embedded",
                EmissionMode::Materialize { embedding: false } => "lookup",
            }
        );
        self.emit_progress(&target.name, GenerationStage::Complete);

        Ok(TargetOutput {
            target: target.name.clone(),
            source_set,
            file,
            resources: stats.files,
            embedded,
            declarations_only,
        })
    }

    /// Generate every non-test target in parallel.
    ///
    /// Results are in declaration order. The first failure aborts the run.
    pub fn generate_all(&self) -> Result<Vec<TargetOutput>> {
        let targets: Vec<&str> = self
            .project
            .targets
            .iter()
            .filter(|target| {
                let excluded =
                    is_test_tier(&target.name) || is_test_tier(&target.source_set_name());
                if excluded {
                    tracing::debug!("Skipping test target {}", target.name);
                }
                !excluded
            })
            .map(|target| target.name.as_str())
            .collect();

        targets
            .par_iter()
            .map(|target| self.generate_target(target))
            .collect()
    }

    fn list_contributions(&self, order: &[String]) -> Result<Contributions> {
        let dirs = self.project.resource_dirs(&self.project_root);
        order
            .iter()
            .map(|source_set| {
                let roots = dirs.get(source_set).map(Vec::as_slice).unwrap_or_default();
                let resources = self.source.list_resources(roots)?;
                tracing::debug!("Source set {} has {} resources", source_set, resources.len());
                Ok((source_set.clone(), resources))
            })
            .collect()
    }

    fn merge(&self, contributions: Contributions) -> Result<ResourceNode> {
        let mut tree = ResourceTree::new("", true);
        for (source_set, resources) in &contributions {
            let contribution = Contribution {
                source_set,
                shared: *source_set == self.project.common_source_set,
            };
            for (relative_path, file) in resources {
                tree.insert(
                    relative_path,
                    file.clone(),
                    self.project.override_strategy,
                    contribution,
                )?;
            }
        }
        Ok(tree.resolve())
    }

    fn emit_progress(&self, target: &str, stage: GenerationStage) {
        if let Some(callback) = &self.progress_callback {
            callback(GenerationProgress {
                target: target.to_string(),
                stage,
            });
        }
    }
}

/// Remove `dir` if present and recreate it empty.
fn reset_dir(dir: &Utf8Path) -> Result<()> {
    if dir.as_std_path().exists() {
        std::fs::remove_dir_all(dir.as_std_path()).map_err(|source| Error::io(dir, source))?;
    }
    std::fs::create_dir_all(dir.as_std_path()).map_err(|source| Error::io(dir, source))
}

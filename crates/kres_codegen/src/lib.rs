//! Typed resource accessor generation for Kotlin Multiplatform builds.
//!
//! This crate merges the resource directories of a source set hierarchy into one
//! tree and writes a `Res` object exposing every file as a typed value. It
//! supports:
//!
//! - **Tiered merging**: the common source set first, platform source sets after,
//!   with a configurable override strategy for duplicate paths
//! - **Expect/actual output**: declarations for the shared tier, values for every
//!   concrete platform
//! - **Two read strategies**: base64-embedded payloads for native platforms,
//!   runtime classpath lookup everywhere else
//! - **Deterministic output**: identical inputs give byte-identical files
//!
//! # Example
//!
//! ```no_run
//! use kres_codegen::ResourceGenerator;
//! use kres_project::ResourcesProject;
//! use camino::Utf8Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let project = ResourcesProject::load(Utf8Path::new("kres.config.json"))?;
//!
//! let generator = ResourceGenerator::new(project, ".".into(), "build/generated/kres".into())?
//!     .with_progress(|progress| {
//!         println!("{}: {:?}", progress.target, progress.stage);
//!     });
//!
//! for output in generator.generate_all()? {
//!     println!("{} -> {} ({} resources)", output.target, output.file, output.resources);
//! }
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod classify;
pub mod content;
pub mod emitter;
pub mod error;
pub mod interfaces;
pub mod mime;
pub mod tree;
pub mod utils;
pub mod writer;

pub use builder::{
    GenerationProgress, GenerationStage, ResourceGenerator, TargetOutput, GENERATED_FILE_NAME,
};
pub use content::{FsResourceSource, ResourceSource};
pub use emitter::{emit_accessors, EmissionMode, EmitStats};
pub use error::{Error, Result};
pub use interfaces::emit_interfaces;
pub use tree::{Contribution, InsertOutcome, ResourceFileEntry, ResourceItemRef, ResourceNode, ResourceTree};
pub use writer::KotlinFileWriter;

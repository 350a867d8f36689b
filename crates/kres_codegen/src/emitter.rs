//! Accessor object generation.
//!
//! Walks a resolved [`ResourceNode`] and writes one nested Kotlin object per
//! directory and one `ResourceFile` value per file. The shared tier gets an
//! `expect` declaration without any values; every concrete platform gets the
//! matching `actual` realization.
//!
//! Inside a directory object, `items` lists child directories first and files
//! second, each group sorted by identifier.

use crate::error::{Error, Result};
use crate::interfaces::{DIRECTORY_INTERFACE, FILE_INTERFACE, ITEM_INTERFACE};
use crate::mime::resolve_mime_type;
use crate::tree::{ResourceFileEntry, ResourceNode};
use crate::utils::{kotlin_identifier, kotlin_string_literal};
use crate::writer::KotlinFileWriter;
use base64::Engine;

const BASE64_IMPORT: &str = "kotlin.io.encoding.Base64";
const EXPERIMENTAL_ENCODING_IMPORT: &str = "kotlin.io.encoding.ExperimentalEncodingApi";

/// Members every directory object already declares.
const RESERVED_MEMBERS: [&str; 2] = ["name", "items"];

/// How the accessor tree is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmissionMode {
    /// Shared tier: `expect` declarations, no values.
    Declare,
    /// Concrete platform: `actual` values with a `readBytes` body.
    Materialize {
        /// Embed payloads as base64 instead of looking them up at runtime.
        embedding: bool,
    },
}

/// Counts collected while emitting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmitStats {
    pub directories: usize,
    pub files: usize,
    pub embedded_bytes: u64,
}

/// Write the accessor object for `node` (usually the root) into `writer`.
pub fn emit_accessors(
    writer: &mut KotlinFileWriter,
    node: &ResourceNode,
    mode: EmissionMode,
) -> Result<EmitStats> {
    let mut stats = EmitStats::default();
    emit_node(writer, node, &kotlin_identifier(node.display_name()), mode, &mut stats)?;
    Ok(stats)
}

fn emit_node(
    writer: &mut KotlinFileWriter,
    node: &ResourceNode,
    identifier: &str,
    mode: EmissionMode,
    stats: &mut EmitStats,
) -> Result<()> {
    stats.directories += 1;

    let platform_modifier = match mode {
        EmissionMode::Declare => "expect ",
        EmissionMode::Materialize { .. } if node.is_shared() => "actual ",
        EmissionMode::Materialize { .. } => "",
    };
    writer.open(format!(
        "public {platform_modifier}object {identifier} : {DIRECTORY_INTERFACE}"
    ));

    match mode {
        EmissionMode::Declare => {
            writer.member();
            writer.line("override val name: String");
            writer.member();
            writer.line(format!("override val items: List<{ITEM_INTERFACE}>"));
        }
        EmissionMode::Materialize { .. } => {
            let actual = if node.is_shared() { "actual " } else { "" };
            writer.member();
            writer.line(format!(
                "{actual}override val name: String = {}",
                kotlin_string_literal(node.display_name())
            ));
            writer.member();
            writer.line(format!(
                "{actual}override val items: List<{ITEM_INTERFACE}> by lazy {{ {} }}",
                items_initializer(node, mode)
            ));
        }
    }

    for key in node.children().keys().chain(node.files().keys()) {
        if RESERVED_MEMBERS.contains(&key.as_str()) {
            tracing::warn!(
                "'{}' in '{}' clashes with a ResourceDirectory member, emitting it as '{}_'",
                key,
                node.display_name(),
                key
            );
        }
    }

    for (key, child) in node.children() {
        if mode == EmissionMode::Declare && !child.is_shared() {
            continue;
        }
        emit_node(writer, child, &accessor_identifier(key), mode, stats)?;
    }

    for (key, entry) in node.files() {
        if mode == EmissionMode::Declare && !entry.shared {
            continue;
        }
        emit_file(writer, entry, &accessor_identifier(key), mode, stats)?;
    }

    writer.close();
    Ok(())
}

/// `listOf(...)` over child objects, then file accessors.
fn items_initializer(node: &ResourceNode, mode: EmissionMode) -> String {
    let refs: Vec<String> = node
        .children()
        .iter()
        .filter(|(_, child)| mode != EmissionMode::Declare || child.is_shared())
        .map(|(key, _)| accessor_identifier(key))
        .chain(
            node.files()
                .iter()
                .filter(|(_, entry)| mode != EmissionMode::Declare || entry.shared)
                .map(|(key, _)| accessor_identifier(key)),
        )
        .collect();

    if refs.is_empty() {
        format!("listOf<{ITEM_INTERFACE}>()")
    } else {
        format!("listOf({})", refs.join(", "))
    }
}

/// Identifier of a child object or file accessor inside a directory object.
///
/// Keys equal to a `ResourceDirectory` member get a trailing `_`, otherwise the
/// accessor would conflict with `name` or `items`.
fn accessor_identifier(key: &str) -> String {
    if RESERVED_MEMBERS.contains(&key) {
        format!("{key}_")
    } else {
        kotlin_identifier(key).into_owned()
    }
}

fn emit_file(
    writer: &mut KotlinFileWriter,
    entry: &ResourceFileEntry,
    identifier: &str,
    mode: EmissionMode,
    stats: &mut EmitStats,
) -> Result<()> {
    stats.files += 1;

    let embedding = match mode {
        EmissionMode::Declare => {
            writer.member();
            writer.line(format!("public expect val {identifier}: {FILE_INTERFACE}"));
            return Ok(());
        }
        EmissionMode::Materialize { embedding } => embedding,
    };

    let bytes = std::fs::read(entry.source.as_std_path())
        .map_err(|source| Error::io(entry.source.clone(), source))?;
    let mime_type = resolve_mime_type(&entry.file_name, &bytes);

    tracing::debug!(
        "Emitting '{}' ({} bytes, {}, {})",
        entry.relative_path,
        bytes.len(),
        mime_type,
        if embedding { "embedded" } else { "lookup" }
    );

    let actual = if entry.shared { "actual " } else { "" };
    writer.member();
    writer.open_inline(format!(
        "public {actual}val {identifier}: {FILE_INTERFACE} = object : {FILE_INTERFACE}"
    ));
    writer.member();
    writer.line(format!(
        "override val name: String = {}",
        kotlin_string_literal(&entry.file_name)
    ));
    writer.member();
    writer.line(format!("override val size: Long = {}", bytes.len()));
    writer.member();
    writer.line(format!(
        "override val type: String = {}",
        kotlin_string_literal(mime_type)
    ));
    writer.member();
    if embedding {
        let payload = base64::engine::general_purpose::STANDARD.encode(&bytes);
        writer.import(BASE64_IMPORT);
        writer.import(EXPERIMENTAL_ENCODING_IMPORT);
        writer.line("@OptIn(ExperimentalEncodingApi::class)");
        writer.line(format!(
            "override fun readBytes(): ByteArray = Base64.Default.decode({})",
            kotlin_string_literal(&payload)
        ));
        stats.embedded_bytes += bytes.len() as u64;
    } else {
        writer.line(format!(
            "override fun readBytes(): ByteArray = Thread.currentThread().contextClassLoader.getResourceAsStream({}).readAllBytes()",
            kotlin_string_literal(&entry.relative_path)
        ));
    }
    writer.close();

    Ok(())
}

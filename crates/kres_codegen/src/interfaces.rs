//! Capability contracts shared by every generated accessor.
//!
//! Emitted once, into the shared tier only. Every generated directory object
//! implements `ResourceDirectory` and every file accessor implements
//! `ResourceFile`; both extend `ResourceItem`.

use crate::writer::KotlinFileWriter;

pub const ITEM_INTERFACE: &str = "ResourceItem";
pub const FILE_INTERFACE: &str = "ResourceFile";
pub const DIRECTORY_INTERFACE: &str = "ResourceDirectory";

/// Write `ResourceItem`, `ResourceFile`, `ResourceDirectory` and the
/// `resolvePath` helpers.
pub fn emit_interfaces(writer: &mut KotlinFileWriter) {
    writer.open(format!("public interface {ITEM_INTERFACE}"));
    writer.member();
    writer.line("public val name: String");
    writer.close();

    writer.open(format!(
        "public interface {FILE_INTERFACE} : {ITEM_INTERFACE}"
    ));
    writer.member();
    writer.line("public val size: Long");
    writer.member();
    writer.line("public val type: String");
    writer.member();
    writer.line("public fun readBytes(): ByteArray");
    writer.close();

    writer.open(format!(
        "public interface {DIRECTORY_INTERFACE} : {ITEM_INTERFACE}"
    ));
    writer.member();
    writer.line(format!("public val items: List<{ITEM_INTERFACE}>"));
    writer.close();

    emit_resolve_path(writer);
}

fn emit_resolve_path(writer: &mut KotlinFileWriter) {
    writer.open(format!(
        "public fun {DIRECTORY_INTERFACE}.resolvePath(path: List<String>): {ITEM_INTERFACE}?"
    ));
    writer.line("if (path.isEmpty()) return this");
    writer.line("val nextItem = items.find { it.name == path.first() }");
    writer.open_inline("return when (nextItem)");
    writer.line(format!(
        "is {DIRECTORY_INTERFACE} -> nextItem.resolvePath(path.drop(1))"
    ));
    writer.line(format!(
        "is {FILE_INTERFACE} -> if (path.size == 1) nextItem else null"
    ));
    writer.line("else -> null");
    writer.close();
    writer.close();

    writer.member();
    writer.line(format!(
        "public fun {DIRECTORY_INTERFACE}.resolvePath(path: String): {ITEM_INTERFACE}? = resolvePath(path.split('/'))"
    ));
}

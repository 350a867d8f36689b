//! MIME type resolution for resource files.
//!
//! Resolution never fails. The chain is:
//!
//! 1. Sniff signatures long enough to be trusted (PNG, JPEG and the other
//!    common image formats via [`image::guess_format`], plus a few container
//!    formats).
//! 2. Look the file extension up in a static table.
//! 3. Accept short image signatures such as `BM` or `P6`, which plain text
//!    starts with often enough that the extension must take precedence.
//! 4. Fall back to [`FALLBACK_MIME_TYPE`].

use image::ImageFormat;

/// Type reported when nothing else matches.
pub const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

const MAGIC_TABLE: &[(&[u8], &str)] = &[
    (b"%PDF-", "application/pdf"),
    (b"PK\x03\x04", "application/zip"),
    (b"\x1f\x8b", "application/gzip"),
    (b"\0asm", "application/wasm"),
];

const EXTENSION_TABLE: &[(&str, &str)] = &[
    ("txt", "text/plain"),
    ("properties", "text/plain"),
    ("md", "text/markdown"),
    ("csv", "text/csv"),
    ("html", "text/html"),
    ("htm", "text/html"),
    ("css", "text/css"),
    ("js", "text/javascript"),
    ("json", "application/json"),
    ("xml", "application/xml"),
    ("yaml", "application/yaml"),
    ("yml", "application/yaml"),
    ("toml", "application/toml"),
    ("pdf", "application/pdf"),
    ("zip", "application/zip"),
    ("gz", "application/gzip"),
    ("wasm", "application/wasm"),
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
    ("webp", "image/webp"),
    ("bmp", "image/bmp"),
    ("ico", "image/x-icon"),
    ("tif", "image/tiff"),
    ("tiff", "image/tiff"),
    ("svg", "image/svg+xml"),
    ("ttf", "font/ttf"),
    ("otf", "font/otf"),
    ("woff", "font/woff"),
    ("woff2", "font/woff2"),
    ("mp3", "audio/mpeg"),
    ("wav", "audio/wav"),
];

/// Resolve the MIME type of a resource from its content, then its name.
pub fn resolve_mime_type(file_name: &str, content: &[u8]) -> &'static str {
    sniff_content(content)
        .or_else(|| mime_from_extension(file_name))
        .or_else(|| sniff_short_signature(content))
        .unwrap_or(FALLBACK_MIME_TYPE)
}

/// Detect a type from magic bytes that text content cannot plausibly start with.
pub fn sniff_content(content: &[u8]) -> Option<&'static str> {
    if let Ok(format) = image::guess_format(content) {
        if has_strong_signature(format) {
            return Some(format.to_mime_type());
        }
    }

    MAGIC_TABLE
        .iter()
        .find(|(magic, _)| content.starts_with(magic))
        .map(|(_, mime)| *mime)
}

fn sniff_short_signature(content: &[u8]) -> Option<&'static str> {
    image::guess_format(content)
        .ok()
        .filter(|format| !has_strong_signature(*format))
        .map(|format| format.to_mime_type())
}

fn has_strong_signature(format: ImageFormat) -> bool {
    matches!(
        format,
        ImageFormat::Png
            | ImageFormat::Jpeg
            | ImageFormat::Gif
            | ImageFormat::WebP
            | ImageFormat::Tiff
            | ImageFormat::Ico
            | ImageFormat::Avif
            | ImageFormat::Qoi
            | ImageFormat::OpenExr
            | ImageFormat::Farbfeld
    )
}

/// Look up a type by the file's last extension, case-insensitively.
pub fn mime_from_extension(file_name: &str) -> Option<&'static str> {
    let (_, extension) = file_name.rsplit_once('.')?;
    let extension = extension.to_ascii_lowercase();

    EXTENSION_TABLE
        .iter()
        .find(|(ext, _)| *ext == extension)
        .map(|(_, mime)| *mime)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_HEADER: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";

    #[test]
    fn test_sniffed_content_wins_over_extension() {
        assert_eq!(resolve_mime_type("picture.bin", PNG_HEADER), "image/png");
        assert_eq!(resolve_mime_type("report.dat", b"%PDF-1.7"), "application/pdf");
    }

    #[test]
    fn test_extension_used_when_content_is_plain() {
        assert_eq!(resolve_mime_type("logo.png", b"linux-logo"), "image/png");
        assert_eq!(resolve_mime_type("linux_only.txt", b"linux-only"), "text/plain");
        assert_eq!(resolve_mime_type("data.JSON", b"{}"), "application/json");
    }

    #[test]
    fn test_text_starting_like_an_image_keeps_its_extension() {
        assert_eq!(resolve_mime_type("notes.txt", b"BMW parts list"), "text/plain");
        assert_eq!(resolve_mime_type("todo.txt", b"P1 fix the build"), "text/plain");
        assert_eq!(resolve_mime_type("plan.md", b"P6 rollout"), "text/markdown");
        assert_eq!(sniff_content(b"BMW parts list"), None);
    }

    #[test]
    fn test_short_signature_used_without_known_extension() {
        assert_eq!(resolve_mime_type("picture", b"BM\x36\0\0\0\0\0"), "image/bmp");
    }

    #[test]
    fn test_unknown_falls_back() {
        assert_eq!(
            resolve_mime_type("archive.xyz123", b"plain bytes"),
            FALLBACK_MIME_TYPE
        );
        assert_eq!(resolve_mime_type("README", b""), FALLBACK_MIME_TYPE);
    }

    #[test]
    fn test_mime_from_extension() {
        assert_eq!(mime_from_extension("logo.dark.svg"), Some("image/svg+xml"));
        assert_eq!(mime_from_extension("no_extension"), None);
    }
}

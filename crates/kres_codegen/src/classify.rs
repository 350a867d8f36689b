//! Source set and platform classification.
//!
//! Platforms without a classpath-style resource loader cannot look resources up
//! at runtime and get their payload embedded into the generated source instead.

/// Name fragments of platforms that need embedded payloads.
pub const EMBEDDING_KEYWORDS: [&str; 4] = ["linux", "native", "ios", "macos"];

/// True if the identifier names a test source set or test target.
pub fn is_test_tier(identifier: &str) -> bool {
    identifier.to_ascii_lowercase().contains("test")
}

/// True if the platform needs resource bytes embedded at generation time.
pub fn requires_embedding(identifier: &str) -> bool {
    requires_embedding_with::<&str>(identifier, &[])
}

/// [`requires_embedding`] with project-specific keywords on top of [`EMBEDDING_KEYWORDS`].
pub fn requires_embedding_with<S: AsRef<str>>(identifier: &str, extra_keywords: &[S]) -> bool {
    let identifier = identifier.to_ascii_lowercase();
    EMBEDDING_KEYWORDS
        .iter()
        .copied()
        .chain(extra_keywords.iter().map(|k| k.as_ref()))
        .any(|keyword| identifier.contains(&keyword.to_ascii_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_test_tier() {
        assert!(is_test_tier("commonTest"));
        assert!(is_test_tier("jvmTest"));
        assert!(is_test_tier("TESTING"));
        assert!(!is_test_tier("commonMain"));
        assert!(!is_test_tier("linuxX64"));
    }

    #[test]
    fn test_requires_embedding() {
        assert!(requires_embedding("linuxX64"));
        assert!(requires_embedding("linuxX64Main"));
        assert!(requires_embedding("nativeMain"));
        assert!(requires_embedding("iosArm64"));
        assert!(requires_embedding("macosX64"));
        assert!(requires_embedding("MacOsArm64"));
        assert!(!requires_embedding("jvm"));
        assert!(!requires_embedding("js"));
        assert!(!requires_embedding("metadata"));
    }

    #[test]
    fn test_requires_embedding_with_extra_keywords() {
        assert!(requires_embedding_with("js", &["js"]));
        assert!(requires_embedding_with("wasmJs", &["WASM"]));
        assert!(requires_embedding_with("linuxX64", &["js"]));
        assert!(!requires_embedding_with("jvm", &["js"]));
    }
}

//! The override-aware resource tree.
//!
//! A [`ResourceTree`] is built fresh for every target by inserting the files of
//! each source set in hierarchy order (common tier first). Conflicts on the same
//! file identifier are settled by the configured [`OverrideStrategy`].
//!
//! # Naming
//!
//! Every directory node and file entry keeps two names: the original one from
//! disk (used for display, MIME lookup and runtime paths) and a sanitized key
//! used as generated identifier. Directory keys replace `.` with `_`; file keys
//! additionally drop the last extension, so `logo.png` and `logo.jpg` compete
//! for the same slot.
//!
//! # Directory/file collisions
//!
//! When a directory and a file end up with the same key under one node, the
//! directory wins regardless of which one was inserted first. The file is
//! dropped with a warning.

use crate::error::{Error, Result};
use crate::utils::{file_identifier, sanitize_name};
use camino::Utf8PathBuf;
use kres_project::OverrideStrategy;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

/// Name used for a node without a name, i.e. the root.
pub const ROOT_OBJECT_NAME: &str = "Res";

/// A single resource file in the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceFileEntry {
    /// Original file name, extension included.
    pub file_name: String,
    /// File on disk. Only read at emission time.
    pub source: Utf8PathBuf,
    /// Path relative to the resource root, `/`-separated.
    pub relative_path: String,
    /// Source set that provided this file.
    pub source_set: String,
    /// Whether the slot is declared by the shared tier.
    pub shared: bool,
}

/// Which source set a file comes from, and whether it is the shared tier.
#[derive(Debug, Clone, Copy)]
pub struct Contribution<'a> {
    pub source_set: &'a str,
    pub shared: bool,
}

/// What [`ResourceTree::insert`] did with a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The slot was empty.
    Inserted,
    /// An existing entry was replaced ([`OverrideStrategy::Override`]).
    Replaced,
    /// An existing entry was kept and the new file dropped ([`OverrideStrategy::UseCommon`]).
    Kept,
    /// A directory with the same identifier exists; the file was dropped.
    Shadowed,
}

/// A directory-like node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceNode {
    name: String,
    shared: bool,
    children: BTreeMap<String, ResourceNode>,
    files: BTreeMap<String, ResourceFileEntry>,
}

/// Borrowed view of an item found by [`ResourceNode::resolve_path`].
#[derive(Debug, Clone, Copy)]
pub enum ResourceItemRef<'a> {
    Directory(&'a ResourceNode),
    File(&'a ResourceFileEntry),
}

impl ResourceNode {
    fn new(name: &str, shared: bool) -> Self {
        Self {
            name: name.to_string(),
            shared,
            children: BTreeMap::new(),
            files: BTreeMap::new(),
        }
    }

    /// Original directory name. Empty for the root.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The name exposed by generated code; [`ROOT_OBJECT_NAME`] for an unnamed node.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            ROOT_OBJECT_NAME
        } else {
            &self.name
        }
    }

    pub fn is_shared(&self) -> bool {
        self.shared
    }

    /// Child directories keyed by identifier, in identifier order.
    pub fn children(&self) -> &BTreeMap<String, ResourceNode> {
        &self.children
    }

    /// Files keyed by identifier, in identifier order.
    pub fn files(&self) -> &BTreeMap<String, ResourceFileEntry> {
        &self.files
    }

    /// Number of files in this node and all descendants.
    pub fn file_count(&self) -> usize {
        self.files.len()
            + self
                .children
                .values()
                .map(ResourceNode::file_count)
                .sum::<usize>()
    }

    /// Find an item by its original `/`-separated path, e.g. `images/logo.png`.
    ///
    /// An empty path resolves to this node.
    pub fn resolve_path(&self, path: &str) -> Option<ResourceItemRef<'_>> {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let Some((last, dirs)) = segments.split_last() else {
            return Some(ResourceItemRef::Directory(self));
        };

        let mut node = self;
        for segment in dirs {
            node = node
                .children
                .get(&sanitize_name(segment))
                .filter(|child| child.name == *segment)?;
        }

        if let Some(child) = node
            .children
            .get(&sanitize_name(last))
            .filter(|child| child.name == *last)
        {
            return Some(ResourceItemRef::Directory(child));
        }

        node.files
            .get(&file_identifier(last))
            .filter(|entry| entry.file_name == *last)
            .map(ResourceItemRef::File)
    }

    fn insert_at(
        &mut self,
        segments: &[&str],
        entry: ResourceFileEntry,
        strategy: OverrideStrategy,
    ) -> Result<InsertOutcome> {
        let Some((dir, rest)) = segments.split_first() else {
            return self.insert_file(entry, strategy);
        };

        let child = match self.children.entry(sanitize_name(dir)) {
            Entry::Occupied(occupied) => occupied.into_mut(),
            Entry::Vacant(vacant) => {
                if let Some(shadowed) = self.files.remove(vacant.key()) {
                    tracing::warn!(
                        "Directory '{}' shadows resource '{}' from '{}'",
                        dir,
                        shadowed.relative_path,
                        shadowed.source_set
                    );
                }
                vacant.insert(ResourceNode::new(dir, false))
            }
        };
        let outcome = child.insert_at(rest, entry, strategy)?;
        self.shared |= child.shared;
        Ok(outcome)
    }

    fn insert_file(
        &mut self,
        entry: ResourceFileEntry,
        strategy: OverrideStrategy,
    ) -> Result<InsertOutcome> {
        let key = file_identifier(&entry.file_name);

        if self.children.contains_key(&key) {
            tracing::warn!(
                "Resource '{}' from '{}' is shadowed by a directory with the same name",
                entry.relative_path,
                entry.source_set
            );
            return Ok(InsertOutcome::Shadowed);
        }

        let Some(existing) = self.files.get_mut(&key) else {
            self.shared |= entry.shared;
            self.files.insert(key, entry);
            return Ok(InsertOutcome::Inserted);
        };

        match strategy {
            OverrideStrategy::Override => {
                tracing::debug!(
                    "Resource '{}' from '{}' overrides '{}'",
                    entry.relative_path,
                    entry.source_set,
                    existing.source_set
                );
                *existing = ResourceFileEntry {
                    shared: true,
                    ..entry
                };
                self.shared = true;
                Ok(InsertOutcome::Replaced)
            }
            OverrideStrategy::UseCommon => {
                tracing::debug!(
                    "Resource '{}' from '{}' ignored, keeping '{}'",
                    entry.relative_path,
                    entry.source_set,
                    existing.source_set
                );
                Ok(InsertOutcome::Kept)
            }
            OverrideStrategy::Fail => Err(Error::DuplicateResource {
                path: entry.relative_path,
                existing_source_set: existing.source_set.clone(),
                incoming_source_set: entry.source_set,
            }),
        }
    }
}

/// Builder for the merged resource tree of one generation run.
#[derive(Debug, Clone)]
pub struct ResourceTree {
    root: ResourceNode,
}

impl ResourceTree {
    /// Create an empty tree. The root is usually unnamed and shared.
    pub fn new(root_name: &str, root_shared: bool) -> Self {
        Self {
            root: ResourceNode::new(root_name, root_shared),
        }
    }

    /// Insert a file at `relative_path` (`/` or `\` separated).
    ///
    /// Intermediate directories are created as needed. When the contribution is
    /// shared, every directory on the way to the file becomes shared.
    pub fn insert(
        &mut self,
        relative_path: &str,
        source: Utf8PathBuf,
        strategy: OverrideStrategy,
        contribution: Contribution<'_>,
    ) -> Result<InsertOutcome> {
        let segments: Vec<&str> = relative_path
            .split(['/', '\\'])
            .filter(|s| !s.is_empty())
            .collect();
        let Some((file_name, dirs)) = segments.split_last() else {
            return Err(Error::InvalidResourcePath(relative_path.to_string()));
        };

        let entry = ResourceFileEntry {
            file_name: file_name.to_string(),
            source,
            relative_path: segments.join("/"),
            source_set: contribution.source_set.to_string(),
            shared: contribution.shared,
        };

        self.root.insert_at(dirs, entry, strategy)
    }

    /// The tree as built so far.
    pub fn root(&self) -> &ResourceNode {
        &self.root
    }

    /// Finish building and hand out the root for emission.
    pub fn resolve(self) -> ResourceNode {
        self.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COMMON: Contribution<'static> = Contribution {
        source_set: "commonMain",
        shared: true,
    };
    const LINUX: Contribution<'static> = Contribution {
        source_set: "linuxX64Main",
        shared: false,
    };

    fn file_at<'a>(root: &'a ResourceNode, path: &str) -> &'a ResourceFileEntry {
        match root.resolve_path(path) {
            Some(ResourceItemRef::File(entry)) => entry,
            other => panic!("expected file at {}, got {:?}", path, other),
        }
    }

    fn dir_at<'a>(root: &'a ResourceNode, path: &str) -> &'a ResourceNode {
        match root.resolve_path(path) {
            Some(ResourceItemRef::Directory(node)) => node,
            other => panic!("expected directory at {}, got {:?}", path, other),
        }
    }

    fn tree_with_duplicate(strategy: OverrideStrategy) -> Result<ResourceTree> {
        let mut tree = ResourceTree::new("", true);
        tree.insert("images/logo.png", "a/images/logo.png".into(), strategy, COMMON)?;
        tree.insert("images/logo.png", "b/images/logo.png".into(), strategy, LINUX)?;
        Ok(tree)
    }

    #[test]
    fn test_override_replaces_and_marks_shared() {
        let tree = tree_with_duplicate(OverrideStrategy::Override).unwrap();
        let entry = file_at(tree.root(), "images/logo.png");

        assert_eq!(entry.source, Utf8PathBuf::from("b/images/logo.png"));
        assert_eq!(entry.source_set, "linuxX64Main");
        assert!(entry.shared);
    }

    #[test]
    fn test_override_between_platform_tiers_marks_shared() {
        let mut tree = ResourceTree::new("", true);
        let native = Contribution {
            source_set: "nativeMain",
            shared: false,
        };
        tree.insert("data.bin", "n/data.bin".into(), OverrideStrategy::Override, native)
            .unwrap();
        let outcome = tree
            .insert("data.bin", "l/data.bin".into(), OverrideStrategy::Override, LINUX)
            .unwrap();

        assert_eq!(outcome, InsertOutcome::Replaced);
        assert!(file_at(tree.root(), "data.bin").shared);
    }

    #[test]
    fn test_use_common_keeps_first() {
        let tree = tree_with_duplicate(OverrideStrategy::UseCommon).unwrap();
        let entry = file_at(tree.root(), "images/logo.png");

        assert_eq!(entry.source, Utf8PathBuf::from("a/images/logo.png"));
        assert_eq!(entry.source_set, "commonMain");
    }

    #[test]
    fn test_fail_reports_duplicate() {
        let err = tree_with_duplicate(OverrideStrategy::Fail).unwrap_err();

        match err {
            Error::DuplicateResource {
                path,
                existing_source_set,
                incoming_source_set,
            } => {
                assert_eq!(path, "images/logo.png");
                assert_eq!(existing_source_set, "commonMain");
                assert_eq!(incoming_source_set, "linuxX64Main");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_same_stem_different_extension_is_duplicate() {
        let mut tree = ResourceTree::new("", true);
        tree.insert("logo.png", "logo.png".into(), OverrideStrategy::Fail, COMMON)
            .unwrap();
        let result = tree.insert("logo.jpg", "logo.jpg".into(), OverrideStrategy::Fail, LINUX);

        assert!(matches!(
            result,
            Err(Error::DuplicateResource { ref path, .. }) if path == "logo.jpg"
        ));
    }

    #[test]
    fn test_shared_flag_propagates_to_ancestors() {
        let mut tree = ResourceTree::new("", false);
        tree.insert("a/b/c.txt", "c.txt".into(), OverrideStrategy::Override, COMMON)
            .unwrap();
        let root = tree.resolve();

        assert!(root.is_shared());
        assert!(dir_at(&root, "a").is_shared());
        assert!(dir_at(&root, "a/b").is_shared());
        assert!(file_at(&root, "a/b/c.txt").shared);
    }

    #[test]
    fn test_platform_only_branch_stays_unshared() {
        let mut tree = ResourceTree::new("", true);
        tree.insert("images/logo.png", "logo.png".into(), OverrideStrategy::Override, COMMON)
            .unwrap();
        tree.insert("fonts/mono.ttf", "mono.ttf".into(), OverrideStrategy::Override, LINUX)
            .unwrap();
        tree.insert(
            "images/linux_only.txt",
            "linux_only.txt".into(),
            OverrideStrategy::Override,
            LINUX,
        )
        .unwrap();
        let root = tree.resolve();

        assert!(dir_at(&root, "images").is_shared());
        assert!(!dir_at(&root, "fonts").is_shared());
        assert!(!file_at(&root, "images/linux_only.txt").shared);
    }

    #[test]
    fn test_shared_flag_is_monotonic() {
        let mut tree = ResourceTree::new("", true);
        tree.insert("a/x.txt", "x.txt".into(), OverrideStrategy::Override, COMMON)
            .unwrap();
        tree.insert("a/y.txt", "y.txt".into(), OverrideStrategy::Override, LINUX)
            .unwrap();

        assert!(dir_at(tree.root(), "a").is_shared());
    }

    #[test]
    fn test_names_are_sanitized_and_originals_kept() {
        let mut tree = ResourceTree::new("", true);
        tree.insert(
            "images.icons/logo.dark.png",
            "logo.dark.png".into(),
            OverrideStrategy::Override,
            COMMON,
        )
        .unwrap();
        let root = tree.resolve();

        let child = &root.children()["images_icons"];
        assert_eq!(child.name(), "images.icons");
        let entry = &child.files()["logo_dark"];
        assert_eq!(entry.file_name, "logo.dark.png");
        assert_eq!(entry.relative_path, "images.icons/logo.dark.png");
    }

    #[test]
    fn test_backslash_paths_are_normalized() {
        let mut tree = ResourceTree::new("", true);
        tree.insert("images\\logo.png", "logo.png".into(), OverrideStrategy::Override, COMMON)
            .unwrap();

        assert_eq!(
            file_at(tree.root(), "images/logo.png").relative_path,
            "images/logo.png"
        );
    }

    #[test]
    fn test_directory_wins_over_later_file() {
        let mut tree = ResourceTree::new("", true);
        tree.insert("icons/a.png", "a.png".into(), OverrideStrategy::Override, COMMON)
            .unwrap();
        let outcome = tree
            .insert("icons.png", "icons.png".into(), OverrideStrategy::Override, LINUX)
            .unwrap();

        assert_eq!(outcome, InsertOutcome::Shadowed);
        assert!(tree.root().files().is_empty());
        assert!(tree.root().children().contains_key("icons"));
    }

    #[test]
    fn test_directory_wins_over_earlier_file() {
        let mut tree = ResourceTree::new("", true);
        tree.insert("icons.png", "icons.png".into(), OverrideStrategy::Override, COMMON)
            .unwrap();
        tree.insert("icons/a.png", "a.png".into(), OverrideStrategy::Override, LINUX)
            .unwrap();

        assert!(tree.root().files().is_empty());
        assert!(tree.root().children()["icons"].files().contains_key("a"));
    }

    #[test]
    fn test_empty_path_is_rejected() {
        let mut tree = ResourceTree::new("", true);
        let result = tree.insert("/", "x".into(), OverrideStrategy::Override, COMMON);
        assert!(matches!(result, Err(Error::InvalidResourcePath(_))));
    }

    #[test]
    fn test_resolve_path_and_counts() {
        let mut tree = ResourceTree::new("", true);
        tree.insert("images/logo.png", "logo.png".into(), OverrideStrategy::Override, COMMON)
            .unwrap();
        tree.insert("readme.txt", "readme.txt".into(), OverrideStrategy::Override, COMMON)
            .unwrap();
        let root = tree.resolve();

        assert_eq!(root.file_count(), 2);
        assert_eq!(root.display_name(), "Res");
        assert!(matches!(
            root.resolve_path(""),
            Some(ResourceItemRef::Directory(_))
        ));
        assert!(root.resolve_path("images/logo.jpg").is_none());
        assert!(root.resolve_path("missing/logo.png").is_none());
        assert_eq!(dir_at(&root, "images").display_name(), "images");
    }
}

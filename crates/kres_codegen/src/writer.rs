//! Minimal Kotlin source writer.
//!
//! Produces two-space indented Kotlin with one blank line between members of
//! the same block, a `package` header and a sorted import list. Output is a
//! pure function of the calls made, so identical inputs give identical bytes.

use std::collections::BTreeSet;

const INDENT: &str = "  ";

/// Writes a single Kotlin source file.
#[derive(Debug)]
pub struct KotlinFileWriter {
    package_name: String,
    imports: BTreeSet<String>,
    body: String,
    /// One entry per open block; `true` until the block's first member is written.
    blocks: Vec<bool>,
}

impl KotlinFileWriter {
    pub fn new(package_name: impl Into<String>) -> Self {
        Self {
            package_name: package_name.into(),
            imports: BTreeSet::new(),
            body: String::new(),
            blocks: vec![true],
        }
    }

    /// Register a fully qualified import.
    pub fn import(&mut self, qualified_name: &str) {
        self.imports.insert(qualified_name.to_string());
    }

    /// Start a new member of the current block, separating it from the previous one.
    pub fn member(&mut self) {
        if let Some(first) = self.blocks.last_mut() {
            if !*first {
                self.body.push('\n');
            }
            *first = false;
        }
    }

    /// Write one indented line.
    pub fn line(&mut self, text: impl AsRef<str>) {
        for _ in 1..self.blocks.len() {
            self.body.push_str(INDENT);
        }
        self.body.push_str(text.as_ref());
        self.body.push('\n');
    }

    /// Write `header {` as a new member and indent.
    pub fn open(&mut self, header: impl AsRef<str>) {
        self.member();
        self.line(format!("{} {{", header.as_ref()));
        self.blocks.push(true);
    }

    /// Write `header {` as the continuation of the current member and indent.
    pub fn open_inline(&mut self, header: impl AsRef<str>) {
        self.line(format!("{} {{", header.as_ref()));
        self.blocks.push(true);
    }

    /// Dedent and write `}`.
    pub fn close(&mut self) {
        if self.blocks.len() > 1 {
            self.blocks.pop();
        }
        self.line("}");
    }

    /// Render the file: package, imports, then the body.
    pub fn finish(self) -> String {
        let mut out = format!("package {}\n\n", self.package_name);
        if !self.imports.is_empty() {
            for import in &self.imports {
                out.push_str("import ");
                out.push_str(import);
                out.push('\n');
            }
            out.push('\n');
        }
        out.push_str(&self.body);
        out
    }
}

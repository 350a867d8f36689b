use colored::Colorize;
use kres_codegen::{ResourceFileEntry, ResourceGenerator, ResourceItemRef, ResourceNode};
use miette::{miette, Result};

use crate::errors::CliError;
use crate::println_pad;
use crate::utils::config::{load_project, project_root, resolve_config_path};

#[derive(Debug)]
pub struct TreeArgs {
    pub config_path: Option<String>,
    pub target: String,
    pub path: Option<String>,
}

/// Print the merged resource tree a target would be generated from.
pub fn print_resource_tree(args: TreeArgs) -> Result<()> {
    let config_path = resolve_config_path(args.config_path)?;
    let project = load_project(&config_path)?;
    let project_root = project_root(&config_path)?;

    let Some(target) = project.target(&args.target) else {
        let declared: Vec<String> = project.targets.iter().map(|t| t.name.clone()).collect();
        return Err(CliError::unknown_target(args.target, &declared).into());
    };
    let source_set = target.source_set_name();

    // Nothing is written, so the output root is never touched.
    let generator = ResourceGenerator::new(project, project_root.clone(), project_root)
        .map_err(CliError::from)?;
    let root = generator
        .collect_resources(&source_set)
        .map_err(CliError::from)?;

    println_pad!(
        "{} {} ({}, {} files)",
        "🌳 Resources of".bright_blue().bold(),
        args.target.bright_cyan().bold(),
        source_set,
        root.file_count()
    );

    let lines = match args.path.as_deref() {
        None => render_node(&root, 0),
        Some(path) => match root.resolve_path(path) {
            Some(ResourceItemRef::Directory(node)) => render_node(node, 0),
            Some(ResourceItemRef::File(entry)) => vec![render_file(entry, 0)],
            None => return Err(miette!("No resource at '{}'", path)),
        },
    };
    for line in lines {
        println_pad!("{}", line);
    }

    Ok(())
}

fn render_node(node: &ResourceNode, depth: usize) -> Vec<String> {
    let mut lines = vec![format!(
        "{}{}/{}",
        "  ".repeat(depth),
        node.display_name(),
        if node.is_shared() { " [shared]" } else { "" }
    )];

    for child in node.children().values() {
        lines.extend(render_node(child, depth + 1));
    }
    for entry in node.files().values() {
        lines.push(render_file(entry, depth + 1));
    }

    lines
}

fn render_file(entry: &ResourceFileEntry, depth: usize) -> String {
    format!(
        "{}{} ({}{})",
        "  ".repeat(depth),
        entry.file_name,
        entry.source_set,
        if entry.shared { ", shared" } else { "" }
    )
}

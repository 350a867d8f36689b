use colored::Colorize;
use kres_codegen::{GenerationStage, ResourceGenerator, TargetOutput};
use miette::Result;

use crate::errors::CliError;
use crate::println_pad;
use crate::utils::{
    config::{load_project, project_root, resolve_config_path, resolve_output_dir},
    print_ansi_boxed_lines,
};

#[derive(Debug)]
pub struct GenerateArgs {
    pub config_path: Option<String>,
    pub output_dir: String,
    pub targets: Vec<String>,
}

pub fn generate_resources(args: GenerateArgs) -> Result<()> {
    let config_path = resolve_config_path(args.config_path)?;
    let project = load_project(&config_path)?;
    let project_root = project_root(&config_path)?;
    let output_root = resolve_output_dir(&args.output_dir, &project_root);

    let declared: Vec<String> = project.targets.iter().map(|t| t.name.clone()).collect();
    for target in &args.targets {
        if !declared.contains(target) {
            return Err(CliError::unknown_target(target.clone(), &declared).into());
        }
    }

    println_pad!(
        "{} {}",
        "📦 Generating resources for package:".bright_blue().bold(),
        project.package_name.bright_cyan().bold()
    );

    let generator = ResourceGenerator::new(project, project_root, output_root)
        .map_err(CliError::from)?
        .with_progress(|progress| {
            if progress.stage == GenerationStage::Complete {
                tracing::debug!("Target {} complete", progress.target);
            }
        });

    let outputs = match args.targets.is_empty() {
        true => generator.generate_all().map_err(CliError::from)?,
        false => args
            .targets
            .iter()
            .map(|target| generator.generate_target(target))
            .collect::<Result<Vec<_>, _>>()
            .map_err(CliError::from)?,
    };

    print_summary(&outputs);

    println_pad!(
        "{}",
        "✅ Resource accessors generated successfully!"
            .bright_green()
            .bold()
    );

    Ok(())
}

fn print_summary(outputs: &[TargetOutput]) {
    let lines: Vec<String> = outputs.iter().map(summary_line).collect();
    if !lines.is_empty() {
        print_ansi_boxed_lines(&lines);
    }
}

fn summary_line(output: &TargetOutput) -> String {
    let mode = if output.declarations_only {
        "expect".bright_magenta()
    } else if output.embedded {
        "embedded".bright_yellow()
    } else {
        "lookup".bright_blue()
    };

    format!(
        "{} [{}] {} resources -> {}",
        output.target.bright_cyan().bold(),
        mode,
        output.resources,
        output.file.as_str().bright_white()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::strip_ansi;

    #[test]
    fn summary_line_shows_mode() {
        let output = TargetOutput {
            target: "linuxX64".to_string(),
            source_set: "linuxX64Main".to_string(),
            file: "build/generated/kres/linuxX64/dev/limebeck/res/Res.kt".into(),
            resources: 3,
            embedded: true,
            declarations_only: false,
        };

        assert_eq!(
            strip_ansi(&summary_line(&output)),
            "linuxX64 [embedded] 3 resources -> build/generated/kres/linuxX64/dev/limebeck/res/Res.kt"
        );
    }
}

use clap::builder::{styling::AnsiColor, Styles};
use clap::ColorChoice;
use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};
use commands::{
    generate_resources, init_project, print_resource_tree, GenerateArgs, InitProjectArgs, TreeArgs,
};
use miette::{IntoDiagnostic, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod errors;
mod utils;

const DEFAULT_LOG_FILTER: &str = "kres=info,kres_codegen=info";
const VERBOSE_LOG_FILTER: &str = "kres=debug,kres_codegen=debug";

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Log every processing step (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a kres.config.json and the common resources directory
    Init {
        /// Package of the generated sources
        #[arg(short, long)]
        package_name: Option<String>,

        /// The project directory (defaults to the current directory)
        #[arg(short, long)]
        output_dir: Option<String>,
    },
    /// Generate resource accessors
    Generate {
        /// The path to the project config file
        #[arg(short, long)]
        config_path: Option<String>,

        /// The directory to write generated sources to, one subdirectory per target
        #[arg(short, long, default_value = "build/generated/kres")]
        output_dir: String,

        /// Only generate these targets (defaults to every non-test target)
        #[arg(short, long)]
        target: Vec<String>,
    },
    /// Show the merged resource tree of a target
    Tree {
        /// The target to show
        target: String,

        /// The path to the project config file
        #[arg(short, long)]
        config_path: Option<String>,

        /// Only show the item at this resource path (e.g. images/logo.png)
        #[arg(short, long)]
        path: Option<String>,
    },
}

fn parse_args() -> Result<Args> {
    // Configure colored/styled help output
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default())
        .placeholder(AnsiColor::Blue.on_default());

    let matches = Args::command()
        .styles(styles)
        .color(ColorChoice::Auto)
        .get_matches();

    Args::from_arg_matches(&matches).into_diagnostic()
}

/// Logs go to stderr so stdout stays readable. `RUST_LOG` wins over `--verbose`.
fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        VERBOSE_LOG_FILTER
    } else {
        DEFAULT_LOG_FILTER
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let args = parse_args()?;
    init_logging(args.verbose);

    match args.command {
        Commands::Init {
            package_name,
            output_dir,
        } => init_project(InitProjectArgs {
            package_name,
            output_dir,
        }),
        Commands::Generate {
            config_path,
            output_dir,
            target,
        } => generate_resources(GenerateArgs {
            config_path,
            output_dir,
            targets: target,
        }),
        Commands::Tree {
            target,
            config_path,
            path,
        } => print_resource_tree(TreeArgs {
            config_path,
            target,
            path,
        }),
    }
}

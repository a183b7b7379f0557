//! textforge CLI entrypoint
//! Parses command-line arguments and dispatches to the generation engine.
#![deny(unsafe_code)]

use std::path::{Path, PathBuf};

// External imports (alphabetized)
use anyhow::Context;
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

use textforge::document::GenerationSet;
use textforge::engine::{execute_set, funcdocs, TemplateRegistry};
use textforge::infrastructure::loader::load_template_dir;
use textforge::infrastructure::output::{DirectorySink, StdoutSink};

#[derive(Parser)]
#[command(name = "textforge")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Generate output documents from templates and JSON input data
    Generate {
        /// Path to the input JSON file with data
        #[arg(long, short = 'd')]
        data: PathBuf,
        /// Path to the folder with templates (read recursively)
        #[arg(long, short = 't')]
        templates: PathBuf,
        /// Path to the output folder; omit to write everything to stdout
        #[arg(long, short = 'o')]
        out: Option<PathBuf>,
    },
    /// Print the documentation for the template functions
    Functions {
        /// Show documentation for a single function only
        #[arg(long, short = 'f')]
        func: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout stays clean for generated output
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match &cli.command {
        Commands::Generate {
            data,
            templates,
            out,
        } => generate(data, templates, out.as_deref()).await,
        Commands::Functions { func } => print_functions(func.as_deref()).await,
    }
}

/// Load the generation document and templates, then render everything.
async fn generate(data_path: &Path, templates_path: &Path, out: Option<&Path>) -> anyhow::Result<()> {
    let document = tokio::fs::read_to_string(data_path)
        .await
        .with_context(|| format!("failed to read data file '{}'", data_path.display()))?;
    let set = GenerationSet::parse(&document)
        .with_context(|| format!("failed to parse generation document '{}'", data_path.display()))?;

    let sources = load_template_dir(templates_path)
        .await
        .context("failed to load templates")?;
    info!(
        templates = sources.len(),
        items = set.items.len(),
        "loaded generation inputs"
    );

    let registry = TemplateRegistry::load(sources).context("failed to compile templates")?;

    match out {
        Some(dir) => {
            let mut sink = DirectorySink::new(dir);
            execute_set(&registry, &set, &mut sink)
                .await
                .context("generation failed")?;
            info!(output_path = %dir.display(), "generation complete");
        }
        None => {
            let mut sink = StdoutSink::new();
            execute_set(&registry, &set, &mut sink)
                .await
                .context("generation failed")?;
        }
    }
    Ok(())
}

/// Render the function documentation through the engine itself.
async fn print_functions(filter: Option<&str>) -> anyhow::Result<()> {
    let registry = funcdocs::doc_registry().context("failed to compile doc templates")?;
    let set = funcdocs::docs_to_set(&funcdocs::BUILTIN_DOCS, filter)?;
    if set.items.is_empty() {
        anyhow::bail!("no function named '{}'", filter.unwrap_or_default());
    }

    let mut sink = StdoutSink::new();
    execute_set(&registry, &set, &mut sink)
        .await
        .context("failed to render function documentation")?;
    Ok(())
}

//! docsite: generate a static HTML documentation site.
//!
//! ```text
//! docsite --metadata Widgets.json --docs Widgets.xml --source src/ -o docs/
//! ```
//!
//! The site is written to `<output>/<assembly>`; open
//! `<assembly> Linker.html` at its root to browse it.

mod logging;

use anyhow::{Context, Result};
use clap::Parser;
use docsite::model::MetadataModel;
use docsite::site::{self, SiteConfig};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(
    name = "docsite",
    about = "Generate a static HTML site from type metadata and XML doc comments"
)]
struct Cli {
    /// Metadata model (JSON) describing the types to document
    #[arg(short = 'm', long)]
    metadata: PathBuf,

    /// XML documentation file produced by the compiler
    #[arg(short = 'd', long)]
    docs: PathBuf,

    /// Root of the source tree; the site mirrors its layout
    #[arg(short = 's', long)]
    source: PathBuf,

    /// Directory the site folder (named after the assembly) is created in
    #[arg(short = 'o', long, default_value = ".")]
    output: PathBuf,

    /// Local stylesheet copied into the site's Styles directory
    #[arg(long)]
    stylesheet: Option<PathBuf>,

    /// Script included at the end of every page, relative to the site root.
    /// Can be specified multiple times.
    #[arg(long)]
    script: Vec<String>,

    /// Extension of source files to index
    #[arg(long, default_value = "cs")]
    extension: String,

    /// More output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only report warnings and errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.quiet)?;

    let model = MetadataModel::load(&cli.metadata)?;
    let config = build_config(&cli, &model);

    let report = site::generate(&model, &config).with_context(|| {
        format!(
            "failed to generate documentation for {}",
            model.assembly
        )
    })?;

    if let Some(entry) = report.entry_point() {
        info!(path = %entry.display(), "site entry point");
    }
    Ok(())
}

fn build_config(cli: &Cli, model: &MetadataModel) -> SiteConfig {
    SiteConfig {
        stylesheet: cli.stylesheet.clone(),
        scripts: cli.script.clone(),
        source_extension: cli.extension.trim_start_matches('.').to_string(),
        ..SiteConfig::new(
            cli.source.clone(),
            cli.docs.clone(),
            &cli.output,
            &model.assembly,
        )
    }
}

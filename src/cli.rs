use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Static API documentation generator for symbol-graph files.
///
/// docgraph renders a parsed symbol graph into a set of cross-linked HTML
/// pages and an optional machine-readable summary index.
#[derive(Parser, Debug)]
#[command(name = "docgraph", version, about, long_about = None, propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate documentation from a symbol graph JSON file.
    Generate {
        /// Path to the symbol graph JSON file.
        graph: PathBuf,

        /// Output directory for generated pages.
        #[arg(short, long)]
        out_dir: Option<PathBuf>,

        /// Remove stale generated files from the output directory first.
        #[arg(long)]
        clean: bool,

        /// Emit a summary.json index alongside the pages.
        #[arg(long)]
        summary: bool,

        /// Skip HTML page generation (useful with --summary).
        #[arg(long)]
        no_html: bool,

        /// Render documentation prose through markdown.
        #[arg(long)]
        markdown: bool,

        /// Documentation title shown in page headers.
        #[arg(long)]
        package_name: Option<String>,

        /// Repository URL for "view source" links.
        #[arg(long)]
        repository: Option<String>,

        /// Base URL resolved against external links.
        #[arg(long)]
        base_href: Option<String>,

        /// Glob pattern of source paths to exclude (repeatable).
        #[arg(long)]
        exclude: Vec<String>,

        /// Path to a README rendered as the documentation home page.
        #[arg(long)]
        readme: Option<PathBuf>,
    },
}

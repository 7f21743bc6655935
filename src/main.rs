mod cli;
mod config;
mod error;
mod graph;
mod html;
mod members;
mod output;
mod pages;
mod render;
mod summary;

use std::path::Path;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use config::{DocConfig, RenderOptions};
use graph::SymbolGraph;
use pages::PagePlan;
use render::Renderer;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            graph,
            out_dir,
            clean,
            summary,
            no_html,
            markdown,
            package_name,
            repository,
            base_href,
            exclude,
            readme,
        } => {
            let config = DocConfig::load(Path::new("."));
            let defaults = RenderOptions::default();
            let options = RenderOptions {
                package_name: package_name
                    .or(config.package_name)
                    .unwrap_or(defaults.package_name),
                repository: repository.or(config.repository),
                base_href: base_href.or(config.base_href),
                markdown: markdown || config.markdown.unwrap_or(false),
                summary: summary || config.summary.unwrap_or(false),
                no_html,
                clean,
                out_dir: out_dir.or(config.out_dir).unwrap_or(defaults.out_dir),
                exclude: if exclude.is_empty() {
                    config.exclude.unwrap_or_default()
                } else {
                    exclude
                },
                readme: readme.or(config.readme),
            };
            generate(&graph, options)
        }
    }
}

fn generate(graph_path: &Path, options: RenderOptions) -> Result<()> {
    let graph = SymbolGraph::load(graph_path)?;
    info!(
        "loaded {} node(s) across {} module(s)",
        graph.len(),
        graph.modules.len()
    );

    let plan = PagePlan::build(&graph, &options)?;
    let renderer = Renderer::new(&graph, &options, &plan);
    let files = renderer.render_files()?;
    output::write_files(&options.out_dir, &files, options.clean)?;

    info!("wrote {} file(s) to {}", files.len(), options.out_dir.display());
    Ok(())
}

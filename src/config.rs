use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Configuration loaded from `docgraph.toml` at the working directory.
///
/// Every key has a command-line counterpart; CLI values win over file values.
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub struct DocConfig {
    /// Output directory for generated pages.
    pub out_dir: Option<PathBuf>,
    /// Title of the generated documentation.
    pub package_name: Option<String>,
    /// URL of the source code repository, used for "view source" links.
    pub repository: Option<String>,
    /// Base URL prepended to external links in rendered markdown.
    pub base_href: Option<String>,
    /// Enables markdown rendering of symbol descriptions.
    pub markdown: Option<bool>,
    /// Enables generation of `summary.json`.
    pub summary: Option<bool>,
    /// Glob patterns of source paths to exclude from generation.
    pub exclude: Option<Vec<String>>,
    /// Path to a README rendered as the documentation home page.
    pub readme: Option<PathBuf>,
}

impl DocConfig {
    /// Load configuration from `docgraph.toml` in the given directory.
    ///
    /// Returns a default (empty) configuration if the file does not exist or
    /// cannot be parsed.
    pub fn load(root: &Path) -> Self {
        let config_path = root.join("docgraph.toml");

        if !config_path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(&config_path) {
            Ok(contents) => match toml::from_str::<Self>(&contents) {
                Ok(config) => config,
                Err(err) => {
                    tracing::warn!("failed to parse docgraph.toml: {err}. Using defaults.");
                    Self::default()
                }
            },
            Err(err) => {
                tracing::warn!("failed to read docgraph.toml: {err}. Using defaults.");
                Self::default()
            }
        }
    }
}

/// The immutable rendering configuration threaded through every rendering
/// call. Built once in `main` from `docgraph.toml` plus CLI arguments;
/// nothing in the render path reads process-wide state.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Documentation title, shown in page headers.
    pub package_name: String,
    /// Repository URL for "view source" links, when known.
    pub repository: Option<String>,
    /// Base URL for external links in rendered markdown.
    pub base_href: Option<String>,
    /// Render untagged documentation prose through markdown.
    pub markdown: bool,
    /// Emit `summary.json`.
    pub summary: bool,
    /// Skip HTML page generation.
    pub no_html: bool,
    /// Remove stale `*.html` / `*.json` from the output directory first.
    pub clean: bool,
    /// Output directory.
    pub out_dir: PathBuf,
    /// Glob patterns of source paths excluded from generation.
    pub exclude: Vec<String>,
    /// README rendered as the home page; also forces module `index` pages
    /// onto the `index-api.html` fallback name.
    pub readme: Option<PathBuf>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            package_name: "API".into(),
            repository: None,
            base_href: None,
            markdown: false,
            summary: false,
            no_html: false,
            clean: false,
            out_dir: PathBuf::from("docs"),
            exclude: Vec::new(),
            readme: None,
        }
    }
}

impl RenderOptions {
    /// Whether a README home page will occupy `index.html`.
    pub fn has_readme(&self) -> bool {
        self.readme.as_deref().is_some_and(Path::exists)
    }
}

pub mod href;

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::config::RenderOptions;
use crate::error::{RenderError, Result};
use crate::graph::SymbolGraph;
use crate::graph::node::{Flags, Kind, NodeRef};

/// Whether a node receives its own output page rather than an in-page
/// anchor.
pub fn owns_page(graph: &SymbolGraph, r: NodeRef) -> bool {
    let node = graph.node(r);
    match node.kind {
        Kind::Class | Kind::Module | Kind::Enum | Kind::Component | Kind::Namespace => true,
        // A declaration-merged interface is documented inside its merge
        // target's page instead.
        Kind::Interface => !node.flags.has(Flags::DECLARATION_MERGE),
        // Ambient function declarations with overload children (flags are
        // exactly Ambient, nothing else).
        Kind::Function => node.flags == Flags::AMBIENT && !node.children().is_empty(),
        _ => false,
    }
}

static EXT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\.([tj]sx?|md)$").unwrap());

/// Rewrite a source file name into an output file name: known extensions are
/// replaced and path separators / quotes collapse to `--`.
///
/// Pure function of its inputs, so re-running the generator over an
/// unchanged graph produces byte-identical file names.
pub fn escape_file_name(name: &str, replace_ext: &str) -> String {
    EXT_RE
        .replace(name, replace_ext)
        .replace(['/', '"'], "--")
}

/// The result of the planning pass: a stable file name for every page-owning
/// node, plus the ordered list of pages to emit.
#[derive(Debug)]
pub struct PagePlan {
    page_names: HashMap<NodeRef, String>,
    /// Pages to write, in emission order: each module's page-owning children
    /// first, then the module page itself.
    pub output_pages: Vec<NodeRef>,
    /// Modules contributing to navigation and output, in graph order.
    pub nav_modules: Vec<NodeRef>,
}

impl PagePlan {
    /// Walk the graph once and assign every page-owning node its file name.
    ///
    /// Fails with [`RenderError::MissingSource`] when a page-owning node
    /// that must carry a source location (anything but modules and
    /// namespaces) has none, since no stable file name can be derived
    /// for it.
    pub fn build(graph: &SymbolGraph, options: &RenderOptions) -> Result<Self> {
        let mut page_names = HashMap::new();
        for r in graph.refs() {
            if owns_page(graph, r) {
                page_names.insert(r, page_name(graph, r, options)?);
            }
        }

        let exclude: Vec<glob::Pattern> = options
            .exclude
            .iter()
            .filter_map(|p| glob::Pattern::new(p).ok())
            .collect();

        let mut output_pages = Vec::new();
        let mut nav_modules = Vec::new();
        for &m in &graph.modules {
            let module = graph.node(m);
            if module.flags.has(Flags::INTERNAL)
                || module.children.is_none()
                || exclude.iter().any(|p| p.matches(module.name()))
            {
                continue;
            }
            nav_modules.push(m);
            for &c in module.children() {
                if owns_page(graph, c) {
                    output_pages.push(c);
                }
            }
            output_pages.push(m);
        }

        Ok(PagePlan {
            page_names,
            output_pages,
            nav_modules,
        })
    }

    /// The planned file name for a page-owning node.
    pub fn page_name(&self, r: NodeRef) -> Option<&str> {
        self.page_names.get(&r).map(String::as_str)
    }
}

/// Derive the output file name for one page-owning node.
fn page_name(graph: &SymbolGraph, r: NodeRef, options: &RenderOptions) -> Result<String> {
    let node = graph.node(r);

    if node.kind == Kind::Module {
        let result = escape_file_name(node.name(), ".html");
        // A root README claims index.html; the module's own index page moves
        // to the reserved fallback.
        if result == "index.html" && options.has_readme() {
            return Ok("index-api.html".into());
        }
        return Ok(result);
    }

    if node.kind == Kind::Namespace {
        return Ok(format!("ns--{}.html", escape_file_name(node.name(), ".html")));
    }

    let source = node
        .primary_source()
        .ok_or_else(|| RenderError::MissingSource(node.name().to_string()))?;
    let prefix = escape_file_name(&source.file, "--");

    Ok(format!("{prefix}{}.html", node.name()))
}

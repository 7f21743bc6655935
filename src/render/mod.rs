pub mod docs;
pub mod signature;
pub mod types;

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use crate::config::RenderOptions;
use crate::error::Result;
use crate::graph::SymbolGraph;
use crate::graph::node::{Flags, Kind, NodeRef};
use crate::pages::PagePlan;
use crate::pages::href::get_href;

/// Escape `&`, `<` and `"` for embedding in markup.
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// The rendering context: the immutable graph, options and page plan, plus
/// write-once memoization caches keyed by arena slot.
///
/// Rendering is a pure function of a node's fields and the globally-resolved
/// hrefs, so a rendered string may be cached on first computation and reused
/// verbatim wherever the graph repeats the same type. The
/// `rendering` set guards recursive walks against `type`-edge cycles, which
/// are a normal, expected case (self-referential constraints, mutually
/// recursive interfaces).
pub struct Renderer<'a> {
    pub graph: &'a SymbolGraph,
    pub options: &'a RenderOptions,
    pub plan: &'a PagePlan,
    exclude: Vec<glob::Pattern>,
    type_cache: RefCell<HashMap<NodeRef, String>>,
    rendering: RefCell<HashSet<NodeRef>>,
}

impl<'a> Renderer<'a> {
    pub fn new(graph: &'a SymbolGraph, options: &'a RenderOptions, plan: &'a PagePlan) -> Self {
        let exclude = options
            .exclude
            .iter()
            .filter_map(|p| glob::Pattern::new(p).ok())
            .collect();
        Renderer {
            graph,
            options,
            plan,
            exclude,
            type_cache: RefCell::new(HashMap::new()),
            rendering: RefCell::new(HashSet::new()),
        }
    }

    /// Render a type position: rest prefix plus the memoized kind dispatch.
    /// `None` renders as the empty string.
    pub fn type_text(&self, r: Option<NodeRef>) -> Result<String> {
        let Some(r) = r else {
            return Ok(String::new());
        };
        let rest = if self.graph.node(r).flags.has(Flags::REST) {
            "..."
        } else {
            ""
        };
        Ok(format!("{rest}{}", self.render_type_memo(r)?))
    }

    /// Memoized, cycle-guarded entry into the Type Renderer.
    fn render_type_memo(&self, r: NodeRef) -> Result<String> {
        if let Some(cached) = self.type_cache.borrow().get(&r) {
            return Ok(cached.clone());
        }
        if !self.rendering.borrow_mut().insert(r) {
            // Already rendering this slot: a type-edge cycle. Emit the
            // node's name so the walk terminates.
            let node = self.graph.node(r);
            return Ok(match &node.name {
                Some(name) => escape(name),
                None => "...".into(),
            });
        }
        let result = self.render_type(r);
        self.rendering.borrow_mut().remove(&r);
        let rendered = result?;
        self.type_cache
            .borrow_mut()
            .entry(r)
            .or_insert_with(|| rendered.clone());
        Ok(rendered)
    }

    /// Render a node as a link to its page or anchor. Falls back to plain
    /// text for nodes without an id (never link targets).
    pub fn link(&self, r: NodeRef, content: Option<&str>, parent: Option<NodeRef>) -> String {
        let node = self.graph.node(r);
        let name = match content {
            Some(c) => c.to_string(),
            None => match &node.name {
                Some(n) => escape(n),
                None if node.flags.has(Flags::DEFAULT) => "<i>default</i>".into(),
                None => "(Unknown)".into(),
            },
        };

        let target = match node.kind {
            Kind::Reference | Kind::ImportType => node.ty.unwrap_or(r),
            _ => r,
        };

        if self.graph.node(target).id.is_none() {
            return name;
        }

        let href = get_href(self.plan, self.graph, target, parent);
        format!("<a href=\"{href}\">{name}</a>")
    }

    /// Whether any of the node's source locations matches an exclusion
    /// pattern. Excluded nodes are omitted entirely, not merely hidden.
    pub fn is_excluded(&self, r: NodeRef) -> bool {
        if self.exclude.is_empty() {
            return false;
        }
        let node = self.graph.node(r);
        node.source
            .as_ref()
            .is_some_and(|sources| {
                sources
                    .iter()
                    .any(|s| self.exclude.iter().any(|p| p.matches(&s.file)))
            })
    }
}

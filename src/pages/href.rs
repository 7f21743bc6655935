use std::collections::HashSet;

use crate::graph::SymbolGraph;
use crate::graph::node::{Kind, NodeRef};

use super::PagePlan;

/// Compute the canonical href for a node: a page file name, an in-page
/// anchor, or a page-plus-anchor composition.
///
/// `rendering_parent` is the node whose page is currently being rendered;
/// when the target's own parent is the same logical parent (by name), the
/// parent hop is skipped so members link as bare `#s<id>` anchors inside
/// their owner's page.
///
/// Pure function of the graph and the page plan: repeated calls with the
/// same arguments return the same string.
pub fn get_href(
    plan: &PagePlan,
    graph: &SymbolGraph,
    node: NodeRef,
    rendering_parent: Option<NodeRef>,
) -> String {
    // Unwrap Reference / Export / ImportType wrappers. Wrapper chains in a
    // malformed graph could cycle, so track visited slots.
    let mut target = node;
    let mut seen: HashSet<NodeRef> = HashSet::new();
    loop {
        let n = graph.node(target);
        let is_wrapper = matches!(n.kind, Kind::Reference | Kind::Export | Kind::ImportType);
        match n.ty {
            Some(ty) if is_wrapper && seen.insert(target) => target = ty,
            _ => break,
        }
    }

    if let Some(page) = plan.page_name(target) {
        return page.to_string();
    }

    let n = graph.node(target);
    let parent_href = match n.parent {
        Some(p)
            if rendering_parent
                .is_none_or(|rp| graph.node(p).name() != graph.node(rp).name()) =>
        {
            get_href(plan, graph, p, None)
        }
        _ => String::new(),
    };

    match n.id {
        Some(id) => format!("{parent_href}#s{id}"),
        None => parent_href,
    }
}

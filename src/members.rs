//! Member grouping: a page's children bucketed by kind, each bucket with an
//! index of links and a list of detail cards, plus inherited-member indexes
//! walked up the heritage chain.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use crate::error::Result;
use crate::graph::SymbolGraph;
use crate::graph::node::{Flags, Kind, NodeRef};
use crate::pages::owns_page;
use crate::render::Renderer;

/// One kind bucket of a member listing.
pub struct MemberGroup {
    pub kind: Kind,
    /// Short links shown in the index grid.
    pub index: Vec<String>,
    /// Full member cards, in body order.
    pub body: Vec<String>,
}

/// Ordering weight: static members, `index` modules and namespaces float to
/// the front of their listing.
fn node_coef(graph: &SymbolGraph, r: NodeRef) -> i32 {
    let node = graph.node(r);
    let mut coef = 0;
    if node.flags.has(Flags::STATIC) {
        coef -= 4;
    }
    if node.kind == Kind::Module && matches!(node.name(), "index.ts" | "index.tsx") {
        coef -= 10;
    }
    if node.kind == Kind::Namespace {
        coef -= 5;
    }
    coef
}

/// Coefficient first, then name.
pub fn sort_node(graph: &SymbolGraph, a: NodeRef, b: NodeRef) -> Ordering {
    let coef = node_coef(graph, a) - node_coef(graph, b);
    let name = if graph.node(a).name() > graph.node(b).name() {
        1
    } else {
        -1
    };
    (coef + name).cmp(&0)
}

/// Sort key for enum member bodies: the numeric value when the member has
/// one, otherwise the name.
#[derive(PartialEq)]
enum ValueKey<'a> {
    Number(f64),
    Name(&'a str),
}

fn value_key(graph: &SymbolGraph, r: NodeRef) -> ValueKey<'_> {
    let node = graph.node(r);
    match node.value.as_deref().and_then(|v| v.parse::<f64>().ok()) {
        Some(n) => ValueKey::Number(n),
        None => ValueKey::Name(node.name()),
    }
}

/// Numeric values sort before names; values like `0x10` that do not parse
/// as plain numbers sort with the names.
fn sort_by_value(graph: &SymbolGraph, a: NodeRef, b: NodeRef) -> Ordering {
    match (value_key(graph, a), value_key(graph, b)) {
        (ValueKey::Number(x), ValueKey::Number(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        (ValueKey::Number(_), ValueKey::Name(_)) => Ordering::Less,
        (ValueKey::Name(_), ValueKey::Number(_)) => Ordering::Greater,
        (ValueKey::Name(x), ValueKey::Name(y)) => x.cmp(y),
    }
}

/// Whether a module/namespace child is part of the public declaration
/// surface.
pub fn declaration_filter(graph: &SymbolGraph, r: NodeRef) -> bool {
    let flags = graph.node(r).flags;
    !flags.has(Flags::INTERNAL)
        && (flags.has(Flags::EXPORT)
            || flags.has(Flags::AMBIENT)
            || flags.has(Flags::DECLARATION_MERGE))
}

impl Renderer<'_> {
    /// A member's entry in the index grid. Plain (unlinked) names get a
    /// wrapper element so the grid styles them uniformly.
    pub(crate) fn member_index_link(&self, r: NodeRef, parent: Option<NodeRef>) -> String {
        let link = self.link(r, None, parent);
        if link.starts_with('<') {
            link
        } else {
            format!("<c>{link}</c>")
        }
    }

    fn enum_members(&self, r: NodeRef) -> Result<Vec<MemberGroup>> {
        let mut children: Vec<NodeRef> = self
            .graph
            .node(r)
            .children()
            .iter()
            .copied()
            .filter(|&c| !self.graph.node(c).flags.has(Flags::INTERNAL))
            .collect();

        children.sort_by(|&a, &b| sort_node(self.graph, a, b));
        let index = children
            .iter()
            .map(|&c| self.member_index_link(c, Some(r)))
            .collect();

        children.sort_by(|&a, &b| sort_by_value(self.graph, a, b));
        let body = children
            .iter()
            .map(|&c| self.member_card(c))
            .collect::<Result<_>>()?;

        Ok(vec![MemberGroup {
            kind: Kind::Property,
            index,
            body,
        }])
    }

    fn push_to_group(
        &self,
        parent: NodeRef,
        c: NodeRef,
        groups: &mut Vec<MemberGroup>,
        by_kind: &mut HashMap<Kind, usize>,
        seen: &mut HashMap<Kind, HashSet<String>>,
        index_only: bool,
    ) -> Result<()> {
        let child = self.graph.node(c);
        let group_kind = if child.kind == Kind::ImportType {
            Kind::Export
        } else {
            child.kind
        };

        let slot = *by_kind.entry(group_kind).or_insert_with(|| {
            groups.push(MemberGroup {
                kind: group_kind,
                index: Vec::new(),
                body: Vec::new(),
            });
            groups.len() - 1
        });

        if seen
            .entry(group_kind)
            .or_default()
            .insert(child.name().to_string())
        {
            let parent = if index_only { None } else { Some(parent) };
            groups[slot].index.push(self.member_index_link(c, parent));
        }

        if !index_only && !owns_page(self.graph, c) && child.kind != Kind::Export {
            groups[slot].body.push(self.member_card(c)?);
        }
        Ok(())
    }

    /// Bucket a node's children into kind groups.
    ///
    /// `index_only` builds the link grids without the detail cards (used for
    /// inherited-member listings). Enums are one flat group, bodies ordered
    /// by member value.
    pub(crate) fn member_groups(
        &self,
        r: NodeRef,
        index_only: bool,
        sort: bool,
    ) -> Result<Vec<MemberGroup>> {
        let node = self.graph.node(r);
        let Some(children) = &node.children else {
            return Ok(Vec::new());
        };

        if node.kind == Kind::Enum {
            return self.enum_members(r);
        }

        let mut children = children.clone();
        children.sort_by(|&a, &b| sort_node(self.graph, a, b));

        let mut groups = Vec::new();
        let mut by_kind = HashMap::new();
        let mut seen = HashMap::new();
        let surface = matches!(node.kind, Kind::Module | Kind::Namespace);

        for c in children {
            let child = self.graph.node(c);
            if (surface && !declaration_filter(self.graph, c))
                || child.flags.has(Flags::INTERNAL)
                || child.kind == Kind::Unknown
            {
                continue;
            }

            // Import wrappers around empty modules document nothing.
            if let Some(ty) = child.ty
                && self.graph.node(ty).kind == Kind::ImportType
                && self
                    .graph
                    .node(ty)
                    .ty
                    .is_none_or(|t| self.graph.node(t).children().is_empty())
            {
                continue;
            }

            // Destructured bindings list each binding, not the pattern.
            if matches!(child.kind, Kind::Constant | Kind::Variable) && child.children.is_some() {
                for &binding in child.children() {
                    self.push_to_group(c, binding, &mut groups, &mut by_kind, &mut seen, index_only)?;
                }
            } else {
                self.push_to_group(r, c, &mut groups, &mut by_kind, &mut seen, index_only)?;
            }
        }

        if sort {
            groups.sort_by(|a, b| a.kind.label().cmp(b.kind.label()));
        }
        Ok(groups)
    }

    /// Index grids of members inherited through the heritage chain, walking
    /// base classes transitively. Excluded bases are skipped.
    pub(crate) fn inherited_members(&self, heritage: NodeRef) -> Result<String> {
        let mut out = String::new();
        for &c in self.graph.node(heritage).children() {
            let Some(base) = self.graph.node(c).ty else {
                continue;
            };
            if self.is_excluded(base) {
                continue;
            }
            if !matches!(self.graph.node(base).kind, Kind::Class | Kind::Component) {
                continue;
            }

            let groups = self.member_groups(base, true, true)?;
            let index: String = groups.iter().map(|g| self.member_group_index(g)).collect();
            if !index.is_empty() {
                out.push_str(&format!(
                    "<c-t font=\"h5\">Inherited from {}</c-t>{index}",
                    self.link(c, None, None)
                ));
            }
            if let Some(grandparent) = self.graph.node(base).ty {
                out.push_str(&self.inherited_members(grandparent)?);
            }
        }
        Ok(out)
    }
}

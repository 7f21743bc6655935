pub mod node;

use std::collections::HashMap;
use std::path::Path;

use anyhow::Context;

use crate::error::RenderError;
use node::{Node, NodeRef};

/// The in-memory symbol graph: a flat node arena with O(1) lookup indexes.
///
/// The graph is produced upstream by the declaration-extraction component
/// and consumed here as an immutable value. Every edge field on [`Node`] is
/// an arena index into `nodes`, so `type` edges may form cycles without any
/// ownership cycle; recursive walks stay cycle-tolerant through per-walk
/// memoization and guards, never through graph mutation.
#[derive(Debug)]
pub struct SymbolGraph {
    nodes: Vec<Node>,
    /// Top-level module nodes, in source order.
    pub modules: Vec<NodeRef>,
    /// Maps stable public ids to arena slots.
    id_index: HashMap<u64, NodeRef>,
    /// Maps symbol names to the first arena slot bearing that name, for
    /// `{@link Name}` / `@see Name` resolution.
    name_index: HashMap<String, NodeRef>,
}

/// Wire format of a graph document.
#[derive(serde::Deserialize)]
struct GraphDoc {
    modules: Vec<NodeRef>,
    nodes: Vec<Node>,
}

impl SymbolGraph {
    /// Load and validate a graph document from a JSON file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read symbol graph {}", path.display()))?;
        let doc: GraphDoc = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse symbol graph {}", path.display()))?;
        Ok(Self::from_doc(doc.nodes, doc.modules)?)
    }

    /// Build a graph from an already-deserialized node arena.
    pub fn from_doc(nodes: Vec<Node>, modules: Vec<NodeRef>) -> Result<Self, RenderError> {
        let mut graph = SymbolGraph {
            nodes,
            modules,
            id_index: HashMap::new(),
            name_index: HashMap::new(),
        };
        graph.validate()?;
        graph.build_indexes();
        Ok(graph)
    }

    /// Check every edge is in range and every present id is unique.
    fn validate(&self) -> Result<(), RenderError> {
        let len = self.nodes.len();
        let check = |r: NodeRef| -> Result<(), RenderError> {
            if r.index() >= len {
                return Err(RenderError::Structural(format!(
                    "node reference {} out of range ({} nodes)",
                    r.0, len
                )));
            }
            Ok(())
        };

        let mut seen_ids: HashMap<u64, usize> = HashMap::new();
        for (i, n) in self.nodes.iter().enumerate() {
            if let Some(id) = n.id {
                if let Some(prev) = seen_ids.insert(id, i) {
                    return Err(RenderError::Structural(format!(
                        "duplicate node id {id} (arena slots {prev} and {i})"
                    )));
                }
            }
            for r in [n.ty, n.resolved_type, n.parent].into_iter().flatten() {
                check(r)?;
            }
            for list in [&n.type_parameters, &n.parameters, &n.children, &n.extended_by] {
                for &r in list.iter().flat_map(|v| v.iter()) {
                    check(r)?;
                }
            }
        }
        for &m in &self.modules {
            check(m)?;
        }
        Ok(())
    }

    fn build_indexes(&mut self) {
        for (i, n) in self.nodes.iter().enumerate() {
            let r = NodeRef(i as u32);
            if let Some(id) = n.id {
                self.id_index.insert(id, r);
            }
            if let Some(name) = &n.name {
                // First occurrence wins: arena order is deterministic.
                self.name_index.entry(name.clone()).or_insert(r);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, r: NodeRef) -> &Node {
        &self.nodes[r.index()]
    }

    /// All arena slots, in order.
    pub fn refs(&self) -> impl Iterator<Item = NodeRef> + '_ {
        (0..self.nodes.len() as u32).map(NodeRef)
    }

    /// Resolve a stable public id to its node.
    pub fn by_id(&self, id: u64) -> Option<NodeRef> {
        self.id_index.get(&id).copied()
    }

    /// Resolve a `{@link Name}` / `@see Name` reference by exact name match.
    /// A `Name#member` suffix is ignored past the `#`.
    pub fn symbol_by_name(&self, name: &str) -> Option<NodeRef> {
        let bare = name.split('#').next().unwrap_or(name).trim();
        self.name_index.get(bare).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use node::{Flags, Kind};

    fn named(kind: Kind, name: &str) -> Node {
        Node {
            kind,
            name: Some(name.into()),
            ..Node::default()
        }
    }

    #[test]
    fn test_from_doc_builds_lookup_indexes() {
        let mut module = named(Kind::Module, "index.ts");
        module.children = Some(vec![NodeRef(1)]);
        let mut class = named(Kind::Class, "Widget");
        class.id = Some(7);
        class.flags = Flags::EXPORT;

        let graph = SymbolGraph::from_doc(vec![module, class], vec![NodeRef(0)]).unwrap();
        assert_eq!(graph.by_id(7), Some(NodeRef(1)));
        assert_eq!(graph.symbol_by_name("Widget"), Some(NodeRef(1)));
        assert_eq!(graph.symbol_by_name("Widget#render"), Some(NodeRef(1)));
        assert_eq!(graph.symbol_by_name("Gadget"), None);
    }

    #[test]
    fn test_duplicate_id_is_fatal() {
        let mut a = named(Kind::Class, "A");
        a.id = Some(1);
        let mut b = named(Kind::Class, "B");
        b.id = Some(1);

        let err = SymbolGraph::from_doc(vec![a, b], vec![]).unwrap_err();
        assert!(matches!(err, RenderError::Structural(_)));
    }

    #[test]
    fn test_dangling_reference_is_fatal() {
        let mut a = named(Kind::Property, "p");
        a.ty = Some(NodeRef(9));

        let err = SymbolGraph::from_doc(vec![a], vec![]).unwrap_err();
        assert!(matches!(err, RenderError::Structural(_)));
    }

}

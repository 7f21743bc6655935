//! `summary.json` serialization: a machine-readable index of the public
//! surface, with cross-references emitted as bare ids so cyclic type graphs
//! serialize without recursion.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::error::Result;
use crate::graph::node::{DocBlock, Flags, Kind, NodeRef};
use crate::render::Renderer;

/// A type position in the summary: an id reference to another indexed
/// symbol, flattened display text, or an embedded structural record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TypeSlot {
    Ref(u64),
    Inline(String),
    Embedded(Box<Summary>),
}

/// One record of the summary index.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Vec<Summary>>,
    pub kind: Kind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flags: Option<Flags>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub docs: Option<DocBlock>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub ty: Option<TypeSlot>,
    #[serde(rename = "typeP", skip_serializing_if = "Option::is_none")]
    pub type_p: Option<Vec<Summary>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_type: Option<TypeSlot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Summary>>,
}

#[derive(Serialize)]
struct SummaryJson {
    index: Vec<Summary>,
}

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"</?[^>]+>").unwrap());

/// Flatten rendered markup to plain text.
fn strip_html(input: &str) -> String {
    TAG_RE
        .replace_all(input, "")
        .replace("&gt;", ">")
        .replace("&lt;", "<")
}

fn non_empty_flags(flags: Flags) -> Option<Flags> {
    (!flags.is_empty()).then_some(flags)
}

fn sort_by_name(a: &Summary, b: &Summary) -> std::cmp::Ordering {
    a.name.as_deref().unwrap_or("").cmp(b.name.as_deref().unwrap_or(""))
}

/// Symbols the summary indexes: page-owning declarations plus type aliases.
/// Declaration-merged interfaces are indexed even though they share a page.
fn summary_filter(kind: Kind, flags: Flags, has_children: bool) -> bool {
    match kind {
        Kind::Class
        | Kind::Interface
        | Kind::Module
        | Kind::Enum
        | Kind::Component
        | Kind::Namespace
        | Kind::TypeAlias => true,
        Kind::Function => flags == Flags::AMBIENT && has_children,
        _ => false,
    }
}

/// Builds summary records over a rendering context, memoizing per arena
/// slot. The in-progress set turns re-entrant walks (type cycles routed
/// through parameters) into shallow records instead of unbounded recursion.
pub struct Summarizer<'a> {
    rd: &'a Renderer<'a>,
    cache: RefCell<HashMap<NodeRef, Summary>>,
    in_progress: RefCell<HashSet<NodeRef>>,
}

impl<'a> Summarizer<'a> {
    pub fn new(rd: &'a Renderer<'a>) -> Self {
        Summarizer {
            rd,
            cache: RefCell::new(HashMap::new()),
            in_progress: RefCell::new(HashSet::new()),
        }
    }

    fn node_id(&self, r: NodeRef) -> Option<u64> {
        self.rd.graph.node(r).id
    }

    /// Shallow identity record, used for cycle termination and for heritage
    /// references.
    fn stub(&self, r: NodeRef) -> Summary {
        let node = self.rd.graph.node(r);
        Summary {
            id: node.id,
            name: node.name.clone(),
            kind: node.kind,
            flags: non_empty_flags(node.flags),
            ..Summary::default()
        }
    }

    /// A type position: exported reference targets collapse to their id,
    /// heritage clauses embed a structural record, everything else flattens
    /// to display text.
    fn render_type(&self, r: NodeRef) -> Result<TypeSlot> {
        let graph = self.rd.graph;
        let mut node = graph.node(r);
        let mut target = r;
        if node.kind == Kind::Reference
            && let Some(ty) = node.ty
        {
            target = ty;
            node = graph.node(target);
        }

        if node.kind == Kind::ClassType {
            let children: Vec<Summary> = node
                .children()
                .iter()
                .filter(|&&c| graph.node(c).kind == Kind::Reference)
                .map(|&c| Summary {
                    kind: Kind::Reference,
                    ty: graph
                        .node(c)
                        .ty
                        .and_then(|t| graph.node(t).id)
                        .map(TypeSlot::Ref),
                    ..Summary::default()
                })
                .collect();
            return Ok(TypeSlot::Embedded(Box::new(Summary {
                kind: node.kind,
                children: Some(children),
                ty: node.ty.and_then(|t| graph.node(t).id).map(TypeSlot::Ref),
                ..Summary::default()
            })));
        }

        if node.kind == Kind::BaseType {
            return Ok(TypeSlot::Inline(node.name().to_string()));
        }

        let structural = matches!(
            node.kind,
            Kind::ObjectType
                | Kind::FunctionType
                | Kind::Function
                | Kind::Method
                | Kind::TypeUnion
                | Kind::Interface
        );
        if node.flags.has(Flags::EXTERNAL) || node.flags.has(Flags::DEFAULT_LIBRARY) || !structural
        {
            return Ok(TypeSlot::Inline(strip_html(
                &self.rd.type_text(Some(target))?,
            )));
        }

        let parameters = self.render_list(node.parameters.as_deref())?;
        let type_p = self.render_param_list(node.type_parameters.as_deref())?;

        Ok(TypeSlot::Embedded(Box::new(Summary {
            id: node.id,
            name: node.name.clone(),
            parameters,
            kind: node.kind,
            flags: non_empty_flags(node.flags),
            docs: node.docs.clone(),
            ty: node.ty.and_then(|t| graph.node(t).id).map(TypeSlot::Ref),
            type_p,
            ..Summary::default()
        })))
    }

    fn render_type_param(&self, r: NodeRef) -> Result<Summary> {
        let graph = self.rd.graph;
        let node = graph.node(r);

        let exported_target = node.kind == Kind::Reference
            && node.ty.is_some_and(|t| {
                let target = graph.node(t);
                target.id.is_some() && target.flags.has(Flags::EXPORT)
            });
        let ty = if exported_target {
            node.ty.and_then(|t| graph.node(t).id).map(TypeSlot::Ref)
        } else {
            Some(self.render_type(r)?)
        };

        Ok(Summary {
            id: node.id,
            name: node.name.clone(),
            kind: node.kind,
            flags: non_empty_flags(node.flags),
            docs: node.docs.clone(),
            ty,
            ..Summary::default()
        })
    }

    fn render_list(&self, refs: Option<&[NodeRef]>) -> Result<Option<Vec<Summary>>> {
        match refs {
            Some(refs) if !refs.is_empty() => Ok(Some(
                refs.iter()
                    .map(|&c| self.render_node(c))
                    .collect::<Result<_>>()?,
            )),
            _ => Ok(None),
        }
    }

    fn render_param_list(&self, refs: Option<&[NodeRef]>) -> Result<Option<Vec<Summary>>> {
        match refs {
            Some(refs) if !refs.is_empty() => Ok(Some(
                refs.iter()
                    .map(|&c| self.render_type_param(c))
                    .collect::<Result<_>>()?,
            )),
            _ => Ok(None),
        }
    }

    /// Full record for one node, memoized.
    pub fn render_node(&self, r: NodeRef) -> Result<Summary> {
        if let Some(cached) = self.cache.borrow().get(&r) {
            return Ok(cached.clone());
        }
        if !self.in_progress.borrow_mut().insert(r) {
            return Ok(self.stub(r));
        }
        let result = self.render_node_inner(r);
        self.in_progress.borrow_mut().remove(&r);
        let summary = result?;
        self.cache.borrow_mut().insert(r, summary.clone());
        Ok(summary)
    }

    fn render_node_inner(&self, r: NodeRef) -> Result<Summary> {
        let graph = self.rd.graph;
        let node = graph.node(r);

        let children = match self.render_list(node.children.as_deref())? {
            Some(mut children) => {
                children.sort_by(sort_by_name);
                Some(children)
            }
            None => None,
        };
        let parameters = self.render_list(node.parameters.as_deref())?;
        let type_p = self.render_param_list(node.type_parameters.as_deref())?;

        let ty = match node.ty {
            Some(t) => {
                let target = graph.node(t);
                let exported = target.kind == Kind::Reference
                    && target.ty.is_some_and(|tt| {
                        let n = graph.node(tt);
                        n.id.is_some() && n.flags.has(Flags::EXPORT)
                    });
                if exported {
                    target.ty.and_then(|tt| graph.node(tt).id).map(TypeSlot::Ref)
                } else {
                    Some(self.render_type(t)?)
                }
            }
            None => None,
        };

        let resolved_type = match node.resolved_type {
            Some(resolved) => {
                // An alias whose resolution points straight back at this node
                // flattens to the alias name.
                let self_referential = graph
                    .node(resolved)
                    .ty
                    .and_then(|t| graph.node(t).ty)
                    .is_some_and(|t| t == r);
                let slot = if self_referential {
                    TypeSlot::Inline(graph.node(resolved).name().to_string())
                } else {
                    self.render_type(resolved)?
                };
                Some(slot)
            }
            None => None,
        };
        let resolved_type = if resolved_type == ty { None } else { resolved_type };

        Ok(Summary {
            id: node.id,
            name: node.name.clone(),
            parameters,
            kind: node.kind,
            flags: non_empty_flags(node.flags),
            docs: node.docs.clone(),
            ty,
            type_p,
            resolved_type,
            children,
        })
    }
}

/// Render the whole summary document.
pub fn render_summary(rd: &Renderer<'_>) -> anyhow::Result<String> {
    let summarizer = Summarizer::new(rd);
    let mut index = Vec::new();
    for r in rd.graph.refs() {
        let node = rd.graph.node(r);
        if node.id.is_some()
            && summary_filter(node.kind, node.flags, !node.children().is_empty())
        {
            index.push(summarizer.render_node(r)?);
        }
    }
    index.sort_by(sort_by_name);
    Ok(serde_json::to_string(&SummaryJson { index })?)
}

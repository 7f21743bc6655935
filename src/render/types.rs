//! The Type Renderer: one case per kind tag, recursing through the memoized
//! cycle-guarded entry point on the context.

use crate::error::{RenderError, Result};
use crate::graph::node::{Kind, NodeRef};

use super::Renderer;

impl Renderer<'_> {
    /// Dispatch on the node's kind and produce its display markup.
    ///
    /// Entered through `type_text`, which adds memoization, the cycle guard
    /// and the rest-flag prefix.
    pub(crate) fn render_type(&self, r: NodeRef) -> Result<String> {
        let node = self.graph.node(r);
        match node.kind {
            Kind::ClassType => self.class_type(r),
            Kind::Infer => Ok(format!("infer {}", self.type_text(node.ty)?)),
            Kind::Parenthesized => Ok(format!("({})", self.type_text(node.ty)?)),
            Kind::ConditionalType => self.conditional_type(r),
            Kind::IndexedType => {
                let children = node.children();
                if children.len() < 2 {
                    return Err(RenderError::Structural(format!(
                        "indexedType node \"{}\" lacks its two children",
                        node.name()
                    )));
                }
                Ok(format!(
                    "{}[{}]",
                    self.type_text(Some(children[0]))?,
                    self.type_text(Some(children[1]))?
                ))
            }
            Kind::TypeUnion => self.join_children(r, " | "),
            Kind::TypeIntersection => self.join_children(r, " & "),
            Kind::Tuple => Ok(format!("[{}]", self.join_children(r, ", ")?)),
            Kind::Array => Ok(format!("{}[]", self.type_text(node.ty)?)),
            Kind::Reference | Kind::ImportType => Ok(format!(
                "{}{}",
                self.link(r, None, None),
                self.type_arguments(node.type_parameters.as_deref())?
            )),
            Kind::FunctionType | Kind::Function | Kind::Method => self.function_type(r),
            Kind::MappedType => self.mapped_type(r),
            Kind::ObjectType => self.object_type(r),
            Kind::Literal | Kind::TypeAlias | Kind::BaseType => Ok(node.name().to_string()),
            Kind::TypeParameter => {
                let name = node.name().to_string();
                match node.children().first() {
                    Some(&constraint) => {
                        Ok(format!("{name} extends {}", self.type_text(Some(constraint))?))
                    }
                    None => Ok(name),
                }
            }
            Kind::ConstructorType => Ok(format!("new {}", self.function_type(r)?)),
            Kind::Keyof => {
                let literal = format!("keyof {}", self.type_text(node.ty)?);
                match node.resolved_type {
                    // Show the literal form and the resolved expansion side
                    // by side, collapsible.
                    Some(resolved) => Ok(format!(
                        "<doc-more><x slot=\"off\"> {literal}</x> {}</doc-more>",
                        self.type_text(Some(resolved))?
                    )),
                    None => Ok(literal),
                }
            }
            Kind::Typeof => Ok(format!("typeof {}", node.name())),
            Kind::ThisType => Ok("this".into()),
            Kind::Class | Kind::Interface => Ok(self.link(r, None, None)),
            Kind::ReadonlyKeyword => Ok(format!("readonly {}", self.type_text(node.ty)?)),
            Kind::Symbol => Ok("Symbol".into()),
            Kind::UnknownType => Ok("unknown".into()),
            // A declaration encountered in type position renders as its
            // signature.
            _ => self.signature(r),
        }
    }

    fn join_children(&self, r: NodeRef, separator: &str) -> Result<String> {
        let parts: Vec<String> = self
            .graph
            .node(r)
            .children()
            .iter()
            .map(|&c| self.type_text(Some(c)))
            .collect::<Result<_>>()?;
        Ok(parts.join(separator))
    }

    /// Generic argument/parameter list: `<A, B extends C>`.
    pub(crate) fn type_arguments(&self, types: Option<&[NodeRef]>) -> Result<String> {
        let Some(types) = types else {
            return Ok(String::new());
        };
        let mut parts = Vec::with_capacity(types.len());
        for &t in types {
            let node = self.graph.node(t);
            let mut text = self.type_text(Some(t))?;
            if node.kind != Kind::Reference
                && let Some(constraint) = node.ty
            {
                text.push_str(&format!(" extends {}", self.type_text(Some(constraint))?));
            }
            parts.push(text);
        }
        Ok(format!("&lt;{}&gt;", parts.join(", ")))
    }

    pub(crate) fn function_type(&self, r: NodeRef) -> Result<String> {
        let node = self.graph.node(r);
        Ok(format!(
            "{}{}{} => {}",
            self.signature_name(r),
            self.type_arguments(node.type_parameters.as_deref())?,
            self.signature_parameters(node.parameters.as_deref())?,
            self.type_text(node.ty)?
        ))
    }

    /// `Check extends Target ? True : False`. The four children are
    /// mandatory; their absence is a malformed upstream graph.
    fn conditional_type(&self, r: NodeRef) -> Result<String> {
        let node = self.graph.node(r);
        let children = node.children();
        if children.len() < 4 {
            return Err(RenderError::Structural(format!(
                "conditionalType node \"{}\" lacks its four children",
                node.name()
            )));
        }
        Ok(format!(
            "{} extends {} ? {} : {}",
            self.type_text(Some(children[0]))?,
            self.type_text(Some(children[1]))?,
            self.type_text(Some(children[2]))?,
            self.type_text(Some(children[3]))?
        ))
    }

    /// `{ [K in V]: T }`. Malformed input renders the fallback token.
    fn mapped_type(&self, r: NodeRef) -> Result<String> {
        let node = self.graph.node(r);
        let children = node.children();
        let (Some(&key), Some(&source), Some(value)) =
            (children.first(), children.get(1), node.ty)
        else {
            return Ok("?".into());
        };
        Ok(format!(
            "{{ [{} in {}]: {} }}",
            self.type_text(Some(key))?,
            self.type_text(Some(source))?,
            self.type_text(Some(value))?
        ))
    }

    /// One member of an object type body.
    fn object_member(&self, r: NodeRef) -> Result<String> {
        let node = self.graph.node(r);
        match node.kind {
            Kind::IndexSignature => self.index_signature(r),
            Kind::Spread => match node.children().first() {
                Some(&inner) => Ok(format!("...{}", self.type_text(Some(inner))?)),
                None => Ok(String::new()),
            },
            _ => self.signature_text(r),
        }
    }

    /// Joined member signatures in braces; bodies past 300 characters are
    /// wrapped in a collapsible marker for the presentation layer to fold.
    fn object_type(&self, r: NodeRef) -> Result<String> {
        let members: Vec<String> = self
            .graph
            .node(r)
            .children()
            .iter()
            .map(|&c| self.object_member(c))
            .collect::<Result<_>>()?;
        let body = members.join("; ");
        if body.chars().count() > 300 {
            Ok(format!("{{ <doc-more> {body}</doc-more> }}"))
        } else {
            Ok(format!("{{ {body} }}"))
        }
    }

    /// The heritage pseudo-node: partition entries into extends/implements.
    ///
    /// An entry counts as "extends" when the owning declaration is an
    /// interface, or when the entry's resolved kind is itself a class,
    /// interface or component; everything else is "implements".
    fn class_type(&self, r: NodeRef) -> Result<String> {
        let node = self.graph.node(r);
        let owner_is_interface = node
            .ty
            .is_some_and(|owner| self.graph.node(owner).kind == Kind::Interface);

        let mut extends = Vec::new();
        let mut implements = Vec::new();
        for &child in node.children() {
            let link = self.type_text(Some(child))?;
            let target_kind = self.graph.node(child).ty.map(|t| self.graph.node(t).kind);
            let is_extends = owner_is_interface
                || matches!(
                    target_kind,
                    Some(Kind::Interface | Kind::Class | Kind::Component)
                );
            if is_extends {
                extends.push(link);
            } else {
                implements.push(link);
            }
        }

        let mut out = String::new();
        if !extends.is_empty() {
            out.push_str(&format!("extends {}", extends.join(", ")));
        }
        if !implements.is_empty() {
            out.push_str(&format!(" implements {}", implements.join(", ")));
        }
        Ok(format!("<c-t font=\"title-medium\">{out}</c-t>"))
    }
}

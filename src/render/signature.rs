//! The Signature Printer: one-line declaration signatures composed from
//! badges, names, generic and value parameters, and the rendered type.

use crate::error::Result;
use crate::graph::node::{Flags, Kind, NodeRef};

use super::{Renderer, escape};

fn chip(label: &str, color: &str) -> String {
    format!("<c-chip size=\"-1\" color=\"{color}\">{label}</c-chip> ")
}

impl Renderer<'_> {
    /// Leading badge indicators for a declaration's flags.
    pub(crate) fn node_chips(&self, r: NodeRef) -> String {
        let node = self.graph.node(r);
        let flags = node.flags;
        let mut out = String::new();
        if node.docs.as_ref().is_some_and(|d| d.beta) {
            out.push_str(&chip("beta", "warning"));
        }
        for (flag, label, color) in [
            (Flags::STATIC, "static", "primary"),
            (Flags::PROTECTED, "protected", "primary"),
            (Flags::ABSTRACT, "abstract", "primary"),
            (Flags::OVERLOAD, "overload", "primary"),
            (Flags::PRIVATE, "private", "primary"),
            (Flags::DEPRECATED, "deprecated", "error"),
            (Flags::READONLY, "readonly", "primary"),
            (Flags::INTERNAL, "internal", "primary"),
            (Flags::DEFAULT, "default", "primary"),
        ] {
            if flags.has(flag) {
                out.push_str(&chip(label, color));
            }
        }
        out
    }

    /// Escaped display name with the optional marker. Anonymous construct
    /// signatures print as `new`.
    pub(crate) fn signature_name(&self, r: NodeRef) -> String {
        let node = self.graph.node(r);
        if node.name.is_none() && node.kind == Kind::ConstructSignature {
            return "new".into();
        }
        let optional = if node.flags.has(Flags::OPTIONAL) { "?" } else { "" };
        format!("{}{optional}", escape(node.name()))
    }

    /// One parameter: `modifier ...name?: Type = default`.
    pub(crate) fn parameter(&self, r: NodeRef) -> Result<String> {
        let node = self.graph.node(r);
        let flags = node.flags;
        let modifiers = if flags.has(Flags::PUBLIC) {
            "public "
        } else if flags.has(Flags::PRIVATE) {
            "private"
        } else if flags.has(Flags::PROTECTED) {
            "protected "
        } else {
            ""
        };
        let rest = if flags.has(Flags::REST) { "..." } else { "" };
        let optional = if flags.has(Flags::OPTIONAL) { "?" } else { "" };
        let default = match &node.value {
            Some(value) => format!(" = {value}"),
            None => String::new(),
        };
        Ok(format!(
            "{modifiers}{rest}{}{optional}: {}{default}",
            node.name(),
            self.type_text(node.ty)?
        ))
    }

    /// Parenthesized, comma-joined parameter list. Absent parameters render
    /// as nothing at all (distinct from an empty `()` list).
    pub(crate) fn signature_parameters(&self, parameters: Option<&[NodeRef]>) -> Result<String> {
        let Some(parameters) = parameters else {
            return Ok(String::new());
        };
        let parts: Vec<String> = parameters
            .iter()
            .map(|&p| self.parameter(p))
            .collect::<Result<_>>()?;
        Ok(format!("({})", parts.join(", ")))
    }

    /// `[params]: Type`.
    pub(crate) fn index_signature(&self, r: NodeRef) -> Result<String> {
        let node = self.graph.node(r);
        let params: Vec<String> = node
            .parameters
            .as_deref()
            .unwrap_or(&[])
            .iter()
            .map(|&p| self.parameter(p))
            .collect::<Result<_>>()?;
        let ty = match node.ty {
            Some(ty) => self.type_text(Some(ty))?,
            None => "?".into(),
        };
        Ok(format!("[{}]: {ty}", params.join(", ")))
    }

    /// The kind-dependent separator between a declaration head and its type.
    fn type_colon(kind: Kind, has_name: bool) -> &'static str {
        if kind == Kind::TypeAlias {
            return " = ";
        }
        if has_name || kind == Kind::Constructor {
            return ": ";
        }
        if kind == Kind::ReadonlyKeyword {
            return "readonly ";
        }
        // Call/construct signatures and other anonymous callables.
        " => "
    }

    fn signature_type(&self, r: NodeRef) -> Result<String> {
        let node = self.graph.node(r);
        let Some(ty) = node.ty else {
            return Ok(String::new());
        };
        // Class/interface/component headers separate the heritage clause
        // with a space, not a colon.
        if matches!(node.kind, Kind::Class | Kind::Interface | Kind::Component) {
            return Ok(format!(" {}", self.type_text(Some(ty))?));
        }
        let colon = Self::type_colon(node.kind, node.name.is_some());
        Ok(format!("{colon}{}", self.type_text(Some(ty))?))
    }

    /// Default-value suffix. Values past 50 characters are suppressed so
    /// large initializers never land in a signature line.
    fn signature_value(value: Option<&str>) -> String {
        match value {
            Some(v) if v.chars().count() <= 50 => format!(" = {}", escape(v)),
            _ => String::new(),
        }
    }

    /// The plain signature text, without badges.
    pub(crate) fn signature_text(&self, r: NodeRef) -> Result<String> {
        let node = self.graph.node(r);
        if node.kind == Kind::Module {
            return Ok(escape(node.name()));
        }
        if node.kind == Kind::IndexSignature {
            return self.index_signature(r);
        }

        Ok(format!(
            "{}{}{}{}{}",
            self.signature_name(r),
            self.type_arguments(node.type_parameters.as_deref())?,
            self.signature_parameters(node.parameters.as_deref())?,
            self.signature_type(r)?,
            Self::signature_value(node.value.as_deref())
        ))
    }

    /// Full signature: badges plus the signature text.
    pub(crate) fn signature(&self, r: NodeRef) -> Result<String> {
        let node = self.graph.node(r);
        if node.kind == Kind::Module || node.kind == Kind::IndexSignature {
            return self.signature_text(r);
        }
        Ok(format!(
            "{}<div>{}</div>",
            self.node_chips(r),
            self.signature_text(r)?
        ))
    }
}

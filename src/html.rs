//! Page assembly: member cards, module bodies, navigation and page chrome,
//! composed into the final set of output files.

use anyhow::Context;

use crate::error::{RenderError, Result};
use crate::graph::node::{Flags, Kind, NodeRef, Source};
use crate::members::{MemberGroup, declaration_filter, sort_node};
use crate::pages::owns_page;
use crate::render::{Renderer, escape};
use crate::summary::render_summary;

/// One file of the generated documentation set.
#[derive(Debug)]
pub struct OutputFile {
    pub name: String,
    pub content: String,
}

fn anchor(id: Option<u64>, content: String) -> String {
    match id {
        Some(id) => format!("<a name=\"s{id}\"></a>{content}"),
        None => content,
    }
}

impl Renderer<'_> {
    /// "View source" link target for a member card.
    fn source_link(&self, src: &Source) -> Option<String> {
        let repository = self.options.repository.as_deref()?;
        let line = match src.line {
            Some(line) => format!("#L{line}"),
            None => String::new(),
        };
        Some(format!(
            "{}/{}{line}",
            repository.trim_end_matches('/'),
            src.file
        ))
    }

    fn parameter_docs(&self, parameters: &[NodeRef]) -> Result<String> {
        let mut out = String::from("<c-t font=\"subtitle2\">Parameters</c-t><ul>");
        for &p in parameters {
            out.push_str(&format!(
                "<li><code>{}</code>{}</li>",
                self.parameter(p)?,
                self.documentation(p)
            ));
        }
        out.push_str("</ul>");
        Ok(out)
    }

    fn member_body(&self, r: NodeRef) -> Result<String> {
        let node = self.graph.node(r);
        let mut result = format!("<doc-ct>{}</doc-ct>", self.signature(r)?);

        if node.docs.is_some() {
            result.push_str(&self.documentation(r));
        }

        if let Some(parameters) = &node.parameters
            && !parameters.is_empty()
        {
            result.push_str(&self.parameter_docs(parameters)?);
        }

        Ok(result)
    }

    /// A member's detail card, anchored by its id for in-page links.
    pub(crate) fn member_card(&self, r: NodeRef) -> Result<String> {
        let node = self.graph.node(r);
        let src = node
            .primary_source()
            .and_then(|s| self.source_link(s))
            .map(|href| format!(" src=\"{href}\""))
            .unwrap_or_default();
        Ok(anchor(
            node.id,
            format!("<doc-card{src}>{}</doc-card>", self.member_body(r)?),
        ))
    }

    pub(crate) fn member_group_index(&self, group: &MemberGroup) -> String {
        format!(
            "<c-t font=\"h6\">{}</c-t><doc-grd>{}</doc-grd>",
            group.kind.label(),
            group.index.concat()
        )
    }

    fn member_body_group(&self, group: &MemberGroup) -> String {
        if group.body.is_empty() {
            return String::new();
        }
        format!(
            "<c-t font=\"h5\">{}</c-t>{}",
            group.kind.label(),
            group.body.concat()
        )
    }

    fn extended_by(&self, r: NodeRef) -> String {
        let Some(extended_by) = &self.graph.node(r).extended_by else {
            return String::new();
        };
        let links: Vec<String> = extended_by
            .iter()
            .filter(|&&e| self.graph.node(e).name.is_some())
            .map(|&e| self.link(e, None, None))
            .collect();
        if links.is_empty() {
            return String::new();
        }
        format!(
            "<div><c-t font=\"subtitle2\">Extended By:</c-t> {}</div>",
            links.join(", ")
        )
    }

    fn kind_chip(kind: Kind) -> &'static str {
        match kind {
            Kind::Module => "module",
            Kind::Class => "class",
            Kind::Interface => "interface",
            Kind::Component => "component",
            Kind::Namespace => "namespace",
            Kind::Enum => "enum",
            _ => "",
        }
    }

    fn module_title(&self, r: NodeRef) -> Result<String> {
        let node = self.graph.node(r);
        let mut chips = format!("<c-flex gap=\"8\">{}", self.node_chips(r));
        let kind_chip = Self::kind_chip(node.kind);
        if !kind_chip.is_empty() {
            chips.push_str(&format!(
                "<c-chip size=\"-1\" color=\"primary\">{kind_chip}</c-chip> "
            ));
        }
        if let Some(role) = node.docs.as_ref().and_then(|d| d.role.as_deref()) {
            chips.push_str(&format!(
                "<c-chip size=\"-1\" color=\"primary\">role: {role}</c-chip> "
            ));
        }
        if node.flags.has(Flags::DECLARATION_MERGE) {
            chips.push_str("<c-chip size=\"-1\" color=\"primary\">declaration merge</c-chip> ");
        }
        chips.push_str("</c-flex>");

        // Components show their custom-element tag as a subtitle.
        let subtitle = match node.docs.as_ref().and_then(|d| d.tag_name.as_deref()) {
            Some(tag) if node.kind == Kind::Component => {
                format!(" <c-t font=\"subtitle\">&lt;{tag}&gt;</c-t>")
            }
            _ => String::new(),
        };

        Ok(format!(
            "{chips}<c-t font=\"h3\">{}{subtitle}</c-t>",
            self.signature_text(r)?
        ))
    }

    fn members(&self, r: NodeRef) -> Result<String> {
        let groups = self.member_groups(r, false, true)?;
        let inherited = match self.graph.node(r).ty {
            Some(heritage) => self.inherited_members(heritage)?,
            None => String::new(),
        };
        if groups.is_empty() && inherited.is_empty() {
            return Ok(String::new());
        }

        let index: String = groups.iter().map(|g| self.member_group_index(g)).collect();
        let bodies: String = groups.iter().map(|g| self.member_body_group(g)).collect();
        Ok(format!("{index}{inherited}{bodies}"))
    }

    /// The full body of one page.
    pub fn module_body(&self, r: NodeRef) -> Result<String> {
        Ok(format!(
            "{}{}<div style=\"margin-top:32px\">{}</div>{}",
            self.module_title(r)?,
            self.extended_by(r),
            self.documentation(r),
            self.members(r)?
        ))
    }

    fn node_icon(&self, r: NodeRef) -> String {
        let mut target = self.graph.node(r);
        // An export entry may wrap a reference that in turn points at the
        // declaration; resolve both hops before picking the icon.
        if let (Kind::Export, Some(ty)) = (target.kind, target.ty) {
            target = self.graph.node(ty);
        }
        if let (Kind::Reference, Some(ty)) = (target.kind, target.ty) {
            target = self.graph.node(ty);
        }
        let icon = match target.kind {
            Kind::Constant => "K",
            Kind::Variable => "V",
            Kind::Class | Kind::Component => "C",
            Kind::Function => "F",
            Kind::Interface => "I",
            Kind::TypeAlias => "T",
            Kind::Enum => "E",
            Kind::Namespace => "N",
            _ => "?",
        };
        format!("<c-avatar size=\"-1\" text=\"{icon}\"></c-avatar>")
    }

    fn nav_item(&self, title: &str, href: &str) -> String {
        format!("<doc-item href=\"{href}\" external>{title}</doc-item>")
    }

    fn navbar_entry(&self, r: NodeRef) -> String {
        let node = self.graph.node(r);
        let name = match &node.name {
            Some(name) => escape(name),
            None if node.flags.has(Flags::DEFAULT) => "<i>default</i>".into(),
            None => return String::new(),
        };
        let href = crate::pages::href::get_href(self.plan, self.graph, r, None);
        if href.is_empty() {
            return String::new();
        }
        self.nav_item(&format!("{}{name}", self.node_icon(r)), &href)
    }

    fn module_navbar(&self, m: NodeRef) -> String {
        let module = self.graph.node(m);
        let title = if module.name().starts_with("index.ts") {
            "Index"
        } else {
            module.name()
        };
        let href = crate::pages::href::get_href(self.plan, self.graph, m, None);
        let mut out = self.nav_item(&format!("<i>{}</i>", escape(title)), &href);

        let mut children: Vec<NodeRef> = module.children().to_vec();
        children.sort_by(|&a, &b| sort_node(self.graph, a, b));
        for c in children {
            if declaration_filter(self.graph, c)
                && owns_page(self.graph, c)
                && !self.graph.node(c).flags.has(Flags::OVERLOAD)
            {
                out.push_str(&self.navbar_entry(c));
            }
        }
        out
    }

    fn navbar(&self) -> String {
        let home = if self.options.has_readme() {
            format!("{}<c-hr></c-hr>", self.nav_item("Home", "index.html"))
        } else {
            String::new()
        };

        let mut modules = self.plan.nav_modules.clone();
        modules.sort_by(|&a, &b| sort_node(self.graph, a, b));
        let entries: String = modules.iter().map(|&m| self.module_navbar(m)).collect();

        format!("<c-drawer id=\"navbar\"><c-hr></c-hr>{home}{entries}</c-drawer>")
    }

    fn header(&self) -> String {
        let title = &self.options.package_name;
        format!(
            concat!(
                "<!DOCTYPE html>\n",
                "<head><meta charset=\"utf-8\">",
                "<meta name=\"description\" content=\"Documentation for {title}\" />",
                "<title>{title} API Reference</title><style>\n",
                "doc-ct {{ gap:8px;margin-bottom:24px;white-space:wrap;",
                "font-size:18px;display:flex;align-items:center; }}\n",
                "#appbar-toolbar {{max-width: 1200px; margin: auto; width: 100%}}\n",
                "</style></head>\n",
                "<c-page><doc-appbar></doc-appbar>{navbar}<c-body>"
            ),
            title = escape(title),
            navbar = self.navbar()
        )
    }

    fn footer(&self) -> &'static str {
        "</c-body></c-page>"
    }

    fn readme_page(&self) -> anyhow::Result<Option<OutputFile>> {
        let Some(path) = &self.options.readme else {
            return Ok(None);
        };
        if !path.exists() {
            return Ok(None);
        }
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Ok(Some(OutputFile {
            name: "index.html".into(),
            content: self.markdown(&source, false),
        }))
    }

    /// Assemble every output file: one page per planned node, the README
    /// home page, and `summary.json` when enabled.
    pub fn render_files(&self) -> anyhow::Result<Vec<OutputFile>> {
        let mut files = Vec::new();

        if !self.options.no_html {
            if let Some(readme) = self.readme_page()? {
                files.push(readme);
            }
            for &page in &self.plan.output_pages {
                let name = self
                    .plan
                    .page_name(page)
                    .ok_or_else(|| {
                        RenderError::Structural(format!(
                            "no planned page for {}",
                            self.graph.node(page).name()
                        ))
                    })?
                    .to_string();
                files.push(OutputFile {
                    name,
                    content: self.module_body(page)?,
                });
            }

            let header = self.header();
            let footer = self.footer();
            for file in &mut files {
                file.content = format!("{header}{}{footer}", file.content);
            }
        }

        if self.options.summary {
            files.push(OutputFile {
                name: "summary.json".into(),
                content: render_summary(self)?,
            });
        }

        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::node::{Node, SourceList};
    use crate::render::test_support::context;

    fn source() -> SourceList {
        SourceList::One(Source {
            file: "box.ts".into(),
            offset: 0,
            line: Some(4),
        })
    }

    /// Module "box.ts" exporting interface Box<T> with property `value: T`.
    fn box_fixture() -> Vec<Node> {
        let t = Node {
            kind: Kind::TypeParameter,
            name: Some("T".into()),
            ..Node::default()
        };
        let value = Node {
            kind: Kind::Property,
            name: Some("value".into()),
            id: Some(3),
            ty: Some(NodeRef(0)),
            parent: Some(NodeRef(2)),
            source: Some(source()),
            ..Node::default()
        };
        let interface = Node {
            kind: Kind::Interface,
            name: Some("Box".into()),
            id: Some(2),
            flags: Flags::EXPORT,
            type_parameters: Some(vec![NodeRef(0)]),
            children: Some(vec![NodeRef(1)]),
            parent: Some(NodeRef(3)),
            source: Some(source()),
            ..Node::default()
        };
        let module = Node {
            kind: Kind::Module,
            name: Some("box.ts".into()),
            children: Some(vec![NodeRef(2)]),
            ..Node::default()
        };
        vec![t, value, interface, module]
    }

    #[test]
    fn test_interface_page_links_members_by_anchor() {
        let (graph, options, plan) = context(box_fixture(), vec![NodeRef(3)]);
        let rd = Renderer::new(&graph, &options, &plan);

        let body = rd.module_body(NodeRef(2)).unwrap();
        assert!(body.contains("Box&lt;T&gt;"), "got: {body}");
        assert!(body.contains("<a name=\"s3\"></a>"));
        assert!(body.contains("value: T"));
    }

    #[test]
    fn test_member_card_carries_view_source_link() {
        let (graph, mut options, plan) = context(box_fixture(), vec![NodeRef(3)]);
        options.repository = Some("https://github.com/acme/box/blob/main".into());
        let rd = Renderer::new(&graph, &options, &plan);

        let card = rd.member_card(NodeRef(1)).unwrap();
        assert!(
            card.contains("src=\"https://github.com/acme/box/blob/main/box.ts#L4\""),
            "got: {card}"
        );
    }

    #[test]
    fn test_navbar_lists_module_and_page_owning_children() {
        let (graph, options, plan) = context(box_fixture(), vec![NodeRef(3)]);
        let rd = Renderer::new(&graph, &options, &plan);

        let navbar = rd.navbar();
        assert!(navbar.contains("<i>box.ts</i>"));
        assert!(navbar.contains("box--Box.html"));
        assert!(navbar.contains("text=\"I\""), "interface icon: {navbar}");
    }

    #[test]
    fn test_export_of_reference_icon_resolves_declaration() {
        let interface = Node {
            kind: Kind::Interface,
            name: Some("Box".into()),
            id: Some(1),
            flags: Flags::EXPORT,
            source: Some(source()),
            ..Node::default()
        };
        let reference = Node {
            kind: Kind::Reference,
            name: Some("Box".into()),
            ty: Some(NodeRef(0)),
            ..Node::default()
        };
        let export = Node {
            kind: Kind::Export,
            name: Some("Box".into()),
            ty: Some(NodeRef(1)),
            ..Node::default()
        };
        let (graph, options, plan) = context(vec![interface, reference, export], vec![]);
        let rd = Renderer::new(&graph, &options, &plan);

        assert!(rd.node_icon(NodeRef(2)).contains("text=\"I\""));
        assert!(rd.node_icon(NodeRef(1)).contains("text=\"I\""));
    }

    #[test]
    fn test_render_files_emits_pages_in_plan_order() {
        let (graph, options, plan) = context(box_fixture(), vec![NodeRef(3)]);
        let rd = Renderer::new(&graph, &options, &plan);

        let files = rd.render_files().unwrap();
        let names: Vec<&str> = files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["box--Box.html", "box.html"]);
        assert!(files[0].content.starts_with("<!DOCTYPE html>"));
        assert!(files[0].content.ends_with("</c-body></c-page>"));
    }

    #[test]
    fn test_no_html_emits_only_summary() {
        let (graph, mut options, plan) = context(box_fixture(), vec![NodeRef(3)]);
        options.no_html = true;
        options.summary = true;
        let rd = Renderer::new(&graph, &options, &plan);

        let files = rd.render_files().unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].name, "summary.json");
        serde_json::from_str::<serde_json::Value>(&files[0].content).unwrap();
    }

    #[test]
    fn test_component_title_shows_tag_name() {
        let mut nodes = box_fixture();
        nodes[2].kind = Kind::Component;
        nodes[2].docs = Some(crate::graph::node::DocBlock {
            tag_name: Some("ui-box".into()),
            ..Default::default()
        });
        let (graph, options, plan) = context(nodes, vec![NodeRef(3)]);
        let rd = Renderer::new(&graph, &options, &plan);

        let title = rd.module_title(NodeRef(2)).unwrap();
        assert!(title.contains("&lt;ui-box&gt;"), "got: {title}");
        assert!(title.contains(">component</c-chip>"));
    }
}

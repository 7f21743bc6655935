//! Documentation-block rendering: prose, `@example` demos, `@see` lines and
//! inline `@link` spans resolved against the symbol graph.

use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;
use url::Url;

use crate::graph::node::{DocItem, DocValue, NodeRef};

use super::{Renderer, escape};

/// Splits a `@link` body into a target and an optional display title,
/// separated by `|` or whitespace.
static LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([^|]+?)\s*(?:[|\s]\s*(.+))?\s*$").unwrap());

fn markdown_options() -> comrak::Options<'static> {
    let mut options = comrak::Options::default();
    options.extension.strikethrough = true;
    options.extension.table = true;
    options.extension.autolink = true;
    options.render.github_pre_lang = true;
    options.render.r#unsafe = true;
    options
}

/// `<caption>Title</caption>` on the first line of an example names it; the
/// remainder is the example body.
fn parse_example(value: &str) -> (String, String) {
    if let Some(rest) = value.strip_prefix("<caption>") {
        let (first, body) = rest.split_once('\n').unwrap_or((rest, ""));
        let title = first.trim().trim_end_matches("</caption>").trim().to_string();
        return (title, body.trim().to_string());
    }
    (String::new(), value.to_string())
}

/// Paragraph breaks for plain (non-markdown) prose.
fn format_content(text: &str) -> String {
    static PARAGRAPH_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\r?\n\r?\n").unwrap());
    PARAGRAPH_RE.replace_all(text, "</p><p>").into_owned()
}

impl Renderer<'_> {
    /// Render markdown prose. Inline rendering drops the single enclosing
    /// paragraph so the result can be embedded mid-markup.
    pub(crate) fn markdown(&self, content: &str, inline: bool) -> String {
        let html = comrak::markdown_to_html(content, &markdown_options());
        if inline {
            let trimmed = html.trim();
            if let Some(body) = trimmed
                .strip_prefix("<p>")
                .and_then(|s| s.strip_suffix("</p>"))
                && !body.contains("<p>")
            {
                return body.to_string();
            }
        }
        html
    }

    fn external_link(&self, target: &str, title: Option<&str>) -> String {
        let href = match &self.options.base_href {
            Some(base) => match Url::parse(base).and_then(|b| b.join(target)) {
                Ok(url) => url.to_string(),
                Err(error) => {
                    warn!(target, %error, "could not resolve link against base href");
                    target.to_string()
                }
            },
            None => target.to_string(),
        };
        format!("<a href=\"{href}\">{}</a>", escape(title.unwrap_or(target)))
    }

    /// Resolve a `@link` body: a known symbol name links to its page, any
    /// other target becomes an external anchor.
    pub(crate) fn doc_link(&self, value: &str) -> String {
        let (name, title) = match LINK_RE.captures(value) {
            Some(caps) => (
                caps.get(1).map_or(value, |m| m.as_str()).to_string(),
                caps.get(2).map(|m| m.as_str().to_string()),
            ),
            None => (value.to_string(), None),
        };

        match self.graph.symbol_by_name(&name) {
            Some(symbol) => {
                let content = title.as_deref().map(escape);
                self.link(symbol, content.as_deref(), None)
            }
            None => {
                if !name.contains("://") {
                    warn!(target = %name, "doc link does not match any symbol");
                }
                self.external_link(&name, title.as_deref())
            }
        }
    }

    /// Flatten a documentation value to markup, resolving inline `link`
    /// spans and escaping everything else.
    fn doc_value(&self, value: &DocValue) -> String {
        match value {
            DocValue::Text(text) => text.clone(),
            DocValue::Spans(spans) => spans
                .iter()
                .map(|span| {
                    if span.tag.as_deref() == Some("link") {
                        self.doc_link(&span.value)
                    } else {
                        escape(&span.value)
                    }
                })
                .collect::<Vec<_>>()
                .join(" "),
        }
    }

    /// A named or anonymous example block: caption heading plus the body,
    /// highlighted client-side when markdown is disabled.
    fn demo(&self, value: &str) -> String {
        let (title, body) = parse_example(value);
        let title = if title.is_empty() { "Example".into() } else { title };
        let rendered = if self.options.markdown {
            self.markdown(&body, false)
        } else {
            format!("<doc-hl><!--{body}--></doc-hl>")
        };
        format!("<c-t font=\"h6\">{title}</c-t>{rendered}")
    }

    fn prose(&self, value: &str) -> String {
        if self.options.markdown {
            let inline = !value.contains('\n');
            let text = self.markdown(value, inline);
            if inline { format!("<p>{text}</p>") } else { text }
        } else {
            format!("<p>{}</p>", format_content(value))
        }
    }

    fn doc_see(&self, items: &[&DocItem]) -> String {
        let rendered: Vec<String> = items
            .iter()
            .map(|item| match &item.value {
                DocValue::Text(name) => match self.graph.symbol_by_name(name) {
                    Some(symbol) => self.link(symbol, None, None),
                    None if self.options.markdown => self.markdown(name, true),
                    None => escape(name),
                },
                value => self.doc_value(value),
            })
            .collect();
        format!("<p>See: {}</p>", rendered.join(", "))
    }

    /// Render a node's full documentation block.
    pub(crate) fn documentation(&self, r: NodeRef) -> String {
        let Some(docs) = &self.graph.node(r).docs else {
            return String::new();
        };

        let mut related: Vec<&DocItem> = Vec::new();
        let mut out = String::new();

        for item in &docs.content {
            match item.tag.as_deref() {
                Some("demo" | "demoonly" | "example") => {
                    out.push_str(&self.demo(&self.doc_value(&item.value)));
                }
                Some("see") => related.push(item),
                Some("link") => {
                    if let DocValue::Text(value) = &item.value {
                        out.push_str(&self.doc_link(value));
                    }
                }
                Some("return") => {
                    let text = self.prose(&self.doc_value(&item.value));
                    out.push_str(&format!("<c-t font=\"h6\">Returns</c-t>{text}"));
                }
                Some("param") => out.push_str(&self.prose(&self.doc_value(&item.value))),
                // Unknown tags are dropped, untagged items are prose.
                Some(_) => {}
                None => out.push_str(&self.prose(&self.doc_value(&item.value))),
            }
        }

        if !related.is_empty() {
            out.push_str(&self.doc_see(&related));
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::node::{DocBlock, DocSpan, Flags, Kind, Node, Source, SourceList};
    use crate::render::test_support::context;

    fn widget() -> Node {
        Node {
            kind: Kind::Class,
            name: Some("Widget".into()),
            id: Some(7),
            flags: Flags::EXPORT,
            source: Some(SourceList::One(Source {
                file: "widget.ts".into(),
                offset: 0,
                line: Some(1),
            })),
            ..Node::default()
        }
    }

    fn doc(items: Vec<DocItem>) -> DocBlock {
        DocBlock {
            content: items,
            ..DocBlock::default()
        }
    }

    fn item(tag: Option<&str>, value: &str) -> DocItem {
        DocItem {
            tag: tag.map(String::from),
            value: DocValue::Text(value.into()),
        }
    }

    #[test]
    fn test_parse_example_caption() {
        let (title, body) = parse_example("<caption>Basic usage</caption>\nlet x = 1;");
        assert_eq!(title, "Basic usage");
        assert_eq!(body, "let x = 1;");

        let (title, body) = parse_example("no caption here");
        assert_eq!(title, "");
        assert_eq!(body, "no caption here");
    }

    #[test]
    fn test_untagged_prose_becomes_paragraph() {
        let node = Node {
            kind: Kind::Function,
            name: Some("go".into()),
            docs: Some(doc(vec![item(None, "First.\n\nSecond.")])),
            ..Node::default()
        };
        let (graph, options, plan) = context(vec![node], vec![]);
        let rd = Renderer::new(&graph, &options, &plan);
        assert_eq!(
            rd.documentation(NodeRef(0)),
            "<p>First.</p><p>Second.</p>"
        );
    }

    #[test]
    fn test_see_resolves_symbol_link() {
        let target = widget();
        let node = Node {
            kind: Kind::Function,
            name: Some("go".into()),
            docs: Some(doc(vec![item(Some("see"), "Widget")])),
            ..Node::default()
        };
        let (graph, options, plan) = context(vec![target, node], vec![]);
        let rd = Renderer::new(&graph, &options, &plan);
        let html = rd.documentation(NodeRef(1));
        assert!(html.starts_with("<p>See: <a href=\""), "got: {html}");
        assert!(html.contains(">Widget</a>"));
    }

    #[test]
    fn test_link_span_with_title() {
        let target = widget();
        let node = Node {
            kind: Kind::Function,
            name: Some("go".into()),
            docs: Some(doc(vec![DocItem {
                tag: None,
                value: DocValue::Spans(vec![
                    DocSpan {
                        tag: None,
                        value: "uses".into(),
                    },
                    DocSpan {
                        tag: Some("link".into()),
                        value: "Widget|the widget".into(),
                    },
                ]),
            }])),
            ..Node::default()
        };
        let (graph, options, plan) = context(vec![target, node], vec![]);
        let rd = Renderer::new(&graph, &options, &plan);
        let html = rd.documentation(NodeRef(1));
        assert!(html.contains(">the widget</a>"), "got: {html}");
    }

    #[test]
    fn test_unresolved_link_joins_base_href() {
        let node = Node {
            kind: Kind::Function,
            name: Some("go".into()),
            docs: Some(doc(vec![item(Some("link"), "guide.html")])),
            ..Node::default()
        };
        let (graph, mut options, plan) = context(vec![node], vec![]);
        options.base_href = Some("https://docs.example.com/pkg/".into());
        let rd = Renderer::new(&graph, &options, &plan);
        assert_eq!(
            rd.documentation(NodeRef(0)),
            "<a href=\"https://docs.example.com/pkg/guide.html\">guide.html</a>"
        );
    }

    #[test]
    fn test_example_without_markdown_uses_highlight_block() {
        let node = Node {
            kind: Kind::Function,
            name: Some("go".into()),
            flags: Flags::EXPORT,
            docs: Some(doc(vec![item(Some("example"), "go(1)")])),
            ..Node::default()
        };
        let (graph, options, plan) = context(vec![node], vec![]);
        let rd = Renderer::new(&graph, &options, &plan);
        assert_eq!(
            rd.documentation(NodeRef(0)),
            "<c-t font=\"h6\">Example</c-t><doc-hl><!--go(1)--></doc-hl>"
        );
    }

    #[test]
    fn test_markdown_inline_strips_paragraph() {
        let (graph, mut options, plan) = context(vec![], vec![]);
        options.markdown = true;
        let rd = Renderer::new(&graph, &options, &plan);
        assert_eq!(rd.markdown("some *emphasis*", true), "some <em>emphasis</em>");
    }

    #[test]
    fn test_unknown_tags_are_dropped() {
        let node = Node {
            kind: Kind::Function,
            name: Some("go".into()),
            docs: Some(doc(vec![item(Some("internalnote"), "secret")])),
            ..Node::default()
        };
        let (graph, options, plan) = context(vec![node], vec![]);
        let rd = Renderer::new(&graph, &options, &plan);
        assert_eq!(rd.documentation(NodeRef(0)), "");
    }
}

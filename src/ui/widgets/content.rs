//! Markdown rendering for post bodies and for whole pages.
//!
//! [`render_document`] walks a parsed page and swaps the contents of every
//! element classed `text/markdown` for its rendered HTML. The page is
//! processed once per call; nothing is re-rendered incrementally.

use maud::{html, PreEscaped, Render};
use pulldown_cmark::{Options, Parser};
use scraper::node::Doctype;
use scraper::{ElementRef, Html, Node};

pub const MARKDOWN_CLASS: &str = "text/markdown";

/// Elements whose text children are written out unescaped. `noscript` is
/// included because pages are rendered for a browser with scripting on.
const RAW_TEXT_ELEMENTS: &[&str] = &[
    "script", "style", "xmp", "iframe", "noembed", "noframes", "plaintext", "noscript",
];

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "basefont", "bgsound", "br", "col", "embed", "frame", "hr", "img", "input",
    "keygen", "link", "meta", "param", "source", "track", "wbr",
];

pub fn render_markdown(markdown: &str) -> String {
    let options =
        Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS;
    let parser = Parser::new_ext(markdown, options);
    let mut html_output = String::new();
    pulldown_cmark::html::push_html(&mut html_output, parser);
    html_output
}

/// Markup for a post body according to its content type.
///
/// Image types are embedded as a `data:` URL, with the content used as-is
/// (e.g. `image/png;base64` plus the base64 payload).
pub fn render_post_content(content_type: &str, content: &str) -> String {
    let markup = if content_type == MARKDOWN_CLASS {
        html! {
            div class=(MARKDOWN_CLASS) { (PreEscaped(render_markdown(content))) }
        }
    } else if content_type.starts_with("image/") {
        html! {
            img class="post-image" src={ "data:" (content_type) "," (content) } alt="";
        }
    } else {
        html! {
            p class=(content_type) { (content) }
        }
    };
    markup.into_string()
}

/// Render every markdown-flagged element of an HTML document.
///
/// Everything else is written back as parsed: the doctype with its public
/// and system identifiers, comments, namespaced attribute names such as
/// `xlink:href`, and raw-text elements without entity escaping.
pub fn render_document(source: &str) -> String {
    let document = Html::parse_document(source);
    let mut out = String::with_capacity(source.len());

    let mut rendered = 0usize;
    for node in document.tree.root().children() {
        match node.value() {
            Node::Doctype(doctype) => write_doctype(doctype, &mut out),
            Node::Comment(comment) => write_comment(comment, &mut out),
            Node::Element(_) => {
                if let Some(element) = ElementRef::wrap(node) {
                    write_element(element, &mut out, &mut rendered);
                }
            }
            _ => {}
        }
    }
    tracing::debug!(blocks = rendered, "rendered markdown blocks");
    out
}

fn write_doctype(doctype: &Doctype, out: &mut String) {
    out.push_str("<!DOCTYPE ");
    out.push_str(doctype.name());
    match (doctype.public_id(), doctype.system_id()) {
        ("", "") => {}
        ("", system) => {
            out.push_str(" SYSTEM \"");
            out.push_str(system);
            out.push('"');
        }
        (public, system) => {
            out.push_str(" PUBLIC \"");
            out.push_str(public);
            out.push('"');
            if !system.is_empty() {
                out.push_str(" \"");
                out.push_str(system);
                out.push('"');
            }
        }
    }
    out.push('>');
}

fn write_comment(comment: &str, out: &mut String) {
    out.push_str("<!--");
    out.push_str(comment);
    out.push_str("-->");
}

fn is_markdown_block(element: &ElementRef) -> bool {
    element.value().classes().any(|c| c == MARKDOWN_CLASS)
}

fn write_element(element: ElementRef, out: &mut String, rendered: &mut usize) {
    let name = element.value().name();

    out.push('<');
    out.push_str(name);
    for (attr, value) in element.value().attrs.iter() {
        out.push(' ');
        if let Some(prefix) = &attr.prefix {
            out.push_str(prefix);
            out.push(':');
        }
        out.push_str(&attr.local);
        out.push_str("=\"");
        value.render_to(out);
        out.push('"');
    }
    out.push('>');

    if VOID_ELEMENTS.contains(&name) {
        return;
    }

    if is_markdown_block(&element) {
        let source: String = element.text().collect();
        out.push_str(&render_markdown(&dedent(&source)));
        *rendered += 1;
    } else {
        let raw = RAW_TEXT_ELEMENTS.contains(&name);
        for child in element.children() {
            match child.value() {
                Node::Text(text) if raw => out.push_str(text),
                Node::Text(text) => text.render_to(out),
                Node::Comment(comment) => write_comment(comment, out),
                Node::Element(_) => {
                    if let Some(child) = ElementRef::wrap(child) {
                        write_element(child, out, rendered);
                    }
                }
                _ => {}
            }
        }
    }

    out.push_str("</");
    out.push_str(name);
    out.push('>');
}

/// Strip the indentation shared by all non-blank lines, so markup nesting in
/// a template does not turn prose into an indented code block.
fn dedent(text: &str) -> String {
    let indent = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.len() - line.trim_start().len())
        .min()
        .unwrap_or(0);

    text.lines()
        .map(|line| line.get(indent..).unwrap_or_else(|| line.trim_start()))
        .collect::<Vec<_>>()
        .join("\n")
        .trim_matches('\n')
        .to_string()
}

use std::fs;
use std::path::Path;

use crate::error::CoreError;
use crate::model::{Content, Document, Element};

/// Output formatting for [`write_document`].
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlWriteOpts {
    /// Indented, one-element-per-line output instead of compact.
    pub pretty: bool,
}

const DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"utf-8\"?>";
const INDENT: &str = "  ";

/// Serialize the document to a UTF-8 string. Attributes are written in
/// stored order, which keeps the root namespace declarations intact.
pub fn write_document(doc: &Document, opts: XmlWriteOpts) -> String {
    let mut out = String::with_capacity(1024);
    out.push_str(DECLARATION);
    out.push('\n');
    write_element(&mut out, &doc.root, 0, opts.pretty);
    if opts.pretty {
        out.push('\n');
    }
    out
}

pub fn write_document_file(
    path: &Path,
    doc: &Document,
    opts: XmlWriteOpts,
) -> Result<(), CoreError> {
    fs::write(path, write_document(doc, opts))?;
    Ok(())
}

fn write_element(out: &mut String, element: &Element, depth: usize, pretty: bool) {
    out.push('<');
    out.push_str(&element.name);
    for (name, value) in &element.attributes {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        escape_into(out, value, true);
        out.push('"');
    }
    if element.children.is_empty() {
        out.push_str(" />");
        return;
    }
    out.push('>');

    let has_child_elements = element
        .children
        .iter()
        .any(|c| matches!(c, Content::Element(_)));
    let indent_children = pretty && has_child_elements && !mixed(element);
    for child in &element.children {
        match child {
            Content::Text(t) => escape_into(out, t, false),
            Content::Element(e) => {
                if indent_children {
                    out.push('\n');
                    push_indent(out, depth + 1);
                }
                write_element(out, e, depth + 1, pretty);
            }
        }
    }
    if indent_children {
        out.push('\n');
        push_indent(out, depth);
    }
    out.push_str("</");
    out.push_str(&element.name);
    out.push('>');
}

// Mixed content keeps its exact spacing even in pretty mode.
fn mixed(element: &Element) -> bool {
    let mut saw_text = false;
    let mut saw_element = false;
    for c in &element.children {
        match c {
            Content::Text(_) => saw_text = true,
            Content::Element(_) => saw_element = true,
        }
    }
    saw_text && saw_element
}

fn push_indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
}

fn escape_into(out: &mut String, s: &str, attribute: bool) {
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
}

//! HTML Serialization (innerHTML/outerHTML)
//!
//! Key features:
//! - innerHTML/outerHTML serialization
//! - Proper HTML escaping
//! - Void element handling
//! - Raw text for `script` and `style`

use domq_dom::{DomTree, NodeData, NodeId};

/// HTML serializer
#[derive(Debug, Clone, Default)]
pub struct HtmlSerializer;

/// Void elements (no end tag)
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Raw text elements (no escaping for content)
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

enum Step {
    Node(NodeId),
    EndTag(NodeId),
}

impl HtmlSerializer {
    pub fn new() -> Self {
        Self
    }

    /// Serialize innerHTML of a node (children only)
    pub fn serialize_inner(&self, tree: &DomTree, node_id: NodeId) -> String {
        let mut output = String::new();
        if tree.tag_name(node_id).is_some_and(is_raw_text) {
            write_raw_text(tree, node_id, &mut output);
            return output;
        }
        let mut stack = Vec::new();
        push_children(tree, node_id, &mut stack);
        self.write(tree, stack, &mut output);
        output
    }

    /// Serialize outerHTML of a node (including the node itself)
    pub fn serialize_outer(&self, tree: &DomTree, node_id: NodeId) -> String {
        let mut output = String::new();
        self.write(tree, vec![Step::Node(node_id)], &mut output);
        output
    }

    fn write(&self, tree: &DomTree, mut stack: Vec<Step>, output: &mut String) {
        while let Some(step) = stack.pop() {
            let node_id = match step {
                Step::Node(id) => id,
                Step::EndTag(id) => {
                    if let Some(tag) = tree.tag_name(id) {
                        output.push_str("</");
                        output.push_str(tag);
                        output.push('>');
                    }
                    continue;
                }
            };
            let Some(node) = tree.get(node_id) else {
                continue;
            };

            match node.data() {
                NodeData::Document | NodeData::DocumentFragment => {
                    push_children(tree, node_id, &mut stack);
                }
                NodeData::Element(elem) => {
                    let tag = elem.tag_name();

                    // Start tag
                    output.push('<');
                    output.push_str(tag);
                    for attr in elem.attributes().iter() {
                        output.push(' ');
                        output.push_str(&attr.name);
                        output.push_str("=\"");
                        escape_attribute(&attr.value, output);
                        output.push('"');
                    }
                    output.push('>');

                    if is_void(tag) {
                        continue;
                    }
                    if is_raw_text(tag) {
                        write_raw_text(tree, node_id, output);
                        stack.push(Step::EndTag(node_id));
                    } else {
                        stack.push(Step::EndTag(node_id));
                        push_children(tree, node_id, &mut stack);
                    }
                }
                NodeData::Text(text) => escape_text(text, output),
                NodeData::Comment(text) => {
                    output.push_str("<!--");
                    output.push_str(text);
                    output.push_str("-->");
                }
            }
        }
    }
}

fn push_children(tree: &DomTree, node_id: NodeId, stack: &mut Vec<Step>) {
    stack.extend(tree.children(node_id).iter().rev().map(|&c| Step::Node(c)));
}

/// Text children written verbatim
fn write_raw_text(tree: &DomTree, node_id: NodeId, output: &mut String) {
    for &child in tree.children(node_id) {
        if let Some(text) = tree.get(child).and_then(|c| c.as_text()) {
            output.push_str(text);
        }
    }
}

fn is_void(tag: &str) -> bool {
    VOID_ELEMENTS.iter().any(|v| v.eq_ignore_ascii_case(tag))
}

fn is_raw_text(tag: &str) -> bool {
    RAW_TEXT_ELEMENTS.iter().any(|r| r.eq_ignore_ascii_case(tag))
}

/// Escape text content for HTML
fn escape_text(text: &str, output: &mut String) {
    for c in text.chars() {
        match c {
            '&' => output.push_str("&amp;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            '\u{a0}' => output.push_str("&nbsp;"),
            _ => output.push(c),
        }
    }
}

/// Escape attribute value
fn escape_attribute(text: &str, output: &mut String) {
    for c in text.chars() {
        match c {
            '&' => output.push_str("&amp;"),
            '"' => output.push_str("&quot;"),
            '\u{a0}' => output.push_str("&nbsp;"),
            _ => output.push(c),
        }
    }
}

/// Utility: Get innerHTML of an element
pub fn get_inner_html(tree: &DomTree, node_id: NodeId) -> String {
    HtmlSerializer::new().serialize_inner(tree, node_id)
}

/// Utility: Get outerHTML of an element
pub fn get_outer_html(tree: &DomTree, node_id: NodeId) -> String {
    HtmlSerializer::new().serialize_outer(tree, node_id)
}

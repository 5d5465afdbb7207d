//! HTML5 Parser implementation
//!
//! Uses html5ever's RcDom and converts it into a domq [`Document`] through
//! the ordinary tree-building API. The conversion walks an explicit stack, so
//! deeply nested markup cannot exhaust the call stack.

use domq_dom::{Document, DomTree, NodeId, NodeOperations};
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData as RcNodeData, RcDom};

use crate::HtmlError;

/// HTML5 parser
#[derive(Debug, Default)]
pub struct HtmlParser;

impl HtmlParser {
    /// Create a new HTML parser
    pub fn new() -> Self {
        Self
    }

    /// Parse HTML string into a Document
    pub fn parse(&self, html: &str) -> Result<Document, HtmlError> {
        self.parse_with_url(html, "about:blank")
    }

    /// Parse HTML with a document URL
    pub fn parse_with_url(&self, html: &str, url: &str) -> Result<Document, HtmlError> {
        let dom = parse_document(RcDom::default(), Default::default())
            .from_utf8()
            .read_from(&mut html.as_bytes())?;

        for error in dom.errors.borrow().iter() {
            tracing::trace!("HTML parse error in {}: {}", url, error);
        }

        let mut document = Document::empty(url);
        let root = document.root();
        import(&dom.document, document.tree_mut(), root)?;

        tracing::debug!("Imported {} nodes from {}", document.tree().len(), url);
        Ok(document)
    }
}

/// Copy the children of `source` under `target`, depth first in source order.
///
/// Doctypes and processing instructions have no tree counterpart and are
/// skipped. Template contents are imported as the template's children.
fn import(source: &Handle, tree: &mut DomTree, target: NodeId) -> Result<(), HtmlError> {
    let mut stack: Vec<(Handle, NodeId)> = children_of(source)
        .into_iter()
        .rev()
        .map(|child| (child, target))
        .collect();

    while let Some((handle, parent)) = stack.pop() {
        let id = match &handle.data {
            RcNodeData::Text { contents } => tree.create_text(&contents.borrow()),
            RcNodeData::Comment { contents } => tree.create_comment(contents),
            RcNodeData::Element { name, attrs, .. } => {
                let attrs: Vec<(String, String)> = attrs
                    .borrow()
                    .iter()
                    .map(|attr| {
                        let name = match &attr.name.prefix {
                            Some(prefix) => format!("{}:{}", prefix, attr.name.local),
                            None => attr.name.local.to_string(),
                        };
                        (name, attr.value.to_string())
                    })
                    .collect();
                tree.create_element_with_attributes(
                    &name.local,
                    attrs.iter().map(|(n, v)| (n.as_str(), v.as_str())),
                )
            }
            RcNodeData::Document
            | RcNodeData::Doctype { .. }
            | RcNodeData::ProcessingInstruction { .. } => continue,
        };
        tree.append_child(parent, id)?;

        for child in children_of(&handle).into_iter().rev() {
            stack.push((child, id));
        }
    }
    Ok(())
}

fn children_of(handle: &Handle) -> Vec<Handle> {
    if let RcNodeData::Element {
        template_contents, ..
    } = &handle.data
    {
        if let Some(contents) = template_contents.borrow().as_ref() {
            return contents.children.borrow().clone();
        }
    }
    handle.children.borrow().clone()
}

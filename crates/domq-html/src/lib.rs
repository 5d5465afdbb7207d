//! domq HTML - parser boundary and serializer
//!
//! Imports HTML through html5ever into a [`Document`] and writes trees back
//! out as `innerHTML`/`outerHTML` strings.

mod parser;
mod serializer;

pub use parser::HtmlParser;
pub use serializer::{get_inner_html, get_outer_html, HtmlSerializer};

use domq_dom::{Document, DomError};

/// HTML import errors
#[derive(Debug, thiserror::Error)]
pub enum HtmlError {
    /// Reading the input into the parser failed
    #[error("failed to read HTML input: {0}")]
    Io(#[from] std::io::Error),

    /// The tree rejected an imported node
    #[error("failed to build document: {0}")]
    Dom(#[from] DomError),
}

/// Parse an HTML string into a document
pub fn parse(html: &str) -> Result<Document, HtmlError> {
    HtmlParser::new().parse(html)
}

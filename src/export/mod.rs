//! Document export - renderers over a [`DocumentContext`]
//!
//! Word/PDF rendering and LLM drafting live outside this crate. Renderers
//! here produce the plain-text formats those collaborators start from.

pub mod csv;
pub mod markdown;

use thiserror::Error;

use crate::core::context::DocumentContext;

pub use self::csv::CsvRenderer;
pub use self::markdown::MarkdownRenderer;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Template error: {0}")]
    Template(#[from] tera::Error),

    #[error("Template '{0}' is not embedded in this build")]
    MissingTemplate(String),

    #[error("CSV error: {0}")]
    Csv(#[from] ::csv::Error),

    #[error("Rendered output is not valid UTF-8")]
    Encoding,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Renders a document context into a text format
pub trait DocumentRenderer {
    /// File extension for the rendered output, without the dot
    fn extension(&self) -> &'static str;

    fn render(&self, context: &DocumentContext) -> Result<String, ExportError>;
}

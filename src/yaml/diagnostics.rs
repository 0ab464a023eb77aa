//! YAML error diagnostics with source spans

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Errors reading or parsing a YAML document
#[derive(Debug, Error, Diagnostic)]
pub enum YamlError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Syntax(#[from] YamlSyntaxError),

    #[error("Failed to read file: {0}")]
    #[diagnostic(code(rams::yaml::io))]
    Io(#[from] std::io::Error),
}

/// A YAML syntax or schema error pointing at the offending location
#[derive(Debug, Error, Diagnostic)]
#[error("Invalid YAML in {filename}: {message}")]
#[diagnostic(
    code(rams::yaml::syntax),
    help("Check indentation and field names against the bundled knowledge base files")
)]
pub struct YamlSyntaxError {
    pub filename: String,

    pub message: String,

    /// 1-based line number, when serde reported one
    pub line: Option<usize>,

    #[source_code]
    src: NamedSource<String>,

    #[label("here")]
    span: Option<SourceSpan>,
}

impl YamlSyntaxError {
    /// Build a diagnostic from a serde_yml error and the source it came from
    pub fn from_serde_error(err: &serde_yml::Error, content: &str, filename: &str) -> Self {
        let location = err.location();
        let span = location.as_ref().map(|loc| {
            let offset = loc.index().min(content.len());
            SourceSpan::from((offset, 1usize.min(content.len() - offset)))
        });

        Self {
            filename: filename.to_string(),
            message: err.to_string(),
            line: location.map(|loc| loc.line()),
            src: NamedSource::new(filename, content.to_string()),
            span,
        }
    }
}

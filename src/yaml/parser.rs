//! YAML parsing with error handling

use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

use crate::yaml::diagnostics::{YamlError, YamlSyntaxError};

/// Parse a knowledge base, session or config document
///
/// `source` names the document in diagnostics: a path for files on disk, the
/// embedded name for bundled knowledge base files.
pub fn parse_yaml<T: DeserializeOwned>(content: &str, source: &str) -> Result<T, YamlError> {
    match serde_yml::from_str(content) {
        Ok(value) => Ok(value),
        Err(err) => {
            let diagnostic = YamlSyntaxError::from_serde_error(&err, content, source);
            tracing::debug!(
                source,
                line = diagnostic.line,
                error = %diagnostic.message,
                "rejected YAML document"
            );
            Err(YamlError::Syntax(diagnostic))
        }
    }
}

/// Read and parse a YAML document from disk
pub fn parse_yaml_file<T: DeserializeOwned>(path: &Path) -> Result<T, YamlError> {
    let content = fs::read_to_string(path).map_err(|err| {
        tracing::debug!(path = %path.display(), error = %err, "cannot read YAML document");
        YamlError::Io(err)
    })?;
    parse_yaml(&content, &path.display().to_string())
}

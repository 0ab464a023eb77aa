//! Markdown RAMS draft rendered from an embedded tera template

use rust_embed::Embed;
use tera::{Context, Tera};

use crate::core::context::DocumentContext;
use crate::export::{DocumentRenderer, ExportError};

#[derive(Embed)]
#[folder = "templates/"]
struct EmbeddedTemplates;

const TEMPLATE_NAME: &str = "rams.md.tera";

pub struct MarkdownRenderer {
    tera: Tera,
}

impl MarkdownRenderer {
    /// Renderer using the bundled template
    pub fn new() -> Result<Self, ExportError> {
        let file = EmbeddedTemplates::get(TEMPLATE_NAME)
            .ok_or_else(|| ExportError::MissingTemplate(TEMPLATE_NAME.to_string()))?;
        let source = std::str::from_utf8(&file.data).map_err(|_| ExportError::Encoding)?;
        Self::from_template(source)
    }

    /// Renderer using a caller-supplied template source
    pub fn from_template(source: &str) -> Result<Self, ExportError> {
        let mut tera = Tera::default();
        tera.add_raw_template(TEMPLATE_NAME, source)?;
        Ok(Self { tera })
    }
}

impl DocumentRenderer for MarkdownRenderer {
    fn extension(&self) -> &'static str {
        "md"
    }

    fn render(&self, context: &DocumentContext) -> Result<String, ExportError> {
        let ctx = Context::from_serialize(context)?;
        Ok(self.tera.render(TEMPLATE_NAME, &ctx)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::knowledge_base::KnowledgeBase;
    use crate::core::session::{ProjectDetails, RamsSession};

    #[test]
    fn test_render_bundled_template() {
        let kb = KnowledgeBase::embedded().unwrap();
        let mut project = ProjectDetails::new("Unit 4 Refit");
        project.client = Some("Acme Estates".to_string());
        let mut session = RamsSession::new(project);
        session.set_selection(&kb, vec!["distribution_board".to_string()]);

        let ctx = DocumentContext::build(&kb, &session);
        let md = MarkdownRenderer::new().unwrap().render(&ctx).unwrap();

        assert!(md.starts_with("# Risk Assessment and Method Statement: Unit 4 Refit"));
        assert!(md.contains("| Client | Acme Estates |"));
        assert!(md.contains("| Site | - |"));
        assert!(md.contains("### 1. Distribution Board Installation"));
        assert!(md.contains("Arc Flash"));
        assert!(md.contains("3 x 4 = 12 (high)"));
        assert!(md.contains("- Permit to Work (Electrical)"));
        assert!(md.contains("- Arc-rated face shield"));
    }

    #[test]
    fn test_render_empty_session() {
        let kb = KnowledgeBase::embedded().unwrap();
        let session = RamsSession::new(ProjectDetails::new("Empty"));
        let ctx = DocumentContext::build(&kb, &session);
        let md = MarkdownRenderer::new().unwrap().render(&ctx).unwrap();

        assert!(md.contains("No activities selected."));
        assert!(md.contains("- None specified"));
    }

    #[test]
    fn test_custom_template() {
        let kb = KnowledgeBase::embedded().unwrap();
        let session = RamsSession::new(ProjectDetails::new("Custom"));
        let ctx = DocumentContext::build(&kb, &session);
        let renderer = MarkdownRenderer::from_template("Job: {{ project.name }}").unwrap();
        assert_eq!(renderer.render(&ctx).unwrap(), "Job: Custom");
    }

    #[test]
    fn test_invalid_template_rejected() {
        assert!(matches!(
            MarkdownRenderer::from_template("{% for %}"),
            Err(ExportError::Template(_))
        ));
    }
}

use pulldown_cmark::{Event, Options, Parser, html};

/// How a fetched recipe payload is displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Pdf,
    Text,
}

impl ContentKind {
    /// The single place a recipe reference is mapped to a renderer.
    /// Anything not recognised is treated as markdown text.
    pub fn classify(reference: &str) -> Self {
        let extension = reference
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        match extension.as_str() {
            "pdf" => Self::Pdf,
            _ => Self::Text,
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Text => "text/markdown",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipePayload {
    pub kind: ContentKind,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecipeBody {
    /// Rendered HTML for a markdown recipe.
    Markup(String),
    /// Raw PDF bytes, handed to the page renderer.
    Document(Vec<u8>),
}

impl RecipePayload {
    pub fn new(reference: &str, bytes: Vec<u8>) -> Self {
        Self {
            kind: ContentKind::classify(reference),
            bytes,
        }
    }

    pub fn into_body(self) -> RecipeBody {
        match self.kind {
            ContentKind::Pdf => RecipeBody::Document(self.bytes),
            ContentKind::Text => {
                RecipeBody::Markup(render_markdown(&String::from_utf8_lossy(&self.bytes)))
            }
        }
    }
}

/// Markdown to HTML. Raw HTML in the source is shown as text, never injected.
pub fn render_markdown(source: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    options.insert(Options::ENABLE_SMART_PUNCTUATION);

    let parser = Parser::new_ext(source, options).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        other => other,
    });
    let mut output = String::new();
    html::push_html(&mut output, parser);
    output
}

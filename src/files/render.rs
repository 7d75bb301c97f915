use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::WorkspaceError;

/// Renderer category, selected purely by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentCategory {
    Spreadsheet,
    WordProcessor,
    DelimitedText,
    Image,
    Markup,
    SlideDeck,
    Pdf,
    PlainText,
}

impl DocumentCategory {
    pub fn for_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "xls" | "xlsx" => DocumentCategory::Spreadsheet,
            "doc" | "docx" => DocumentCategory::WordProcessor,
            "csv" => DocumentCategory::DelimitedText,
            "png" | "jpg" | "jpeg" | "gif" | "svg" | "webp" => DocumentCategory::Image,
            "html" | "htm" => DocumentCategory::Markup,
            "ppt" | "pptx" => DocumentCategory::SlideDeck,
            "pdf" => DocumentCategory::Pdf,
            _ => DocumentCategory::PlainText,
        }
    }
}

/// Structured output of a document renderer, ready for the host to display.
#[derive(Debug, Clone)]
pub enum RenderedDocument {
    PlainText { content: String },
    Markup { source: String, file_url: String },
    Image { file_url: String },
    Embedded { file_url: String },
    OpenExternally { path: PathBuf },
    Table { rows: Vec<Vec<String>> },
    Sheets { names: Vec<String>, sheets: HashMap<String, Vec<Vec<String>>> },
    RichText { html: String },
}

pub trait DocumentRenderer: Send + Sync {
    fn render(&self, path: &Path) -> Result<RenderedDocument, WorkspaceError>;
}

pub fn file_url(path: &Path) -> String {
    format!("file://{}", path.display())
}

/// Maps each category to its renderer. Heavyweight formats (spreadsheets,
/// word-processor files, delimited text) have no built-in renderer; the host
/// registers its own converters, and an unregistered category surfaces as a
/// conversion error in the tab.
pub struct RendererRegistry {
    renderers: HashMap<DocumentCategory, Box<dyn DocumentRenderer>>,
}

impl RendererRegistry {
    pub fn empty() -> Self {
        Self {
            renderers: HashMap::new(),
        }
    }

    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        registry.register(DocumentCategory::PlainText, Box::new(PlainTextRenderer));
        registry.register(DocumentCategory::Markup, Box::new(MarkupRenderer));
        registry.register(DocumentCategory::Image, Box::new(FileUrlRenderer::image()));
        registry.register(DocumentCategory::Pdf, Box::new(FileUrlRenderer::embedded()));
        registry.register(DocumentCategory::SlideDeck, Box::new(SlideDeckRenderer));
        registry
    }

    pub fn register(&mut self, category: DocumentCategory, renderer: Box<dyn DocumentRenderer>) {
        self.renderers.insert(category, renderer);
    }

    pub fn render(&self, path: &Path) -> Result<RenderedDocument, WorkspaceError> {
        let category = DocumentCategory::for_path(path);
        match self.renderers.get(&category) {
            Some(renderer) => renderer.render(path),
            None => Err(WorkspaceError::conversion(
                path,
                format!("no renderer registered for {category:?}"),
            )),
        }
    }
}

struct PlainTextRenderer;

impl DocumentRenderer for PlainTextRenderer {
    fn render(&self, path: &Path) -> Result<RenderedDocument, WorkspaceError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| WorkspaceError::conversion(path, e.to_string()))?;
        Ok(RenderedDocument::PlainText { content })
    }
}

struct MarkupRenderer;

impl DocumentRenderer for MarkupRenderer {
    fn render(&self, path: &Path) -> Result<RenderedDocument, WorkspaceError> {
        let source = std::fs::read_to_string(path)
            .map_err(|e| WorkspaceError::conversion(path, e.to_string()))?;
        Ok(RenderedDocument::Markup {
            source,
            file_url: file_url(path),
        })
    }
}

/// Images and PDFs are handed to the host as a file URL to embed.
struct FileUrlRenderer {
    embedded: bool,
}

impl FileUrlRenderer {
    fn image() -> Self {
        Self { embedded: false }
    }

    fn embedded() -> Self {
        Self { embedded: true }
    }
}

impl DocumentRenderer for FileUrlRenderer {
    fn render(&self, path: &Path) -> Result<RenderedDocument, WorkspaceError> {
        if !path.exists() {
            return Err(WorkspaceError::conversion(path, "file not found"));
        }
        let file_url = file_url(path);
        Ok(if self.embedded {
            RenderedDocument::Embedded { file_url }
        } else {
            RenderedDocument::Image { file_url }
        })
    }
}

/// Slide decks are best viewed natively; the tab offers to open externally.
struct SlideDeckRenderer;

impl DocumentRenderer for SlideDeckRenderer {
    fn render(&self, path: &Path) -> Result<RenderedDocument, WorkspaceError> {
        Ok(RenderedDocument::OpenExternally {
            path: path.to_path_buf(),
        })
    }
}

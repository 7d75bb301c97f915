mod copier;
mod lister;
mod render;
mod shell;

pub use copier::{FileCopier, FsCopier};
pub use lister::{DirectoryLister, FsLister};
pub use render::{
    file_url, DocumentCategory, DocumentRenderer, RenderedDocument, RendererRegistry,
};
pub use shell::{ExternalShell, SystemShell};

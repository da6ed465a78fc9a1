//! Concrete collaborators for dotpad: storage, rendering and file access.

pub mod config_service;
pub mod document_io;
pub mod graphviz_renderer;
pub mod json_draft_store;
pub mod paths;
pub mod storage;

pub use crate::config_service::ConfigService;
pub use crate::document_io::FsDocumentIo;
pub use crate::graphviz_renderer::GraphvizRenderer;
pub use crate::json_draft_store::JsonDraftStore;
pub use crate::paths::DotpadPaths;

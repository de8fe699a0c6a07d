//! Document discovery and ordering for Dox.
//!
//! Walks a docs source directory and produces an ordered document tree:
//! `.md` files become docs, subdirectories become nested categories. Ordering
//! is lexicographic by filename, overridable per document with
//! `sidebar_position` front matter and per directory with a `meta.yaml`
//! sidecar. Scanning the same directory snapshot twice yields an identical
//! tree.
//!
//! This crate only discovers structure; it never renders content.

mod frontmatter;
mod scanner;

use std::path::PathBuf;

use serde::Serialize;

pub use scanner::DocScanner;

/// One entry of a scanned document tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum DocEntry {
    /// A single document.
    Doc(DocInfo),
    /// A directory of documents, rendered as a nested category.
    Category(CategoryInfo),
}

/// A discovered document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DocInfo {
    /// Document id: source path relative to the docs root, without extension
    /// (e.g., `"java/opencv/intro"`). A directory's `index.md` takes the
    /// directory's own id.
    pub id: String,
    /// Sidebar label: `sidebar_label` front matter, first `# H1`, or
    /// title-cased filename, in that precedence.
    pub label: String,
    /// Source file path relative to the docs root.
    pub source: PathBuf,
    /// Explicit ordering position from front matter, if any.
    pub position: Option<i64>,
}

/// A discovered category (subdirectory).
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CategoryInfo {
    /// Category label: `label` from the directory's `meta.yaml`, or the
    /// title-cased directory name.
    pub label: String,
    /// Directory path relative to the docs root.
    pub dir: String,
    /// Explicit ordering position from `meta.yaml`, if any.
    pub position: Option<i64>,
    /// Ordered child entries.
    pub items: Vec<DocEntry>,
}

/// Error during document discovery.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// The requested source directory does not exist.
    #[error("Docs directory not found: {}", .0.display())]
    MissingDir(PathBuf),
    /// I/O error while walking or reading.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Malformed YAML front matter in a document.
    #[error("Invalid front matter in {}: {message}", .path.display())]
    FrontMatter {
        /// Offending document path.
        path: PathBuf,
        /// Parser message.
        message: String,
    },
    /// Malformed `meta.yaml` sidecar in a directory.
    #[error("Invalid metadata in {}: {message}", .path.display())]
    Metadata {
        /// Offending sidecar path.
        path: PathBuf,
        /// Parser message.
        message: String,
    },
    /// A referenced document does not exist.
    #[error("Document not found: {id}")]
    MissingDoc {
        /// The unresolved document id.
        id: String,
    },
}

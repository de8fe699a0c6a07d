//! Directory walking and document tree construction.
//!
//! The scanner reads one directory level at a time: `.md` files become docs,
//! subdirectories are scanned recursively and become categories. Entries are
//! then ordered by explicit position first, filename second, so the result is
//! independent of filesystem iteration order.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::frontmatter::{extract_h1, parse_front_matter, title_from_stem};
use crate::{CategoryInfo, DocEntry, DocInfo, ScanError};

/// Directory sidecar filename for category metadata.
const META_FILENAME: &str = "meta.yaml";

/// Category metadata from a directory's `meta.yaml`.
#[derive(Debug, Default, Deserialize)]
struct CategoryMeta {
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    position: Option<i64>,
}

/// Ordering key for one directory level.
///
/// Entries with an explicit position come first (ascending); the rest follow
/// lexicographically. Docs sort before a category with the same name.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
struct SortKey {
    position: i64,
    name: String,
    is_category: bool,
}

/// Walks a docs source directory into ordered [`DocEntry`] trees.
pub struct DocScanner {
    docs_root: PathBuf,
}

impl DocScanner {
    /// Create a scanner rooted at the docs source directory.
    pub fn new(docs_root: impl Into<PathBuf>) -> Self {
        Self {
            docs_root: docs_root.into(),
        }
    }

    /// Scan a directory relative to the docs root.
    ///
    /// `rel_dir` is a `/`-separated path (e.g., `"java/opencv"`); empty means
    /// the docs root itself. Document ids and source paths in the result are
    /// always relative to the docs root, not to `rel_dir`.
    ///
    /// Scanning is deterministic: the same directory snapshot produces the
    /// same tree regardless of filesystem iteration order.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::MissingDir`] if the directory does not exist, or
    /// other [`ScanError`] variants for I/O and metadata failures.
    pub fn scan(&self, rel_dir: &str) -> Result<Vec<DocEntry>, ScanError> {
        let rel_dir = rel_dir.trim_matches('/');
        let target = if rel_dir.is_empty() {
            self.docs_root.clone()
        } else {
            self.docs_root.join(rel_dir)
        };

        if !target.is_dir() {
            return Err(ScanError::MissingDir(target));
        }

        self.scan_directory(&target, rel_dir)
    }

    /// Load a single document by id.
    ///
    /// `id` is a `/`-separated path relative to the docs root, without
    /// extension. Resolution tries `<id>.md` first, then `<id>/index.md`.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::MissingDoc`] if neither file exists.
    pub fn load_doc(&self, id: &str) -> Result<DocInfo, ScanError> {
        let id = id.trim_matches('/');
        let direct = self.docs_root.join(format!("{id}.md"));
        let index = self.docs_root.join(id).join("index.md");

        let (path, source) = if direct.is_file() {
            (direct, PathBuf::from(format!("{id}.md")))
        } else if index.is_file() {
            (index, PathBuf::from(format!("{id}/index.md")))
        } else {
            return Err(ScanError::MissingDoc { id: id.to_owned() });
        };

        let content = fs::read_to_string(&path)?;
        let (front_matter, body) =
            parse_front_matter(&content).map_err(|message| ScanError::FrontMatter {
                path: path.clone(),
                message,
            })?;
        let front_matter = front_matter.unwrap_or_default();

        let stem = id.rsplit('/').next().unwrap_or(id);
        let label = front_matter
            .sidebar_label
            .or_else(|| extract_h1(body))
            .unwrap_or_else(|| title_from_stem(stem));

        Ok(DocInfo {
            id: id.to_owned(),
            label,
            source,
            position: front_matter.sidebar_position,
        })
    }

    /// Scan one directory level, recursing into subdirectories.
    fn scan_directory(&self, dir: &Path, prefix: &str) -> Result<Vec<DocEntry>, ScanError> {
        let mut keyed: Vec<(SortKey, DocEntry)> = Vec::new();

        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().into_owned();

            // Hidden and partial files/dirs are not part of the site
            if name.starts_with('.') || name.starts_with('_') {
                continue;
            }

            if entry.file_type()?.is_dir() {
                let child_prefix = join_path(prefix, &name);
                let items = self.scan_directory(&entry.path(), &child_prefix)?;
                if items.is_empty() {
                    tracing::debug!(dir = %child_prefix, "Skipping directory without documents");
                    continue;
                }

                let meta = read_category_meta(&entry.path())?;
                keyed.push((
                    SortKey {
                        position: meta.position.unwrap_or(i64::MAX),
                        name: name.clone(),
                        is_category: true,
                    },
                    DocEntry::Category(CategoryInfo {
                        label: meta.label.unwrap_or_else(|| title_from_stem(&name)),
                        dir: child_prefix,
                        position: meta.position,
                        items,
                    }),
                ));
            } else if let Some(stem) = name.strip_suffix(".md") {
                let (key, doc) = self.build_doc(&entry.path(), prefix, &name, stem)?;
                keyed.push((key, DocEntry::Doc(doc)));
            }
        }

        keyed.sort_by(|(a, _), (b, _)| a.cmp(b));
        Ok(keyed.into_iter().map(|(_, entry)| entry).collect())
    }

    /// Build a doc entry from a markdown file.
    fn build_doc(
        &self,
        path: &Path,
        prefix: &str,
        name: &str,
        stem: &str,
    ) -> Result<(SortKey, DocInfo), ScanError> {
        let content = fs::read_to_string(path)?;
        let (front_matter, body) =
            parse_front_matter(&content).map_err(|message| ScanError::FrontMatter {
                path: path.to_path_buf(),
                message,
            })?;
        let front_matter = front_matter.unwrap_or_default();

        let is_index = stem == "index";
        let id = if is_index {
            prefix.to_owned()
        } else {
            join_path(prefix, stem)
        };

        let label = front_matter
            .sidebar_label
            .or_else(|| extract_h1(body))
            .unwrap_or_else(|| title_from_stem(stem));

        // index.md leads its directory unless given an explicit position
        let sort_position = front_matter
            .sidebar_position
            .unwrap_or(if is_index { i64::MIN } else { i64::MAX });

        Ok((
            SortKey {
                position: sort_position,
                name: stem.to_owned(),
                is_category: false,
            },
            DocInfo {
                id,
                label,
                source: PathBuf::from(join_path(prefix, name)),
                position: front_matter.sidebar_position,
            },
        ))
    }
}

/// Join two `/`-separated path segments, either of which may be empty.
fn join_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_owned()
    } else {
        format!("{prefix}/{name}")
    }
}

/// Read a directory's `meta.yaml` sidecar, if present.
fn read_category_meta(dir: &Path) -> Result<CategoryMeta, ScanError> {
    let path = dir.join(META_FILENAME);
    if !path.exists() {
        return Ok(CategoryMeta::default());
    }

    let content = fs::read_to_string(&path)?;
    if content.trim().is_empty() {
        return Ok(CategoryMeta::default());
    }

    serde_yaml::from_str(&content).map_err(|e| ScanError::Metadata {
        path,
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn create_test_dir() -> tempfile::TempDir {
        tempfile::tempdir().unwrap()
    }

    fn labels(entries: &[DocEntry]) -> Vec<&str> {
        entries
            .iter()
            .map(|e| match e {
                DocEntry::Doc(doc) => doc.label.as_str(),
                DocEntry::Category(cat) => cat.label.as_str(),
            })
            .collect()
    }

    #[test]
    fn test_scan_orders_lexicographically_by_default() {
        let temp_dir = create_test_dir();
        fs::write(temp_dir.path().join("zeta.md"), "# Zeta").unwrap();
        fs::write(temp_dir.path().join("alpha.md"), "# Alpha").unwrap();
        fs::write(temp_dir.path().join("mid.md"), "# Mid").unwrap();

        let scanner = DocScanner::new(temp_dir.path());
        let entries = scanner.scan("").unwrap();

        assert_eq!(labels(&entries), vec!["Alpha", "Mid", "Zeta"]);
    }

    #[test]
    fn test_scan_sidebar_position_overrides_order() {
        let temp_dir = create_test_dir();
        fs::write(
            temp_dir.path().join("alpha.md"),
            "---\nsidebar_position: 2\n---\n# Alpha",
        )
        .unwrap();
        fs::write(
            temp_dir.path().join("zeta.md"),
            "---\nsidebar_position: 1\n---\n# Zeta",
        )
        .unwrap();
        fs::write(temp_dir.path().join("unpositioned.md"), "# Unpositioned").unwrap();

        let scanner = DocScanner::new(temp_dir.path());
        let entries = scanner.scan("").unwrap();

        // Positioned docs first (ascending), then lexicographic
        assert_eq!(labels(&entries), vec!["Zeta", "Alpha", "Unpositioned"]);
    }

    #[test]
    fn test_scan_index_doc_leads_directory() {
        let temp_dir = create_test_dir();
        fs::write(temp_dir.path().join("aardvark.md"), "# Aardvark").unwrap();
        fs::write(temp_dir.path().join("index.md"), "# Overview").unwrap();

        let scanner = DocScanner::new(temp_dir.path());
        let entries = scanner.scan("").unwrap();

        assert_eq!(labels(&entries), vec!["Overview", "Aardvark"]);
        let DocEntry::Doc(index) = &entries[0] else {
            panic!("expected doc");
        };
        assert_eq!(index.id, "");
        assert_eq!(index.source, PathBuf::from("index.md"));
    }

    #[test]
    fn test_scan_subdirectories_become_categories() {
        let temp_dir = create_test_dir();
        let opencv = temp_dir.path().join("java").join("opencv");
        fs::create_dir_all(&opencv).unwrap();
        fs::write(opencv.join("install.md"), "# Install").unwrap();
        fs::write(opencv.join("intro.md"), "# Intro").unwrap();

        let scanner = DocScanner::new(temp_dir.path());
        let entries = scanner.scan("java").unwrap();

        assert_eq!(entries.len(), 1);
        let DocEntry::Category(cat) = &entries[0] else {
            panic!("expected category, got {:?}", entries[0]);
        };
        assert_eq!(cat.label, "Opencv");
        assert_eq!(cat.dir, "java/opencv");
        assert_eq!(labels(&cat.items), vec!["Install", "Intro"]);

        // Ids and sources are docs-root relative
        let DocEntry::Doc(install) = &cat.items[0] else {
            panic!("expected doc");
        };
        assert_eq!(install.id, "java/opencv/install");
        assert_eq!(install.source, PathBuf::from("java/opencv/install.md"));
    }

    #[test]
    fn test_scan_category_meta_label_and_position() {
        let temp_dir = create_test_dir();
        let first = temp_dir.path().join("zz-advanced");
        let second = temp_dir.path().join("aa-basics");
        fs::create_dir_all(&first).unwrap();
        fs::create_dir_all(&second).unwrap();
        fs::write(first.join("meta.yaml"), "label: Advanced\nposition: 1").unwrap();
        fs::write(first.join("page.md"), "# Page").unwrap();
        fs::write(second.join("page.md"), "# Page").unwrap();

        let scanner = DocScanner::new(temp_dir.path());
        let entries = scanner.scan("").unwrap();

        // Positioned category jumps ahead of the lexicographically-first one
        assert_eq!(labels(&entries), vec!["Advanced", "Aa Basics"]);
    }

    #[test]
    fn test_scan_label_precedence() {
        let temp_dir = create_test_dir();
        fs::write(
            temp_dir.path().join("a.md"),
            "---\nsidebar_label: From Front Matter\n---\n# From H1",
        )
        .unwrap();
        fs::write(temp_dir.path().join("b.md"), "# From H1").unwrap();
        fs::write(temp_dir.path().join("setup-guide.md"), "no heading").unwrap();

        let scanner = DocScanner::new(temp_dir.path());
        let entries = scanner.scan("").unwrap();

        assert_eq!(
            labels(&entries),
            vec!["From Front Matter", "From H1", "Setup Guide"]
        );
    }

    #[test]
    fn test_scan_skips_hidden_and_underscore_entries() {
        let temp_dir = create_test_dir();
        fs::write(temp_dir.path().join(".hidden.md"), "# Hidden").unwrap();
        fs::write(temp_dir.path().join("_partial.md"), "# Partial").unwrap();
        fs::create_dir(temp_dir.path().join("_drafts")).unwrap();
        fs::write(temp_dir.path().join("_drafts").join("x.md"), "# X").unwrap();
        fs::write(temp_dir.path().join("visible.md"), "# Visible").unwrap();

        let scanner = DocScanner::new(temp_dir.path());
        let entries = scanner.scan("").unwrap();

        assert_eq!(labels(&entries), vec!["Visible"]);
    }

    #[test]
    fn test_scan_skips_directories_without_documents() {
        let temp_dir = create_test_dir();
        fs::create_dir(temp_dir.path().join("empty")).unwrap();
        fs::write(temp_dir.path().join("guide.md"), "# Guide").unwrap();

        let scanner = DocScanner::new(temp_dir.path());
        let entries = scanner.scan("").unwrap();

        assert_eq!(labels(&entries), vec!["Guide"]);
    }

    #[test]
    fn test_scan_missing_dir_is_fatal() {
        let temp_dir = create_test_dir();

        let scanner = DocScanner::new(temp_dir.path());
        let err = scanner.scan("java/opencv").unwrap_err();

        assert!(matches!(err, ScanError::MissingDir(_)));
        assert!(err.to_string().contains("java/opencv"));
    }

    #[test]
    fn test_scan_is_idempotent() {
        let temp_dir = create_test_dir();
        let sub = temp_dir.path().join("guides");
        fs::create_dir_all(&sub).unwrap();
        fs::write(temp_dir.path().join("index.md"), "# Home").unwrap();
        fs::write(
            temp_dir.path().join("setup.md"),
            "---\nsidebar_position: 1\n---\n# Setup",
        )
        .unwrap();
        fs::write(sub.join("advanced.md"), "# Advanced").unwrap();

        let scanner = DocScanner::new(temp_dir.path());
        let first = scanner.scan("").unwrap();
        let second = scanner.scan("").unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_scan_malformed_front_matter_is_fatal() {
        let temp_dir = create_test_dir();
        fs::write(
            temp_dir.path().join("bad.md"),
            "---\nsidebar_position: [oops\n---\n# Bad",
        )
        .unwrap();

        let scanner = DocScanner::new(temp_dir.path());
        let err = scanner.scan("").unwrap_err();

        assert!(matches!(err, ScanError::FrontMatter { .. }));
        assert!(err.to_string().contains("bad.md"));
    }

    #[test]
    fn test_scan_malformed_category_meta_is_fatal() {
        let temp_dir = create_test_dir();
        let sub = temp_dir.path().join("guides");
        fs::create_dir_all(&sub).unwrap();
        fs::write(sub.join("meta.yaml"), "label: [oops").unwrap();
        fs::write(sub.join("page.md"), "# Page").unwrap();

        let scanner = DocScanner::new(temp_dir.path());
        let err = scanner.scan("").unwrap_err();

        assert!(matches!(err, ScanError::Metadata { .. }));
        assert!(err.to_string().contains("meta.yaml"));
    }

    #[test]
    fn test_load_doc_direct_file() {
        let temp_dir = create_test_dir();
        let sub = temp_dir.path().join("guides");
        fs::create_dir_all(&sub).unwrap();
        fs::write(sub.join("setup.md"), "# Setup Guide").unwrap();

        let scanner = DocScanner::new(temp_dir.path());
        let doc = scanner.load_doc("guides/setup").unwrap();

        assert_eq!(doc.id, "guides/setup");
        assert_eq!(doc.label, "Setup Guide");
        assert_eq!(doc.source, PathBuf::from("guides/setup.md"));
    }

    #[test]
    fn test_load_doc_index_fallback() {
        let temp_dir = create_test_dir();
        let sub = temp_dir.path().join("guides");
        fs::create_dir_all(&sub).unwrap();
        fs::write(sub.join("index.md"), "# Guides").unwrap();

        let scanner = DocScanner::new(temp_dir.path());
        let doc = scanner.load_doc("guides").unwrap();

        assert_eq!(doc.id, "guides");
        assert_eq!(doc.label, "Guides");
        assert_eq!(doc.source, PathBuf::from("guides/index.md"));
    }

    #[test]
    fn test_load_doc_missing() {
        let temp_dir = create_test_dir();

        let scanner = DocScanner::new(temp_dir.path());
        let err = scanner.load_doc("nope").unwrap_err();

        assert!(matches!(err, ScanError::MissingDoc { id } if id == "nope"));
    }

    #[test]
    fn test_doc_sorts_before_category_with_same_name() {
        let temp_dir = create_test_dir();
        let sub = temp_dir.path().join("guide");
        fs::create_dir_all(&sub).unwrap();
        fs::write(temp_dir.path().join("guide.md"), "# Guide Doc").unwrap();
        fs::write(sub.join("deep.md"), "# Deep").unwrap();

        let scanner = DocScanner::new(temp_dir.path());
        let entries = scanner.scan("").unwrap();

        assert_eq!(labels(&entries), vec!["Guide Doc", "Guide"]);
    }
}

//! Site resolution: sidebar expansion, navbar resolution, link policy.

use serde::Serialize;

use dox_config::{BrokenLinkPolicy, Config};
use dox_docs::{DocEntry, DocScanner, ScanError};
use dox_nav::{ExplicitEntry, NavError, ResolvedNavbar, SidebarRule, resolve_navbar};

use crate::links::{ContentWarning, RouteSet};

/// One expanded sidebar entry, ready for rendering.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum SidebarItem {
    /// A document link.
    Doc {
        /// Document id (docs-root-relative path without extension).
        id: String,
        /// Display label.
        label: String,
    },
    /// A labeled group of entries.
    Category {
        /// Display label.
        label: String,
        /// Ordered child entries.
        items: Vec<SidebarItem>,
    },
}

/// An expanded sidebar with its registry identifier.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ResolvedSidebar {
    /// Registry key this sidebar was declared under.
    pub id: String,
    /// Ordered, fully expanded entries.
    pub items: Vec<SidebarItem>,
}

/// The fully resolved site structure.
///
/// Immutable output of [`Site::resolve`]; everything the rendering layer
/// needs to lay out navigation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedSite {
    /// Navbar items bucketed by position, declaration order preserved.
    pub navbar: ResolvedNavbar,
    /// Expanded sidebars in registry declaration order.
    pub sidebars: Vec<ResolvedSidebar>,
    /// Content warnings surfaced under the `warn` link policy. Empty under
    /// `ignore`; under `throw` violations are an error instead.
    pub warnings: Vec<ContentWarning>,
}

/// Error returned when site resolution fails.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// Malformed navbar or dangling sidebar reference.
    #[error(transparent)]
    Nav(#[from] NavError),
    /// A sidebar rule could not be expanded.
    #[error("Sidebar '{id}': {source}")]
    Sidebar {
        /// Registry key of the failing sidebar.
        id: String,
        /// Underlying scan failure.
        #[source]
        source: ScanError,
    },
    /// Broken internal links under the `throw` policy.
    #[error("{} broken internal link(s), first: {}", .0.len(), .0[0])]
    BrokenLinks(Vec<ContentWarning>),
}

/// Build-time site resolver.
///
/// Owns the loaded [`Config`] and a [`DocScanner`] rooted at the configured
/// docs source directory. Resolution never mutates either.
pub struct Site {
    config: Config,
    scanner: DocScanner,
}

impl Site {
    /// Create a resolver for a loaded configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let scanner = DocScanner::new(config.docs_resolved.source_dir.clone());
        Self { config, scanner }
    }

    /// The configuration this site was built from.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Resolve the declared configuration into a [`ResolvedSite`].
    ///
    /// Expands every sidebar rule in registry order, resolves the navbar
    /// against the registry, and applies the configured link-integrity
    /// policy. Re-running on an unchanged config and docs directory yields an
    /// identical result.
    ///
    /// # Errors
    ///
    /// All configuration errors are fatal: a dangling sidebar reference, a
    /// malformed navbar entry, a missing sidebar directory, or a missing
    /// explicit document. Broken internal links are fatal only under
    /// [`BrokenLinkPolicy::Throw`].
    pub fn resolve(&self) -> Result<ResolvedSite, ResolveError> {
        let mut sidebars = Vec::with_capacity(self.config.sidebars.len());
        for (id, rule) in self.config.sidebars.iter() {
            let items = self
                .expand_rule(rule)
                .map_err(|source| ResolveError::Sidebar {
                    id: id.to_owned(),
                    source,
                })?;
            sidebars.push(ResolvedSidebar {
                id: id.to_owned(),
                items,
            });
        }

        let navbar = resolve_navbar(&self.config.navbar.items, &self.config.sidebars)?;

        let routes = RouteSet::collect(
            &sidebars,
            &self.config.docs_resolved.extra_routes,
            &self.config.site.base_url,
        );
        let mut warnings = Vec::new();
        for item in navbar.left.iter().chain(&navbar.right) {
            routes.check_item(item, &mut warnings);
        }

        let warnings = match self.config.site.on_broken_links {
            BrokenLinkPolicy::Throw if !warnings.is_empty() => {
                return Err(ResolveError::BrokenLinks(warnings));
            }
            BrokenLinkPolicy::Warn => {
                for warning in &warnings {
                    tracing::warn!(%warning, "Broken internal link");
                }
                warnings
            }
            BrokenLinkPolicy::Ignore => Vec::new(),
            BrokenLinkPolicy::Throw => warnings,
        };

        Ok(ResolvedSite {
            navbar,
            sidebars,
            warnings,
        })
    }

    /// Expand one sidebar rule into concrete entries.
    fn expand_rule(&self, rule: &SidebarRule) -> Result<Vec<SidebarItem>, ScanError> {
        match rule {
            SidebarRule::Autogenerated { dir } => {
                Ok(self.scanner.scan(dir)?.iter().map(convert_entry).collect())
            }
            SidebarRule::Explicit { items } => {
                items.iter().map(|entry| self.expand_explicit(entry)).collect()
            }
        }
    }

    /// Expand one explicit entry, loading referenced documents.
    fn expand_explicit(&self, entry: &ExplicitEntry) -> Result<SidebarItem, ScanError> {
        match entry {
            ExplicitEntry::Doc(id) => {
                let doc = self.scanner.load_doc(id)?;
                Ok(SidebarItem::Doc {
                    id: doc.id,
                    label: doc.label,
                })
            }
            ExplicitEntry::Category { label, items } => Ok(SidebarItem::Category {
                label: label.clone(),
                items: items
                    .iter()
                    .map(|child| self.expand_explicit(child))
                    .collect::<Result<_, _>>()?,
            }),
        }
    }
}

/// Convert a scanned doc tree entry into a sidebar item.
fn convert_entry(entry: &DocEntry) -> SidebarItem {
    match entry {
        DocEntry::Doc(doc) => SidebarItem::Doc {
            id: doc.id.clone(),
            label: doc.label.clone(),
        },
        DocEntry::Category(cat) => SidebarItem::Category {
            label: cat.label.clone(),
            items: cat.items.iter().map(convert_entry).collect(),
        },
    }
}

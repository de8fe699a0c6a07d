//! Internal link-integrity checking.
//!
//! Collects the set of routes a resolved site serves and checks every
//! internal navbar link against it. Violations are [`ContentWarning`]s; how
//! they are reported is the caller's policy decision.

use std::collections::HashSet;
use std::fmt;

use dox_nav::NavItem;

use crate::site::SidebarItem;

/// A non-fatal content issue found during resolution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ContentWarning {
    /// An internal navbar link points at a route the site does not serve.
    BrokenLink {
        /// Label of the offending navbar item.
        label: String,
        /// The declared link target.
        to: String,
    },
}

impl fmt::Display for ContentWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BrokenLink { label, to } => {
                write!(f, "navbar item '{label}' links to unknown route '{to}'")
            }
        }
    }
}

/// The set of internal routes a site serves, in docs-space (leading `/`,
/// `base_url` stripped).
pub(crate) struct RouteSet {
    routes: HashSet<String>,
    base_url: String,
}

impl RouteSet {
    /// Collect routes from expanded sidebars plus externally-provided routes.
    pub(crate) fn collect(
        sidebars: &[crate::site::ResolvedSidebar],
        extra_routes: &[String],
        base_url: &str,
    ) -> Self {
        let mut routes = HashSet::new();

        for sidebar in sidebars {
            collect_doc_routes(&sidebar.items, &mut routes);
        }
        for route in extra_routes {
            routes.insert(normalize(route));
        }

        Self {
            routes,
            base_url: base_url.to_owned(),
        }
    }

    /// Whether `to` is an internal link (as opposed to an external URL).
    pub(crate) fn is_internal(to: &str) -> bool {
        to.starts_with('/')
    }

    /// Whether an internal link target resolves to a known route.
    ///
    /// The target may be declared with or without the site's `base_url`
    /// prefix; anchors and query strings are ignored.
    pub(crate) fn contains(&self, to: &str) -> bool {
        let target = to
            .split(['#', '?'])
            .next()
            .unwrap_or(to);

        let target = if self.base_url != "/" && target.starts_with(self.base_url.as_str()) {
            // "/notes/guide" -> "/guide"
            &target[self.base_url.len() - 1..]
        } else {
            target
        };

        self.routes.contains(&normalize(target))
    }

    /// Check every internal link in a navbar item tree, appending warnings.
    pub(crate) fn check_item(&self, item: &NavItem, warnings: &mut Vec<ContentWarning>) {
        match item {
            NavItem::Link { label, to, .. } => {
                if Self::is_internal(to) && !self.contains(to) {
                    warnings.push(ContentWarning::BrokenLink {
                        label: label.clone(),
                        to: to.clone(),
                    });
                }
            }
            NavItem::Dropdown { items, .. } => {
                for child in items {
                    self.check_item(child, warnings);
                }
            }
            NavItem::Sidebar { .. } => {}
        }
    }
}

/// Collect `/`-prefixed doc routes from expanded sidebar items.
fn collect_doc_routes(items: &[SidebarItem], routes: &mut HashSet<String>) {
    for item in items {
        match item {
            SidebarItem::Doc { id, .. } => {
                routes.insert(normalize(&format!("/{id}")));
            }
            SidebarItem::Category { items, .. } => collect_doc_routes(items, routes),
        }
    }
}

/// Normalize a route for comparison: single leading `/`, no trailing `/`.
fn normalize(route: &str) -> String {
    let trimmed = route.trim_matches('/');
    format!("/{trimmed}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route_set(ids: &[&str], extra: &[&str], base_url: &str) -> RouteSet {
        let sidebars = vec![crate::site::ResolvedSidebar {
            id: "docs".to_owned(),
            items: ids
                .iter()
                .map(|id| SidebarItem::Doc {
                    id: (*id).to_owned(),
                    label: (*id).to_owned(),
                })
                .collect(),
        }];
        let extra: Vec<String> = extra.iter().map(|r| (*r).to_owned()).collect();
        RouteSet::collect(&sidebars, &extra, base_url)
    }

    #[test]
    fn test_is_internal() {
        assert!(RouteSet::is_internal("/blog"));
        assert!(!RouteSet::is_internal("https://github.com/example"));
        assert!(!RouteSet::is_internal("mailto:a@b.c"));
    }

    #[test]
    fn test_contains_doc_route() {
        let routes = route_set(&["java/opencv/intro"], &[], "/");
        assert!(routes.contains("/java/opencv/intro"));
        assert!(routes.contains("/java/opencv/intro/"));
        assert!(!routes.contains("/java/opencv/missing"));
    }

    #[test]
    fn test_contains_extra_route() {
        let routes = route_set(&[], &["/blog"], "/");
        assert!(routes.contains("/blog"));
        assert!(!routes.contains("/shop"));
    }

    #[test]
    fn test_contains_strips_base_url() {
        let routes = route_set(&["guide"], &[], "/notes/");
        assert!(routes.contains("/guide"));
        assert!(routes.contains("/notes/guide"));
        assert!(!routes.contains("/notes/missing"));
    }

    #[test]
    fn test_contains_ignores_anchor_and_query() {
        let routes = route_set(&["guide"], &[], "/");
        assert!(routes.contains("/guide#setup"));
        assert!(routes.contains("/guide?tab=2"));
    }

    #[test]
    fn test_category_routes_collected_recursively() {
        let sidebars = vec![crate::site::ResolvedSidebar {
            id: "docs".to_owned(),
            items: vec![SidebarItem::Category {
                label: "Tutorial".to_owned(),
                items: vec![SidebarItem::Doc {
                    id: "tutorial/create".to_owned(),
                    label: "Create".to_owned(),
                }],
            }],
        }];
        let routes = RouteSet::collect(&sidebars, &[], "/");
        assert!(routes.contains("/tutorial/create"));
    }
}

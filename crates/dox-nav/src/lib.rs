//! Navigation and sidebar model for Dox.
//!
//! This crate provides the declarative navigation data model:
//! - [`NavItem`]: a navbar entry (direct link, dropdown group, or sidebar reference)
//! - [`SidebarRule`]: how a named sidebar's contents are produced
//! - [`SidebarRegistry`]: named, reusable sidebar rules keyed by identifier
//! - [`resolve_navbar`]: validation and position-bucketing of the navbar tree
//!
//! Navbar items reference sidebars by identifier only; the registry is the
//! single source of truth for sidebar contents.

mod resolver;

use std::collections::HashMap;
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub use resolver::{ResolvedNavbar, resolve_navbar, validate_items};

/// Horizontal placement of a navbar item.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    /// Left navbar bucket.
    #[default]
    Left,
    /// Right navbar bucket.
    Right,
}

/// A declared navbar entry.
///
/// Serialized with an internal `type` tag, so a TOML declaration reads:
///
/// ```toml
/// [[navbar.items]]
/// type = "link"
/// label = "Blog"
/// to = "/blog"
/// position = "left"
/// ```
///
/// Dropdown children may not themselves be dropdowns; one level of nesting
/// only. This is enforced by [`validate_items`], not by the type itself.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NavItem {
    /// Direct link to a URL or internal route.
    Link {
        /// Display label.
        label: String,
        /// Link target. Internal if it starts with `/`, external otherwise.
        to: String,
        /// Navbar bucket.
        #[serde(default)]
        position: Position,
    },
    /// Labeled group of child items rendered as a dropdown.
    Dropdown {
        /// Display label.
        label: String,
        /// Navbar bucket.
        #[serde(default)]
        position: Position,
        /// Child items. Children's own `position` is ignored at render time.
        items: Vec<NavItem>,
    },
    /// Reference to a named sidebar in the [`SidebarRegistry`].
    Sidebar {
        /// Display label.
        label: String,
        /// Registry key. Must resolve at build time.
        sidebar_id: String,
        /// Navbar bucket.
        #[serde(default)]
        position: Position,
    },
}

impl NavItem {
    /// Display label of this item.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Link { label, .. } | Self::Dropdown { label, .. } | Self::Sidebar { label, .. } => {
                label
            }
        }
    }

    /// Navbar bucket this item was declared in.
    #[must_use]
    pub fn position(&self) -> Position {
        match self {
            Self::Link { position, .. }
            | Self::Dropdown { position, .. }
            | Self::Sidebar { position, .. } => *position,
        }
    }
}

/// Generation rule for a named sidebar.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SidebarRule {
    /// Contents derived from a docs directory listing at build time.
    Autogenerated {
        /// Directory path relative to the docs source root.
        dir: String,
    },
    /// Explicitly declared contents; declared order is authoritative.
    Explicit {
        /// Ordered document and category references.
        items: Vec<ExplicitEntry>,
    },
}

/// One entry of an explicit sidebar rule.
///
/// A bare string is a document id; a table declares a nested category.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExplicitEntry {
    /// Document reference by id (path relative to the docs root, no extension).
    Doc(String),
    /// Nested category with its own ordered entries.
    Category {
        /// Category label.
        label: String,
        /// Ordered child entries.
        items: Vec<ExplicitEntry>,
    },
}

/// Error in the declared navigation structure.
#[derive(Debug, thiserror::Error)]
pub enum NavError {
    /// An item has an empty label.
    #[error("navbar item has an empty label")]
    EmptyLabel,
    /// A link has an empty target.
    #[error("navbar link '{label}' has an empty target")]
    EmptyTarget {
        /// Label of the offending link.
        label: String,
    },
    /// A dropdown contains another dropdown.
    #[error("dropdown '{label}' is nested inside another dropdown; only one level of nesting is allowed")]
    NestedDropdown {
        /// Label of the inner dropdown.
        label: String,
    },
    /// A sidebar reference names a key absent from the registry.
    #[error("navbar references unknown sidebar '{id}'")]
    UnknownSidebar {
        /// The unresolved registry key.
        id: String,
    },
    /// Two sidebar rules share the same identifier.
    #[error("duplicate sidebar id '{id}'")]
    DuplicateSidebar {
        /// The repeated registry key.
        id: String,
    },
}

/// Named sidebar rules in declaration order.
///
/// Backed by a flat `Vec` with a `HashMap` index so iteration preserves the
/// order sidebars were declared in while lookups stay O(1).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SidebarRegistry {
    entries: Vec<(String, SidebarRule)>,
    index: HashMap<String, usize>,
}

impl SidebarRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a sidebar rule under `id`.
    ///
    /// # Errors
    ///
    /// Returns [`NavError::DuplicateSidebar`] if `id` is already registered.
    pub fn insert(&mut self, id: impl Into<String>, rule: SidebarRule) -> Result<(), NavError> {
        let id = id.into();
        if self.index.contains_key(&id) {
            return Err(NavError::DuplicateSidebar { id });
        }
        self.index.insert(id.clone(), self.entries.len());
        self.entries.push((id, rule));
        Ok(())
    }

    /// Look up a rule by identifier.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&SidebarRule> {
        self.index.get(id).map(|&i| &self.entries[i].1)
    }

    /// Whether `id` is registered.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Iterate rules in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SidebarRule)> {
        self.entries.iter().map(|(id, rule)| (id.as_str(), rule))
    }

    /// Number of registered sidebars.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// Manual serde impls: declaration order matters, so the registry cannot be a
// plain HashMap field.
impl Serialize for SidebarRegistry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (id, rule) in &self.entries {
            map.serialize_entry(id, rule)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for SidebarRegistry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RegistryVisitor;

        impl<'de> Visitor<'de> for RegistryVisitor {
            type Value = SidebarRegistry;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of sidebar id to sidebar rule")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut registry = SidebarRegistry::new();
                while let Some((id, rule)) = access.next_entry::<String, SidebarRule>()? {
                    registry
                        .insert(id, rule)
                        .map_err(serde::de::Error::custom)?;
                }
                Ok(registry)
            }
        }

        deserializer.deserialize_map(RegistryVisitor)
    }
}

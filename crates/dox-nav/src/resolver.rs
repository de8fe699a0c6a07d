//! Navbar validation and resolution.
//!
//! Turns the declared navbar item list into position buckets for rendering,
//! checking structural invariants and resolving sidebar references against
//! the registry. Resolution is pure: read-only access to the registry, no
//! side effects.

use crate::{NavError, NavItem, Position, SidebarRegistry};

/// Fully resolved navbar, split into position buckets.
///
/// Within each bucket, items keep their declaration order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResolvedNavbar {
    /// Items declared with `position = "left"`, in declaration order.
    pub left: Vec<NavItem>,
    /// Items declared with `position = "right"`, in declaration order.
    pub right: Vec<NavItem>,
}

/// Validate structural invariants of declared navbar items.
///
/// Checks, recursively:
/// - every label is non-empty
/// - every link target is non-empty
/// - dropdowns contain no dropdowns (one level of nesting only)
///
/// Sidebar references are not resolved here; see [`resolve_navbar`].
///
/// # Errors
///
/// Returns the first [`NavError`] found, in declaration order.
pub fn validate_items(items: &[NavItem]) -> Result<(), NavError> {
    for item in items {
        validate_item(item, false)?;
    }
    Ok(())
}

fn validate_item(item: &NavItem, inside_dropdown: bool) -> Result<(), NavError> {
    if item.label().trim().is_empty() {
        return Err(NavError::EmptyLabel);
    }

    match item {
        NavItem::Link { label, to, .. } => {
            if to.trim().is_empty() {
                return Err(NavError::EmptyTarget {
                    label: label.clone(),
                });
            }
        }
        NavItem::Dropdown { label, items, .. } => {
            if inside_dropdown {
                return Err(NavError::NestedDropdown {
                    label: label.clone(),
                });
            }
            for child in items {
                validate_item(child, true)?;
            }
        }
        NavItem::Sidebar { .. } => {}
    }

    Ok(())
}

/// Resolve the declared navbar against a sidebar registry.
///
/// Validates every item, checks that each sidebar reference (including those
/// inside dropdowns) names a registered sidebar, and buckets top-level items
/// by position. Declaration order is preserved within each bucket.
///
/// # Errors
///
/// Returns a [`NavError`] for malformed items or for the first dangling
/// sidebar reference, naming the unresolved key.
pub fn resolve_navbar(
    items: &[NavItem],
    registry: &SidebarRegistry,
) -> Result<ResolvedNavbar, NavError> {
    validate_items(items)?;

    for item in items {
        check_sidebar_refs(item, registry)?;
    }

    let mut navbar = ResolvedNavbar::default();
    for item in items {
        match item.position() {
            Position::Left => navbar.left.push(item.clone()),
            Position::Right => navbar.right.push(item.clone()),
        }
    }
    Ok(navbar)
}

fn check_sidebar_refs(item: &NavItem, registry: &SidebarRegistry) -> Result<(), NavError> {
    match item {
        NavItem::Sidebar { sidebar_id, .. } => {
            if !registry.contains(sidebar_id) {
                return Err(NavError::UnknownSidebar {
                    id: sidebar_id.clone(),
                });
            }
        }
        NavItem::Dropdown { items, .. } => {
            for child in items {
                check_sidebar_refs(child, registry)?;
            }
        }
        NavItem::Link { .. } => {}
    }
    Ok(())
}

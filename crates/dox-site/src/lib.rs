//! Build-time site resolution for Dox.
//!
//! This crate ties the declarative inputs together: it expands every sidebar
//! rule in the registry, resolves the navbar against it, applies the
//! link-integrity policy, and produces an immutable [`ResolvedSite`] for the
//! rendering layer.
//!
//! Resolution is a one-shot, deterministic transformation over a fixed input
//! snapshot: same config and same docs directory state, same output.
//!
//! # Quick Start
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use dox_config::Config;
//! use dox_site::Site;
//!
//! let config = Config::load(None)?;
//! let site = Site::new(config);
//! let resolved = site.resolve()?;
//!
//! for sidebar in &resolved.sidebars {
//!     println!("{}: {} entries", sidebar.id, sidebar.items.len());
//! }
//! # Ok(())
//! # }
//! ```

mod links;
mod site;

pub use links::ContentWarning;
pub use site::{ResolveError, ResolvedSidebar, ResolvedSite, SidebarItem, Site};

// Re-export the resolved navbar type for consumers of `ResolvedSite`.
pub use dox_nav::ResolvedNavbar;

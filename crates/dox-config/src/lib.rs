//! Configuration loading for Dox.
//!
//! Parses `site.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! The configuration is the single declarative input of a build: the site
//! descriptor (title, URLs, locales, link-integrity policy), the declared
//! navbar, the sidebar registry, and theme passthrough. Everything is
//! immutable after [`Config::load`] returns.
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `site.url`

use std::path::{Path, PathBuf};

use serde::Deserialize;

use dox_nav::{NavError, NavItem, SidebarRegistry};

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "site.toml";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Site descriptor (global metadata).
    pub site: SiteDescriptor,
    /// Docs configuration (paths are relative strings from TOML).
    docs: DocsConfigRaw,
    /// Declared navbar.
    pub navbar: NavbarConfig,
    /// Named sidebar rules, in declaration order.
    pub sidebars: SidebarRegistry,
    /// Theme passthrough parameters.
    pub theme: ThemeConfig,
    /// Footer passthrough parameters.
    pub footer: FooterConfig,

    /// Resolved docs configuration (set after loading).
    #[serde(skip)]
    pub docs_resolved: DocsConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Global site metadata.
///
/// Created once at configuration load and read-only for the life of a build.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SiteDescriptor {
    /// Site title.
    pub title: String,
    /// Site tagline.
    pub tagline: String,
    /// Canonical production URL.
    pub url: String,
    /// Base path under which the site is served. Must start and end with `/`.
    pub base_url: String,
    /// Available locales.
    pub locales: Vec<String>,
    /// Default locale. Empty means "first entry of `locales`", resolved at load.
    pub default_locale: String,
    /// What to do about broken internal links.
    pub on_broken_links: BrokenLinkPolicy,
}

impl Default for SiteDescriptor {
    fn default() -> Self {
        Self {
            title: "Documentation".to_owned(),
            tagline: String::new(),
            url: "http://localhost".to_owned(),
            base_url: "/".to_owned(),
            locales: vec!["en".to_owned()],
            default_locale: String::new(),
            on_broken_links: BrokenLinkPolicy::Throw,
        }
    }
}

/// Link-integrity policy for broken internal links.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrokenLinkPolicy {
    /// Fail the build.
    #[default]
    Throw,
    /// Log a warning and continue.
    Warn,
    /// Silently continue.
    Ignore,
}

/// Raw docs configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct DocsConfigRaw {
    source_dir: Option<String>,
    extra_routes: Option<Vec<String>>,
}

/// Resolved docs configuration with absolute paths.
#[derive(Debug, Default)]
pub struct DocsConfig {
    /// Source directory for markdown files.
    pub source_dir: PathBuf,
    /// Routes provided outside the docs tree (e.g. `/blog`), exempt from
    /// link-integrity checks.
    pub extra_routes: Vec<String>,
}

/// Declared navbar: branding plus the ordered item list.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct NavbarConfig {
    /// Navbar title (brand text).
    pub title: Option<String>,
    /// Logo asset path.
    pub logo: Option<String>,
    /// Declared items, in order.
    pub items: Vec<NavItem>,
}

/// Theme passthrough parameters.
///
/// Stored verbatim for the rendering layer; no computed behavior.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    /// Syntax highlighting theme for light mode.
    pub light_syntax_theme: String,
    /// Syntax highlighting theme for dark mode.
    pub dark_syntax_theme: String,
    /// Extra syntax-highlighting languages to load.
    pub additional_languages: Vec<String>,
    /// Social card image path.
    pub social_card: Option<String>,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            light_syntax_theme: "github-light".to_owned(),
            dark_syntax_theme: "github-dark".to_owned(),
            additional_languages: Vec::new(),
            social_card: None,
        }
    }
}

/// Footer passthrough parameters.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FooterConfig {
    /// Footer copyright line.
    pub copyright: Option<String>,
    /// Link groups.
    pub links: Vec<FooterLinkGroup>,
}

/// A titled group of footer links.
#[derive(Debug, Deserialize)]
pub struct FooterLinkGroup {
    /// Group title.
    pub title: String,
    /// Links in this group.
    #[serde(default)]
    pub items: Vec<FooterLink>,
}

/// A single footer link.
#[derive(Debug, Deserialize)]
pub struct FooterLink {
    /// Display label.
    pub label: String,
    /// Link target.
    pub href: String,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Malformed navbar declaration.
    #[error("Configuration error: {0}")]
    Nav(#[from] NavError),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`site.url`").
        field: String,
        /// Error message (e.g., "${`SITE_URL`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

/// Expand environment variable references in a string.
///
/// Only `${VAR}` with braces is expanded; bare `$VAR` is left alone.
fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    // Fast path: no expansion needed
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    struct Missing(String);

    shellexpand::env_with_context(value, |var| -> Result<Option<String>, Missing> {
        match std::env::var(var) {
            Ok(val) => Ok(Some(val)),
            Err(_) => Err(Missing(var.to_owned())),
        }
    })
    .map(|cow| cow.into_owned())
    .map_err(|e| ConfigError::EnvVar {
        field: field.to_owned(),
        message: format!("${{{0}}} not set", e.cause.0),
    })
}

impl Config {
    /// Load configuration from file.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `site.toml` in current directory and parents,
    /// falling back to defaults when nothing is found.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or validation fails.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)
        } else {
            Ok(Self::default_with_cwd())
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        let mut config = Self {
            site: SiteDescriptor::default(),
            docs: DocsConfigRaw::default(),
            navbar: NavbarConfig::default(),
            sidebars: SidebarRegistry::new(),
            theme: ThemeConfig::default(),
            footer: FooterConfig::default(),
            docs_resolved: DocsConfig {
                source_dir: base.join("docs"),
                extra_routes: Vec::new(),
            },
            config_path: None,
        };
        config.resolve_locale();
        config
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before validation
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.resolve_locale();
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` (or `ConfigError::Nav` for navbar
    /// structure) if any invariant is violated.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_site()?;
        self.validate_footer()?;
        dox_nav::validate_items(&self.navbar.items)?;
        Ok(())
    }

    /// Validate the site descriptor.
    fn validate_site(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.site.title, "site.title")?;
        require_non_empty(&self.site.url, "site.url")?;
        require_http_url(&self.site.url, "site.url")?;

        if !self.site.base_url.starts_with('/') || !self.site.base_url.ends_with('/') {
            return Err(ConfigError::Validation(
                "site.base_url must start and end with '/'".to_owned(),
            ));
        }

        if self.site.locales.is_empty() {
            return Err(ConfigError::Validation(
                "site.locales cannot be empty".to_owned(),
            ));
        }
        if !self.site.locales.contains(&self.site.default_locale) {
            return Err(ConfigError::Validation(format!(
                "site.default_locale '{}' is not in site.locales",
                self.site.default_locale
            )));
        }

        Ok(())
    }

    /// Validate footer passthrough entries.
    fn validate_footer(&self) -> Result<(), ConfigError> {
        for group in &self.footer.links {
            require_non_empty(&group.title, "footer.links.title")?;
            for link in &group.items {
                require_non_empty(&link.label, "footer.links.items.label")?;
                require_non_empty(&link.href, "footer.links.items.href")?;
            }
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.site.url = expand_env(&self.site.url, "site.url")?;
        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        self.docs_resolved = DocsConfig {
            source_dir: config_dir.join(self.docs.source_dir.as_deref().unwrap_or("docs")),
            extra_routes: self.docs.extra_routes.clone().unwrap_or_default(),
        };
    }

    /// Default the locale to the first declared one when not set explicitly.
    fn resolve_locale(&mut self) {
        if self.site.default_locale.is_empty()
            && let Some(first) = self.site.locales.first()
        {
            self.site.default_locale = first.clone();
        }
    }
}

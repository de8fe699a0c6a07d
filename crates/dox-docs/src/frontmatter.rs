//! YAML front matter and title extraction.
//!
//! Front matter is a YAML block fenced by `---` lines at the very start of a
//! document. Only the keys that influence sidebar placement are read; unknown
//! keys are ignored.

use serde::Deserialize;

/// Sidebar-relevant front matter keys.
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
pub(crate) struct FrontMatter {
    /// Explicit ordering position within the parent category.
    #[serde(default)]
    pub sidebar_position: Option<i64>,
    /// Label override for the sidebar entry.
    #[serde(default)]
    pub sidebar_label: Option<String>,
}

/// Split a document into front matter and body.
///
/// Returns `(None, content)` when the document has no front matter block.
///
/// # Errors
///
/// Returns the YAML parser message when the block is present but malformed.
pub(crate) fn parse_front_matter(content: &str) -> Result<(Option<FrontMatter>, &str), String> {
    let Some(rest) = content.strip_prefix("---") else {
        return Ok((None, content));
    };
    // The opening fence must be a whole line
    let Some(rest) = rest.strip_prefix('\n').or_else(|| rest.strip_prefix("\r\n")) else {
        return Ok((None, content));
    };

    // The closing fence may be the very next line (empty block)
    let end = if rest.starts_with("---") {
        0
    } else {
        rest.find("\n---")
            .map(|i| i + 1)
            .ok_or_else(|| "unterminated front matter block".to_owned())?
    };
    let yaml = &rest[..end];
    let body = rest[end + 3..].trim_start_matches('\r').trim_start_matches('\n');

    if yaml.trim().is_empty() {
        return Ok((Some(FrontMatter::default()), body));
    }
    let front_matter: FrontMatter = serde_yaml::from_str(yaml).map_err(|e| e.to_string())?;
    Ok((Some(front_matter), body))
}

/// Extract the first H1 heading from markdown content.
pub(crate) fn extract_h1(content: &str) -> Option<String> {
    content
        .lines()
        .map(str::trim_end)
        .find_map(|line| line.strip_prefix("# "))
        .map(|title| title.trim().to_owned())
        .filter(|title| !title.is_empty())
}

/// Derive a human-readable title from a file or directory stem.
///
/// `"setup-guide"` becomes `"Setup Guide"`.
pub(crate) fn title_from_stem(stem: &str) -> String {
    stem.split(['-', '_'])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

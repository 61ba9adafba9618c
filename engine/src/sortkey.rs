//! Sort-key extraction for game names.
//!
//! PS1 disc folders are conventionally named `"<index> - <Title>"`; the
//! part after the first `" - "` is what the destination listing should be
//! ordered by. PSP image files are ordered by their full filename.

/// The separator between a folder's index prefix and its title.
const TITLE_SEPARATOR: &str = " - ";

/// Extract the title used to order a game folder.
///
/// Returns the trimmed text after the first occurrence of `" - "`, or the
/// trimmed whole name when the separator is absent. Pure and total: every
/// input string maps to a key.
pub fn title_key(name: &str) -> &str {
    match name.split_once(TITLE_SEPARATOR) {
        Some((_, title)) => title.trim(),
        None => name.trim(),
    }
}

/// Sort names descending by their extracted title (PS1 folder order).
pub fn sort_by_title_desc(names: &mut [String]) {
    names.sort_by(|a, b| title_key(b).cmp(title_key(a)));
}

/// Sort names descending by the full name (PSP file order).
pub fn sort_by_name_desc(names: &mut [String]) {
    names.sort_by(|a, b| b.cmp(a));
}

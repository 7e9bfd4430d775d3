//! Automatic conversation titles.

/// Number of leading words kept in a derived title.
const TITLE_WORDS: usize = 4;

/// Maximum number of characters kept before the ellipsis.
const TITLE_MAX_CHARS: usize = 30;

const ELLIPSIS: &str = "...";

/// Derives a title from the first user message.
///
/// Keeps the first four words and cuts the result at 30 characters. An
/// ellipsis marks that anything was dropped. Returns `None` for blank text.
pub fn derive_title(message: &str) -> Option<String> {
    let words: Vec<&str> = message.split_whitespace().collect();
    if words.is_empty() {
        return None;
    }

    let mut title = words[..words.len().min(TITLE_WORDS)].join(" ");
    let mut truncated = words.len() > TITLE_WORDS;

    if title.chars().count() > TITLE_MAX_CHARS {
        title = title.chars().take(TITLE_MAX_CHARS).collect();
        truncated = true;
    }

    if truncated {
        title.push_str(ELLIPSIS);
    }
    Some(title)
}

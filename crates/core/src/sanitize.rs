//! Free-text cleanup applied before user input reaches an outbound message.
//!
//! Angle brackets are removed and the text is trimmed and cut to a maximum
//! number of characters. The limits mirror the form validation limits, so
//! sanitizing validated input only ever strips brackets.

/// Maximum characters kept for first/last names, state, and city.
pub const NAME_MAX_CHARS: usize = 100;

/// Maximum characters kept for phone numbers and ZIP codes.
pub const SHORT_MAX_CHARS: usize = 20;

/// Maximum characters kept for email addresses.
pub const EMAIL_MAX_CHARS: usize = 255;

/// Maximum characters kept for message bodies and order notes.
pub const MESSAGE_MAX_CHARS: usize = 1000;

/// Strip `<` and `>`, trim surrounding whitespace, and keep at most
/// `max_chars` characters.
///
/// ```
/// use icedelights_core::sanitize::sanitize_text;
///
/// assert_eq!(sanitize_text("  <b>Hi</b> ", 100), "bHi/b");
/// assert_eq!(sanitize_text("héllo", 2), "hé");
/// ```
#[must_use]
pub fn sanitize_text(input: &str, max_chars: usize) -> String {
    let stripped: String = input.chars().filter(|c| !matches!(c, '<' | '>')).collect();
    let trimmed = stripped.trim();
    match trimmed.char_indices().nth(max_chars) {
        Some((cut, _)) => trimmed.get(..cut).unwrap_or(trimmed).trim_end().to_owned(),
        None => trimmed.to_owned(),
    }
}

/// Sanitize an optional field, treating blank results as absent.
#[must_use]
pub fn sanitize_optional(input: Option<&str>, max_chars: usize) -> Option<String> {
    input
        .map(|value| sanitize_text(value, max_chars))
        .filter(|value| !value.is_empty())
}

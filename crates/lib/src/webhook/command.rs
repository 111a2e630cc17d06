//! Keyword command extraction from message text.

/// Zip token from `content` when it starts with `keyword` (exact, case-sensitive prefix).
///
/// The token is the second element of `content` split on single spaces, unvalidated; a
/// missing token comes back as an empty string so the lookup can report it. `None` means
/// the message is not for us.
pub fn extract_zip(content: &str, keyword: &str) -> Option<String> {
    if !content.starts_with(keyword) {
        return None;
    }
    Some(content.split(' ').nth(1).unwrap_or("").to_string())
}

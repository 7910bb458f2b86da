/// Truncate `text` to at most `max_chars` characters, appending `...` when cut.
/// Cuts on char boundaries so multi-byte answers never panic.
pub fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
        None => text.to_string(),
    }
}

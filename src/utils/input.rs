//! Console input cleanup.

/// Sanitize one console line before it is dispatched.
///
/// Tabs become 4 spaces and every other control character is dropped,
/// including the line terminator, so terminal escape sequences never reach
/// the transcript or a model request.
pub fn sanitize_text_input(text: &str) -> String {
    let mut sanitized = String::with_capacity(text.len());

    for c in text.chars() {
        match c {
            '\t' => sanitized.push_str("    "),
            _ if !c.is_control() => sanitized.push(c),
            _ => {}
        }
    }

    sanitized
}

//! Filtering text before it reaches the terminal.

/// Normalize pasted text for the query editor.
///
/// Line endings become `\n`, tabs become four spaces and any other control
/// character is dropped.
pub fn sanitize_text_input(text: &str) -> String {
    let mut sanitized = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\t' => sanitized.push_str("    "),
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                sanitized.push('\n');
            }
            '\n' => sanitized.push(c),
            _ if !c.is_control() => sanitized.push(c),
            _ => {}
        }
    }

    sanitized
}

/// Strip control characters from backend text so it is shown literally.
///
/// Only `\n` survives; escape sequences lose their `ESC`/`BEL` bytes and
/// print as ordinary characters. Tabs are expanded.
pub fn sanitize_display_text(text: &str) -> String {
    let mut sanitized = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\t' => sanitized.push_str("    "),
            '\n' => sanitized.push(c),
            _ if !c.is_control() => sanitized.push(c),
            _ => {}
        }
    }
    sanitized
}

//! XML text escaping shared by every part writer.

use std::borrow::Cow;
use std::fmt::Display;

/// Escape the five XML-reserved characters for text content and attribute values.
///
/// Borrows the input unchanged when nothing needs escaping.
pub fn escape_xml(s: &str) -> Cow<'_, str> {
    if !s.contains(['<', '>', '&', '"', '\'']) {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len() + 16);
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Stringify any displayable value, then escape it.
pub fn escape_display<T: Display + ?Sized>(value: &T) -> String {
    escape_xml(&value.to_string()).into_owned()
}

/// XML declaration emitted at the top of every generated part.
pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

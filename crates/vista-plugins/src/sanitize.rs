//! HTML sanitisation applied to every string a request can inject.
//!
//! Values resolved from requests may later be interpolated into rendered
//! pages, so markup is neutralised at the resolution boundary rather than at
//! render time.

use std::borrow::Cow;

/// Escapes the characters that can open or close markup.
///
/// # Example
///
/// ```
/// use vista_plugins::sanitize::sanitize_html;
///
/// assert_eq!(
///     sanitize_html("<b onclick=\"x\">&</b>"),
///     "&lt;b onclick=&quot;x&quot;&gt;&amp;&lt;/b&gt;"
/// );
/// assert_eq!(sanitize_html("plain"), "plain");
/// ```
#[must_use]
pub fn sanitize_html(input: &str) -> Cow<'_, str> {
    if !input.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(input);
    }
    let mut escaped = String::with_capacity(input.len() + 16);
    for ch in input.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            other => escaped.push(other),
        }
    }
    Cow::Owned(escaped)
}

/// Sanitises every string leaf of a JSON value in place.
pub fn sanitize_json(value: &mut serde_json::Value) {
    match value {
        serde_json::Value::String(text) => {
            let clean = match sanitize_html(text) {
                Cow::Borrowed(_) => return,
                Cow::Owned(clean) => clean,
            };
            *text = clean;
        }
        serde_json::Value::Array(items) => items.iter_mut().for_each(sanitize_json),
        serde_json::Value::Object(map) => map.values_mut().for_each(sanitize_json),
        serde_json::Value::Null | serde_json::Value::Bool(_) | serde_json::Value::Number(_) => {}
    }
}

//! Escaping for text and JSON placed into generated HTML.

/// Escape HTML special characters for safe rendering.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Serialize a value as JSON that is safe to inline inside a `<script>` element.
///
/// `<` is written as `\u003c` so feed text can never close the script tag.
pub fn script_json<T: serde::Serialize + ?Sized>(value: &T) -> serde_json::Result<String> {
    Ok(serde_json::to_string(value)?.replace('<', "\\u003c"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_escape_basic() {
        assert_eq!(html_escape("Kīlauea"), "Kīlauea");
        assert_eq!(html_escape("<script>"), "&lt;script&gt;");
        assert_eq!(html_escape("a & b"), "a &amp; b");
        assert_eq!(html_escape("O'Higgins \"region\""), "O&#39;Higgins &quot;region&quot;");
    }

    #[test]
    fn test_script_json_cannot_close_tag() {
        let json = script_json(&serde_json::json!({"place": "</script><b>"})).unwrap();
        assert!(!json.contains("</script>"));
        let back: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(back["place"], "</script><b>");
    }
}

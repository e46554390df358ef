//! Input sanitization, output scrubbing, and the content-safety gate.
//!
//! Decisions arrive as free text from an untrusted UI and branch stories
//! come back from an LLM; both pass through here before they are rendered
//! or persisted. Sanitization never fails — bad input is rewritten, and
//! the safety gate reports a reason instead of raising.

use std::sync::LazyLock;

use regex::Regex;

static UNSAFE_PATTERNS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    vec![(
        Regex::new(r"(?i)\b(suicide|self[- ]?harm)\b").expect("pattern compiles"),
        "self-harm content",
    )]
});

static SCRIPT_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<script.*?>.*?</script>").expect("pattern compiles"));

static JS_SCHEME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)javascript:").expect("pattern compiles"));

/// Sanitize a user decision: HTML-escape, truncate to `max_len` characters
/// (appending `...`), and collapse whitespace runs.
pub fn sanitize_decision(decision: &str, max_len: usize) -> String {
    let escaped = escape_html(decision);

    let truncated = if escaped.chars().count() > max_len {
        let mut s: String = escaped.chars().take(max_len).collect();
        s.push_str("...");
        s
    } else {
        escaped
    };

    truncated.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Content-safety gate. Returns the reason when the text should be
/// rejected, `None` when it is fine to simulate.
///
/// Only genuinely harmful prompts are blocked; rejected input still gets
/// the safe template branches rather than an error.
pub fn check_content_safety(text: &str) -> Option<&'static str> {
    UNSAFE_PATTERNS
        .iter()
        .find(|(pattern, _)| pattern.is_match(text))
        .map(|(_, reason)| *reason)
}

/// Strip potential injection vectors from model output.
pub fn sanitize_output(text: &str) -> String {
    let text = SCRIPT_BLOCK.replace_all(text, "");
    let text = JS_SCHEME.replace_all(&text, "");
    escape_html(&text)
}

/// Escape the HTML-significant characters. `&` goes first so entities
/// produced by the later replacements survive intact.
fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

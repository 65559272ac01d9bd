//! Message segment helpers.
//!
//! OneBot v11 messages arrive as an ordered array of segments, each
//! `{"type": ..., "data": {...}}`. The handlers only need three views of
//! that array: a human-readable text rendering, whether the bot is
//! @-mentioned, and the text left over after a leading mention.
//!
//! Segments stay `serde_json::Value`; the helpers probe the fields they
//! need and ignore everything else.

use serde_json::Value;

/// Renders message segments as display text.
///
/// `text` segments contribute their content, `at` segments render as
/// `@<qq>` (matching how chat clients display mentions), all other segment
/// types contribute nothing. Non-array input renders as empty.
pub fn display_text(message: &Value) -> String {
    let Value::Array(segments) = message else {
        return String::new();
    };
    segments
        .iter()
        .filter_map(|seg| match seg.get("type")?.as_str()? {
            "text" => seg
                .get("data")?
                .get("text")?
                .as_str()
                .map(str::to_string),
            "at" => at_target(seg).map(|qq| format!("@{qq}")),
            _ => None,
        })
        .collect()
}

/// Returns the `qq` field of an `at` segment, normalized to a string.
///
/// The platform encodes the target as either a JSON string or a number;
/// both forms are accepted. Returns `None` for any other segment type.
fn at_target(seg: &Value) -> Option<String> {
    if seg.get("type")?.as_str()? != "at" {
        return None;
    }
    match seg.get("data")?.get("qq")? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Whether `seg` is an `at` segment targeting `self_id`.
pub fn is_at_self(seg: &Value, self_id: i64) -> bool {
    at_target(seg).is_some_and(|qq| qq == self_id.to_string())
}

/// Whether any segment in the message @-mentions the bot.
pub fn mentions(message: &Value, self_id: i64) -> bool {
    match message {
        Value::Array(segments) => segments.iter().any(|seg| is_at_self(seg, self_id)),
        _ => false,
    }
}

/// Strips a single leading bot-mention token from `text`.
///
/// If the first segment of the message is an at-self mention, the first
/// whitespace-separated token of the trimmed text (the mention rendering)
/// is removed once and the remainder trimmed. Otherwise the text is only
/// trimmed. Used by the mention handler to decide whether the bot was
/// called with no further content.
pub fn strip_leading_mention(message: &Value, self_id: i64, text: &str) -> String {
    let text = text.trim();
    let first_is_at_self = matches!(
        message,
        Value::Array(segments) if segments.first().is_some_and(|seg| is_at_self(seg, self_id))
    );
    if !first_is_at_self {
        return text.to_string();
    }
    match text.split_whitespace().next() {
        Some(token) => text.replacen(token, "", 1).trim().to_string(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SELF_ID: i64 = 10001000;

    #[test]
    fn test_display_text() {
        let message = json!([
            {"type": "at", "data": {"qq": "10001000"}},
            {"type": "text", "data": {"text": " hello"}},
            {"type": "image", "data": {"file": "a.jpg"}},
        ]);
        assert_eq!(display_text(&message), "@10001000 hello");

        assert_eq!(display_text(&json!([])), "");
        assert_eq!(display_text(&Value::Null), "");
    }

    #[test]
    fn test_mentions_string_and_numeric_qq() {
        let string_form = json!([{"type": "at", "data": {"qq": "10001000"}}]);
        let numeric_form = json!([{"type": "at", "data": {"qq": 10001000}}]);
        let other_user = json!([{"type": "at", "data": {"qq": "42"}}]);

        assert!(mentions(&string_form, SELF_ID));
        assert!(mentions(&numeric_form, SELF_ID));
        assert!(!mentions(&other_user, SELF_ID));
    }

    #[test]
    fn test_at_all_is_not_a_mention() {
        let at_all = json!([{"type": "at", "data": {"qq": "all"}}]);
        assert!(!mentions(&at_all, SELF_ID));
    }

    #[test]
    fn test_strip_leading_mention() {
        let message = json!([
            {"type": "at", "data": {"qq": "10001000"}},
            {"type": "text", "data": {"text": " 你好"}},
        ]);
        assert_eq!(
            strip_leading_mention(&message, SELF_ID, "@10001000 你好"),
            "你好"
        );

        let bare = json!([{"type": "at", "data": {"qq": "10001000"}}]);
        assert_eq!(strip_leading_mention(&bare, SELF_ID, "@10001000"), "");
        assert_eq!(strip_leading_mention(&bare, SELF_ID, "  "), "");
    }

    #[test]
    fn test_strip_without_leading_mention_only_trims() {
        let message = json!([
            {"type": "text", "data": {"text": "hello "}},
            {"type": "at", "data": {"qq": "10001000"}},
        ]);
        assert_eq!(
            strip_leading_mention(&message, SELF_ID, " hello @10001000 "),
            "hello @10001000"
        );
    }
}

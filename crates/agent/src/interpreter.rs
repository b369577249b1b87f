//! Response interpreter — parses raw model output into a typed [`Intent`].
//!
//! Model output drifts between formatting conventions across prompt
//! revisions, so the interpreter is a layered-fallback parser rather than a
//! single pattern match. Layers are tried in order, first match wins:
//!
//! 1. A known action name appearing anywhere in the text, with parameters
//!    taken from the first brace-delimited region after it.
//! 2. A leading `ACTION:` / `ANSWER:` marker.
//! 3. Fail-open: echo the raw text.
//!
//! `interpret` is a pure function of its input and total — every possible
//! string maps to some `Intent`, nothing panics.

use stockchat_core::intent::{ActionParams, Intent};

/// The fixed set of action names the assistant can dispatch.
pub const ACTION_NAMES: [&str; 3] = ["add_item", "list_items", "update_quantity"];

/// Interpret one raw model response.
pub fn interpret(raw: &str) -> Intent {
    if let Some((name, rest)) = find_action_token(raw) {
        let params = match extract_json_object(rest) {
            Some(region) => parse_params(region),
            None => ActionParams::empty(),
        };
        return Intent::ActionCall {
            name: name.to_string(),
            params,
        };
    }

    if let Some(intent) = parse_marker(raw) {
        return intent;
    }

    Intent::Unparseable {
        raw: raw.to_string(),
    }
}

/// Layer 1: find the earliest known action name, matched case-insensitively
/// on token boundaries. Returns the canonical name and the text after it.
///
/// Action names are ASCII, so the scan compares byte windows with
/// `eq_ignore_ascii_case` directly on `raw`. A matched window is all ASCII,
/// which makes both ends of it char boundaries in arbitrary UTF-8 input.
pub fn find_action_token(raw: &str) -> Option<(&'static str, &str)> {
    let bytes = raw.as_bytes();

    let mut best: Option<(usize, &'static str)> = None;
    for name in ACTION_NAMES {
        let window = name.len();
        let mut start = 0;
        while start + window <= bytes.len() {
            if bytes[start..start + window].eq_ignore_ascii_case(name.as_bytes())
                && is_token_boundary(raw, start, start + window)
            {
                if best.is_none_or(|(b, _)| start < b) {
                    best = Some((start, name));
                }
                break;
            }
            start += 1;
        }
    }

    let (start, name) = best?;
    Some((name, &raw[start + name.len()..]))
}

/// A token boundary is any position not flanked by an identifier character.
fn is_token_boundary(text: &str, start: usize, end: usize) -> bool {
    let before_ok = start == 0
        || text[..start]
            .chars()
            .next_back()
            .is_none_or(|c| !c.is_alphanumeric() && c != '_');
    let after_ok = end >= text.len()
        || text[end..]
            .chars()
            .next()
            .is_none_or(|c| !c.is_alphanumeric() && c != '_');
    before_ok && after_ok
}

/// Extract the first balanced `{...}` region in `text`.
///
/// Uses brace-depth counting, skipping braces inside JSON string literals
/// (including escaped quotes), so a `}` closing a nested object or embedded
/// in a string never truncates the region. Returns `None` when no `{` is
/// present or the braces never balance.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let bytes = text.as_bytes();

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, &b) in bytes[start..].iter().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }

    None
}

/// Parse a brace-delimited region into parameters.
///
/// Invalid JSON is carried as `Malformed` — the action stays recognized so
/// the dispatcher can report the failure against its name.
fn parse_params(region: &str) -> ActionParams {
    match serde_json::from_str::<serde_json::Value>(region) {
        Ok(serde_json::Value::Object(map)) => ActionParams::Object(map),
        _ => ActionParams::Malformed,
    }
}

/// Layer 2: leading `ACTION:` / `ANSWER:` markers, case-insensitive.
///
/// `ACTION: <name> [{json}]` is an action call even when the name is not in
/// the known set — the dispatcher owns the "Unknown action" report.
/// `ANSWER: <text>` is a direct answer with the marker stripped.
pub fn parse_marker(raw: &str) -> Option<Intent> {
    let trimmed = raw.trim_start();

    if let Some(rest) = strip_prefix_ignore_case(trimmed, "ACTION:") {
        let rest = rest.trim_start();
        let name: String = rest
            .chars()
            .take_while(|c| c.is_alphanumeric() || *c == '_')
            .collect();
        if name.is_empty() {
            return None;
        }
        let after_name = &rest[name.len()..];
        let params = match extract_json_object(after_name) {
            Some(region) => parse_params(region),
            None => ActionParams::empty(),
        };
        return Some(Intent::ActionCall { name, params });
    }

    if let Some(rest) = strip_prefix_ignore_case(trimmed, "ANSWER:") {
        return Some(Intent::DirectAnswer {
            text: rest.trim().to_string(),
        });
    }

    None
}

/// `prefix` must be ASCII. Compares bytes so a multibyte character
/// straddling the prefix length cannot cause an out-of-boundary slice; a
/// matching head is all ASCII, so the split offset is a char boundary.
fn strip_prefix_ignore_case<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let head = text.as_bytes().get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix.as_bytes()) {
        Some(&text[prefix.len()..])
    } else {
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────

//! Parsers that turn loosely structured text into candidate codex records.
//!
//! Two sources feed the codex: the generative text service (asked for
//! strict JSON, but prone to wrapping it in code fences anyway) and
//! manually pasted character notes. Both parsers degrade to best-effort
//! extraction — a malformed candidate is dropped, never fatal for its
//! siblings. Only a wholly unparseable AI response is an error, and that
//! error discards the batch without touching the codex.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Sentinel rendered for any template field the source text did not reveal.
/// Fields are never left silently blank — the UI expects a consistent
/// field layout.
pub const UNKNOWN_FIELD: &str = "Unknown";

/// Keys recognized (case-sensitively) by the manual import parser. Any
/// other key is preserved under Notes rather than dropped.
pub const RECOGNIZED_IMPORT_KEYS: &[&str] = &[
    "Role",
    "Age",
    "Appearance",
    "Personality",
    "Background",
    "Character Arc",
    "Key Relationships",
    "Notable Traits",
];

/// `Key: Value` line — the key is everything up to the first colon.
static KEY_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([^:]+):\s*(.*)$").expect("valid regex"));

// ---------------------------------------------------------------------------
// Candidate record
// ---------------------------------------------------------------------------

/// An unvalidated, provisional character record produced by a parser.
///
/// The six template fields always carry text ([`UNKNOWN_FIELD`] when the
/// source omitted them). `arc`, `relationships`, and `extra_notes` only
/// appear on manual imports, which recognize a wider key set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateCharacter {
    pub name: String,
    pub role: String,
    pub age: String,
    pub appearance: String,
    pub personality: String,
    pub background: String,
    pub traits: String,
    pub arc: Option<String>,
    pub relationships: Option<String>,
    /// Unrecognized `Key: Value` lines and orphan continuations, one per line.
    pub extra_notes: Option<String>,
}

impl CandidateCharacter {
    fn with_name(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            role: UNKNOWN_FIELD.to_string(),
            age: UNKNOWN_FIELD.to_string(),
            appearance: UNKNOWN_FIELD.to_string(),
            personality: UNKNOWN_FIELD.to_string(),
            background: UNKNOWN_FIELD.to_string(),
            traits: UNKNOWN_FIELD.to_string(),
            arc: None,
            relationships: None,
            extra_notes: None,
        }
    }
}

// ---------------------------------------------------------------------------
// AI extraction
// ---------------------------------------------------------------------------

/// Parse the generative service's extraction response into candidates.
///
/// The response is expected to be a JSON array of character objects (a
/// single bare object is also accepted). Code-fence markers (```json /
/// ```) are stripped before parsing — the service wraps its output in
/// them despite being asked not to.
///
/// Per-candidate failures degrade: an element that is not an object, or
/// that lacks a non-empty `name`, is dropped without affecting its
/// siblings. A response that is not valid JSON at all is
/// [`CoreError::Parse`], discarding the whole batch.
pub fn parse_ai_extraction(raw: &str) -> Result<Vec<CandidateCharacter>, CoreError> {
    let cleaned = strip_code_fences(raw);
    let value: Value = serde_json::from_str(&cleaned)
        .map_err(|e| CoreError::Parse(format!("extraction response is not valid JSON: {e}")))?;

    let items = match value {
        Value::Array(items) => items,
        obj @ Value::Object(_) => vec![obj],
        other => {
            return Err(CoreError::Parse(format!(
                "extraction response must be a JSON array or object, got {}",
                json_type_name(&other)
            )))
        }
    };

    let mut candidates = Vec::new();
    for item in &items {
        let Some(obj) = item.as_object() else {
            continue;
        };
        let Some(name) = text_field(obj, "name").filter(|n| !n.trim().is_empty()) else {
            // A candidate without a name cannot be matched or created.
            continue;
        };

        let mut candidate = CandidateCharacter::with_name(name.trim());
        if let Some(v) = text_field(obj, "role") {
            candidate.role = v;
        }
        if let Some(v) = text_field(obj, "age") {
            candidate.age = v;
        }
        if let Some(v) = text_field(obj, "appearance") {
            candidate.appearance = v;
        }
        if let Some(v) = text_field(obj, "personality") {
            candidate.personality = v;
        }
        if let Some(v) = text_field(obj, "background") {
            candidate.background = v;
        }
        if let Some(v) = text_field(obj, "traits") {
            candidate.traits = v;
        }
        candidates.push(candidate);
    }

    Ok(candidates)
}

/// Strip a leading ```json / ``` fence line and a trailing ``` fence.
fn strip_code_fences(raw: &str) -> String {
    let mut s = raw.trim();
    if let Some(rest) = s.strip_prefix("```") {
        // Drop the info string ("json", "JSON", ...) up to the first newline.
        s = rest.split_once('\n').map(|(_, body)| body).unwrap_or("");
    }
    let trimmed = s.trim_end();
    if let Some(body) = trimmed.strip_suffix("```") {
        s = body;
    }
    s.trim().to_string()
}

/// Read a field as text, accepting strings, numbers, and booleans — the
/// service sometimes emits `"age": 19` instead of `"age": "19"`.
fn text_field(obj: &serde_json::Map<String, Value>, key: &str) -> Option<String> {
    match obj.get(key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ---------------------------------------------------------------------------
// Manual import
// ---------------------------------------------------------------------------

/// Where a continuation line (no colon) should be appended.
enum LastKey {
    None,
    Field(&'static str),
    Notes,
}

/// Parse manually pasted character notes into a single candidate.
///
/// The first non-empty line is the name. Remaining lines are scanned for a
/// `Key: Value` pattern; recognized keys (see [`RECOGNIZED_IMPORT_KEYS`],
/// matched case-sensitively) fill the template fields, anything else is
/// preserved under Notes. A line without a colon continues the most
/// recently seen key, appended on a new line.
///
/// Returns `None` when the input has no non-empty line at all.
pub fn parse_manual_import(raw: &str) -> Option<CandidateCharacter> {
    let mut lines = raw.lines();
    let name = loop {
        let line = lines.next()?;
        if !line.trim().is_empty() {
            break line.trim();
        }
    };

    let mut fields: Vec<(&'static str, String)> = Vec::new();
    let mut notes_lines: Vec<String> = Vec::new();
    let mut last = LastKey::None;

    for line in lines {
        if line.trim().is_empty() {
            continue;
        }
        if let Some(caps) = KEY_LINE_RE.captures(line) {
            let key = caps[1].trim().to_string();
            let value = caps[2].trim().to_string();
            if let Some(&canonical) = RECOGNIZED_IMPORT_KEYS.iter().find(|k| **k == key) {
                // Later occurrences of the same key overwrite earlier ones.
                fields.retain(|(k, _)| *k != canonical);
                fields.push((canonical, value));
                last = LastKey::Field(canonical);
            } else {
                notes_lines.push(format!("{key}: {value}"));
                last = LastKey::Notes;
            }
        } else {
            let continuation = line.trim();
            match last {
                LastKey::Field(key) => {
                    if let Some((_, value)) = fields.iter_mut().find(|(k, _)| *k == key) {
                        value.push('\n');
                        value.push_str(continuation);
                    }
                }
                LastKey::Notes => {
                    if let Some(value) = notes_lines.last_mut() {
                        value.push('\n');
                        value.push_str(continuation);
                    }
                }
                // No key seen yet — Notes is the only bucket that cannot
                // silently drop text.
                LastKey::None => notes_lines.push(continuation.to_string()),
            }
        }
    }

    let mut candidate = CandidateCharacter::with_name(name);
    for (key, value) in fields {
        match key {
            "Role" => candidate.role = value,
            "Age" => candidate.age = value,
            "Appearance" => candidate.appearance = value,
            "Personality" => candidate.personality = value,
            "Background" => candidate.background = value,
            "Character Arc" => candidate.arc = Some(value),
            "Key Relationships" => candidate.relationships = Some(value),
            "Notable Traits" => candidate.traits = value,
            _ => unreachable!("key comes from RECOGNIZED_IMPORT_KEYS"),
        }
    }
    if !notes_lines.is_empty() {
        candidate.extra_notes = Some(notes_lines.join("\n"));
    }

    Some(candidate)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

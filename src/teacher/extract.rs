//! Extraction of JSON objects embedded in free-text completions.
//!
//! The teacher model is asked for a fixed JSON shape but tends to wrap it in
//! prose ("Here you go: {...} Good luck!"). These helpers find balanced
//! `{...}` regions and try to deserialize them, without ever failing loudly.

use serde::de::DeserializeOwned;
use tracing::debug;

/// Returns the first balanced `{...}` region in `text`, if any.
///
/// Braces inside JSON string literals (including escaped quotes) do not count
/// toward the balance.
///
/// # Example
///
/// ```
/// use havo_speak::teacher::first_json_object;
///
/// let text = r#"Sure! {"grammar": 7} Hope this helps."#;
/// assert_eq!(first_json_object(text), Some(r#"{"grammar": 7}"#));
/// ```
pub fn first_json_object(text: &str) -> Option<&str> {
    json_objects(text).next()
}

/// Iterates over all balanced, non-overlapping `{...}` regions in `text`.
///
/// An opening brace that is never closed is skipped and scanning resumes at
/// the next opening brace.
pub fn json_objects(text: &str) -> impl Iterator<Item = &str> {
    let mut cursor = 0;
    std::iter::from_fn(move || {
        while let Some(offset) = text[cursor..].find('{') {
            let start = cursor + offset;
            if let Some(end) = balanced_end(&text[start..]) {
                cursor = start + end;
                return Some(&text[start..start + end]);
            }
            cursor = start + 1;
        }
        cursor = text.len();
        None
    })
}

/// Deserializes the first embedded object that matches `T`.
///
/// Returns `None` when no candidate parses; callers treat that as "no
/// structured answer", not as an error.
pub fn parse_embedded<T: DeserializeOwned>(text: &str) -> Option<T> {
    let parsed = json_objects(text).find_map(|candidate| {
        serde_json::from_str::<T>(candidate)
            .map_err(|e| debug!("Skipping embedded object: {e}"))
            .ok()
    });

    if parsed.is_none() {
        debug!("No usable JSON object in completion ({} bytes)", text.len());
    }
    parsed
}

/// Given a slice starting with `{`, returns the byte length of the balanced
/// object, or `None` when it is never closed.
fn balanced_end(slice: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (idx, ch) in slice.char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(idx + ch.len_utf8());
                }
            }
            _ => {}
        }
    }

    None
}

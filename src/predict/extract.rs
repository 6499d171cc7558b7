//! Locates the first JSON object embedded in raw model output.

/// Extracts the first top-level JSON object from `raw`.
///
/// Strips an optional fenced code block (with or without a language tag),
/// then scans for a balanced `{...}` span, treating braces inside string
/// literals as content. When no balanced object closes before the text ends
/// (typically truncated output), the widest first-`{` to last-`}` span is
/// returned instead so the caller's JSON parser produces the diagnostic.
/// Returns `None` when the text contains no plausible object at all.
///
/// Never panics, regardless of input.
pub fn extract_json(raw: &str) -> Option<&str> {
    let text = strip_fences(raw);
    balanced_object(text).or_else(|| widest_span(text))
}

// Remove a surrounding ``` fence, tolerating a language tag on the opening
// fence and a missing closing fence.
fn strip_fences(raw: &str) -> &str {
    let mut text = raw.trim();

    if let Some(rest) = text.strip_prefix("```") {
        let rest = rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric());
        text = rest
            .strip_prefix("\r\n")
            .or_else(|| rest.strip_prefix('\n'))
            .unwrap_or(rest);
    }

    let trimmed = text.trim_end();
    if let Some(rest) = trimmed.strip_suffix("```") {
        text = rest;
    }

    text.trim()
}

// Byte scan for the first `{` whose matching `}` closes it. String literals
// (including escape sequences) are skipped so an embedded `}` cannot end the
// span early. All significant bytes are ASCII, so byte indices are valid
// char boundaries.
fn balanced_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, &b) in text.as_bytes().iter().enumerate().skip(start) {
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
                    return Some(&text[start..=i]);
                }
            }
            _ => {}
        }
    }

    None
}

// First-`{` to last-`}` heuristic, used only when no balanced object
// exists. Yields something parseable or a span the parser can fault on.
fn widest_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

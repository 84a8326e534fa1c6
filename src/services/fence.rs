//! Line-based scanner for fenced code regions.
//!
//! Two states: outside a block and inside one. A line opens a block when,
//! after leading whitespace, it starts with three or more backticks and the
//! rest of the line holds no backtick. Inside a block only a line made of
//! backticks alone, at least as many as the opener, closes it; anything
//! else (including a nested "```lang" line) is content. A block still open
//! at the end of the text is discarded.

use crate::domain::models::CodeRegion;

const MIN_FENCE: usize = 3;

enum State {
    Outside,
    Inside {
        fence_len: usize,
        language: Option<String>,
        start_line: usize,
        body: Vec<String>,
    },
}

/// Parse an opening fence line into `(fence_len, language)`.
fn opening_fence(line: &str) -> Option<(usize, Option<String>)> {
    let trimmed = line.trim_start();
    let fence_len = trimmed.chars().take_while(|c| *c == '`').count();
    if fence_len < MIN_FENCE {
        return None;
    }

    let info = &trimmed[fence_len..];
    if info.contains('`') {
        return None;
    }

    let language = info.split_whitespace().next().map(str::to_string);
    Some((fence_len, language))
}

fn closes(line: &str, fence_len: usize) -> bool {
    let trimmed = line.trim();
    trimmed.len() >= fence_len && trimmed.chars().all(|c| c == '`')
}

/// All well-formed code regions of `text`, in order of appearance.
pub fn scan(text: &str) -> Vec<CodeRegion> {
    let mut regions = Vec::new();
    let mut state = State::Outside;

    for (index, line) in text.lines().enumerate() {
        state = match state {
            State::Outside => match opening_fence(line) {
                Some((fence_len, language)) => State::Inside {
                    fence_len,
                    language,
                    start_line: index,
                    body: Vec::new(),
                },
                None => State::Outside,
            },
            State::Inside {
                fence_len,
                language,
                start_line,
                mut body,
            } => {
                if closes(line, fence_len) {
                    regions.push(CodeRegion {
                        language,
                        body: body.join("\n"),
                        fence_len,
                        start_line,
                        end_line: index,
                    });
                    State::Outside
                } else {
                    body.push(line.to_string());
                    State::Inside {
                        fence_len,
                        language,
                        start_line,
                        body,
                    }
                }
            }
        };
    }

    regions
}

/// Number of well-formed code regions in `text`.
pub fn count(text: &str) -> usize {
    scan(text).len()
}

/// Body of the only code region in `text`, or `text` itself when it holds
/// zero or several regions.
pub fn single_body(text: &str) -> String {
    let mut regions = scan(text);
    if regions.len() == 1 {
        regions.remove(0).body
    } else {
        text.to_string()
    }
}

/// Render `body` as a fenced block using `fence_len` backticks.
pub fn render(body: &str, language: Option<&str>, fence_len: usize) -> String {
    let fence = "`".repeat(fence_len.max(MIN_FENCE));
    format!("{fence}{}\n{body}\n{fence}", language.unwrap_or(""))
}

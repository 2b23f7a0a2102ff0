//! Line-oriented helpers for the small amount of markdown structure the
//! daily README and weekly log files rely on: ATX headings, `## Section`
//! bodies and HTML comment hints.

use regex::Regex;
use std::borrow::Cow;
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Headings
// ---------------------------------------------------------------------------

/// Level of an ATX heading (`## Title` -> 2), or `None` for ordinary lines.
pub fn heading_level(line: &str) -> Option<usize> {
    let hashes = line.bytes().take_while(|&b| b == b'#').count();
    if hashes == 0 || hashes > 6 {
        return None;
    }
    match line.as_bytes().get(hashes) {
        None | Some(b' ') | Some(b'\t') => Some(hashes),
        _ => None,
    }
}

/// Heading text without the leading hashes, trimmed.
pub fn heading_text(line: &str) -> Option<&str> {
    let level = heading_level(line)?;
    Some(line[level..].trim())
}

// ---------------------------------------------------------------------------
// Section extraction
// ---------------------------------------------------------------------------

/// Body of the `## <title>` section: everything after the heading line up to
/// the next `## ` heading (or the end of the document), with HTML comments
/// and surrounding blank lines removed. Headings inside fenced code blocks
/// do not count.
///
/// Returns `None` when the document has no such heading.
pub fn extract_section(doc: &str, title: &str) -> Option<String> {
    let lines: Vec<&str> = doc.lines().collect();
    let fenced = fenced_lines(&lines);
    let is_section = |i: usize| !fenced[i] && heading_level(lines[i]) == Some(2);

    let start = (0..lines.len()).find(|&i| is_section(i) && heading_text(lines[i]) == Some(title))?;
    let end = (start + 1..lines.len())
        .find(|&i| is_section(i))
        .unwrap_or(lines.len());

    let body = lines[start + 1..end].join("\n");
    Some(trim_blank_lines(&strip_html_comments(&body)).to_string())
}

// ---------------------------------------------------------------------------
// Code fences
// ---------------------------------------------------------------------------

fn fence_marker(line: &str) -> Option<&'static str> {
    let line = line.trim_start();
    ["```", "~~~"].into_iter().find(|m| line.starts_with(m))
}

/// For each line, whether it belongs to a fenced code block, fence lines
/// included. A fence left open at the end of the text does not count as a
/// block.
pub fn fenced_lines<S: AsRef<str>>(lines: &[S]) -> Vec<bool> {
    let mut mask = vec![false; lines.len()];
    let mut open: Option<(usize, &str)> = None;
    for (i, line) in lines.iter().enumerate() {
        let marker = fence_marker(line.as_ref());
        match (open, marker) {
            (None, Some(m)) => {
                open = Some((i, m));
                mask[i] = true;
            }
            (Some((_, o)), Some(m)) if o == m => {
                open = None;
                mask[i] = true;
            }
            (Some(_), _) => mask[i] = true,
            (None, None) => {}
        }
    }
    if let Some((start, _)) = open {
        mask[start..].iter_mut().for_each(|m| *m = false);
    }
    mask
}

/// Marker of a code fence the text opens and never closes.
pub fn unclosed_fence<S: AsRef<str>>(lines: &[S]) -> Option<&'static str> {
    let mut open = None;
    for line in lines {
        match (open, fence_marker(line.as_ref())) {
            (None, Some(m)) => open = Some(m),
            (Some(o), Some(m)) if o == m => open = None,
            _ => {}
        }
    }
    open
}

static COMMENT_RE: OnceLock<Regex> = OnceLock::new();

fn comment_re() -> &'static Regex {
    COMMENT_RE.get_or_init(|| Regex::new(r"(?s)<!--.*?-->").unwrap())
}

/// Remove every `<!-- ... -->` block, including ones spanning lines.
pub fn strip_html_comments(text: &str) -> Cow<'_, str> {
    comment_re().replace_all(text, "")
}

/// Drop leading and trailing whitespace-only lines, keeping inner
/// indentation intact.
pub fn trim_blank_lines(text: &str) -> &str {
    let lines: Vec<&str> = text.lines().collect();
    let Some(first) = lines.iter().position(|l| !l.trim().is_empty()) else {
        return "";
    };
    let last = lines
        .iter()
        .rposition(|l| !l.trim().is_empty())
        .unwrap_or(first);

    // Slice the original text so interior line endings survive untouched.
    let start = line_offset(text, first);
    let end = line_offset(text, last) + lines[last].len();
    &text[start..end]
}

fn line_offset(text: &str, index: usize) -> usize {
    text.split_inclusive('\n').take(index).map(str::len).sum()
}

/// Replace every run of blank lines with a single empty line.
pub fn collapse_blank_lines(lines: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(lines.len());
    for line in lines {
        if line.trim().is_empty() {
            if out.last().is_some_and(|prev| prev.is_empty()) {
                continue;
            }
            out.push(String::new());
        } else {
            out.push(line);
        }
    }
    out
}

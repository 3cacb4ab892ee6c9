use once_cell::sync::Lazy;
use regex::Regex;

static TRAILING_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)[ \t]+$").unwrap());
static HEADING: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^(#{1,6})[ \t]*([^#\s])").unwrap());
static BULLET: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^([ \t]*)[-*+•][ \t]+").unwrap());
static NUMBERED: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^([ \t]*)(\d+)[.)][ \t]+").unwrap());
static EXTRA_NEWLINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());
static FENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[ \t]{0,3}(```|~~~)").unwrap());

/// Normalizes the Markdown produced by the model.
///
/// Collapses runs of blank lines, puts exactly one space after heading markers
/// and rewrites bullet and numbered list markers to `- ` and `N. `. Lines inside
/// fenced code blocks keep their markers. Applying it to its own output returns
/// the same text.
pub fn format_response(raw: &str) -> String {
    let text = raw.replace("\r\n", "\n").replace('\r', "\n");
    // Trim first so an indented opening heading is still seen as a heading.
    let text = TRAILING_WHITESPACE.replace_all(text.trim(), "");
    let text = normalize_markers(&text);
    EXTRA_NEWLINES.replace_all(&text, "\n\n").into_owned()
}

/// Applies the heading and list rules to prose only, copying fenced blocks as is.
fn normalize_markers(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prose = String::new();
    let mut open_fence: Option<&str> = None;

    for line in text.split_inclusive('\n') {
        let fence = FENCE
            .captures(line)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str());

        match (open_fence, fence) {
            (Some(open), Some(close)) if open == close => {
                out.push_str(line);
                open_fence = None;
            }
            (Some(_), _) => out.push_str(line),
            (None, Some(_)) => {
                flush_prose(&mut prose, &mut out);
                out.push_str(line);
                open_fence = fence;
            }
            (None, None) => prose.push_str(line),
        }
    }
    flush_prose(&mut prose, &mut out);
    out
}

fn flush_prose(prose: &mut String, out: &mut String) {
    let text = HEADING.replace_all(prose.as_str(), "$1 $2");
    let text = BULLET.replace_all(&text, "${1}- ");
    let text = NUMBERED.replace_all(&text, "${1}${2}. ");
    out.push_str(&text);
    prose.clear();
}

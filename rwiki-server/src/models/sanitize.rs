//! Server-side input sanitization.
//!
//! Submissions come from public, unauthenticated forms: HTML tags and
//! invisible control characters are stripped before validation, and
//! multiline fields are normalized to `\n` with runs of blank lines
//! collapsed.

use once_cell::sync::Lazy;
use regex::Regex;

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").expect("invalid tag regex"));

static CONTROL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\x00-\x08\x0B\x0C\x0E-\x1F]").expect("invalid control regex"));

static BLANK_RUNS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n{3,}").expect("invalid blank-run regex"));

/// Embedded script markers that survive tag stripping.
static SCRIPT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)<script|javascript:|on\w+\s*=").expect("invalid script regex")
});

/// Clean a single-line field: strip tags and control characters, trim.
pub fn clean_line(value: &str) -> String {
    let value = TAG_RE.replace_all(value, "");
    let value = CONTROL_RE.replace_all(&value, "");
    value.trim().to_string()
}

/// Clean a multiline field: as [`clean_line`], plus newline
/// normalization and collapsing of 3+ consecutive blank lines.
pub fn clean_multiline(value: &str) -> String {
    let value = TAG_RE.replace_all(value, "");
    let value = CONTROL_RE.replace_all(&value, "");
    let value = value.replace("\r\n", "\n").replace('\r', "\n");
    BLANK_RUNS_RE.replace_all(&value, "\n\n").trim().to_string()
}

/// Detect script-like content in the raw (pre-sanitization) input.
pub fn looks_like_script(raw: &str) -> bool {
    SCRIPT_RE.is_match(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_tags() {
        assert_eq!(clean_line("<b>Chez Paul</b>"), "Chez Paul");
        assert_eq!(clean_line("a <script>x</script> b"), "a x b");
    }

    #[test]
    fn strips_control_chars() {
        assert_eq!(clean_line("a\x00b\x1Fc"), "abc");
        // \n and \t survive in multiline cleaning
        assert_eq!(clean_multiline("a\tb\nc"), "a\tb\nc");
    }

    #[test]
    fn normalizes_newlines() {
        assert_eq!(clean_multiline("a\r\nb\rc"), "a\nb\nc");
        assert_eq!(clean_multiline("a\n\n\n\n\nb"), "a\n\nb");
    }

    #[test]
    fn detects_script_content() {
        assert!(looks_like_script("<script>alert(1)</script>"));
        assert!(looks_like_script("click javascript:void(0)"));
        assert!(looks_like_script("x onload=steal()"));
        assert!(!looks_like_script("un restaurant sympa"));
    }
}

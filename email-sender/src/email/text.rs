//! Plain-text fallback bodies derived from rendered HTML

use once_cell::sync::Lazy;
use regex::Regex;

static COMMENTS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<!--.*?-->").expect("Invalid regex"));

// quoted attribute values may contain '>'
static TAGS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"</?[A-Za-z](?:[^>"']|"[^"]*"|'[^']*')*>|<![^>]*>|<\?[^>]*>"#)
        .expect("Invalid regex")
});

static SCRIPTS_AND_STYLES: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>|<style\b[^>]*>.*?</style\s*>")
        .expect("Invalid regex")
});

static BLOCK_BREAKS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)<br\s*/?>|</(p|div|h[1-6]|li|tr|table|ul|ol|blockquote)\s*>")
        .expect("Invalid regex")
});

static BLANK_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").expect("Invalid regex"));

/// Converts an HTML body into plain text
#[cfg_attr(test, mockall::automock)]
pub trait TextExtractor: Send + Sync {
    /// Extract the text of `html` with markup removed
    fn extract(&self, html: &str) -> String;
}

/// Removes HTML markup with regular expressions
///
/// The default mode removes comments and tags and leaves everything else,
/// including character references, exactly as written. The readable mode
/// also drops script and style bodies, turns block endings into line breaks,
/// decodes the common entities, and trims the result.
///
/// # Examples
///
/// ```rust
/// use email_sender::email::{TagStripper, TextExtractor};
///
/// let text = TagStripper::new().extract("<p>Hello <b>Ann</b></p>");
/// assert_eq!(text, "Hello Ann");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct TagStripper {
    readable: bool,
}

impl TagStripper {
    /// Create a stripper that only removes markup
    #[must_use]
    pub const fn new() -> Self {
        Self { readable: false }
    }

    /// Create a stripper that also lays the text out for reading
    #[must_use]
    pub const fn readable() -> Self {
        Self { readable: true }
    }

    fn strip(html: &str) -> String {
        let without_comments = COMMENTS.replace_all(html, "");
        TAGS.replace_all(&without_comments, "").into_owned()
    }

    fn layout(html: &str) -> String {
        let html = SCRIPTS_AND_STYLES.replace_all(html, "");
        let html = BLOCK_BREAKS.replace_all(&html, "\n");
        let text = decode_entities(&Self::strip(&html));

        let lines: Vec<&str> = text.lines().map(str::trim).collect();
        BLANK_RUNS
            .replace_all(&lines.join("\n"), "\n\n")
            .trim()
            .to_string()
    }
}

impl TextExtractor for TagStripper {
    fn extract(&self, html: &str) -> String {
        if self.readable {
            Self::layout(html)
        } else {
            Self::strip(html)
        }
    }
}

fn decode_entities(text: &str) -> String {
    // &amp; last so "&amp;lt;" stays "&lt;"
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&amp;", "&")
}

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::utils::OutputFormat;

// Slack link formatting uses angle brackets:
// - <http://example.com/>
// - <http://www.example.com|This message *is* a link>
// Source: https://docs.slack.dev/messaging/formatting-message-text/#linking-urls
static LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<(https?://[^|>]+)(?:\|([^>]*))?>").expect("link regex compiles"));

/// Rewrite Slack's inline link markup into the requested output format.
///
/// `<url|label>` becomes `label (url)` in text mode and `<a href="url">label</a>`
/// in HTML mode. `<url>` (and `<url|>` with an empty label) uses the URL itself
/// as the display text. Everything outside the matched spans is left untouched;
/// input without any markup is returned borrowed.
pub fn rewrite<'a>(text: &'a str, format: OutputFormat) -> Cow<'a, str> {
    LINK_RE.replace_all(text, |caps: &Captures| {
        let url = &caps[1];
        let label = match caps.get(2).map(|m| m.as_str()) {
            Some(l) if !l.is_empty() => l,
            _ => url,
        };
        match format {
            OutputFormat::Html => format!("<a href=\"{}\">{}</a>", url, label),
            OutputFormat::Txt => format!("{} ({})", label, url),
        }
    })
}

use crate::patterns;
use regex::Captures;

/// Replacement href for links whose scheme is not on the allow-list.
pub const BLOCKED_HREF: &str = "#blocked";

/// Escapes `&`, `<` and `>`. Applying it twice escapes the entities again.
pub fn escape_html(text: &str) -> String {
    html_escape::encode_text(text).into_owned()
}

/// Filters a link target down to web, mail and relative URLs.
///
/// Targets starting with `http:`, `https:`, `mailto:`, `/`, `#` or `.` are kept
/// as-is (after trimming). Any other `scheme:` prefix yields [`BLOCKED_HREF`].
/// Bare relative paths pass through.
pub fn sanitize_href(url: &str) -> String {
    let trimmed = url.trim();
    if patterns::allowed_href().is_match(trimmed) {
        return trimmed.to_string();
    }
    if patterns::any_scheme().is_match(trimmed) {
        return BLOCKED_HREF.to_string();
    }
    trimmed.to_string()
}

/// Converts one run of raw text into escaped HTML with code spans, bold,
/// italics and links applied in that order.
pub fn render_inline(text: &str) -> String {
    let escaped = escape_html(text);
    let text = patterns::code_span().replace_all(&escaped, "<code>${1}</code>");
    let text = patterns::strong().replace_all(&text, "<strong>${1}</strong>");
    let text = patterns::emphasis().replace_all(&text, "<em>${1}</em>");
    let text = patterns::link().replace_all(&text, |caps: &Captures| {
        let href = sanitize_href(&caps[2]).replace('"', "&quot;");
        format!("<a href=\"{}\">{}</a>", href, &caps[1])
    });
    text.into_owned()
}

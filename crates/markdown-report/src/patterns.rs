//! Compiled line and inline patterns shared by the block and inline passes.

use regex::Regex;
use std::sync::OnceLock;

fn cached(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("static pattern must compile"))
}

pub(crate) fn heading() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(&RE, r"^(#{1,4})\s+(.+)$")
}

pub(crate) fn rule() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(&RE, r"^---+$")
}

pub(crate) fn unordered_item() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(&RE, r"^[-*]\s+")
}

pub(crate) fn ordered_item() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(&RE, r"^[0-9]+\.\s+")
}

pub(crate) fn code_span() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(&RE, r"`([^`]+)`")
}

pub(crate) fn strong() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(&RE, r"\*\*(.+?)\*\*")
}

pub(crate) fn emphasis() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(&RE, r"\*(.+?)\*")
}

pub(crate) fn link() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(&RE, r"\[([^\]]+)\]\(([^)]+)\)")
}

/// Schemes and prefixes that are always safe to emit as an href.
pub(crate) fn allowed_href() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(&RE, r"(?i)^(https?:|mailto:|/|#|\.)")
}

pub(crate) fn any_scheme() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(&RE, r"(?i)^[a-z][a-z0-9+.-]*:")
}

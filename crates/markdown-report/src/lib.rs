//! Line-oriented renderer for report-style markdown.
//!
//! A document is scanned once, top to bottom. Each line is classified into a
//! block construct ([`classify`]), the construct consumes its run of lines and
//! appends HTML fragments, and inline text goes through [`render_inline`].
//! The result is an HTML body fragment plus the text of the first level-1
//! heading.

mod block;
mod inline;
mod line;
mod patterns;
mod render;
mod state;

pub use block::{classify, LineKind};
pub use inline::{escape_html, render_inline, sanitize_href, BLOCKED_HREF};
pub use line::split_lines;

use render::Renderer;
use std::{
    fs::File,
    io::{self, Read},
    path::Path,
};

/// Heading text that opens the highlighted summary wrapper by default.
pub const DEFAULT_SUMMARY_HEADING: &str = "Executive Summary";

/// Rendered body fragment and extracted title.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rendered {
    pub body: String,
    /// Raw text of the first `#` heading, empty when the document has none.
    pub title: String,
}

/// Knobs for a single conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Exact `##` heading text that opens the summary wrapper.
    pub summary_heading: String,
    /// Keep blank interior table cells instead of dropping them.
    pub keep_empty_cells: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            summary_heading: DEFAULT_SUMMARY_HEADING.to_string(),
            keep_empty_cells: false,
        }
    }
}

pub fn convert(text: &str) -> Rendered {
    convert_with(text, &RenderOptions::default())
}

pub fn convert_with(text: &str, options: &RenderOptions) -> Rendered {
    let lines = split_lines(text);
    convert_lines(&lines, options)
}

pub fn convert_lines(lines: &[&str], options: &RenderOptions) -> Rendered {
    Renderer::new(lines, options).run()
}

pub fn convert_from_reader<R: Read>(
    reader: &mut R,
    options: &RenderOptions,
) -> io::Result<Rendered> {
    let source = line::read_source(reader)?;
    Ok(convert_with(&source, options))
}

pub fn convert_from_path(path: &Path, options: &RenderOptions) -> io::Result<Rendered> {
    let mut file = File::open(path)?;
    convert_from_reader(&mut file, options)
}

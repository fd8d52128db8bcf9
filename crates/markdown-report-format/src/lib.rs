//! HTML document shell for rendered reports.
//!
//! The shell is a fixed page with the stylesheet inlined, so the output is a
//! single file with no external assets. Print rules spell out link targets.

use markdown_report::{escape_html, Rendered};
use markdown_report_config::{Config, DocumentSettings};

const STYLESHEET: &str = include_str!("report.css");

/// Picks the page title: the extracted heading, or `fallback` when it is empty.
pub fn page_title<'a>(extracted: &'a str, fallback: &'a str) -> &'a str {
    if extracted.is_empty() {
        fallback
    } else {
        extracted
    }
}

/// Wraps rendered bodies in the standalone HTML page.
pub struct DocumentShell {
    settings: DocumentSettings,
}

impl DocumentShell {
    /// Build a shell from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.document.clone())
    }

    pub fn new(settings: DocumentSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &DocumentSettings {
        &self.settings
    }

    pub fn render(&self, rendered: &Rendered) -> String {
        let title = page_title(&rendered.title, &self.settings.default_title);
        self.wrap(title, &rendered.body)
    }

    fn wrap(&self, title: &str, body: &str) -> String {
        format!(
            "<!DOCTYPE html>\n\
             <html lang=\"{lang}\">\n\
             <head>\n\
             <meta charset=\"UTF-8\">\n\
             <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n\
             <title>{title}</title>\n\
             <style>\n\
             {STYLESHEET}\
             </style>\n\
             </head>\n\
             <body>\n\
             <div class=\"container\">\n\
             {body}\n\
             </div>\n\
             </body>\n\
             </html>",
            lang = self.settings.lang,
            title = escape_html(title),
        )
    }
}

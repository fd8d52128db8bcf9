use crate::Rendered;

pub(crate) const SUMMARY_OPEN: &str = "<div class=\"executive-summary\">";
pub(crate) const SUMMARY_CLOSE: &str = "</div>";

/// Output fragments plus the state that outlives a single block.
#[derive(Debug, Default)]
pub struct ParseState {
    fragments: Vec<String>,
    title: Option<String>,
    within_summary: bool,
}

impl ParseState {
    pub fn new() -> Self {
        Self {
            fragments: Vec::new(),
            title: None,
            within_summary: false,
        }
    }

    pub fn push(&mut self, fragment: impl Into<String>) {
        self.fragments.push(fragment.into());
    }

    /// Records the document title unless one was already captured.
    pub fn capture_title(&mut self, raw: &str) {
        if self.title.is_none() {
            self.title = Some(raw.to_string());
        }
    }

    pub fn open_summary(&mut self) {
        self.push(SUMMARY_OPEN);
        self.within_summary = true;
    }

    pub fn close_summary(&mut self) {
        if self.within_summary {
            self.push(SUMMARY_CLOSE);
            self.within_summary = false;
        }
    }

    pub fn finalize(mut self) -> Rendered {
        self.close_summary();
        Rendered {
            body: self.fragments.join("\n"),
            title: self.title.unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_first_title() {
        let mut state = ParseState::new();
        state.capture_title("First");
        state.capture_title("Second");
        assert_eq!(state.finalize().title, "First");
    }

    #[test]
    fn closes_open_summary_on_finalize() {
        let mut state = ParseState::new();
        state.open_summary();
        state.push("<p>x</p>");
        let rendered = state.finalize();
        assert_eq!(
            rendered.body,
            "<div class=\"executive-summary\">\n<p>x</p>\n</div>"
        );
    }

    #[test]
    fn closing_twice_emits_one_close() {
        let mut state = ParseState::new();
        state.open_summary();
        state.close_summary();
        state.close_summary();
        assert_eq!(
            state.finalize().body,
            "<div class=\"executive-summary\">\n</div>"
        );
    }

    #[test]
    fn close_without_open_is_a_no_op() {
        let mut state = ParseState::new();
        state.close_summary();
        assert_eq!(state.finalize().body, "");
    }
}

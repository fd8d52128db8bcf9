use crate::block::{
    self, classify, fence_language, is_blockquote, is_fence, is_ordered_item, is_table_row,
    is_unordered_item, parse_heading, strip_quote_marker, table_cells, LineKind,
};
use crate::inline::{escape_html, render_inline};
use crate::state::ParseState;
use crate::{RenderOptions, Rendered};
use log::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListKind {
    Unordered,
    Ordered,
}

impl ListKind {
    fn tag(self) -> &'static str {
        match self {
            ListKind::Unordered => "ul",
            ListKind::Ordered => "ol",
        }
    }

    fn accepts(self, line: &str) -> bool {
        match self {
            ListKind::Unordered => is_unordered_item(line),
            ListKind::Ordered => is_ordered_item(line),
        }
    }

    fn item_text(self, line: &str) -> &str {
        match self {
            ListKind::Unordered => block::unordered_item_text(line),
            ListKind::Ordered => block::ordered_item_text(line),
        }
    }
}

/// Single forward scan over the line sequence.
pub(crate) struct Renderer<'a> {
    lines: &'a [&'a str],
    cursor: usize,
    options: &'a RenderOptions,
    state: ParseState,
}

impl<'a> Renderer<'a> {
    pub fn new(lines: &'a [&'a str], options: &'a RenderOptions) -> Self {
        Self {
            lines,
            cursor: 0,
            options,
            state: ParseState::new(),
        }
    }

    pub fn run(mut self) -> Rendered {
        while self.cursor < self.lines.len() {
            let before = self.cursor;
            self.step();
            debug_assert!(self.cursor > before, "every block consumes a line");
        }

        let rendered = self.state.finalize();
        debug!(
            "rendered {} lines into {} bytes of html",
            self.lines.len(),
            rendered.body.len()
        );
        rendered
    }

    fn step(&mut self) {
        let line = self.lines[self.cursor];
        let kind = classify(line);
        trace!("line {}: {:?}", self.cursor, kind);

        match kind {
            LineKind::Fence => self.render_fence(line),
            LineKind::Heading => self.render_heading(line),
            LineKind::Rule => {
                self.cursor += 1;
                self.state.push("<hr>");
            }
            LineKind::Table => self.render_table(),
            LineKind::Blockquote => self.render_blockquote(),
            LineKind::UnorderedItem => self.render_list(ListKind::Unordered),
            LineKind::OrderedItem => self.render_list(ListKind::Ordered),
            LineKind::Blank => self.cursor += 1,
            LineKind::Paragraph => self.render_paragraph(),
        }
    }

    /// Advances past every line accepted by `predicate` and returns them.
    fn consume_while<P>(&mut self, predicate: P) -> &'a [&'a str]
    where
        P: Fn(&str) -> bool,
    {
        let lines = self.lines;
        let start = self.cursor;
        while self.cursor < lines.len() && predicate(lines[self.cursor]) {
            self.cursor += 1;
        }
        &lines[start..self.cursor]
    }

    fn render_fence(&mut self, opener: &str) {
        let language = fence_language(opener);
        self.cursor += 1;

        let code = self
            .consume_while(|line| !is_fence(line))
            .iter()
            .map(|line| escape_html(line))
            .collect::<Vec<_>>()
            .join("\n");

        if self.cursor < self.lines.len() {
            self.cursor += 1;
        } else {
            debug!("code fence left open until end of input");
        }

        let class = if language.is_empty() {
            String::new()
        } else {
            format!(" class=\"language-{language}\"")
        };
        self.state.push(format!("<pre><code{class}>{code}</code></pre>"));
    }

    fn render_heading(&mut self, line: &str) {
        self.cursor += 1;
        let Some(heading) = parse_heading(line) else {
            return;
        };
        let level = heading.level;

        if level == 2 {
            self.state.close_summary();
        }

        self.state.push(format!(
            "<h{level}>{}</h{level}>",
            render_inline(heading.text)
        ));

        if level == 1 {
            self.state.capture_title(heading.text);
        }

        if level == 2 && heading.text == self.options.summary_heading {
            self.state.open_summary();
        }
    }

    fn render_table(&mut self) {
        let rows = self.consume_while(is_table_row);
        if rows.len() < 2 {
            debug!("skipping table run with {} line(s)", rows.len());
            return;
        }

        let keep_empty = self.options.keep_empty_cells;
        self.state.push("<table>");
        self.state.push("<thead><tr>");
        for cell in table_cells(rows[0], keep_empty) {
            self.state.push(format!("<th>{}</th>", render_inline(cell)));
        }
        self.state.push("</tr></thead>");

        self.state.push("<tbody>");
        for row in &rows[2..] {
            self.state.push("<tr>");
            for cell in table_cells(row, keep_empty) {
                self.state.push(format!("<td>{}</td>", render_inline(cell)));
            }
            self.state.push("</tr>");
        }
        self.state.push("</tbody></table>");
    }

    fn render_blockquote(&mut self) {
        let quoted = self
            .consume_while(is_blockquote)
            .iter()
            .map(|line| render_inline(strip_quote_marker(line)))
            .collect::<Vec<_>>()
            .join("<br>");
        self.state.push(format!("<blockquote>{quoted}</blockquote>"));
    }

    fn render_list(&mut self, kind: ListKind) {
        let items = self.consume_while(|line| kind.accepts(line));
        self.state.push(format!("<{}>", kind.tag()));
        for item in items {
            self.state
                .push(format!("<li>{}</li>", render_inline(kind.item_text(item))));
        }
        self.state.push(format!("</{}>", kind.tag()));
    }

    fn render_paragraph(&mut self) {
        let start = self.cursor;
        self.cursor += 1;
        self.consume_while(|line| classify(line) == LineKind::Paragraph);

        let text = self.lines[start..self.cursor].join("\n");
        self.state.push(format!("<p>{}</p>", render_inline(&text)));
    }
}

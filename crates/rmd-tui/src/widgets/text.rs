//! Text primitives: colored strings, object links and the text box.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Widget, Wrap};

use rmd_core::body::PartId;

/// A string carrying its own foreground and background colors.
#[derive(Debug, Clone, PartialEq)]
pub struct ColoredText {
    pub text: String,
    pub fg: Color,
    pub bg: Color,
}

impl ColoredText {
    pub fn new(text: impl Into<String>, fg: Color, bg: Color) -> Self {
        Self {
            text: text.into(),
            fg,
            bg,
        }
    }

    /// Render as a span with both colors applied.
    pub fn as_span(&self) -> Span<'_> {
        Span::styled(
            self.text.as_str(),
            Style::default().fg(self.fg).bg(self.bg),
        )
    }
}

/// A list entry that remembers which body part it points at, so a
/// selection can be resolved back to the game object.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectLink {
    pub id: PartId,
    pub text: ColoredText,
}

impl ObjectLink {
    pub fn new(id: PartId, text: ColoredText) -> Self {
        Self { id, text }
    }
}

/// Bordered, titled paragraph.
pub struct TextBox<'a> {
    text: &'a str,
    title: &'a str,
    fg: Color,
    bg: Color,
    alignment: Alignment,
}

impl<'a> TextBox<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            title: "",
            fg: Color::White,
            bg: Color::Black,
            alignment: Alignment::Left,
        }
    }

    pub fn title(mut self, title: &'a str) -> Self {
        self.title = title;
        self
    }

    pub fn colors(mut self, fg: Color, bg: Color) -> Self {
        self.fg = fg;
        self.bg = bg;
        self
    }

    pub fn alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }
}

impl Widget for TextBox<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default().borders(Borders::ALL).title(self.title);
        let paragraph = Paragraph::new(self.text)
            .block(block)
            .style(Style::default().fg(self.fg).bg(self.bg))
            .alignment(self.alignment)
            .wrap(Wrap { trim: false });
        paragraph.render(area, buf);
    }
}

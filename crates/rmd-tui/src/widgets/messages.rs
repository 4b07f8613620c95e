//! Message log widget

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Widget};

/// Widget for the rolling message log. Shows the tail of the history,
/// newest line last.
pub struct MessagesWidget<'a> {
    messages: &'a [String],
}

impl<'a> MessagesWidget<'a> {
    pub fn new(messages: &'a [String]) -> Self {
        Self { messages }
    }
}

impl Widget for MessagesWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default().borders(Borders::TOP).title("Messages");
        let inner = block.inner(area);
        block.render(area, buf);

        let visible = inner.height as usize;
        let start = self.messages.len().saturating_sub(visible);
        let lines: Vec<Line> = self.messages[start..]
            .iter()
            .map(|msg| Line::from(msg.as_str()))
            .collect();

        Paragraph::new(lines).render(inner, buf);
    }
}

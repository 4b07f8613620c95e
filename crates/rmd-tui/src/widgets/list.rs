//! Selectable list of object links.
//!
//! ListChooser holds the items and the selection; ListChooserWidget
//! borrows it for one frame. Up/down wrap around the ends. Only one of
//! the browsers on screen is active at a time; the inactive one keeps
//! its selection visible in muted colors.

use ratatui::prelude::*;
use ratatui::widgets::Widget;

use rmd_core::body::PartId;

use crate::theme::Theme;
use crate::widgets::text::ObjectLink;

/// Stateful selectable list.
#[derive(Debug, Clone, Default)]
pub struct ListChooser {
    items: Vec<ObjectLink>,
    selected: usize,
    active: bool,
}

impl ListChooser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the items, keeping the selection on the same part when it
    /// is still present and clamping it otherwise.
    pub fn set_items(&mut self, items: Vec<ObjectLink>) {
        let keep = self.selected_id();
        self.items = items;
        self.selected = keep
            .and_then(|id| self.items.iter().position(|item| item.id == id))
            .unwrap_or(0);
        if self.selected >= self.items.len() {
            self.selected = 0;
        }
    }

    pub fn items(&self) -> &[ObjectLink] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn select_prev(&mut self) {
        if self.items.is_empty() {
            return;
        }
        self.selected = if self.selected > 0 {
            self.selected - 1
        } else {
            self.items.len() - 1
        };
    }

    pub fn select_next(&mut self) {
        if self.items.is_empty() {
            return;
        }
        self.selected = if self.selected + 1 < self.items.len() {
            self.selected + 1
        } else {
            0
        };
    }

    pub fn selected(&self) -> Option<&ObjectLink> {
        self.items.get(self.selected)
    }

    pub fn selected_id(&self) -> Option<PartId> {
        self.selected().map(|item| item.id)
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

/// One-frame view of a ListChooser.
///
/// Each row takes its foreground from the item; the selected row swaps
/// in the theme's selection pair for the active or inactive browser.
pub struct ListChooserWidget<'a> {
    chooser: &'a ListChooser,
    theme: &'a Theme,
}

impl<'a> ListChooserWidget<'a> {
    pub fn new(chooser: &'a ListChooser, theme: &'a Theme) -> Self {
        Self { chooser, theme }
    }
}

impl Widget for ListChooserWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        let base = Style::default()
            .fg(self.theme.panel_fg)
            .bg(self.theme.panel_bg);
        for y in area.top()..area.bottom() {
            buf.set_string(area.x, y, " ".repeat(area.width as usize), base);
        }

        // TODO: scroll the window so the selection stays visible once
        // bodies outgrow the pane.
        let rows = area.height as usize;
        let overflow = self.chooser.len() > rows;

        for (index, item) in self.chooser.items().iter().enumerate() {
            if index >= rows {
                break;
            }
            let y = area.y + index as u16;

            if overflow && index == rows - 1 {
                buf.set_string(area.x, y, "...", base);
                break;
            }

            if index == self.chooser.selected_index() {
                let style = if self.chooser.is_active() {
                    Style::default()
                        .fg(self.theme.sel_fg_active)
                        .bg(self.theme.sel_bg_active)
                } else {
                    Style::default()
                        .fg(self.theme.sel_fg_inactive)
                        .bg(self.theme.sel_bg_inactive)
                };
                buf.set_stringn(area.x, y, &item.text.text, area.width as usize, style);
            } else {
                buf.set_span(area.x, y, &item.text.as_span(), area.width);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use ratatui::style::Color;

    use super::*;
    use crate::widgets::text::ColoredText;

    fn link(id: u32, text: &str) -> ObjectLink {
        ObjectLink::new(
            PartId(id),
            ColoredText::new(text, Color::White, Color::Black),
        )
    }

    fn three_items() -> Vec<ObjectLink> {
        vec![link(0, "torso"), link(1, "heart"), link(2, "arm")]
    }

    #[test]
    fn test_selection_wraps_both_ways() {
        let mut chooser = ListChooser::new();
        chooser.set_items(three_items());

        assert_eq!(chooser.selected_index(), 0);
        chooser.select_prev();
        assert_eq!(chooser.selected_index(), 2);
        chooser.select_next();
        assert_eq!(chooser.selected_index(), 0);
        chooser.select_next();
        assert_eq!(chooser.selected_index(), 1);
    }

    #[test]
    fn test_empty_list_has_no_selection() {
        let mut chooser = ListChooser::new();
        assert!(chooser.selected().is_none());
        chooser.select_next();
        chooser.select_prev();
        assert!(chooser.selected_id().is_none());
    }

    #[test]
    fn test_replacing_items_follows_the_part() {
        let mut chooser = ListChooser::new();
        chooser.set_items(three_items());
        chooser.select_next();
        assert_eq!(chooser.selected_id(), Some(PartId(1)));

        // The heart moves to the front of the refreshed list.
        chooser.set_items(vec![link(1, "heart"), link(2, "arm")]);
        assert_eq!(chooser.selected_id(), Some(PartId(1)));
        assert_eq!(chooser.selected_index(), 0);
    }

    #[test]
    fn test_replacing_items_resets_when_part_gone() {
        let mut chooser = ListChooser::new();
        chooser.set_items(three_items());
        chooser.select_next();
        chooser.select_next();
        assert_eq!(chooser.selected_id(), Some(PartId(2)));

        chooser.set_items(vec![link(0, "torso"), link(1, "heart")]);
        assert_eq!(chooser.selected_index(), 0);
        assert_eq!(chooser.selected_id(), Some(PartId(0)));
    }

    fn row_text(buf: &Buffer, y: u16, width: u16) -> String {
        (0..width)
            .filter_map(|x| buf.cell(Position::new(x, y)))
            .map(|cell| cell.symbol().to_string())
            .collect()
    }

    #[test]
    fn test_rows_keep_item_colors() {
        let mut chooser = ListChooser::new();
        chooser.set_items(vec![
            link(0, "torso"),
            ObjectLink::new(
                PartId(1),
                ColoredText::new("heart", Color::Red, Color::Black),
            ),
        ]);
        chooser.set_active(true);
        let theme = Theme::dark();

        let area = Rect::new(0, 0, 10, 2);
        let mut buf = Buffer::empty(area);
        ListChooserWidget::new(&chooser, &theme).render(area, &mut buf);

        // The selected row swaps in the selection pair; the other rows
        // carry their own colors.
        let selected = buf.cell(Position::new(0, 0)).unwrap();
        assert_eq!(selected.fg, theme.sel_fg_active);
        assert_eq!(selected.bg, theme.sel_bg_active);
        let plain = buf.cell(Position::new(0, 1)).unwrap();
        assert_eq!(plain.fg, Color::Red);
        assert_eq!(plain.bg, Color::Black);
    }

    #[test]
    fn test_overflow_renders_ellipsis_row() {
        let mut chooser = ListChooser::new();
        chooser.set_items(three_items());

        let area = Rect::new(0, 0, 10, 2);
        let mut buf = Buffer::empty(area);
        ListChooserWidget::new(&chooser, &Theme::dark()).render(area, &mut buf);

        assert_eq!(row_text(&buf, 1, 3), "...");
    }

    #[test]
    fn test_exact_fit_has_no_ellipsis() {
        let mut chooser = ListChooser::new();
        chooser.set_items(three_items());

        let area = Rect::new(0, 0, 10, 3);
        let mut buf = Buffer::empty(area);
        ListChooserWidget::new(&chooser, &Theme::dark()).render(area, &mut buf);

        assert_eq!(row_text(&buf, 2, 3), "arm");
    }
}

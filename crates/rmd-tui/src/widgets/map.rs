//! Map display widget

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Widget};

use rmd_core::map::{Map, Pos};
use rmd_core::ActorMap;

use crate::theme::Theme;

/// Widget for rendering the playing field: colored tile backgrounds with
/// actor glyphs drawn on top.
pub struct MapWidget<'a> {
    map: &'a Map,
    actors: &'a ActorMap,
    theme: &'a Theme,
}

impl<'a> MapWidget<'a> {
    pub fn new(map: &'a Map, actors: &'a ActorMap, theme: &'a Theme) -> Self {
        Self { map, actors, theme }
    }
}

impl Widget for MapWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default().borders(Borders::ALL).title("RMDVC");

        let inner = block.inner(area);
        block.render(area, buf);

        let cols = (self.map.width as u16).min(inner.width);
        let rows = (self.map.height as u16).min(inner.height);

        for y in 0..rows {
            for x in 0..cols {
                let pos = Pos::new(x as i32, y as i32);
                let bg = if self.map.is_wall(pos) {
                    self.theme.map_wall
                } else {
                    self.theme.map_floor
                };
                if let Some(cell) = buf.cell_mut(Position::new(inner.x + x, inner.y + y)) {
                    cell.set_char(' ');
                    cell.set_bg(bg);
                }
            }
        }

        for actor in self.actors.iter() {
            let (x, y) = (actor.pos.x, actor.pos.y);
            if x < 0 || y < 0 || x as u16 >= cols || y as u16 >= rows {
                continue;
            }
            let fg = self.theme.glyph_color(actor.color);
            if let Some(cell) =
                buf.cell_mut(Position::new(inner.x + x as u16, inner.y + y as u16))
            {
                cell.set_char(actor.glyph);
                cell.set_fg(fg);
            }
        }
    }
}

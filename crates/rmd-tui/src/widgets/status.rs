//! Status line widget

use ratatui::prelude::*;
use ratatui::widgets::Widget;

use rmd_core::Engine;

use crate::theme::Theme;

/// Widget for the two status lines under the map: hit points on the
/// first, accumulated wound totals on the second.
pub struct StatusWidget<'a> {
    engine: &'a Engine,
    theme: &'a Theme,
}

impl<'a> StatusWidget<'a> {
    pub fn new(engine: &'a Engine, theme: &'a Theme) -> Self {
        Self { engine, theme }
    }
}

impl Widget for StatusWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let Some(player) = self.engine.player() else {
            return;
        };

        let style = Style::default().fg(self.theme.text);

        let (hp, hp_max) = player
            .destructible
            .as_ref()
            .map(|d| (d.hp, d.max_hp))
            .unwrap_or((0, 0));
        let hp_style = if hp * 2 < hp_max {
            Style::default().fg(self.theme.bad)
        } else {
            Style::default().fg(self.theme.good)
        };

        let name = format!("{}  ", player.name);
        let hp_text = format!("HP:{hp}/{hp_max}");
        let turn_text = format!("  T:{}", self.engine.turns);

        buf.set_string(area.x, area.y, &name, style);
        buf.set_string(area.x + name.len() as u16, area.y, &hp_text, hp_style);
        buf.set_string(
            area.x + (name.len() + hp_text.len()) as u16,
            area.y,
            &turn_text,
            style,
        );

        if area.height > 1 {
            let line2 = match player.destructible.as_ref() {
                Some(d) => format!(
                    "Pain:{:.1} Blood:{:.1} Impair:{:.1} Parts:{}",
                    d.total_pain(),
                    d.total_blood_loss(),
                    d.total_impairment(),
                    d.body.as_ref().map(|b| b.part_count()).unwrap_or(0),
                ),
                None => String::new(),
            };
            buf.set_string(area.x, area.y + 1, &line2, style);
        }
    }
}

//! Body viewer overlay.
//!
//! A bordered window over the map with three panes: the part browser on
//! the left, the part info box top right, the tissue browser bottom
//! right. Tab moves focus between the two browsers; the info box and the
//! tissue browser follow the part selection. Escape (handled in app.rs)
//! closes the whole thing.

use std::fmt::Write as _;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Widget};

use rmd_core::body::{Body, Destructible, PartId};

use crate::theme::Theme;
use crate::widgets::list::{ListChooser, ListChooserWidget};
use crate::widgets::text::{ColoredText, ObjectLink, TextBox};

/// Which browser has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerPane {
    Parts,
    Tissues,
}

/// Viewer state: two browsers, the info text and the focus marker.
#[derive(Debug, Clone)]
pub struct BodyViewer {
    part_browser: ListChooser,
    tissue_browser: ListChooser,
    focus: ViewerPane,
    info: String,
}

impl Default for BodyViewer {
    fn default() -> Self {
        Self::new()
    }
}

impl BodyViewer {
    pub fn new() -> Self {
        Self {
            part_browser: ListChooser::new(),
            tissue_browser: ListChooser::new(),
            focus: ViewerPane::Parts,
            info: String::new(),
        }
    }

    /// (Re)fill the browsers from a body. The part selection survives a
    /// refresh when its part still exists.
    pub fn activate(&mut self, dest: &Destructible, theme: &Theme) {
        let Some(body) = dest.body.as_ref() else {
            self.part_browser.set_items(Vec::new());
            self.tissue_browser.set_items(Vec::new());
            self.info.clear();
            return;
        };

        self.part_browser.set_items(part_links(body, theme));
        self.focus = ViewerPane::Parts;
        self.part_browser.set_active(true);
        self.tissue_browser.set_active(false);
        self.refresh(dest, theme);
    }

    /// Route a key press to the focused browser.
    pub fn handle_key(&mut self, key: KeyEvent, dest: &Destructible, theme: &Theme) {
        match key.code {
            KeyCode::Tab => {
                self.focus = match self.focus {
                    ViewerPane::Parts => ViewerPane::Tissues,
                    ViewerPane::Tissues => ViewerPane::Parts,
                };
                self.part_browser.set_active(self.focus == ViewerPane::Parts);
                self.tissue_browser
                    .set_active(self.focus == ViewerPane::Tissues);
            }
            KeyCode::Up => match self.focus {
                ViewerPane::Parts => {
                    self.part_browser.select_prev();
                    self.refresh(dest, theme);
                }
                ViewerPane::Tissues => self.tissue_browser.select_prev(),
            },
            KeyCode::Down => match self.focus {
                ViewerPane::Parts => {
                    self.part_browser.select_next();
                    self.refresh(dest, theme);
                }
                ViewerPane::Tissues => self.tissue_browser.select_next(),
            },
            _ => {}
        }
    }

    /// Rebuild the info box and tissue browser for the current part
    /// selection.
    fn refresh(&mut self, dest: &Destructible, theme: &Theme) {
        let Some(body) = dest.body.as_ref() else {
            return;
        };
        match self.part_browser.selected_id() {
            Some(id) => {
                self.info = part_info(body, dest, id);
                self.tissue_browser
                    .set_items(tissue_links(body, dest, id, theme));
            }
            None => {
                self.info.clear();
                self.tissue_browser.set_items(Vec::new());
            }
        }
    }

    pub fn focus(&self) -> ViewerPane {
        self.focus
    }

    pub fn part_browser(&self) -> &ListChooser {
        &self.part_browser
    }

    pub fn tissue_browser(&self) -> &ListChooser {
        &self.tissue_browser
    }

    pub fn info(&self) -> &str {
        &self.info
    }
}

/// Outline rows for the part browser: one space of indent per depth,
/// body parts and organs in their own colors.
fn part_links(body: &Body, theme: &Theme) -> Vec<ObjectLink> {
    body.outline()
        .into_iter()
        .map(|entry| {
            let mut text = " ".repeat(entry.depth + 1);
            text.push_str(&entry.name);
            if entry.stump {
                text.push_str(" (stump)");
            }
            let fg = if entry.is_organ {
                theme.organ
            } else {
                theme.body_part
            };
            ObjectLink::new(entry.id, ColoredText::new(text, fg, theme.panel_bg))
        })
        .collect()
}

/// Tissue rows for the selected organ; layers that carry a wound show in
/// the wound color. Non-organ parts get an empty browser.
fn tissue_links(
    body: &Body,
    dest: &Destructible,
    id: PartId,
    theme: &Theme,
) -> Vec<ObjectLink> {
    let Some(organ) = body.organ(id) else {
        return Vec::new();
    };

    organ
        .layers
        .iter()
        .map(|layer| {
            let name = match body.tissue(&layer.tissue) {
                Some(tissue) => layer.display_name(tissue).to_string(),
                None => layer.tissue.clone(),
            };
            let wounded = dest
                .wounds()
                .iter()
                .any(|w| w.part == id && w.layer_name == name);
            let fg = if wounded { theme.wound } else { theme.panel_fg };
            ObjectLink::new(id, ColoredText::new(name, fg, theme.panel_bg))
        })
        .collect()
}

/// The info box text: identity, kind, surface share, organ details and
/// the wound readout for the selected part.
fn part_info(body: &Body, dest: &Destructible, id: PartId) -> String {
    let Some(part) = body.part(id) else {
        return String::new();
    };

    let mut out = String::new();
    let _ = writeln!(out, "{}", part.name);

    match part.organ() {
        Some(organ) => {
            let _ = writeln!(out, "Organ, {} tissue layers", organ.layers.len());
            let _ = writeln!(out, "Surface share: {:.0}", part.surface);
            if organ.vital {
                let _ = writeln!(out, "Vital.");
            }
            if organ.stump {
                let _ = writeln!(out, "Severed below; only a stump remains.");
            }
            match organ.connector.and_then(|c| body.part(c)) {
                Some(conn) => {
                    let _ = writeln!(out, "Attached to: {}", conn.name);
                }
                None => {
                    let _ = writeln!(out, "Anchor of its body part.");
                }
            }
        }
        None => {
            let _ = writeln!(
                out,
                "Body part, {} children",
                body.children_of(id).len()
            );
            let _ = writeln!(out, "Surface share: {:.0}", part.surface);
        }
    }

    let wounds: Vec<_> = dest.wounds().iter().filter(|w| w.part == id).collect();
    if wounds.is_empty() {
        let _ = writeln!(out, "\nNo wounds.");
    } else {
        let _ = writeln!(out, "\nWounds:");
        for wound in wounds {
            let _ = writeln!(
                out,
                " {}: pain {:.1}, blood {:.1}",
                wound.layer_name, wound.pain, wound.blood_loss
            );
        }
    }

    out
}

/// One-frame view of the viewer: border, then the three panes.
pub struct BodyViewerWidget<'a> {
    viewer: &'a BodyViewer,
    theme: &'a Theme,
}

impl<'a> BodyViewerWidget<'a> {
    pub fn new(viewer: &'a BodyViewer, theme: &'a Theme) -> Self {
        Self { viewer, theme }
    }
}

impl Widget for BodyViewerWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title("BodyViewer")
            .style(
                Style::default()
                    .fg(self.theme.panel_fg)
                    .bg(self.theme.panel_bg),
            );
        let inner = block.inner(area);
        block.render(area, buf);

        let halves = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(inner);

        let right = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(halves[1]);

        ListChooserWidget::new(self.viewer.part_browser(), self.theme)
            .render(halves[0], buf);

        TextBox::new(self.viewer.info())
            .title("Info")
            .colors(self.theme.panel_fg, self.theme.panel_bg)
            .render(right[0], buf);

        ListChooserWidget::new(self.viewer.tissue_browser(), self.theme)
            .render(right[1], buf);
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyModifiers;

    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn viewer_with_humanoid() -> (BodyViewer, Destructible, Theme) {
        let body = Body::default_humanoid().unwrap();
        let dest = Destructible::new(100).with_body(body);
        let theme = Theme::dark();
        let mut viewer = BodyViewer::new();
        viewer.activate(&dest, &theme);
        (viewer, dest, theme)
    }

    #[test]
    fn test_activate_fills_part_browser() {
        let (viewer, dest, _) = viewer_with_humanoid();
        let body = dest.body.as_ref().unwrap();
        assert_eq!(viewer.part_browser().len(), body.part_count());
        assert!(viewer.info().contains("Humanoid body"));
    }

    #[test]
    fn test_tab_toggles_focus() {
        let (mut viewer, dest, theme) = viewer_with_humanoid();
        assert_eq!(viewer.focus(), ViewerPane::Parts);
        assert!(viewer.part_browser().is_active());

        viewer.handle_key(key(KeyCode::Tab), &dest, &theme);
        assert_eq!(viewer.focus(), ViewerPane::Tissues);
        assert!(viewer.tissue_browser().is_active());
        assert!(!viewer.part_browser().is_active());

        viewer.handle_key(key(KeyCode::Tab), &dest, &theme);
        assert_eq!(viewer.focus(), ViewerPane::Parts);
    }

    #[test]
    fn test_selecting_an_organ_fills_tissue_browser() {
        let (mut viewer, dest, theme) = viewer_with_humanoid();
        let body = dest.body.as_ref().unwrap();

        // The root is a body part, so the tissue browser starts empty.
        assert!(viewer.tissue_browser().is_empty());

        let outline = body.outline();
        let organ_row = outline
            .iter()
            .position(|e| e.is_organ)
            .expect("humanoid has organs");
        for _ in 0..organ_row {
            viewer.handle_key(key(KeyCode::Down), &dest, &theme);
        }

        let selected = viewer.part_browser().selected_id().unwrap();
        assert_eq!(selected, outline[organ_row].id);
        assert!(!viewer.tissue_browser().is_empty());
        assert!(viewer.info().contains("Organ"));
    }

    #[test]
    fn test_organ_rows_use_organ_color() {
        let (viewer, dest, theme) = viewer_with_humanoid();
        let body = dest.body.as_ref().unwrap();
        for (entry, link) in body.outline().iter().zip(viewer.part_browser().items()) {
            let expected = if entry.is_organ {
                theme.organ
            } else {
                theme.body_part
            };
            assert_eq!(link.text.fg, expected);
        }
    }

    #[test]
    fn test_activate_survives_missing_body() {
        let dest = Destructible::new(10);
        let theme = Theme::dark();
        let mut viewer = BodyViewer::new();
        viewer.activate(&dest, &theme);
        assert!(viewer.part_browser().is_empty());
        assert!(viewer.info().is_empty());
    }
}

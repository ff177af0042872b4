//! Header bar with the drawer button, title and status line

use crate::ui::state::AppState;
use crate::ui::theme::Theme;
use egui::{self, RichText, Vec2};

pub struct Header<'a> {
    state: &'a mut AppState,
    theme: &'a Theme,
    wide: bool,
}

impl<'a> Header<'a> {
    pub fn new(state: &'a mut AppState, theme: &'a Theme, wide: bool) -> Self {
        Self { state, theme, wide }
    }

    pub fn show(self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            // The drawer is docked on wide layouts
            if !self.wide {
                let response = ui.add(
                    egui::Button::new(RichText::new("☰").size(18.0).color(self.theme.text_primary))
                        .frame(false)
                        .min_size(Vec2::splat(32.0)),
                );
                response.widget_info(|| {
                    egui::WidgetInfo::labeled(egui::WidgetType::Button, true, "Open menu")
                });
                if response.clicked() {
                    self.state.sidebar.toggle();
                }
            }

            ui.vertical(|ui| {
                ui.label(
                    RichText::new(&self.state.ui.title)
                        .size(18.0)
                        .strong()
                        .color(self.theme.text_primary),
                );
                ui.label(
                    RichText::new(&self.state.ui.subtitle)
                        .size(12.0)
                        .color(self.theme.text_muted),
                );
            });

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if let Some(status) = self.state.status_text() {
                    let color = if self.state.session.last_error().is_some() {
                        self.theme.error
                    } else {
                        self.theme.recording
                    };
                    ui.label(RichText::new(status).size(12.0).color(color));
                }
            });
        });
    }
}

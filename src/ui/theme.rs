//! Colors, rounding and spacing for the chat pane

use egui::{Color32, FontFamily, FontId, Rounding, Stroke, Vec2, Visuals};

#[derive(Clone, Debug)]
pub struct Theme {
    /// Accent used by the send button and brand mark
    pub primary: Color32,
    pub error: Color32,
    /// Mic button while listening
    pub recording: Color32,

    pub bg_chat: Color32,
    pub bg_header: Color32,
    pub bg_input: Color32,
    pub bg_sidebar: Color32,
    pub sidebar_accent: Color32,
    pub backdrop: Color32,
    pub border: Color32,

    pub text_primary: Color32,
    pub text_muted: Color32,
    pub sidebar_text: Color32,

    pub user_bubble: Color32,
    pub user_text: Color32,
    pub assistant_bubble: Color32,
    pub assistant_text: Color32,

    pub button_rounding: Rounding,
    pub bubble_rounding: Rounding,

    pub sidebar_width: f32,
    pub spacing: f32,
    pub spacing_sm: f32,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            primary: Color32::from_rgb(16, 163, 127),
            error: Color32::from_rgb(239, 68, 68),
            recording: Color32::from_rgb(239, 68, 68),

            bg_chat: Color32::from_rgb(33, 33, 41),
            bg_header: Color32::from_rgb(39, 39, 48),
            bg_input: Color32::from_rgb(52, 53, 65),
            bg_sidebar: Color32::from_rgb(23, 23, 28),
            sidebar_accent: Color32::from_rgb(42, 43, 50),
            backdrop: Color32::from_black_alpha(128),
            border: Color32::from_rgb(64, 65, 79),

            text_primary: Color32::from_rgb(236, 236, 241),
            text_muted: Color32::from_rgb(142, 142, 160),
            sidebar_text: Color32::from_rgb(217, 217, 227),

            user_bubble: Color32::from_rgb(16, 163, 127),
            user_text: Color32::WHITE,
            assistant_bubble: Color32::from_rgb(52, 53, 65),
            assistant_text: Color32::from_rgb(236, 236, 241),

            button_rounding: Rounding::same(6.0),
            bubble_rounding: Rounding::same(8.0),

            sidebar_width: 256.0,
            spacing: 16.0,
            spacing_sm: 8.0,
        }
    }

    /// Apply this theme to egui
    pub fn apply(&self, ctx: &egui::Context) {
        let mut visuals = Visuals::dark();

        visuals.panel_fill = self.bg_chat;
        visuals.window_fill = self.bg_header;
        visuals.extreme_bg_color = self.bg_input;

        visuals.widgets.noninteractive.bg_stroke = Stroke::new(1.0, self.border);
        visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, self.text_muted);
        visuals.widgets.inactive.bg_fill = self.bg_input;
        visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, self.text_primary);
        visuals.widgets.hovered.bg_fill = self.sidebar_accent;
        visuals.widgets.active.bg_fill = self.primary;

        visuals.selection.bg_fill = self.primary.gamma_multiply(0.4);
        visuals.selection.stroke = Stroke::new(1.0, self.primary);

        ctx.set_visuals(visuals);

        let mut style = (*ctx.style()).clone();
        style.spacing.item_spacing = Vec2::splat(self.spacing_sm);
        style.spacing.button_padding = Vec2::new(self.spacing_sm * 1.5, self.spacing_sm);
        style.text_styles.insert(
            egui::TextStyle::Heading,
            FontId::new(20.0, FontFamily::Proportional),
        );
        style.text_styles.insert(
            egui::TextStyle::Body,
            FontId::new(14.0, FontFamily::Proportional),
        );
        style.text_styles.insert(
            egui::TextStyle::Small,
            FontId::new(11.0, FontFamily::Proportional),
        );
        ctx.set_style(style);
    }
}

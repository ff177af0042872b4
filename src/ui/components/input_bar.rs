//! Input bar component
//!
//! Provides the dictation toggle, the draft editor and the send button.

use crate::session::{KeyCode, KeyPress};
use crate::ui::state::AppState;
use crate::ui::theme::Theme;
use egui::{self, Key, Modifiers, RichText, Vec2};

const MESSAGE_INPUT_ID: &str = "message_input";

pub struct InputBar<'a> {
    state: &'a mut AppState,
    theme: &'a Theme,
}

impl<'a> InputBar<'a> {
    pub fn new(state: &'a mut AppState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    pub fn show(mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            self.show_dictation_button(ui);

            // Leave room for the send button
            let width = (ui.available_width() - 56.0).max(80.0);
            self.show_text_input(ui, width);

            self.show_send_button(ui);
        });
    }

    fn show_dictation_button(&mut self, ui: &mut egui::Ui) {
        let supported = self.state.session.speech_supported();
        let listening = self.state.session.dictation_state().is_listening();

        let (icon, tooltip, color) = if !supported {
            ("🎤", "Dictation is not supported here", self.theme.text_muted)
        } else if listening {
            ("⏹", "Stop dictation", self.theme.recording)
        } else {
            ("🎤", "Start dictation", self.theme.text_primary)
        };

        let mut button = egui::Button::new(RichText::new(icon).size(18.0).color(color))
            .min_size(Vec2::splat(40.0))
            .rounding(self.theme.button_rounding);
        if listening {
            button = button.fill(self.theme.recording.gamma_multiply(0.2));
        }

        let response = ui.add_enabled(supported, button);
        response.widget_info(|| {
            egui::WidgetInfo::labeled(egui::WidgetType::Button, supported, "Toggle dictation")
        });

        if response.clicked() {
            self.state.session.toggle_dictation();
        }
        response
            .on_hover_text(tooltip)
            .on_disabled_hover_text(tooltip);
    }

    fn show_text_input(&mut self, ui: &mut egui::Ui, width: f32) {
        let id = egui::Id::new(MESSAGE_INPUT_ID);

        // Plain Enter sends; Shift+Enter falls through to the editor
        if ui.memory(|m| m.has_focus(id)) {
            let (enter, shift) = ui.input(|i| (i.key_pressed(Key::Enter), i.modifiers.shift));
            if enter
                && self.state.session.submit_on_enter(KeyPress {
                    key: KeyCode::Enter,
                    shift,
                })
            {
                ui.input_mut(|i| i.consume_key(Modifiers::NONE, Key::Enter));
            }
        }

        let rows = self.state.session.composer().rows();
        let hint = self.state.composer_hint.clone();

        let text_edit = egui::TextEdit::multiline(self.state.session.composer_mut().text_mut())
            .id(id)
            .hint_text(hint)
            .desired_rows(rows)
            .desired_width(width)
            .font(egui::TextStyle::Body)
            .margin(egui::Margin::symmetric(12.0, 8.0));

        let response = ui.add(text_edit);
        response.widget_info(|| {
            egui::WidgetInfo::labeled(egui::WidgetType::TextEdit, true, "Message input")
        });
    }

    fn show_send_button(&mut self, ui: &mut egui::Ui) {
        let can_send = self.state.session.can_send();
        let fill = if can_send {
            self.theme.primary
        } else {
            self.theme.bg_input
        };

        let button = egui::Button::new(RichText::new("➤").size(16.0).color(egui::Color32::WHITE))
            .min_size(Vec2::splat(40.0))
            .rounding(self.theme.button_rounding)
            .fill(fill);

        let response = ui.add_enabled(can_send, button);
        response.widget_info(|| {
            egui::WidgetInfo::labeled(egui::WidgetType::Button, can_send, "Send message")
        });

        if response.clicked() {
            self.state.session.send();
        }
        response.on_hover_text("Send message (Enter)");
    }
}

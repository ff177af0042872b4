//! Message list component
//!
//! Assistant bubbles sit on the left, the user's on the right, each with
//! a role avatar and the time it was written.

use crate::messages::{Message, Role};
use crate::session::ChatSession;
use crate::ui::theme::Theme;
use egui::{self, Align, RichText, Vec2};

pub struct MessageList<'a> {
    session: &'a ChatSession,
    theme: &'a Theme,
}

impl<'a> MessageList<'a> {
    pub fn new(session: &'a ChatSession, theme: &'a Theme) -> Self {
        Self { session, theme }
    }

    pub fn show(self, ui: &mut egui::Ui) {
        let messages = self.session.messages();

        egui::ScrollArea::vertical()
            .id_salt("messages")
            .auto_shrink([false, false])
            .stick_to_bottom(true)
            .show(ui, |ui| {
                ui.add_space(self.theme.spacing);
                for message in &messages {
                    self.show_message(ui, message);
                    ui.add_space(self.theme.spacing);
                }
            });
    }

    fn show_message(&self, ui: &mut egui::Ui, message: &Message) {
        let is_user = message.role.is_user();
        let (bubble, text_color, avatar) = match message.role {
            Role::User => (self.theme.user_bubble, self.theme.user_text, "👤"),
            Role::Assistant => (self.theme.assistant_bubble, self.theme.assistant_text, "🤖"),
        };
        let align = if is_user { Align::Max } else { Align::Min };

        ui.with_layout(egui::Layout::top_down(align), |ui| {
            let max_width = ui.available_width() * 0.8;

            let row = |ui: &mut egui::Ui| {
                egui::Frame::none()
                    .fill(bubble)
                    .rounding(self.theme.bubble_rounding)
                    .stroke(if is_user {
                        egui::Stroke::NONE
                    } else {
                        egui::Stroke::new(1.0, self.theme.border)
                    })
                    .inner_margin(egui::Margin::symmetric(12.0, 8.0))
                    .show(ui, |ui| {
                        ui.set_max_width(max_width);
                        ui.vertical(|ui| {
                            let label = if is_user {
                                format!("User message: {}", message.content)
                            } else {
                                format!("Assistant response: {}", message.content)
                            };
                            let response =
                                ui.label(RichText::new(&message.content).color(text_color));
                            response.widget_info(|| {
                                egui::WidgetInfo::labeled(egui::WidgetType::Label, true, &label)
                            });

                            ui.label(
                                RichText::new(message.time_label())
                                    .size(10.0)
                                    .color(text_color.gamma_multiply(0.7)),
                            );
                        });
                    });
            };

            ui.horizontal(|ui| {
                if is_user {
                    ui.with_layout(egui::Layout::right_to_left(Align::Min), |ui| {
                        self.show_avatar(ui, avatar, bubble);
                        row(ui);
                    });
                } else {
                    self.show_avatar(ui, avatar, bubble);
                    row(ui);
                }
            });
        });
    }

    fn show_avatar(&self, ui: &mut egui::Ui, glyph: &str, fill: egui::Color32) {
        egui::Frame::none()
            .fill(fill)
            .rounding(egui::Rounding::same(16.0))
            .stroke(egui::Stroke::new(1.0, self.theme.border))
            .show(ui, |ui| {
                ui.set_min_size(Vec2::splat(32.0));
                ui.centered_and_justified(|ui| {
                    ui.label(RichText::new(glyph).size(14.0));
                });
            });
    }
}

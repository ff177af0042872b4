//! Navigation drawer
//!
//! Docked permanently on wide windows. On narrow windows it slides over
//! the chat with a translucent backdrop that closes it when clicked.

use crate::ui::state::SidebarNav;
use crate::ui::theme::Theme;
use egui::{self, Align, Layout, RichText, Sense, Vec2};
use tracing::info;

pub struct Sidebar<'a> {
    nav: &'a mut SidebarNav,
    brand: &'a str,
    theme: &'a Theme,
    wide: bool,
}

impl<'a> Sidebar<'a> {
    pub fn new(nav: &'a mut SidebarNav, brand: &'a str, theme: &'a Theme, wide: bool) -> Self {
        Self {
            nav,
            brand,
            theme,
            wide,
        }
    }

    pub fn show(self, ctx: &egui::Context) {
        if !self.wide && !self.nav.is_open() {
            return;
        }

        let mut selected = None;
        let mut close_clicked = false;

        let panel = egui::SidePanel::left("sidebar")
            .resizable(false)
            .exact_width(self.theme.sidebar_width)
            .frame(
                egui::Frame::none()
                    .fill(self.theme.bg_sidebar)
                    .inner_margin(self.theme.spacing),
            )
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(RichText::new("💬").size(20.0).color(self.theme.primary));
                    ui.label(
                        RichText::new(self.brand)
                            .size(18.0)
                            .strong()
                            .color(self.theme.sidebar_text),
                    );

                    if !self.wide {
                        ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                            let response = ui.add(
                                egui::Button::new(
                                    RichText::new("✕").color(self.theme.sidebar_text),
                                )
                                .frame(false),
                            );
                            response.widget_info(|| {
                                egui::WidgetInfo::labeled(
                                    egui::WidgetType::Button,
                                    true,
                                    "Close menu",
                                )
                            });
                            close_clicked = response.clicked();
                        });
                    }
                });

                ui.separator();

                for (index, item) in self.nav.items().iter().enumerate() {
                    let button = egui::Button::new(
                        RichText::new(&item.label).color(self.theme.sidebar_text),
                    )
                    .fill(self.theme.bg_sidebar)
                    .rounding(self.theme.button_rounding)
                    .min_size(Vec2::new(ui.available_width(), 36.0));

                    if ui.add(button).on_hover_text(&item.route).clicked() {
                        selected = Some(index);
                    }
                }

                ui.with_layout(Layout::bottom_up(Align::Min), |ui| {
                    let logout = egui::Button::new(
                        RichText::new("⎋  Logout").color(self.theme.sidebar_text),
                    )
                    .fill(self.theme.bg_sidebar)
                    .min_size(Vec2::new(ui.available_width(), 36.0));

                    if ui.add(logout).clicked() {
                        info!("Logout requested");
                    }
                    ui.separator();
                });
            });

        if let Some(index) = selected {
            self.nav.select(index);
        }
        if close_clicked {
            self.nav.close();
        }

        if !self.wide && self.nav.is_open() {
            let screen = ctx.screen_rect();
            let backdrop = egui::Rect::from_min_max(
                egui::pos2(panel.response.rect.right(), screen.top()),
                screen.max,
            );

            egui::Area::new(egui::Id::new("sidebar_backdrop"))
                .order(egui::Order::Foreground)
                .fixed_pos(backdrop.min)
                .show(ctx, |ui| {
                    let response = ui.allocate_rect(backdrop, Sense::click());
                    ui.painter().rect_filled(backdrop, 0.0, self.theme.backdrop);
                    if response.clicked() {
                        self.nav.close();
                    }
                });
        }
    }
}

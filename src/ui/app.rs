//! Main application struct and eframe integration

use crate::config::ChatConfig;
use crate::speech::SpeechProvider;
use crate::ui::components::{Header, InputBar, MessageList, Sidebar};
use crate::ui::state::AppState;
use crate::ui::theme::Theme;
use egui::{self, CentralPanel, TopBottomPanel};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tracing::info;

/// How often to check for speech while dictating
const DICTATION_POLL_INTERVAL: Duration = Duration::from_millis(100);

pub struct ChatApp {
    state: AppState,
    theme: Theme,
}

impl ChatApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        config: &ChatConfig,
        runtime: Handle,
        provider: Box<dyn SpeechProvider>,
    ) -> Self {
        let theme = Theme::dark();
        theme.apply(&cc.egui_ctx);

        let mut state = AppState::new(config, runtime, provider);
        let ctx = cc.egui_ctx.clone();
        state
            .session
            .set_notifier(Some(Arc::new(move || ctx.request_repaint())));

        info!(session = %state.session.id(), "Chat window ready");
        Self { state, theme }
    }
}

/// Draw one frame of the chat window over `state`
pub fn render(ctx: &egui::Context, state: &mut AppState, theme: &Theme) {
    state.session.poll_events();

    let wide = ctx.screen_rect().width() >= state.ui.wide_layout_width;

    Sidebar::new(&mut state.sidebar, &state.ui.brand, theme, wide).show(ctx);

    TopBottomPanel::top("header")
        .frame(
            egui::Frame::none()
                .fill(theme.bg_header)
                .inner_margin(theme.spacing),
        )
        .show(ctx, |ui| {
            Header::new(state, theme, wide).show(ui);
        });

    TopBottomPanel::bottom("input_area")
        .frame(
            egui::Frame::none()
                .fill(theme.bg_header)
                .inner_margin(theme.spacing),
        )
        .show(ctx, |ui| {
            InputBar::new(state, theme).show(ui);
        });

    CentralPanel::default()
        .frame(
            egui::Frame::none()
                .fill(theme.bg_chat)
                .inner_margin(egui::Margin::symmetric(theme.spacing, 0.0)),
        )
        .show(ctx, |ui| {
            MessageList::new(&state.session, theme).show(ui);
        });
}

impl eframe::App for ChatApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        render(ctx, &mut self.state, &self.theme);

        // Transcripts arrive without a wakeup, so keep polling while dictating
        if self.state.session.dictation_state().is_listening() {
            ctx.request_repaint_after(DICTATION_POLL_INTERVAL);
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.state.session.close();
    }
}

//! egui/eframe user interface for the chat pane

mod app;
pub mod components;
mod state;
mod theme;

pub use app::{render, ChatApp};
pub use state::{AppState, SidebarNav};
pub use theme::Theme;

use crate::config::ChatConfig;
use crate::speech::SpeechProvider;
use tokio::runtime::Handle;

/// Open the chat window and block until it is closed
pub fn run(
    config: ChatConfig,
    runtime: Handle,
    provider: Box<dyn SpeechProvider>,
) -> eframe::Result<()> {
    let title = config.ui.title.clone();
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 720.0])
            .with_min_inner_size([360.0, 480.0])
            .with_title(title),
        ..Default::default()
    };

    eframe::run_native(
        "Chatpane",
        options,
        Box::new(move |cc| Ok(Box::new(ChatApp::new(cc, &config, runtime, provider)))),
    )
}

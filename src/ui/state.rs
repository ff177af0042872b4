//! Application state for the chat window
//!
//! [`AppState`] pairs the chat session with the navigation drawer. The
//! two never talk to each other; the header's menu button flips the
//! drawer and everything else goes to the session.

use crate::config::{ChatConfig, NavItem, UiConfig};
use crate::session::ChatSession;
use crate::speech::SpeechProvider;
use tokio::runtime::Handle;
use tracing::info;

/// Visibility of the navigation drawer plus its static entries
#[derive(Debug, Clone)]
pub struct SidebarNav {
    open: bool,
    items: Vec<NavItem>,
}

impl SidebarNav {
    pub fn new(items: Vec<NavItem>) -> Self {
        Self { open: false, items }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn items(&self) -> &[NavItem] {
        &self.items
    }

    /// A navigation entry was chosen. Routing lives outside the chat
    /// pane, so this records the choice and closes the drawer.
    pub fn select(&mut self, index: usize) -> Option<&NavItem> {
        let item = self.items.get(index)?;
        info!(label = %item.label, route = %item.route, "Navigation selected");
        self.open = false;
        Some(item)
    }
}

impl Default for SidebarNav {
    fn default() -> Self {
        Self::new(NavItem::defaults())
    }
}

pub struct AppState {
    pub session: ChatSession,
    pub sidebar: SidebarNav,
    pub ui: UiConfig,
    /// Hint text for the empty composer
    pub composer_hint: String,
}

impl AppState {
    pub fn new(config: &ChatConfig, runtime: Handle, provider: Box<dyn SpeechProvider>) -> Self {
        Self {
            session: ChatSession::from_config(config, runtime, provider),
            sidebar: SidebarNav::new(config.nav.clone()),
            ui: config.ui.clone(),
            composer_hint: config.composer.hint.clone(),
        }
    }

    /// Status line text for the header, if anything needs saying
    pub fn status_text(&self) -> Option<String> {
        if let Some(error) = self.session.last_error() {
            return Some(error.user_message());
        }
        if self.session.dictation_state().is_listening() {
            return Some("Listening...".to_string());
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sidebar_toggles() {
        let mut nav = SidebarNav::default();
        assert!(!nav.is_open());
        nav.toggle();
        assert!(nav.is_open());
        nav.toggle();
        assert!(!nav.is_open());
        nav.open();
        nav.close();
        assert!(!nav.is_open());
    }

    #[test]
    fn test_select_closes_drawer() {
        let mut nav = SidebarNav::default();
        nav.open();
        let route = nav.select(2).map(|item| item.route.clone());
        assert_eq!(route.as_deref(), Some("/settings"));
        assert!(!nav.is_open());
        assert!(nav.select(99).is_none());
    }

    #[test]
    fn test_items_keep_order() {
        let nav = SidebarNav::default();
        let labels: Vec<&str> = nav.items().iter().map(|i| i.label.as_str()).collect();
        assert_eq!(labels, vec!["Home", "New Chat", "Settings", "Profile"]);
    }
}

/// The draft currently being written in the input bar.
///
/// Whitespace is kept exactly as typed; trimming only happens when
/// deciding whether the draft can be sent and when it is committed.
#[derive(Debug, Clone)]
pub struct ComposerState {
    text: String,
    max_rows: usize,
}

impl ComposerState {
    pub fn new(max_rows: usize) -> Self {
        Self {
            text: String::new(),
            max_rows: max_rows.max(1),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Mutable access for text widgets that edit in place
    pub fn text_mut(&mut self) -> &mut String {
        &mut self.text
    }

    /// Replace the draft wholesale
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }

    pub fn can_send(&self) -> bool {
        !self.text.trim().is_empty()
    }

    /// Take the trimmed draft and clear it, or leave a blank draft alone
    pub fn take_sendable(&mut self) -> Option<String> {
        if !self.can_send() {
            return None;
        }
        let text = std::mem::take(&mut self.text);
        Some(text.trim().to_string())
    }

    /// Height of the input box in rows
    pub fn rows(&self) -> usize {
        let lines = self.text.split('\n').count();
        lines.clamp(1, self.max_rows)
    }

    pub fn max_rows(&self) -> usize {
        self.max_rows
    }
}

impl Default for ComposerState {
    fn default() -> Self {
        Self::new(6)
    }
}

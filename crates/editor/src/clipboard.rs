//! Clipboard collaborator.
//!
//! The editor exchanges opaque manifest strings with whatever clipboard the
//! embedder provides. `MemoryClipboard` is the in-process default.

pub trait Clipboard {
    fn set_text(&mut self, text: String);
    fn text(&self) -> Option<String>;
}

/// In-memory clipboard used by the harness and by embedders without a system
/// clipboard.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    contents: Option<String>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clipboard for MemoryClipboard {
    fn set_text(&mut self, text: String) {
        self.contents = Some(text);
    }

    fn text(&self) -> Option<String> {
        self.contents.clone()
    }
}

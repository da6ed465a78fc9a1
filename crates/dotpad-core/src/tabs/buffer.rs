/// An editing surface owned by exactly one tab.
///
/// The widget itself is external; this is the narrow view the coordination
/// layer needs. Hiding a buffer must keep its content and history intact.
pub trait BufferView: Send {
    /// Creates a buffer holding `content`.
    fn with_content(content: &str) -> Self
    where
        Self: Sized;

    /// Current document text.
    fn text(&self) -> String;

    /// Replaces the whole document. Counts as one edit.
    fn replace_content(&mut self, content: &str);

    /// Change generation, bumped on every edit.
    fn revision(&self) -> u64;

    fn set_visible(&mut self, visible: bool);

    fn is_visible(&self) -> bool;
}

/// Plain in-memory buffer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextBuffer {
    text: String,
    revision: u64,
    visible: bool,
}

impl BufferView for TextBuffer {
    fn with_content(content: &str) -> Self {
        Self {
            text: content.to_string(),
            revision: 0,
            visible: false,
        }
    }

    fn text(&self) -> String {
        self.text.clone()
    }

    fn replace_content(&mut self, content: &str) {
        self.text.clear();
        self.text.push_str(content);
        self.revision += 1;
    }

    fn revision(&self) -> u64 {
        self.revision
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    fn is_visible(&self) -> bool {
        self.visible
    }
}

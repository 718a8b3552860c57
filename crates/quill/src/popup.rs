//! Autocomplete popup state and completion sources.

use quill_render::types::Point;

/// Source of completion candidates.
///
/// Implement this trait to provide custom completion data. The source
/// receives the text captured before the caret and returns candidates in
/// display order. Any `Fn(&str) -> Vec<String>` is a `CompletionSource`.
pub trait CompletionSource {
    fn completions(&self, prefix: &str) -> Vec<String>;
}

impl<F> CompletionSource for F
where
    F: Fn(&str) -> Vec<String>,
{
    fn completions(&self, prefix: &str) -> Vec<String> {
        self(prefix)
    }
}

// ============================================================================
// Word List Source
// ============================================================================

/// A completion source backed by a fixed list of words.
///
/// Matches words that start with the last whitespace-separated word of the
/// captured text, ignoring case.
#[derive(Debug, Clone, Default)]
pub struct WordListSource {
    words: Vec<String>,
}

impl WordListSource {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            words: words.into_iter().map(Into::into).collect(),
        }
    }
}

impl CompletionSource for WordListSource {
    fn completions(&self, prefix: &str) -> Vec<String> {
        let word = prefix.rsplit(char::is_whitespace).next().unwrap_or("");
        if word.is_empty() {
            return self.words.clone();
        }
        let lower = word.to_lowercase();
        self.words
            .iter()
            .filter(|w| w.to_lowercase().starts_with(&lower))
            .cloned()
            .collect()
    }
}

// ============================================================================
// Popup State
// ============================================================================

/// Visible state of the autocomplete popup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PopupState {
    pub visible: bool,
    /// Top-left corner in surface coordinates.
    pub xy: Point,
    pub lines: Vec<String>,
    pub selected_index: usize,
}

impl PopupState {
    /// Show `lines` at `xy`. An empty list hides the popup instead.
    pub fn show(&mut self, xy: Point, lines: Vec<String>) {
        if lines.is_empty() {
            self.hide();
            return;
        }
        self.visible = true;
        self.xy = xy;
        self.lines = lines;
        self.selected_index = 0;
    }

    pub fn hide(&mut self) {
        self.visible = false;
        self.lines.clear();
        self.selected_index = 0;
    }

    /// Move the highlight by `delta` rows, clamped to the list.
    pub fn move_selection(&mut self, delta: i32) {
        if !self.visible || self.lines.is_empty() {
            return;
        }
        let max = self.lines.len() as i64 - 1;
        let next = (self.selected_index as i64 + delta as i64).clamp(0, max);
        self.selected_index = next as usize;
    }

    /// The highlighted candidate, when visible.
    pub fn selected(&self) -> Option<&str> {
        if !self.visible {
            return None;
        }
        self.lines.get(self.selected_index).map(String::as_str)
    }

    /// Hide the popup and return the highlighted candidate.
    pub fn accept(&mut self) -> Option<String> {
        let chosen = self.selected().map(str::to_string);
        self.hide();
        chosen
    }
}

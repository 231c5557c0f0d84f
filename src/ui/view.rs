//! Presentation state that lives beside the query session.
//!
//! Nothing here affects [`SessionState`](crate::core::session::SessionState):
//! the query editor, focus, selection, scrolling and status text are purely
//! local to the UI.

use ratatui::style::Style;
use tui_textarea::{CursorMove, TextArea};

use crate::ui::theme::Theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Input,
    Citations,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
}

impl StatusMessage {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }
}

#[derive(Debug, Default)]
pub struct ViewState {
    pub input: TextArea<'static>,
    pub focus: Focus,
    pub selected_citation: usize,
    pub answer_scroll: u16,
    pub status: Option<StatusMessage>,
    pub exit_requested: bool,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// The query as typed, lines joined with `\n`.
    pub fn query_text(&self) -> String {
        self.input.lines().join("\n")
    }

    /// Replace the query, leaving the cursor at its end.
    pub fn set_query(&mut self, text: &str) {
        self.input = TextArea::from(text.split('\n'));
        self.input.move_cursor(CursorMove::Bottom);
        self.input.move_cursor(CursorMove::End);
    }

    /// Insert text at the cursor, breaking lines at `\n`.
    pub fn insert_text(&mut self, text: &str) {
        for (idx, line) in text.split('\n').enumerate() {
            if idx > 0 {
                self.input.insert_newline();
            }
            self.input.insert_str(line);
        }
    }

    /// Style the editor for the current theme. The cursor is only drawn
    /// while the editor accepts input.
    pub fn style_input(&mut self, theme: &Theme, editable: bool) {
        let text_style = if editable {
            theme.input_text_style
        } else {
            theme.input_disabled_style
        };
        let text_style = text_style.patch(Style::default().bg(theme.background_color));
        let cursor_style = if editable && self.focus == Focus::Input {
            text_style.patch(theme.input_cursor_style)
        } else {
            text_style
        };
        self.input.set_style(text_style);
        self.input.set_cursor_style(cursor_style);
        self.input.set_cursor_line_style(Style::default());
    }

    pub fn toggle_focus(&mut self, citation_count: usize) {
        self.focus = match self.focus {
            Focus::Input if citation_count > 0 => Focus::Citations,
            _ => Focus::Input,
        };
    }

    pub fn select_next(&mut self, citation_count: usize) {
        if citation_count == 0 {
            self.selected_citation = 0;
        } else {
            self.selected_citation = (self.selected_citation + 1).min(citation_count - 1);
        }
    }

    pub fn select_previous(&mut self) {
        self.selected_citation = self.selected_citation.saturating_sub(1);
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.answer_scroll = self.answer_scroll.saturating_sub(lines);
    }

    pub fn scroll_down(&mut self, lines: u16, max_scroll: u16) {
        self.answer_scroll = self.answer_scroll.saturating_add(lines).min(max_scroll);
    }

    /// Reset selection and scrolling once a new outcome replaces the old one.
    pub fn reset_for_outcome(&mut self, citation_count: usize) {
        self.selected_citation = 0;
        self.answer_scroll = 0;
        if citation_count == 0 {
            self.focus = Focus::Input;
        }
    }
}

//! Mapping raw key events to chat commands.
//!
//! Resolution depends only on which pane has focus. Whether a command is
//! allowed in the current session state is decided when it is applied.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::ui::view::Focus;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiCommand {
    Quit,
    Submit,
    InsertSample,
    Insert(char),
    Newline,
    Backspace,
    Delete,
    CursorLeft,
    CursorRight,
    CursorHome,
    CursorEnd,
    ToggleFocus,
    SelectPrevious,
    SelectNext,
    OpenSelected,
    ScrollUp,
    ScrollDown,
    PageUp,
    PageDown,
}

pub fn resolve_key(key: &KeyEvent, focus: Focus) -> Option<UiCommand> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);

    match key.code {
        KeyCode::Char('c') | KeyCode::Char('d') if ctrl => return Some(UiCommand::Quit),
        KeyCode::Esc => return Some(UiCommand::Quit),
        KeyCode::Char('s') if ctrl => return Some(UiCommand::InsertSample),
        KeyCode::Tab | KeyCode::BackTab => return Some(UiCommand::ToggleFocus),
        KeyCode::PageUp => return Some(UiCommand::PageUp),
        KeyCode::PageDown => return Some(UiCommand::PageDown),
        _ => {}
    }

    match focus {
        Focus::Citations => match key.code {
            KeyCode::Up | KeyCode::Char('k') => Some(UiCommand::SelectPrevious),
            KeyCode::Down | KeyCode::Char('j') => Some(UiCommand::SelectNext),
            KeyCode::Enter | KeyCode::Char('o') => Some(UiCommand::OpenSelected),
            _ => None,
        },
        Focus::Input => match key.code {
            KeyCode::Enter if alt || key.modifiers.contains(KeyModifiers::SHIFT) => {
                Some(UiCommand::Newline)
            }
            KeyCode::Enter => Some(UiCommand::Submit),
            KeyCode::Char('j') if ctrl => Some(UiCommand::Newline),
            KeyCode::Char('a') if ctrl => Some(UiCommand::CursorHome),
            KeyCode::Char('e') if ctrl => Some(UiCommand::CursorEnd),
            KeyCode::Char(c) if !ctrl && !alt => Some(UiCommand::Insert(c)),
            KeyCode::Backspace => Some(UiCommand::Backspace),
            KeyCode::Delete => Some(UiCommand::Delete),
            KeyCode::Left => Some(UiCommand::CursorLeft),
            KeyCode::Right => Some(UiCommand::CursorRight),
            KeyCode::Home => Some(UiCommand::CursorHome),
            KeyCode::End => Some(UiCommand::CursorEnd),
            KeyCode::Up => Some(UiCommand::ScrollUp),
            KeyCode::Down => Some(UiCommand::ScrollDown),
            _ => None,
        },
    }
}

impl UiCommand {
    /// Commands that change the query text, refused while a query runs.
    pub fn edits_input(self) -> bool {
        matches!(
            self,
            UiCommand::Insert(_)
                | UiCommand::InsertSample
                | UiCommand::Newline
                | UiCommand::Backspace
                | UiCommand::Delete
        )
    }
}

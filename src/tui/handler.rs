use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::models::Screen;

#[derive(Debug, Clone, PartialEq)]
pub enum AppAction {
    Quit,
    NextScreen,
    PrevScreen,
    GoTo(Screen),
    MoveUp,
    MoveDown,
    StartAdd,
    StartEdit,
    Delete,
    ShowHelp,
    HideHelp,
    // Form input actions
    FormChar(char),
    FormBackspace,
    FormNextField,
    FormPrevField,
    FormSubmit,
    FormCancel,
    // Delete confirmation
    ConfirmYes,
    ConfirmNo,
}

/// Which kind of input the focused part of the UI expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Form,
    /// The Add screen's form, which is part of the screen rather than a popup.
    InlineForm,
    Confirm,
    Help,
}

pub fn handle_key_event(key: KeyEvent, mode: InputMode) -> Option<AppAction> {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Some(AppAction::Quit);
    }

    match mode {
        // Any key closes help
        InputMode::Help => Some(AppAction::HideHelp),

        InputMode::Confirm => match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => Some(AppAction::ConfirmYes),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => Some(AppAction::ConfirmNo),
            _ => None,
        },

        // Arrow keys still leave the Add screen; digits go to the amount field
        InputMode::InlineForm => match key.code {
            KeyCode::Right => Some(AppAction::NextScreen),
            KeyCode::Left => Some(AppAction::PrevScreen),
            _ => handle_key_event(key, InputMode::Form),
        },

        InputMode::Form => match key.code {
            KeyCode::Enter => Some(AppAction::FormSubmit),
            KeyCode::Esc => Some(AppAction::FormCancel),
            KeyCode::Tab | KeyCode::Down => Some(AppAction::FormNextField),
            KeyCode::BackTab | KeyCode::Up => Some(AppAction::FormPrevField),
            KeyCode::Backspace => Some(AppAction::FormBackspace),
            KeyCode::Char(c) => Some(AppAction::FormChar(c)),
            _ => None,
        },

        InputMode::Normal => match key.code {
            KeyCode::Char('q') => Some(AppAction::Quit),

            KeyCode::Right | KeyCode::Char('l') | KeyCode::Tab => Some(AppAction::NextScreen),
            KeyCode::Left | KeyCode::Char('h') | KeyCode::BackTab => Some(AppAction::PrevScreen),
            KeyCode::Char(c @ '1'..='6') => {
                let index = c as usize - '1' as usize;
                Some(AppAction::GoTo(Screen::ALL[index]))
            }

            KeyCode::Char('j') | KeyCode::Down => Some(AppAction::MoveDown),
            KeyCode::Char('k') | KeyCode::Up => Some(AppAction::MoveUp),

            KeyCode::Char('a') | KeyCode::Enter => Some(AppAction::StartAdd),
            KeyCode::Char('e') => Some(AppAction::StartEdit),
            KeyCode::Char('d') | KeyCode::Delete => Some(AppAction::Delete),

            KeyCode::Char('?') => Some(AppAction::ShowHelp),

            _ => None,
        },
    }
}

use crate::app::AppMode;
use crossterm::event::{self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    Section(usize),
    NextSection,
    PrevSection,
    Up,
    Down,
    Refresh,
    Help,
    Close,
    Export,
    Confirm,
    NewRule,
    NextField,
    PrevField,
    Input(char),
    Backspace,
    Submit,
    DismissToasts,
    None,
}

pub fn poll_action(mode: &AppMode, timeout: Duration) -> std::io::Result<Action> {
    if event::poll(timeout)? {
        if let CrosstermEvent::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                return Ok(map_key_event(mode, key));
            }
        }
    }
    Ok(Action::None)
}

pub fn map_key_event(mode: &AppMode, key: KeyEvent) -> Action {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Action::Quit;
    }

    match mode {
        AppMode::Normal => match key.code {
            KeyCode::Char('q') => Action::Quit,
            KeyCode::Char(c @ '1'..='5') => Action::Section(c as usize - '1' as usize),
            KeyCode::Char('l') | KeyCode::Tab | KeyCode::Right => Action::NextSection,
            KeyCode::Char('h') | KeyCode::BackTab | KeyCode::Left => Action::PrevSection,
            KeyCode::Char('k') | KeyCode::Up => Action::Up,
            KeyCode::Char('j') | KeyCode::Down => Action::Down,
            KeyCode::Char('r') => Action::Refresh,
            KeyCode::Char('?') => Action::Help,
            KeyCode::Char('e') => Action::Export,
            KeyCode::Char('n') => Action::NewRule,
            KeyCode::Char('x') | KeyCode::Esc => Action::DismissToasts,
            _ => Action::None,
        },
        AppMode::Help => match key.code {
            KeyCode::Char('?') | KeyCode::Char('q') | KeyCode::Esc => Action::Close,
            _ => Action::None,
        },
        AppMode::ConfirmExport => match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => Action::Confirm,
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => Action::Close,
            _ => Action::None,
        },
        AppMode::ExportSuccess(_) => match key.code {
            KeyCode::Enter | KeyCode::Esc | KeyCode::Char('q') => Action::Close,
            _ => Action::None,
        },
        AppMode::RuleForm => match key.code {
            KeyCode::Esc => Action::Close,
            KeyCode::Enter => Action::Submit,
            KeyCode::Tab | KeyCode::Down => Action::NextField,
            KeyCode::BackTab | KeyCode::Up => Action::PrevField,
            KeyCode::Backspace => Action::Backspace,
            KeyCode::Char(c) => Action::Input(c),
            _ => Action::None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_normal_mode_keys() {
        let mode = AppMode::Normal;
        assert_eq!(map_key_event(&mode, key(KeyCode::Char('3'))), Action::Section(2));
        assert_eq!(map_key_event(&mode, key(KeyCode::Tab)), Action::NextSection);
        assert_eq!(map_key_event(&mode, key(KeyCode::Char('n'))), Action::NewRule);
        assert_eq!(map_key_event(&mode, key(KeyCode::Char('q'))), Action::Quit);
    }

    #[test]
    fn test_form_captures_text() {
        let mode = AppMode::RuleForm;
        assert_eq!(map_key_event(&mode, key(KeyCode::Char('q'))), Action::Input('q'));
        assert_eq!(map_key_event(&mode, key(KeyCode::Enter)), Action::Submit);
        assert_eq!(
            map_key_event(&mode, KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Action::Quit
        );
    }
}

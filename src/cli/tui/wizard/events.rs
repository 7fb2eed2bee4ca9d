use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::wizard::Key;

/// All possible events in the application
#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Resize(u16, u16),
    /// No input within the poll interval
    Tick,
}

/// Translate a terminal key press into the wizard's key vocabulary
pub fn to_wizard_key(key: &KeyEvent) -> Option<Key> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') | KeyCode::Char('C') => Some(Key::Interrupt),
            KeyCode::Char('u') | KeyCode::Char('U') => Some(Key::ClearLine),
            _ => None,
        };
    }

    let key = match key.code {
        KeyCode::Char(c) => Key::Char(c),
        KeyCode::Enter => Key::Enter,
        KeyCode::Esc => Key::Esc,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Delete => Key::Delete,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::Tab => Key::Tab,
        KeyCode::F(1) => Key::Help,
        _ => return None,
    };
    Some(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_control_keys() {
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(to_wizard_key(&ctrl_c), Some(Key::Interrupt));

        let ctrl_u = KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL);
        assert_eq!(to_wizard_key(&ctrl_u), Some(Key::ClearLine));

        let ctrl_x = KeyEvent::new(KeyCode::Char('x'), KeyModifiers::CONTROL);
        assert_eq!(to_wizard_key(&ctrl_x), None);
    }

    #[test]
    fn test_plain_keys() {
        let q = KeyEvent::new(KeyCode::Char('Q'), KeyModifiers::SHIFT);
        assert_eq!(to_wizard_key(&q), Some(Key::Char('Q')));
        assert_eq!(
            to_wizard_key(&KeyEvent::new(KeyCode::F(1), KeyModifiers::NONE)),
            Some(Key::Help)
        );
        assert_eq!(
            to_wizard_key(&KeyEvent::new(KeyCode::F(2), KeyModifiers::NONE)),
            None
        );
    }
}

//! Keypress → Action mapping.

use ratatui::crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::action::Action;

pub const BINDING_HELP: &str = "\
q          : quit
enter      : play highlighted song
space      : toggle play/pause
up,k       : highlight previous song
down,j     : highlight next song
alt+up/k   : move highlighted song up
alt+down/j : move highlighted song down
left,h     : seek backwards
right,l    : seek forwards
d          : remove song from queue
c          : clear queue
?          : toggle this help";

/// Map a terminal event to an action.  Unbound keys return `None`.
pub fn action_for(event: &Event) -> Option<Action> {
    match event {
        Event::Resize(_, _) => Some(Action::Redraw),
        Event::Key(key) if key.kind == KeyEventKind::Press => action_for_key(key),
        _ => None,
    }
}

fn action_for_key(key: &KeyEvent) -> Option<Action> {
    let alt = key.modifiers.contains(KeyModifiers::ALT);
    match key.code {
        KeyCode::Enter => Some(Action::PlayHighlighted),
        KeyCode::Up => Some(prev_action(alt)),
        KeyCode::Down => Some(next_action(alt)),
        KeyCode::Left => Some(Action::SeekBackward),
        KeyCode::Right => Some(Action::SeekForward),
        KeyCode::Char(' ') => Some(Action::TogglePause),
        KeyCode::Char('h') => Some(Action::SeekBackward),
        KeyCode::Char('j') => Some(next_action(alt)),
        KeyCode::Char('k') => Some(prev_action(alt)),
        KeyCode::Char('l') => Some(Action::SeekForward),
        KeyCode::Char('d') => Some(Action::DeleteHighlighted),
        KeyCode::Char('c') => Some(Action::ClearQueue),
        KeyCode::Char('?') => Some(Action::ToggleHelp),
        KeyCode::Char('q') => Some(Action::Quit),
        _ => None,
    }
}

fn prev_action(alt: bool) -> Action {
    if alt {
        Action::MovePrev
    } else {
        Action::HighlightPrev
    }
}

fn next_action(alt: bool) -> Action {
    if alt {
        Action::MoveNext
    } else {
        Action::HighlightNext
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode, modifiers: KeyModifiers) -> Event {
        Event::Key(KeyEvent::new(code, modifiers))
    }

    #[test]
    fn arrow_keys_move_the_highlight() {
        assert_eq!(
            action_for(&press(KeyCode::Up, KeyModifiers::NONE)),
            Some(Action::HighlightPrev)
        );
        assert_eq!(
            action_for(&press(KeyCode::Down, KeyModifiers::NONE)),
            Some(Action::HighlightNext)
        );
    }

    #[test]
    fn alt_arrows_move_the_song() {
        assert_eq!(
            action_for(&press(KeyCode::Up, KeyModifiers::ALT)),
            Some(Action::MovePrev)
        );
        assert_eq!(
            action_for(&press(KeyCode::Char('j'), KeyModifiers::ALT)),
            Some(Action::MoveNext)
        );
    }

    #[test]
    fn unbound_keys_are_ignored() {
        assert_eq!(action_for(&press(KeyCode::Char('x'), KeyModifiers::NONE)), None);
    }

    #[test]
    fn resize_requests_a_redraw() {
        assert_eq!(action_for(&Event::Resize(80, 24)), Some(Action::Redraw));
    }
}

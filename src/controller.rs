use std::time::Duration;
use tracing::trace;

use ratatui::crossterm::event::{self, Event, KeyCode};
use crate::domain::{TVConfig, TVError, Message};
use crate::model::Model;

pub struct Controller {
    event_poll_time: u64
}

impl Controller {
    pub fn new(cfg: &TVConfig) -> Self {
        Self {
            event_poll_time: cfg.event_poll_time,
        }
    }

    pub fn handle_event<R>(&self, model: &Model<R>) -> Result<Option<Message>, TVError> {
        if event::poll(Duration::from_millis(self.event_poll_time))?
            && let Event::Key(key) = event::read()?
                && key.kind == event::KeyEventKind::Press {
                    if model.raw_keyevents() {
                        return Ok(Some(Message::RawKey(key)));
                    }
                    return Ok(self.handle_key(key));
                }
        Ok(None)
    }

    fn handle_key(&self, key: event::KeyEvent) -> Option<Message> {
        let message = match key.code {
            KeyCode::Char('q') => Some(Message::Quit),
            KeyCode::Char('?') => Some(Message::Help),
            KeyCode::Esc => Some(Message::Exit),
            KeyCode::Char('/') => Some(Message::Search),
            KeyCode::Left | KeyCode::Char('h') => Some(Message::MoveLeft),
            KeyCode::Right | KeyCode::Char('l') => Some(Message::MoveRight),
            KeyCode::Char(' ') | KeyCode::Char('x') => Some(Message::ToggleColumnState),
            KeyCode::Enter | KeyCode::Char('s') => Some(Message::SortColumn),
            KeyCode::Home | KeyCode::Char('g') => Some(Message::MoveBeginning),
            KeyCode::PageUp | KeyCode::Char('p') => Some(Message::MovePageUp),
            KeyCode::PageDown | KeyCode::Char('n') => Some(Message::MovePageDown),
            KeyCode::End | KeyCode::Char('G') => Some(Message::MoveEnd),
            KeyCode::Char('z') => Some(Message::CyclePageSize),
            _ => None,
        };
        trace!("Mapped: {key:?} => {message:?}");
        message
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::crossterm::event::{KeyEvent, KeyModifiers};

    fn map(code: KeyCode) -> Option<Message> {
        Controller::new(&TVConfig::default()).handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn key_mapping() {
        assert_eq!(map(KeyCode::Char('q')), Some(Message::Quit));
        assert_eq!(map(KeyCode::Char('/')), Some(Message::Search));
        assert_eq!(map(KeyCode::Char(' ')), Some(Message::ToggleColumnState));
        assert_eq!(map(KeyCode::Enter), Some(Message::SortColumn));
        assert_eq!(map(KeyCode::PageDown), Some(Message::MovePageDown));
        assert_eq!(map(KeyCode::Char('p')), Some(Message::MovePageUp));
        assert_eq!(map(KeyCode::Char('G')), Some(Message::MoveEnd));
        assert_eq!(map(KeyCode::Home), Some(Message::MoveBeginning));
        assert_eq!(map(KeyCode::Char('z')), Some(Message::CyclePageSize));
        assert_eq!(map(KeyCode::Char('k')), None);
    }
}

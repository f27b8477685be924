use std::time::Duration;

use crossterm::event::{self, Event, KeyEvent, KeyEventKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    Key(KeyEvent),
    /// Bracketed paste: the whole pasted text in one event.
    Paste(String),
}

pub fn poll_event(timeout: Duration) -> color_eyre::Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

pub fn next_event(timeout: Duration) -> color_eyre::Result<Option<AppEvent>> {
    loop {
        match poll_event(timeout)? {
            Some(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                return Ok(Some(AppEvent::Key(key)))
            }
            Some(Event::Paste(text)) => return Ok(Some(AppEvent::Paste(text))),
            Some(_) => continue,
            None => return Ok(None),
        }
    }
}

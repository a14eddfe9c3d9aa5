use std::sync::mpsc::Sender;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::player::PlaybackState;
use crate::runtime::FlashEvent;
use crate::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Reading,
    Paused,
    Finished,
}

/// What the event loop should do after a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Continue,
    Quit,
}

/// Terminal host around one reading session
#[derive(Debug)]
pub struct App {
    pub session: Session,
}

impl App {
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    pub fn start(&mut self, tx: Sender<FlashEvent>) {
        self.session.start(tx);
    }

    pub fn state(&self) -> AppState {
        if self.session.state() == PlaybackState::Done {
            AppState::Finished
        } else if self.session.is_paused() {
            AppState::Paused
        } else {
            AppState::Reading
        }
    }

    /// Returns true when the screen needs redrawing
    pub fn on_tick(&mut self, generation: u64) -> bool {
        self.session.on_tick(generation)
    }

    pub fn on_key(&mut self, key: KeyEvent, tx: Sender<FlashEvent>) -> KeyOutcome {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => KeyOutcome::Quit,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                KeyOutcome::Quit
            }
            KeyCode::Char(' ') => {
                if self.state() != AppState::Finished {
                    self.session.toggle_pause(tx);
                }
                KeyOutcome::Continue
            }
            KeyCode::Char('r') => {
                self.session.restart(tx);
                KeyOutcome::Continue
            }
            _ => KeyOutcome::Continue,
        }
    }

    /// Closing always releases the ticker
    pub fn close(&mut self) {
        self.session.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::FlushMode;
    use crate::session::SessionConfig;
    use std::sync::mpsc;

    fn app(text: &str) -> App {
        let config = SessionConfig::new(1, 600.0, FlushMode::Drop).unwrap();
        App::new(Session::new(Some(text), config).unwrap())
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn quit_keys() {
        let (tx, _rx) = mpsc::channel();
        let mut app = app("a b");
        assert_eq!(app.on_key(key(KeyCode::Esc), tx.clone()), KeyOutcome::Quit);
        assert_eq!(app.on_key(key(KeyCode::Char('q')), tx.clone()), KeyOutcome::Quit);
        assert_eq!(
            app.on_key(
                KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
                tx.clone()
            ),
            KeyOutcome::Quit
        );
        assert_eq!(app.on_key(key(KeyCode::Char('c')), tx), KeyOutcome::Continue);
    }

    #[test]
    fn space_toggles_pause() {
        let (tx, _rx) = mpsc::channel();
        let mut app = app("a b c");
        app.start(tx.clone());
        assert_eq!(app.state(), AppState::Reading);

        app.on_key(key(KeyCode::Char(' ')), tx.clone());
        assert_eq!(app.state(), AppState::Paused);

        app.on_key(key(KeyCode::Char(' ')), tx);
        assert_eq!(app.state(), AppState::Reading);
        app.close();
    }

    #[test]
    fn finished_after_last_flash() {
        let mut app = app("word");
        let tick = app.session.generation();
        assert!(app.on_tick(tick));
        assert_eq!(app.state(), AppState::Finished);
        assert!(!app.on_tick(tick));
    }

    #[test]
    fn restart_from_finished() {
        let (tx, _rx) = mpsc::channel();
        let mut app = app("word");
        app.on_tick(app.session.generation());
        assert_eq!(app.state(), AppState::Finished);

        app.on_key(key(KeyCode::Char('r')), tx);
        assert_eq!(app.state(), AppState::Reading);
        app.close();
    }
}

use std::sync::mpsc::Sender;
use std::time::Duration;

use crate::runtime::{spawn_ticker, FixedTicker, FlashEvent, TickHandle};
use crate::segment::{Flash, FlashSequence};
use crate::session::SessionConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Playing,
    Done,
}

/// Steps through a [`FlashSequence`], one flash per tick.
#[derive(Debug)]
pub struct Player {
    flashes: FlashSequence,
    index: usize,
    interval: Duration,
}

impl Player {
    pub fn new(flashes: FlashSequence, config: &SessionConfig) -> Self {
        Self {
            flashes,
            index: 0,
            interval: config.interval(),
        }
    }

    /// Begin delivering `Tick(generation)` events on `tx`. Playback lasts as
    /// long as the returned handle is held.
    pub fn start(&self, tx: Sender<FlashEvent>, generation: u64) -> TickHandle {
        spawn_ticker(FixedTicker::new(self.interval), tx, generation)
    }

    /// Returns the flash to display next, or `None` once every flash was shown.
    pub fn advance(&mut self) -> Option<&Flash> {
        if self.index == self.flashes.len() {
            return None;
        }

        let flash = self.flashes.get(self.index);
        self.index += 1;
        flash
    }

    /// Most recently displayed flash
    pub fn current(&self) -> Option<&Flash> {
        self.index.checked_sub(1).and_then(|i| self.flashes.get(i))
    }

    pub fn state(&self) -> PlaybackState {
        if self.index < self.flashes.len() {
            PlaybackState::Playing
        } else {
            PlaybackState::Done
        }
    }

    pub fn is_done(&self) -> bool {
        self.state() == PlaybackState::Done
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.flashes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flashes.is_empty()
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn flashes(&self) -> &FlashSequence {
        &self.flashes
    }

    pub fn reset(&mut self) {
        self.index = 0;
    }
}

use std::sync::mpsc::Sender;
use std::time::Duration;

use log::{debug, info};

use crate::error::{FlashError, Result};
use crate::player::{PlaybackState, Player};
use crate::runtime::{FlashEvent, TickHandle};
use crate::segment::{segment_with, Flash, FlushMode};

/// Shown until the first tick swaps in real content
pub const PLACEHOLDER: &str = "Loading...";

/// Validated settings for one reading session
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionConfig {
    pub words_per_flash: usize,
    pub words_per_minute: f64,
    pub flush_mode: FlushMode,
}

impl SessionConfig {
    pub fn new(words_per_flash: usize, words_per_minute: f64, flush_mode: FlushMode) -> Result<Self> {
        if words_per_flash == 0 {
            return Err(FlashError::invalid_config(
                "wordcount",
                words_per_flash.to_string(),
                "must be at least one word per flash",
            ));
        }
        if !words_per_minute.is_finite() || words_per_minute <= 0.0 {
            return Err(FlashError::invalid_config(
                "wpm",
                words_per_minute.to_string(),
                "must be a positive number",
            ));
        }

        let config = Self {
            words_per_flash,
            words_per_minute,
            flush_mode,
        };
        if config.interval().is_zero() {
            return Err(FlashError::invalid_config(
                "wpm",
                words_per_minute.to_string(),
                "too fast to schedule",
            ));
        }
        Ok(config)
    }

    /// Milliseconds each flash stays on screen
    pub fn interval_millis(&self) -> f64 {
        (60.0 * 1000.0 * self.words_per_flash as f64) / self.words_per_minute
    }

    pub fn interval(&self) -> Duration {
        Duration::from_nanos((self.interval_millis() * 1_000_000.0).round() as u64)
    }
}

/// One reading run: the player plus the ticker driving it.
#[derive(Debug)]
pub struct Session {
    pub config: SessionConfig,
    player: Player,
    ticker: Option<TickHandle>,
    /// Bumped on every start; ticks from earlier tickers are ignored
    generation: u64,
    display: Option<String>,
    paused: bool,
}

impl Session {
    /// Segments `text` (absent text reads as empty) and prepares a player.
    pub fn new(text: Option<&str>, config: SessionConfig) -> Result<Self> {
        let flashes = segment_with(text, config.words_per_flash, config.flush_mode)?;
        let player = Player::new(flashes, &config);

        debug!(
            "session ready: {} flashes every {:.1}ms",
            player.len(),
            config.interval_millis()
        );

        Ok(Self {
            config,
            player,
            ticker: None,
            generation: 0,
            display: None,
            paused: false,
        })
    }

    pub fn start(&mut self, tx: Sender<FlashEvent>) {
        self.stop_ticker();
        self.generation += 1;
        self.ticker = Some(self.player.start(tx, self.generation));
        self.paused = false;
        info!("session started (ticker {})", self.generation);
    }

    /// Advance on a tick from ticker `generation`. Returns true if the display
    /// text changed.
    pub fn on_tick(&mut self, generation: u64) -> bool {
        if self.paused || generation != self.generation {
            return false;
        }

        match self.player.advance().map(Flash::text) {
            Some(text) => {
                self.display = Some(text.to_string());
                if self.player.is_done() {
                    debug!("last flash shown");
                }
                true
            }
            None => false,
        }
    }

    /// Pausing releases the ticker; resuming starts a fresh one so the next
    /// flash appears a full interval later.
    pub fn toggle_pause(&mut self, tx: Sender<FlashEvent>) {
        if self.paused {
            self.start(tx);
        } else {
            self.stop_ticker();
            self.paused = true;
            info!("session paused at {}/{}", self.player.index(), self.player.len());
        }
    }

    pub fn restart(&mut self, tx: Sender<FlashEvent>) {
        self.stop_ticker();
        self.player.reset();
        self.display = None;
        self.start(tx);
    }

    pub fn close(&mut self) {
        self.stop_ticker();
        info!("session closed");
    }

    fn stop_ticker(&mut self) {
        if let Some(mut ticker) = self.ticker.take() {
            ticker.stop();
        }
    }

    pub fn display_text(&self) -> &str {
        self.display.as_deref().unwrap_or(PLACEHOLDER)
    }

    pub fn is_ticking(&self) -> bool {
        self.ticker.as_ref().is_some_and(TickHandle::is_running)
    }

    /// Generation of the current ticker, carried by its `Tick` events
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn state(&self) -> PlaybackState {
        self.player.state()
    }

    pub fn player(&self) -> &Player {
        &self.player
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.stop_ticker();
    }
}

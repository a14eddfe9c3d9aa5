use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CtEvent, KeyEvent};
use log::debug;

/// Unified event type consumed by the app runner
#[derive(Clone, Debug)]
pub enum FlashEvent {
    Key(KeyEvent),
    Resize,
    /// Playback tick, tagged with the generation of the ticker that sent it
    Tick(u64),
}

/// Source of application events (keyboard, resize, playback ticks)
pub trait FlashEventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    fn recv_timeout(&self, timeout: Duration) -> Result<FlashEvent, RecvTimeoutError>;

    /// Sender that feeds this source, handed to tickers.
    fn sender(&self) -> Sender<FlashEvent>;
}

/// Production event source using crossterm
pub struct CrosstermEventSource {
    tx: Sender<FlashEvent>,
    rx: Receiver<FlashEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        let input_tx = tx.clone();

        thread::spawn(move || loop {
            match event::read() {
                Ok(CtEvent::Key(key)) => {
                    if input_tx.send(FlashEvent::Key(key)).is_err() {
                        break;
                    }
                }
                Ok(CtEvent::Resize(_, _)) => {
                    if input_tx.send(FlashEvent::Resize).is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                Err(_) => break,
            }
        });

        Self { tx, rx }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl FlashEventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<FlashEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }

    fn sender(&self) -> Sender<FlashEvent> {
        self.tx.clone()
    }
}

/// Test event source for unit tests
pub struct TestEventSource {
    tx: Sender<FlashEvent>,
    rx: Receiver<FlashEvent>,
}

impl TestEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self { tx, rx }
    }
}

impl Default for TestEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl FlashEventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<FlashEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }

    fn sender(&self) -> Sender<FlashEvent> {
        self.tx.clone()
    }
}

/// Configurable ticker interface
pub trait Ticker: Send + Sync + 'static {
    fn interval(&self) -> Duration;
}

/// Fixed interval ticker
#[derive(Clone, Copy, Debug)]
pub struct FixedTicker {
    interval: Duration,
}

impl FixedTicker {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Ticker for FixedTicker {
    fn interval(&self) -> Duration {
        self.interval
    }
}

/// Owner of a running ticker thread. Stopping (or dropping) the handle
/// guarantees no further `Tick` is sent.
#[derive(Debug)]
pub struct TickHandle {
    stop_tx: Option<Sender<()>>,
    thread: Option<JoinHandle<()>>,
}

impl TickHandle {
    pub fn stop(&mut self) {
        // Dropping the sender disconnects the stop channel and wakes the ticker
        self.stop_tx.take();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }

    pub fn is_running(&self) -> bool {
        self.thread.as_ref().is_some_and(|t| !t.is_finished())
    }
}

impl Drop for TickHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Send `FlashEvent::Tick(generation)` on `tx` every `ticker.interval()`, first
/// one after a full interval. Tick `n` is scheduled at `start + n * interval`
/// so sleeps do not accumulate drift.
pub fn spawn_ticker<T: Ticker>(ticker: T, tx: Sender<FlashEvent>, generation: u64) -> TickHandle {
    let (stop_tx, stop_rx) = mpsc::channel::<()>();
    let interval = ticker.interval();

    let thread = thread::spawn(move || {
        let started = Instant::now();
        let mut ticks: u32 = 0;

        loop {
            let deadline = started + interval * (ticks + 1);
            let wait = deadline.saturating_duration_since(Instant::now());

            match stop_rx.recv_timeout(wait) {
                Err(RecvTimeoutError::Timeout) => {
                    if tx.send(FlashEvent::Tick(generation)).is_err() {
                        break;
                    }
                    ticks = ticks.saturating_add(1);
                }
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            }
        }

        debug!("ticker {} stopped after {} ticks", generation, ticks);
    });

    TickHandle {
        stop_tx: Some(stop_tx),
        thread: Some(thread),
    }
}

/// Runner that hands the application one event at a time
pub struct Runner<E: FlashEventSource> {
    event_source: E,
    poll_interval: Duration,
}

impl<E: FlashEventSource> Runner<E> {
    pub fn new(event_source: E, poll_interval: Duration) -> Self {
        Self {
            event_source,
            poll_interval,
        }
    }

    pub fn sender(&self) -> Sender<FlashEvent> {
        self.event_source.sender()
    }

    /// Blocks up to the poll interval; `None` when nothing arrived
    pub fn step(&self) -> Option<FlashEvent> {
        match self.event_source.recv_timeout(self.poll_interval) {
            Ok(ev) => Some(ev),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }
}

// Library surface for the binary, headless integration tests and embedding hosts.
pub mod app;
pub mod app_dirs;
pub mod config;
pub mod error;
pub mod logging;
pub mod player;
pub mod runtime;
pub mod segment;
pub mod selection;
pub mod session;
pub mod ui;

pub use error::{FlashError, Result};
pub use segment::{segment, Flash, FlashSequence, FlushMode};
pub use session::{Session, SessionConfig};

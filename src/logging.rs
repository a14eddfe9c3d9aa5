use std::fs::{self, OpenOptions};
use std::path::Path;

use env_logger::{Builder, Env, Target};

use crate::app_dirs::AppDirs;

/// Environment variable holding the log filter, e.g. `FLASHREAD_LOG=debug`
pub const LOG_ENV: &str = "FLASHREAD_LOG";

/// Send log records to the state directory log file when `FLASHREAD_LOG` is
/// set. The terminal belongs to the reader, so nothing is ever written to it.
pub fn init() {
    if std::env::var_os(LOG_ENV).is_none() {
        return;
    }
    if let Some(path) = AppDirs::log_path() {
        init_to(&path);
    }
}

pub fn init_to(path: &Path) {
    if let Some(parent) = path.parent() {
        if fs::create_dir_all(parent).is_err() {
            return;
        }
    }

    let file = match OpenOptions::new().create(true).append(true).open(path) {
        Ok(file) => file,
        Err(_) => return,
    };

    let _ = Builder::from_env(Env::new().filter_or(LOG_ENV, "info"))
        .target(Target::Pipe(Box::new(file)))
        .try_init();
}

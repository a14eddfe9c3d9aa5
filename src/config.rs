use directories::ProjectDirs;
use log::warn;
use serde::{Deserialize, Serialize};
use regex::Regex;
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use crate::error::{FlashError, Result};
use crate::segment::FlushMode;
use crate::session::SessionConfig;

pub const DEFAULT_WPM: &str = "600";
pub const DEFAULT_WORDCOUNT: &str = "1";

fn int_prefix_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[+-]?[0-9]+").expect("integer prefix pattern is valid"))
}

fn float_prefix_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[+-]?([0-9]+(\.[0-9]*)?|\.[0-9]+)([eE][+-]?[0-9]+)?")
            .expect("float prefix pattern is valid")
    })
}

/// Longest number at the start of `raw`, ignoring leading whitespace
fn leading_match<'a>(re: &Regex, raw: &'a str) -> Option<&'a str> {
    re.find(raw.trim_start()).map(|m| m.as_str())
}

/// Persisted reader settings. Values are kept as the strings the user typed
/// and only parsed when a session starts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    pub wpm: String,
    pub wordcount: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            wpm: DEFAULT_WPM.to_string(),
            wordcount: DEFAULT_WORDCOUNT.to_string(),
        }
    }
}

impl Settings {
    /// Overlay explicitly provided values, leaving the rest untouched
    pub fn with_overrides(mut self, wpm: Option<String>, wordcount: Option<String>) -> Self {
        if let Some(wpm) = wpm {
            self.wpm = wpm;
        }
        if let Some(wordcount) = wordcount {
            self.wordcount = wordcount;
        }
        self
    }

    /// Leading whole number of `wordcount`; trailing text is ignored, so
    /// `"2.5"` reads as 2 and `"3 words"` as 3.
    pub fn words_per_flash(&self) -> Result<usize> {
        let prefix = leading_match(int_prefix_re(), &self.wordcount)
            .ok_or_else(|| FlashError::invalid_config("wordcount", &self.wordcount, "not a number"))?;
        let n = prefix
            .parse::<i64>()
            .map_err(|_| FlashError::invalid_config("wordcount", &self.wordcount, "number too large"))?;
        if n < 1 {
            return Err(FlashError::invalid_config(
                "wordcount",
                &self.wordcount,
                "must be at least one word per flash",
            ));
        }
        usize::try_from(n)
            .map_err(|_| FlashError::invalid_config("wordcount", &self.wordcount, "number too large"))
    }

    /// Leading decimal number of `wpm`, e.g. `"600wpm"` reads as 600.
    pub fn words_per_minute(&self) -> Result<f64> {
        let wpm = leading_match(float_prefix_re(), &self.wpm)
            .and_then(|prefix| prefix.parse::<f64>().ok())
            .ok_or_else(|| FlashError::invalid_config("wpm", &self.wpm, "not a number"))?;
        if !wpm.is_finite() || wpm <= 0.0 {
            return Err(FlashError::invalid_config(
                "wpm",
                &self.wpm,
                "must be a positive number",
            ));
        }
        Ok(wpm)
    }

    pub fn to_session_config(&self, flush_mode: FlushMode) -> Result<SessionConfig> {
        SessionConfig::new(self.words_per_flash()?, self.words_per_minute()?, flush_mode)
    }
}

pub trait SettingsStore {
    fn load(&self) -> Settings;
    fn save(&self, settings: &Settings) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileSettingsStore {
    path: PathBuf,
}

impl FileSettingsStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "flashread") {
            pd.config_dir().join("settings.json")
        } else {
            PathBuf::from("flashread_settings.json")
        };
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileSettingsStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsStore for FileSettingsStore {
    fn load(&self) -> Settings {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(_) => return Settings::default(),
        };
        match serde_json::from_slice::<Settings>(&bytes) {
            Ok(settings) => settings,
            Err(err) => {
                warn!("ignoring unreadable settings {}: {}", self.path.display(), err);
                Settings::default()
            }
        }
    }

    fn save(&self, settings: &Settings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(settings).unwrap_or_default();
        fs::write(&self.path, data)?;
        Ok(())
    }
}

/// Keeps settings in memory, for embedding hosts and tests
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    settings: RefCell<Option<Settings>>,
}

impl MemorySettingsStore {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings: RefCell::new(Some(settings)),
        }
    }
}

impl SettingsStore for MemorySettingsStore {
    fn load(&self) -> Settings {
        self.settings.borrow().clone().unwrap_or_default()
    }

    fn save(&self, settings: &Settings) -> Result<()> {
        *self.settings.borrow_mut() = Some(settings.clone());
        Ok(())
    }
}

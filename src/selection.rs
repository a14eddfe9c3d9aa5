use std::fs;
use std::io::{self, IsTerminal, Read};
use std::ops::RangeInclusive;
use std::path::PathBuf;

use log::warn;

/// Anything that can hand over the text the reader wants to flash through.
/// `None` means nothing is selected, which plays as empty text.
pub trait SelectionSource {
    fn selection(&self) -> Option<String>;
}

/// Text given directly, e.g. on the command line
#[derive(Debug, Clone)]
pub struct TextSelection(pub String);

impl SelectionSource for TextSelection {
    fn selection(&self) -> Option<String> {
        Some(self.0.clone())
    }
}

/// A file, optionally narrowed to an inclusive 1-based line range
#[derive(Debug, Clone)]
pub struct FileSelection {
    pub path: PathBuf,
    pub lines: Option<RangeInclusive<usize>>,
}

impl FileSelection {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lines: None,
        }
    }

    pub fn with_lines(mut self, lines: RangeInclusive<usize>) -> Self {
        self.lines = Some(lines);
        self
    }
}

impl SelectionSource for FileSelection {
    fn selection(&self) -> Option<String> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) => {
                warn!("cannot read {}: {}", self.path.display(), err);
                return None;
            }
        };

        match &self.lines {
            None => Some(contents),
            Some(range) => {
                let start = range.start().saturating_sub(1);
                let take = range.end().saturating_sub(start);
                let picked = contents.lines().skip(start).take(take).collect::<Vec<_>>();
                if picked.is_empty() {
                    None
                } else {
                    Some(picked.join("\n"))
                }
            }
        }
    }
}

/// Piped standard input. Nothing is selected when stdin is a terminal.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdinSelection;

impl SelectionSource for StdinSelection {
    fn selection(&self) -> Option<String> {
        let stdin = io::stdin();
        if stdin.is_terminal() {
            return None;
        }

        let mut buf = String::new();
        match stdin.lock().read_to_string(&mut buf) {
            Ok(_) => Some(buf),
            Err(err) => {
                warn!("cannot read stdin: {}", err);
                None
            }
        }
    }
}

/// Parse `A:B`, `A:` or `A` into an inclusive line range.
pub fn parse_line_range(s: &str) -> Result<RangeInclusive<usize>, String> {
    let parse = |v: &str| {
        v.trim()
            .parse::<usize>()
            .map_err(|_| format!("invalid line number {:?}", v))
    };

    let (start, end) = match s.split_once(':') {
        Some((a, "")) => (parse(a)?, usize::MAX),
        Some((a, b)) => (parse(a)?, parse(b)?),
        None => {
            let n = parse(s)?;
            (n, n)
        }
    };

    if start == 0 {
        return Err("line numbers start at 1".to_string());
    }
    if end < start {
        return Err(format!("line range {} ends before it starts", s));
    }
    Ok(start..=end)
}

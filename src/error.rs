use std::{fmt, io};

/// Errors surfaced while preparing or running a reading session.
#[derive(Debug)]
pub enum FlashError {
    /// A settings value that cannot drive a session (non-numeric, zero, negative, not finite)
    InvalidConfig {
        field: &'static str,
        value: String,
        reason: &'static str,
    },
    Io(io::Error),
}

impl FlashError {
    pub fn invalid_config(field: &'static str, value: impl Into<String>, reason: &'static str) -> Self {
        FlashError::InvalidConfig {
            field,
            value: value.into(),
            reason,
        }
    }
}

impl fmt::Display for FlashError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlashError::InvalidConfig {
                field,
                value,
                reason,
            } => write!(f, "invalid {} {:?}: {}", field, value, reason),
            FlashError::Io(err) => write!(f, "io error: {}", err),
        }
    }
}

impl std::error::Error for FlashError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FlashError::Io(err) => Some(err),
            FlashError::InvalidConfig { .. } => None,
        }
    }
}

impl From<io::Error> for FlashError {
    fn from(err: io::Error) -> Self {
        FlashError::Io(err)
    }
}

pub type Result<T> = std::result::Result<T, FlashError>;

use std::path::PathBuf;

use pinchcal_core::ConfigError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, HarnessError>;

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("invalid config {path}: {problems}")]
    InvalidConfig { path: PathBuf, problems: String },

    #[error("script line {line}: {message}")]
    Script { line: usize, message: String },

    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },
}

impl HarnessError {
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidArgument { .. } => 2,
            Self::Script { .. } => 3,
            Self::Config(_) | Self::InvalidConfig { .. } => 4,
            _ => 1,
        }
    }

    #[must_use]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn script(line: usize, message: impl Into<String>) -> Self {
        Self::Script {
            line,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::HarnessError;

    #[test]
    fn script_error_names_the_line() {
        let error = HarnessError::script(7, "unknown action");
        assert_eq!(error.to_string(), "script line 7: unknown action");
        assert_eq!(error.exit_code(), 3);
    }

    #[test]
    fn invalid_argument_exit_code() {
        assert_eq!(HarnessError::invalid("bad --start").exit_code(), 2);
    }

    #[test]
    fn io_errors_use_generic_exit_code() {
        let error = HarnessError::from(std::io::Error::other("disk"));
        assert_eq!(error.exit_code(), 1);
    }
}

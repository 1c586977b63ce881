//! One-shot user-facing messages shown after a redirect.

use serde::{Deserialize, Serialize};

/// Severity of a flash message. Maps onto the CSS alert classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlashLevel {
    Success,
    Info,
    Warning,
    Danger,
}

impl FlashLevel {
    /// CSS modifier used by the templates (`alert-success`, ...).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Danger => "danger",
        }
    }
}

/// A message stored in the session and rendered once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashMessage {
    pub level: FlashLevel,
    pub text: String,
}

impl FlashMessage {
    /// Create a new flash message.
    #[must_use]
    pub fn new(level: FlashLevel, text: impl Into<String>) -> Self {
        Self {
            level,
            text: text.into(),
        }
    }

    /// Convenience constructor for a success message.
    #[must_use]
    pub fn success(text: impl Into<String>) -> Self {
        Self::new(FlashLevel::Success, text)
    }

    /// Convenience constructor for an info message.
    #[must_use]
    pub fn info(text: impl Into<String>) -> Self {
        Self::new(FlashLevel::Info, text)
    }

    /// Convenience constructor for a warning message.
    #[must_use]
    pub fn warning(text: impl Into<String>) -> Self {
        Self::new(FlashLevel::Warning, text)
    }

    /// Convenience constructor for a danger message.
    #[must_use]
    pub fn danger(text: impl Into<String>) -> Self {
        Self::new(FlashLevel::Danger, text)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_flash_serializes_level_as_snake_case() {
        let json = serde_json::to_string(&FlashMessage::warning("Fill all fields")).unwrap();
        assert_eq!(json, r#"{"level":"warning","text":"Fill all fields"}"#);
    }
}

use thiserror::Error;

/// Errors returned by a module's `set`.
///
/// # Examples
/// ```
/// use codecmap_core::ModuleError;
///
/// let err = ModuleError::UnknownKey { key: "anything".to_string() };
/// assert!(err.to_string().contains("unknown option"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModuleError {
    #[error("unknown option '{key}'")]
    UnknownKey { key: String },
    #[error("option '{key}' expects {expected}")]
    TypeMismatch { key: String, expected: &'static str },
    #[error("option '{key}' value {value} out of range {min}..={max}")]
    OutOfRange {
        key: String,
        value: i64,
        min: i64,
        max: i64,
    },
    #[error("invalid value for option '{key}': {reason}")]
    InvalidValue { key: String, reason: String },
}

impl ModuleError {
    pub fn unknown(key: &str) -> Self {
        ModuleError::UnknownKey {
            key: key.to_string(),
        }
    }

    pub fn mismatch(key: &str, expected: &'static str) -> Self {
        ModuleError::TypeMismatch {
            key: key.to_string(),
            expected,
        }
    }

    pub fn invalid(key: &str, reason: impl Into<String>) -> Self {
        ModuleError::InvalidValue {
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

use thiserror::Error;

/// Errors raised before any store access.
///
/// Both variants are hard failures: they surface to the caller as a tool
/// fault, never as an `{ok:false}` envelope. Store-level errors are not
/// represented here — they propagate unmodified as `sqlx::Error`.
#[derive(Error, Debug)]
pub enum HearthError {
    /// Missing process-wide configuration (e.g. no owner supplied and no
    /// default owner configured).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A caller-supplied parameter is malformed or out of range.
    #[error("validation error: {0}")]
    Validation(String),
}

impl HearthError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

//! Error types for the mechanics engine.

/// Errors that can occur during mechanics operations.
#[derive(Debug, thiserror::Error)]
pub enum MechError {
    /// A dice notation string does not match `[count]d<sides>[+|-modifier]`.
    #[error("malformed dice expression {input:?}: {reason}")]
    MalformedExpression {
        /// The text that failed to parse.
        input: String,
        /// What was wrong with it.
        reason: String,
    },

    /// A character sheet carries values the combat rules cannot use.
    #[error("invalid character sheet: {0}")]
    InvalidSheet(String),
}

impl MechError {
    pub(crate) fn malformed(input: &str, reason: impl Into<String>) -> Self {
        Self::MalformedExpression {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

/// Convenience result type for mechanics operations.
pub type MechResult<T> = Result<T, MechError>;

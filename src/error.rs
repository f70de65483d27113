//! Unified error handling for the require-auth line engine.
//!
//! Every rejection here is local and synchronous: it is reported once to
//! the invoking operator and the engine keeps running.

use thiserror::Error;

/// Errors produced by line construction, storage, and removal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthLineError {
    /// A line with the same scope and mask already exists. The stored
    /// line is left untouched.
    #[error("{0}-line for {1} already exists")]
    DuplicateLine(&'static str, String),

    /// No line with this exact mask in the given scope. The trailing
    /// character is the STATS symbol that lists the scope.
    #[error("{0}-line {1} not found in list, try /stats {2}")]
    LineNotFound(&'static str, String, char),

    /// Target could not be split into non-empty ident and host parts.
    #[error("target not found: {0}")]
    InvalidMask(String),

    /// These line kinds operate on ident@host masks only.
    #[error("cannot operate on nick!user@host masks: {0}")]
    NickUserHostMask(String),

    /// The mask would match every currently connected session.
    #[error("mask {0} matches every connected user")]
    MatchesEveryone(String),

    /// Duration string could not be parsed.
    #[error("invalid duration: {0}")]
    InvalidDuration(String),
}

impl AuthLineError {
    /// Static code string classifying the rejection, for hosts that
    /// label their own metrics or log streams.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::DuplicateLine(..) => "duplicate_line",
            Self::LineNotFound(..) => "line_not_found",
            Self::InvalidMask(_) => "invalid_mask",
            Self::NickUserHostMask(_) => "nick_user_host_mask",
            Self::MatchesEveryone(_) => "matches_everyone",
            Self::InvalidDuration(_) => "invalid_duration",
        }
    }
}

/// Result type for line operations.
pub type LineResult<T> = Result<T, AuthLineError>;

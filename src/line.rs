//! Require-auth line records.
//!
//! An `AuthLine` marks an ident@host pattern whose users must
//! authenticate before using the server. Local lines (tag `A`) apply to
//! this server only; Global lines (tag `GA`) are propagated network-wide
//! during burst. Lines are immutable once stored: removal and
//! re-creation, never edit.

use crate::error::AuthLineError;
use crate::matching::{host_match, wildcard_match};
use crate::session::SessionInfo;

/// Scope of a require-auth line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineScope {
    /// Applies only to sessions on this server instance.
    Local,
    /// Propagated to all cooperating servers.
    Global,
}

impl LineScope {
    /// Storage tag used by the factory registry and the propagation
    /// layer.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Local => "A",
            Self::Global => "GA",
        }
    }

    /// Prefix used in quit reasons and user notices.
    pub fn line_name(&self) -> &'static str {
        match self {
            Self::Local => "A-Lined",
            Self::Global => "GA-Lined",
        }
    }

    /// STATS symbol that surfaces this scope's lines.
    ///
    /// Inverted relative to the scope's casing: the uppercase symbol
    /// surfaces Global lines, the lowercase one Local lines. Operator
    /// tooling depends on this convention.
    pub fn stats_symbol(&self) -> char {
        match self {
            Self::Local => 'a',
            Self::Global => 'A',
        }
    }

    /// Whether lines of this scope are sent during network
    /// synchronization.
    pub fn is_burstable(&self) -> bool {
        matches!(self, Self::Global)
    }
}

/// An authentication-requirement line.
#[derive(Debug, Clone)]
pub struct AuthLine {
    /// Local or Global.
    pub scope: LineScope,
    /// Glob pattern for the ident part.
    pub ident_mask: String,
    /// Glob or CIDR pattern for the host or IP part.
    pub host_mask: String,
    /// Operator or server that set the line.
    pub source: String,
    /// Free-text justification, shown to affected users.
    pub reason: String,
    /// Unix timestamp when the line was set.
    pub set_at: i64,
    /// Lifetime in seconds; 0 means permanent.
    pub duration: i64,
}

impl AuthLine {
    /// Build a line from a raw `ident@host` target.
    ///
    /// The target must contain an `@`; an empty ident part falls back to
    /// `*`, an empty host part is rejected. `nick!user@host` forms are
    /// rejected outright.
    pub fn new(
        scope: LineScope,
        set_at: i64,
        duration: i64,
        source: &str,
        reason: &str,
        target: &str,
    ) -> Result<Self, AuthLineError> {
        let (ident_mask, host_mask) = split_ident_host(target)?;
        Ok(Self {
            scope,
            ident_mask,
            host_mask,
            source: source.to_string(),
            reason: reason.to_string(),
            set_at,
            duration,
        })
    }

    /// Canonical `ident@host` text: the display form and the exact-match
    /// key for removal.
    pub fn mask(&self) -> String {
        format!("{}@{}", self.ident_mask, self.host_mask)
    }

    /// Expiry timestamp, or `None` for permanent lines.
    pub fn expires_at(&self) -> Option<i64> {
        (self.duration > 0).then(|| self.set_at + self.duration)
    }

    /// Check if this line has expired.
    pub fn is_expired(&self, now: i64) -> bool {
        self.expires_at().is_some_and(|expiry| now > expiry)
    }

    /// Whether this line is sent to peers during burst.
    pub fn is_burstable(&self) -> bool {
        self.scope.is_burstable()
    }

    /// Whether the line is written against a host only (`*` ident).
    pub fn is_host_only(&self) -> bool {
        self.ident_mask == "*"
    }

    /// Check this line against a session.
    ///
    /// Exempt sessions never match. The ident mask is globbed against
    /// the session ident; the host mask must match either the hostname
    /// or the resolved IP, so a line written against a hostname also
    /// catches direct-IP connections and vice versa.
    pub fn matches(&self, session: &SessionInfo) -> bool {
        if session.exempt {
            return false;
        }
        wildcard_match(&self.ident_mask, &session.ident)
            && (host_match(&self.host_mask, &session.host)
                || host_match(&self.host_mask, &session.ip))
    }

    /// Exact-text comparison against the canonical mask, independent of
    /// the glob engine. Used for removal by operators.
    pub fn matches_text(&self, candidate: &str) -> bool {
        self.mask() == candidate
    }

    /// Operator notice emitted when the line is dropped by the expiry
    /// sweep.
    pub fn expiry_notice(&self, now: i64) -> String {
        format!(
            "Removing expired {}-Line {} (set by {} {} seconds ago)",
            self.scope.tag(),
            self.mask(),
            self.source,
            now.saturating_sub(self.set_at)
        )
    }
}

/// Split an `ident@host` target into its mask parts.
fn split_ident_host(target: &str) -> Result<(String, String), AuthLineError> {
    if target.contains('!') {
        return Err(AuthLineError::NickUserHostMask(target.to_string()));
    }
    let Some((ident, host)) = target.split_once('@') else {
        return Err(AuthLineError::InvalidMask(target.to_string()));
    };
    if host.is_empty() {
        return Err(AuthLineError::InvalidMask(target.to_string()));
    }
    let ident = if ident.is_empty() { "*" } else { ident };
    Ok((ident.to_string(), host.to_string()))
}

/// Parse an operator-typed duration string into seconds.
///
/// Accepts the usual suffix form (`1d2h30m`, suffixes `s m h d w y`) or
/// a bare number of seconds. `0` means permanent.
pub fn parse_duration(text: &str) -> Result<i64, AuthLineError> {
    let mut total: i64 = 0;
    let mut acc: i64 = 0;
    let mut saw_digit = false;

    for c in text.chars() {
        if let Some(d) = c.to_digit(10) {
            acc = acc
                .checked_mul(10)
                .and_then(|a| a.checked_add(d as i64))
                .ok_or_else(|| AuthLineError::InvalidDuration(text.to_string()))?;
            saw_digit = true;
        } else {
            let unit: i64 = match c.to_ascii_lowercase() {
                's' => 1,
                'm' => 60,
                'h' => 3600,
                'd' => 86400,
                'w' => 604800,
                'y' => 31536000,
                _ => return Err(AuthLineError::InvalidDuration(text.to_string())),
            };
            total = acc
                .checked_mul(unit)
                .and_then(|a| total.checked_add(a))
                .ok_or_else(|| AuthLineError::InvalidDuration(text.to_string()))?;
            acc = 0;
        }
    }

    if !saw_digit {
        return Err(AuthLineError::InvalidDuration(text.to_string()));
    }
    total
        .checked_add(acc)
        .ok_or_else(|| AuthLineError::InvalidDuration(text.to_string()))
}

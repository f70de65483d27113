//! Session snapshots and the host capability surface.
//!
//! The engine does not own sessions. The host hands in a `SessionInfo`
//! snapshot at each trigger point and exposes its side effects
//! (termination, notices) through the `SessionGateway` trait.

use async_trait::async_trait;

/// Snapshot of a connected session.
#[derive(Debug, Clone)]
pub struct SessionInfo {
    /// Host-assigned session identifier.
    pub uid: String,
    /// Current nickname.
    pub nick: String,
    /// Ident (username) string.
    pub ident: String,
    /// Hostname, possibly cloaked.
    pub host: String,
    /// Resolved IP address as text.
    pub ip: String,
    /// Immune to require-auth lines regardless of pattern (server links,
    /// privileged sources).
    pub exempt: bool,
    /// True once the session has completed the authentication exchange.
    pub authenticated: bool,
    /// True once the connection handshake has finished.
    pub registered: bool,
}

/// Capabilities injected by the host: session directory, termination
/// primitive, and the notification channels.
///
/// All user- and operator-visible I/O goes through this trait; the
/// engine itself performs none.
#[async_trait]
pub trait SessionGateway: Send + Sync {
    /// Snapshot of all currently connected sessions.
    fn sessions(&self) -> Vec<SessionInfo>;

    /// Look up a connected session by nickname.
    fn find_by_nick(&self, nick: &str) -> Option<SessionInfo>;

    /// Disconnect a session with the given quit reason.
    async fn terminate(&self, uid: &str, reason: &str);

    /// Deliver a server notice to a session.
    async fn notice(&self, uid: &str, text: &str);

    /// Deliver a notice to the operator notification channel.
    async fn oper_notice(&self, text: &str);
}

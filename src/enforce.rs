//! Enforcement engine.
//!
//! Applies require-auth lines at the trigger points supplied by the
//! host session manager: registration completion, line addition, and
//! the periodic expiry sweep. Authenticated sessions are never touched.

use crate::line::{AuthLine, LineScope};
use crate::session::{SessionGateway, SessionInfo};
use crate::store::LineStore;
use std::sync::Arc;
use tracing::{debug, info};

/// Decides whether a line applies to a session and executes the
/// configured action through the host gateway.
pub struct Enforcer {
    store: Arc<LineStore>,
    gateway: Arc<dyn SessionGateway>,
}

impl Enforcer {
    /// Create an enforcer over the given store and host gateway.
    pub fn new(store: Arc<LineStore>, gateway: Arc<dyn SessionGateway>) -> Self {
        Self { store, gateway }
    }

    /// Hook for new-connection acceptance.
    ///
    /// No action: the full mask is not known yet. Checks run at
    /// registration completion.
    pub fn on_new_connection(&self, _session: &SessionInfo) {}

    /// Check a session that has just completed the connection handshake.
    ///
    /// A Local match takes precedence over a Global one and
    /// short-circuits it; only the winning line is reported to the user.
    pub async fn on_registration_complete(&self, session: &SessionInfo) {
        if session.authenticated || !session.registered {
            return;
        }
        let now = chrono::Utc::now().timestamp();
        let matched = self
            .store
            .find_match(LineScope::Local, session, now)
            .or_else(|| self.store.find_match(LineScope::Global, session, now));
        if let Some(line) = matched {
            self.disconnect(session, &line).await;
        }
    }

    /// Re-evaluate every currently connected session against a newly
    /// added line.
    ///
    /// Runs to completion before returning, so the caller can
    /// acknowledge the addition knowing enforcement already happened.
    /// Returns the number of sessions terminated.
    pub async fn apply_line(&self, line: &AuthLine) -> usize {
        let mut terminated = 0;
        for session in self.gateway.sessions() {
            if session.registered && !session.authenticated && line.matches(&session) {
                self.disconnect(&session, line).await;
                terminated += 1;
            }
        }
        if terminated > 0 {
            info!(
                scope = line.scope.tag(),
                mask = %line.mask(),
                terminated,
                "line applied to connected sessions"
            );
        }
        terminated
    }

    /// Drop expired lines from both scopes, reporting each removal on
    /// the operator notification channel. Returns the number dropped.
    pub async fn sweep_expired(&self, now: i64) -> usize {
        let mut removed = 0;
        for scope in [LineScope::Local, LineScope::Global] {
            for line in self.store.sweep_expired(scope, now) {
                self.gateway.oper_notice(&line.expiry_notice(now)).await;
                removed += 1;
            }
        }
        if removed > 0 {
            debug!(count = removed, "expired lines dropped");
        }
        removed
    }

    async fn disconnect(&self, session: &SessionInfo, line: &AuthLine) {
        let name = line.scope.line_name();
        // Host-only lines read as "this host is ban-pending"; keep the
        // ident out of the wording for those.
        let notice = if line.is_host_only() {
            format!(
                "*** NOTICE -- You need to identify via SASL to use this server (your host is {name})."
            )
        } else {
            format!(
                "*** NOTICE -- You need to identify via SASL to use this server (your username and host are {name})."
            )
        };
        self.gateway.notice(&session.uid, &notice).await;
        self.gateway
            .terminate(&session.uid, &format!("{name}: {}", line.reason))
            .await;
        info!(
            uid = %session.uid,
            scope = line.scope.tag(),
            mask = %line.mask(),
            "unauthenticated session terminated"
        );
    }
}

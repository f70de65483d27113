//! Service wiring: lifecycle, administrative surface, and stats.
//!
//! `RequireAuthService` owns the store and the enforcement engine for
//! both line kinds. It registers the scope-tag factories at startup and
//! tears everything down in the right order at shutdown: lines are
//! purged while the factories are still registered, so a concurrent
//! expiry sweep can still rebuild and report a line mid-teardown.

use crate::enforce::Enforcer;
use crate::error::{AuthLineError, LineResult};
use crate::line::{AuthLine, LineScope};
use crate::session::SessionGateway;
use crate::stats;
use crate::store::LineStore;
use std::sync::Arc;
use tracing::info;

/// Outcome of a successful line addition.
#[derive(Debug, Clone)]
pub struct AddOutcome {
    /// Canonical mask actually stored, after target normalization.
    pub mask: String,
    /// Sessions terminated when the line was applied.
    pub terminated: usize,
}

fn local_line(
    set_at: i64,
    duration: i64,
    source: &str,
    reason: &str,
    target: &str,
) -> Result<AuthLine, AuthLineError> {
    AuthLine::new(LineScope::Local, set_at, duration, source, reason, target)
}

fn global_line(
    set_at: i64,
    duration: i64,
    source: &str,
    reason: &str,
    target: &str,
) -> Result<AuthLine, AuthLineError> {
    AuthLine::new(LineScope::Global, set_at, duration, source, reason, target)
}

/// Administrative entry points for A-lines and GA-lines.
pub struct RequireAuthService {
    store: Arc<LineStore>,
    enforcer: Enforcer,
    gateway: Arc<dyn SessionGateway>,
}

impl RequireAuthService {
    /// Create the service and register the line factories for both
    /// scope tags.
    pub fn new(gateway: Arc<dyn SessionGateway>) -> Self {
        let store = Arc::new(LineStore::new());
        store.register_factory(LineScope::Local.tag(), local_line);
        store.register_factory(LineScope::Global.tag(), global_line);

        let enforcer = Enforcer::new(Arc::clone(&store), Arc::clone(&gateway));
        Self {
            store,
            enforcer,
            gateway,
        }
    }

    /// Shared handle to the line store.
    pub fn store(&self) -> &Arc<LineStore> {
        &self.store
    }

    /// The enforcement engine, for wiring into the host's
    /// connection-lifecycle hooks.
    pub fn enforcer(&self) -> &Enforcer {
        &self.enforcer
    }

    /// Add a line and apply it to all currently connected sessions.
    ///
    /// `target` is either an `ident@host` mask or the nick of a
    /// connected session; a connected, fully-registered nick is
    /// rewritten to `*@<resolved IP>` before construction. The add is
    /// acknowledged only after enforcement against connected sessions
    /// has completed.
    pub async fn add_line(
        &self,
        scope: LineScope,
        target: &str,
        duration: i64,
        source: &str,
        reason: &str,
    ) -> LineResult<AddOutcome> {
        let target = self.resolve_target(target);
        let now = chrono::Utc::now().timestamp();
        let line = AuthLine::new(scope, now, duration, source, reason, &target)?;

        self.reject_if_matches_everyone(&line)?;

        let mask = line.mask();
        self.store.add(line.clone())?;
        info!(scope = scope.tag(), mask = %mask, source = %source, "line added");

        let notice = match line.expires_at() {
            None => format!(
                "{} added permanent {}-line for {}: {}",
                source,
                scope.tag(),
                mask,
                reason
            ),
            Some(expiry) => {
                let when = chrono::DateTime::from_timestamp(expiry, 0)
                    .map(|t| t.to_rfc2822())
                    .unwrap_or_else(|| expiry.to_string());
                format!(
                    "{} added timed {}-line for {}, expires on {}: {}",
                    source,
                    scope.tag(),
                    mask,
                    when,
                    reason
                )
            }
        };
        self.gateway.oper_notice(&notice).await;

        let terminated = self.enforcer.apply_line(&line).await;
        Ok(AddOutcome { mask, terminated })
    }

    /// Remove a line by its exact mask.
    pub async fn remove_line(&self, scope: LineScope, mask: &str) -> LineResult<()> {
        if self.store.remove(scope, mask) {
            self.gateway
                .oper_notice(&format!("Removed {}-line on {}", scope.tag(), mask))
                .await;
            info!(scope = scope.tag(), mask = %mask, "line removed");
            Ok(())
        } else {
            Err(AuthLineError::LineNotFound(
                scope.tag(),
                mask.to_string(),
                scope.stats_symbol(),
            ))
        }
    }

    /// Answer a STATS query; `None` when the symbol belongs to another
    /// handler.
    pub fn handle_stats(&self, symbol: char) -> Option<Vec<String>> {
        stats::handle_stats(&self.store, symbol, chrono::Utc::now().timestamp())
    }

    /// Purge all lines of both kinds, then unregister both factories.
    pub fn shutdown(&self) {
        for scope in [LineScope::Local, LineScope::Global] {
            let purged = self.store.purge(scope);
            info!(scope = scope.tag(), purged, "lines purged at shutdown");
        }
        self.store.unregister_factory(LineScope::Local.tag());
        self.store.unregister_factory(LineScope::Global.tag());
    }

    /// Rewrite a connected nick to `*@<resolved IP>`; anything else is
    /// taken as a raw mask.
    fn resolve_target(&self, target: &str) -> String {
        match self.gateway.find_by_nick(target) {
            Some(session) if session.registered => format!("*@{}", session.ip),
            _ => target.to_string(),
        }
    }

    /// Refuse a line that would match every connected session. Exempt
    /// sessions never match and do not count.
    fn reject_if_matches_everyone(&self, line: &AuthLine) -> LineResult<()> {
        let sessions = self.gateway.sessions();
        let eligible: Vec<_> = sessions.iter().filter(|s| !s.exempt).collect();
        if !eligible.is_empty() && eligible.iter().all(|s| line.matches(s)) {
            return Err(AuthLineError::MatchesEveryone(line.mask()));
        }
        Ok(())
    }
}

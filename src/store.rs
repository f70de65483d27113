//! In-memory store for require-auth lines.
//!
//! Keyed storage per scope: add-if-absent, exact-mask removal,
//! first-match lookup, stats enumeration, and lazy expiry. Lines are
//! kept in insertion order, so when several lines of one scope match a
//! session the earliest-added line wins.
//!
//! The store also carries the factory registry: constructors keyed by
//! scope tag, used to rebuild lines from persisted or propagated text.

use crate::error::AuthLineError;
use crate::line::{AuthLine, LineScope};
use crate::session::SessionInfo;
use dashmap::DashMap;
use parking_lot::RwLock;
use tracing::debug;

/// Constructor used to rebuild a line from persisted or propagated text.
///
/// Arguments: set time, duration in seconds, source, reason, raw
/// `ident@host` target.
pub type LineFactory =
    fn(i64, i64, &str, &str, &str) -> Result<AuthLine, AuthLineError>;

/// In-memory line store.
#[derive(Default)]
pub struct LineStore {
    local: RwLock<Vec<AuthLine>>,
    global: RwLock<Vec<AuthLine>>,
    factories: DashMap<&'static str, LineFactory>,
}

impl LineStore {
    /// Create an empty store with no factories registered.
    pub fn new() -> Self {
        Self::default()
    }

    fn shelf(&self, scope: LineScope) -> &RwLock<Vec<AuthLine>> {
        match scope {
            LineScope::Local => &self.local,
            LineScope::Global => &self.global,
        }
    }

    /// Add a line if no line with the same scope and mask exists.
    ///
    /// On a duplicate the stored line is left untouched and the new one
    /// is discarded.
    pub fn add(&self, line: AuthLine) -> Result<(), AuthLineError> {
        let mut shelf = self.shelf(line.scope).write();
        let mask = line.mask();
        if shelf.iter().any(|l| l.matches_text(&mask)) {
            return Err(AuthLineError::DuplicateLine(line.scope.tag(), mask));
        }
        debug!(scope = line.scope.tag(), mask = %mask, "line stored");
        shelf.push(line);
        Ok(())
    }

    /// Remove a line by its exact mask text.
    ///
    /// Exact string equality only; globs in the argument are not
    /// expanded. Returns `false` when no such line exists.
    pub fn remove(&self, scope: LineScope, mask: &str) -> bool {
        let mut shelf = self.shelf(scope).write();
        let before = shelf.len();
        shelf.retain(|l| !l.matches_text(mask));
        let removed = shelf.len() != before;
        if removed {
            debug!(scope = scope.tag(), mask = %mask, "line removed");
        }
        removed
    }

    /// First live line of the scope matching the session, in insertion
    /// order. Expired lines are skipped.
    pub fn find_match(
        &self,
        scope: LineScope,
        session: &SessionInfo,
        now: i64,
    ) -> Option<AuthLine> {
        self.shelf(scope)
            .read()
            .iter()
            .find(|l| !l.is_expired(now) && l.matches(session))
            .cloned()
    }

    /// All live lines of a scope, in insertion order.
    pub fn list(&self, scope: LineScope, now: i64) -> Vec<AuthLine> {
        self.shelf(scope)
            .read()
            .iter()
            .filter(|l| !l.is_expired(now))
            .cloned()
            .collect()
    }

    /// Number of live lines in a scope.
    pub fn count(&self, scope: LineScope, now: i64) -> usize {
        self.shelf(scope)
            .read()
            .iter()
            .filter(|l| !l.is_expired(now))
            .count()
    }

    /// Remove expired lines of a scope and return them so the caller can
    /// report each removal.
    pub fn sweep_expired(&self, scope: LineScope, now: i64) -> Vec<AuthLine> {
        let mut shelf = self.shelf(scope).write();
        let (expired, live): (Vec<_>, Vec<_>) =
            shelf.drain(..).partition(|l| l.is_expired(now));
        *shelf = live;
        expired
    }

    /// Drop every line of a scope. Returns the number dropped.
    pub fn purge(&self, scope: LineScope) -> usize {
        let mut shelf = self.shelf(scope).write();
        let dropped = shelf.len();
        shelf.clear();
        dropped
    }

    /// Register the constructor for a scope tag.
    pub fn register_factory(&self, tag: &'static str, factory: LineFactory) {
        self.factories.insert(tag, factory);
    }

    /// Remove the constructor for a scope tag.
    pub fn unregister_factory(&self, tag: &str) {
        self.factories.remove(tag);
    }

    /// Rebuild a line from persisted or propagated text.
    ///
    /// Returns `None` when no factory is registered for the tag.
    pub fn rebuild(
        &self,
        tag: &str,
        set_at: i64,
        duration: i64,
        source: &str,
        reason: &str,
        target: &str,
    ) -> Option<Result<AuthLine, AuthLineError>> {
        self.factories
            .get(tag)
            .map(|factory| (*factory)(set_at, duration, source, reason, target))
    }
}

//! Shared test harness: a recording session gateway.

use async_trait::async_trait;
use authline::{SessionGateway, SessionInfo};
use parking_lot::Mutex;
use std::sync::Arc;

/// Side effect recorded by the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Notice { uid: String, text: String },
    Terminate { uid: String, reason: String },
    OperNotice { text: String },
}

/// In-memory session directory that records every side effect the
/// engine requests. Terminated sessions drop out of the directory.
#[derive(Default)]
pub struct TestGateway {
    connected: Mutex<Vec<SessionInfo>>,
    events: Mutex<Vec<Event>>,
}

#[allow(dead_code)] // Not every test file uses the whole harness
impl TestGateway {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn connect(&self, session: SessionInfo) {
        self.connected.lock().push(session);
    }

    pub fn connected_uids(&self) -> Vec<String> {
        self.connected.lock().iter().map(|s| s.uid.clone()).collect()
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().clone()
    }

    pub fn terminations(&self) -> Vec<(String, String)> {
        self.events
            .lock()
            .iter()
            .filter_map(|e| match e {
                Event::Terminate { uid, reason } => Some((uid.clone(), reason.clone())),
                _ => None,
            })
            .collect()
    }

    pub fn notices_for(&self, target: &str) -> Vec<String> {
        self.events
            .lock()
            .iter()
            .filter_map(|e| match e {
                Event::Notice { uid, text } if uid == target => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn oper_notices(&self) -> Vec<String> {
        self.events
            .lock()
            .iter()
            .filter_map(|e| match e {
                Event::OperNotice { text } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl SessionGateway for TestGateway {
    fn sessions(&self) -> Vec<SessionInfo> {
        self.connected.lock().clone()
    }

    fn find_by_nick(&self, nick: &str) -> Option<SessionInfo> {
        self.connected.lock().iter().find(|s| s.nick == nick).cloned()
    }

    async fn terminate(&self, uid: &str, reason: &str) {
        self.connected.lock().retain(|s| s.uid != uid);
        self.events.lock().push(Event::Terminate {
            uid: uid.to_string(),
            reason: reason.to_string(),
        });
    }

    async fn notice(&self, uid: &str, text: &str) {
        self.events.lock().push(Event::Notice {
            uid: uid.to_string(),
            text: text.to_string(),
        });
    }

    async fn oper_notice(&self, text: &str) {
        self.events.lock().push(Event::OperNotice {
            text: text.to_string(),
        });
    }
}

/// A registered, unauthenticated, non-exempt session.
#[allow(dead_code)]
pub fn session(uid: &str, nick: &str, ident: &str, host: &str, ip: &str) -> SessionInfo {
    SessionInfo {
        uid: uid.to_string(),
        nick: nick.to_string(),
        ident: ident.to_string(),
        host: host.to_string(),
        ip: ip.to_string(),
        exempt: false,
        authenticated: false,
        registered: true,
    }
}

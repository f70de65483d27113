//! authline - require-auth ban lines for IRC-style servers.
//!
//! Two line kinds gate unauthenticated connections: A-lines apply to
//! the local server only, GA-lines are propagated network-wide. A
//! session whose ident@host matches a line must authenticate (e.g. via
//! SASL) before using the server; matching sessions that have not
//! authenticated are disconnected when they finish registration and
//! whenever a new line is added.
//!
//! The host server injects its side of the contract through
//! [`SessionGateway`]: session snapshots, the termination primitive,
//! and the notice channels. Everything else - matching, scoping,
//! expiry, stats multiplexing, lifecycle - lives here.

pub mod enforce;
pub mod error;
pub mod line;
pub mod matching;
pub mod service;
pub mod session;
pub mod stats;
pub mod store;

pub use enforce::Enforcer;
pub use error::{AuthLineError, LineResult};
pub use line::{AuthLine, LineScope, parse_duration};
pub use service::{AddOutcome, RequireAuthService};
pub use session::{SessionGateway, SessionInfo};
pub use stats::{handle_stats, scope_for_symbol};
pub use store::{LineFactory, LineStore};

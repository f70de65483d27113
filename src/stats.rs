//! STATS multiplexing for require-auth lines.
//!
//! Maps an operator stats query symbol to the scope whose lines it
//! surfaces. The mapping is inverted relative to the scope's own casing:
//! `'A'` lists Global lines and `'a'` Local lines. Existing operator
//! tooling depends on this convention, so it is preserved exactly.

use crate::line::LineScope;
use crate::store::LineStore;

/// Scope surfaced by a STATS symbol, or `None` for symbols that belong
/// to other handlers.
pub fn scope_for_symbol(symbol: char) -> Option<LineScope> {
    match symbol {
        'A' => Some(LineScope::Global),
        'a' => Some(LineScope::Local),
        _ => None,
    }
}

/// Handle a STATS query.
///
/// `None` means the symbol is not ours and other handlers may respond;
/// `Some` fully consumes the query, even when the listing is empty.
/// Rows are `<mask> <set_at> <duration> <source> :<reason>`.
pub fn handle_stats(store: &LineStore, symbol: char, now: i64) -> Option<Vec<String>> {
    let scope = scope_for_symbol(symbol)?;
    Some(
        store
            .list(scope, now)
            .iter()
            .map(|line| {
                format!(
                    "{} {} {} {} :{}",
                    line.mask(),
                    line.set_at,
                    line.duration,
                    line.source,
                    line.reason
                )
            })
            .collect(),
    )
}

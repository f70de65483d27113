//! Mask matching primitives.
//!
//! Ident masks are glob patterns; host masks are glob patterns or CIDR
//! ranges. All text comparisons are ASCII case-insensitive for IRC
//! compatibility.

use ipnet::IpNet;
use regex::Regex;
use std::net::IpAddr;

/// Wildcard matching with `*` and `?` support.
///
/// - `*` matches zero or more characters
/// - `?` matches exactly one character
///
/// Case-insensitive. Compiled to an anchored regex; patterns that fail
/// to compile never match.
pub fn wildcard_match(pattern: &str, text: &str) -> bool {
    let mut translated = String::with_capacity(pattern.len() + 8);
    translated.push_str("(?i)^");
    for c in pattern.chars() {
        match c {
            '*' => translated.push_str(".*"),
            '?' => translated.push('.'),
            c if "+.()[]{}|^$\\".contains(c) => {
                translated.push('\\');
                translated.push(c);
            }
            c => translated.push(c),
        }
    }
    translated.push('$');

    Regex::new(&translated)
        .map(|re| re.is_match(text))
        .unwrap_or(false)
}

/// Parse a CIDR string or bare IP into a network.
///
/// A bare address becomes a /32 (IPv4) or /128 (IPv6) network.
fn parse_ip_or_cidr(pattern: &str) -> Option<IpNet> {
    pattern.parse().ok().or_else(|| {
        // SAFETY: Prefix 32 (IPv4) and 128 (IPv6) are compile-time constants and always valid
        pattern.parse::<IpAddr>().ok().map(|addr| match addr {
            IpAddr::V4(v4) => IpNet::V4(ipnet::Ipv4Net::new(v4, 32).expect("prefix 32 is valid")),
            IpAddr::V6(v6) => IpNet::V6(ipnet::Ipv6Net::new(v6, 128).expect("prefix 128 is valid")),
        })
    })
}

/// CIDR containment check.
///
/// Returns `false` when either side does not parse as an address or
/// network.
pub fn cidr_match(pattern: &str, addr: &str) -> bool {
    let Some(net) = parse_ip_or_cidr(pattern) else {
        return false;
    };
    let Ok(ip) = addr.parse::<IpAddr>() else {
        return false;
    };
    net.contains(&ip)
}

/// Host-part match: glob on the text, or CIDR containment when the
/// candidate is an address.
pub fn host_match(pattern: &str, host_or_ip: &str) -> bool {
    wildcard_match(pattern, host_or_ip) || cidr_match(pattern, host_or_ip)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wildcard_matching() {
        assert!(wildcard_match("*", "anything"));
        assert!(wildcard_match("guest*", "guest42"));
        assert!(wildcard_match("*.example.com", "shell.example.com"));
        assert!(wildcard_match("gue?t", "guest"));
        assert!(!wildcard_match("gue?t", "guests"));
        assert!(!wildcard_match("*.example.com", "example.org"));
    }

    #[test]
    fn test_wildcard_case_insensitive() {
        assert!(wildcard_match("GUEST*", "guest42"));
        assert!(wildcard_match("guest*", "GUEST42"));
    }

    #[test]
    fn test_wildcard_literal_dot_not_wild() {
        // The dot in the pattern must not act as a regex metacharacter
        assert!(!wildcard_match("a.b", "aXb"));
        assert!(wildcard_match("a.b", "a.b"));
    }

    #[test]
    fn test_cidr_matching() {
        assert!(cidr_match("203.0.113.0/24", "203.0.113.5"));
        assert!(!cidr_match("203.0.113.0/24", "203.0.114.5"));
        assert!(cidr_match("203.0.113.5", "203.0.113.5"));
        assert!(cidr_match("2001:db8::/32", "2001:db8::1"));
        assert!(!cidr_match("2001:db8::/32", "2001:db9::1"));
    }

    #[test]
    fn test_cidr_non_address_inputs() {
        assert!(!cidr_match("203.0.113.0/24", "shell.example.com"));
        assert!(!cidr_match("*.example.com", "203.0.113.5"));
        assert!(!cidr_match("203.0.113.0/99", "203.0.113.5"));
    }

    #[test]
    fn test_host_match_glob_or_cidr() {
        assert!(host_match("*.example.com", "shell.example.com"));
        assert!(host_match("203.0.113.0/24", "203.0.113.7"));
        assert!(!host_match("203.0.113.0/24", "shell.example.com"));
    }
}

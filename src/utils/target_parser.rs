//! Target parsing utilities
//!
//! Targets are handed to nmap verbatim; this module only makes sure each one
//! is an address, a CIDR network or a plausible hostname, and that nothing
//! can be mistaken for a scanner flag.

use crate::{ReportError, Result};
use ipnetwork::IpNetwork;
use once_cell::sync::Lazy;
use regex::Regex;
use std::net::IpAddr;
use std::str::FromStr;

// RFC 1123 labels, dot separated, optional trailing dot
static HOSTNAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)*\.?$")
        .expect("hostname pattern is valid")
});

const MAX_HOSTNAME_LEN: usize = 253;

/// Represents a validated target with its type
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedTarget {
    pub original: String,
    pub target_type: TargetType,
}

/// Type of target being scanned
#[derive(Debug, Clone, PartialEq)]
pub enum TargetType {
    Address(IpAddr),
    Network(IpNetwork),
    Hostname,
}

impl ParsedTarget {
    /// Number of addresses the target covers, when that is known up front
    pub fn address_count(&self) -> Option<u128> {
        match &self.target_type {
            TargetType::Address(_) => Some(1),
            TargetType::Network(IpNetwork::V4(net)) => Some(1u128 << (32 - u32::from(net.prefix()))),
            // a /0 network holds 2^128 addresses
            TargetType::Network(IpNetwork::V6(net)) => 1u128.checked_shl(128 - u32::from(net.prefix())),
            TargetType::Hostname => None,
        }
    }
}

/// Parse a target string into a ParsedTarget
pub fn parse_target(target: &str) -> Result<ParsedTarget> {
    if target.trim().is_empty() {
        return Err(ReportError::Config("Target cannot be empty".to_string()));
    }

    if target.trim() != target {
        return Err(ReportError::Config(format!(
            "Target has surrounding whitespace: {:?}",
            target
        )));
    }

    if target.starts_with('-') {
        return Err(ReportError::Config(format!(
            "Target looks like a command-line flag: {}",
            target
        )));
    }

    let target_type = if let Ok(addr) = IpAddr::from_str(target) {
        TargetType::Address(addr)
    } else if target.contains('/') {
        let network = IpNetwork::from_str(target).map_err(|e| {
            ReportError::Config(format!("Invalid CIDR target {}: {}", target, e))
        })?;
        TargetType::Network(network)
    } else if target.len() <= MAX_HOSTNAME_LEN && HOSTNAME_RE.is_match(target) {
        TargetType::Hostname
    } else {
        return Err(ReportError::Config(format!(
            "Invalid target format: {}",
            target
        )));
    };

    Ok(ParsedTarget {
        original: target.to_string(),
        target_type,
    })
}

/// Parse every target, failing on the first invalid one
pub fn parse_targets(targets: &[String]) -> Result<Vec<ParsedTarget>> {
    targets.iter().map(|t| parse_target(t)).collect()
}

/// Total address count, `None` when a hostname is involved or the sum overflows
pub fn total_addresses(targets: &[ParsedTarget]) -> Option<u128> {
    targets
        .iter()
        .try_fold(0u128, |total, t| total.checked_add(t.address_count()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_ipv4() {
        let parsed = parse_target("192.168.1.10").unwrap();
        assert!(matches!(parsed.target_type, TargetType::Address(IpAddr::V4(_))));
        assert_eq!(parsed.address_count(), Some(1));
    }

    #[test]
    fn test_ipv4_cidr() {
        let parsed = parse_target("10.0.0.0/24").unwrap();
        assert!(matches!(parsed.target_type, TargetType::Network(_)));
        assert_eq!(parsed.address_count(), Some(256));
    }

    #[test]
    fn test_ipv6() {
        assert!(parse_target("::1").is_ok());
        let net = parse_target("2001:db8::/120").unwrap();
        assert_eq!(net.address_count(), Some(256));
        assert_eq!(parse_target("::/0").unwrap().address_count(), None);
        assert_eq!(parse_target("0.0.0.0/0").unwrap().address_count(), Some(1 << 32));
    }

    #[test]
    fn test_hostname() {
        let parsed = parse_target("scanme.nmap.org").unwrap();
        assert_eq!(parsed.target_type, TargetType::Hostname);
        assert_eq!(parsed.address_count(), None);
    }

    #[test]
    fn test_rejects_bad_targets() {
        assert!(parse_target("").is_err());
        assert!(parse_target(" 10.0.0.1").is_err());
        assert!(parse_target("-sS").is_err());
        assert!(parse_target("10.0.0.0/33").is_err());
        assert!(parse_target("bad_host!").is_err());
        assert!(parse_target("a;rm -rf").is_err());
    }

    #[test]
    fn test_parse_targets_stops_on_invalid() {
        let targets = vec!["127.0.0.1".to_string(), "-oN".to_string()];
        assert!(parse_targets(&targets).is_err());
    }

    #[test]
    fn test_total_addresses() {
        let targets = vec!["10.0.0.1".to_string(), "10.0.1.0/30".to_string()];
        assert_eq!(total_addresses(&parse_targets(&targets).unwrap()), Some(5));

        let targets = vec!["10.0.0.1".to_string(), "scanme.nmap.org".to_string()];
        assert_eq!(total_addresses(&parse_targets(&targets).unwrap()), None);

        let targets = vec!["::/1".to_string(), "8000::/1".to_string()];
        assert_eq!(total_addresses(&parse_targets(&targets).unwrap()), None);
    }
}

//! Text parsers for CIDR prefixes and dotted-quad addresses.

use std::net::Ipv4Addr;

use thiserror::Error;

use crate::Ipv4Prefix;

/// Errors when parsing prefixes or addresses from text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A character that is neither a digit nor a valid separator.
    #[error("invalid character {0:?}")]
    InvalidCharacter(char),

    /// Wrong number or order of separators, or an empty component.
    #[error("invalid format: {0:?}")]
    InvalidFormat(String),

    /// An octet larger than 255.
    #[error("octet {0} out of range")]
    OctetOverflow(u32),

    /// A prefix length larger than 32.
    #[error("prefix length {0} out of range")]
    PrefixLength(u32),

    /// Rejected by the strict address parser.
    #[error("invalid IPv4 address: {0:?}")]
    InvalidAddress(String),
}

/// Parse a CIDR prefix of the form `a.b.c.d/len`. The returned prefix is masked to its length, so
/// `"1.2.3.4/16"` yields `1.2.0.0/16`.
///
/// ```
/// # use ipv4_patricia::{parse_cidr, ParseError};
/// let p = parse_cidr("1.1.2.2/30").unwrap();
/// assert_eq!(p.addr(), 0x0101_0200);
/// assert_eq!(p.prefix_len(), 30);
/// assert_eq!(parse_cidr("1.1.2.2/33"), Err(ParseError::PrefixLength(33)));
/// ```
pub fn parse_cidr(s: &str) -> Result<Ipv4Prefix, ParseError> {
    let (addr, len) = s
        .split_once('/')
        .ok_or_else(|| ParseError::InvalidFormat(s.to_string()))?;
    let addr = parse_dotted(addr, s)?;
    let len = parse_decimal(len, s)?;
    if len > 32 {
        return Err(ParseError::PrefixLength(len));
    }
    Ok(Ipv4Prefix::new(addr, len as u8))
}

/// Parse a dotted-quad address leniently.
///
/// Returns `0` for a bracketed IPv6 literal, i.e. when a `[` shows up before the end of the dotted
/// part. Parsing stops at the first other character that is neither a digit nor a dot, so
/// `"1.2.3.4:80"` yields `1.2.3.4`. Octets wrap modulo 256 and no validation is performed; use
/// [`parse_ipv4_strict`] for untrusted input.
///
/// ```
/// # use ipv4_patricia::parse_ipv4;
/// assert_eq!(parse_ipv4("1.2.3.4"), 0x0102_0304);
/// assert_eq!(parse_ipv4("10.0.0.1:8080"), 0x0a00_0001);
/// assert_eq!(parse_ipv4("[::1]:53"), 0);
/// ```
pub fn parse_ipv4(s: &str) -> u32 {
    let mut addr: u32 = 0;
    let mut octet: u8 = 0;
    for c in s.bytes() {
        match c {
            b'0'..=b'9' => octet = octet.wrapping_mul(10).wrapping_add(c - b'0'),
            b'.' => {
                addr = (addr << 8) | octet as u32;
                octet = 0;
            }
            b'[' => return 0,
            _ => break,
        }
    }
    (addr << 8) | octet as u32
}

/// Parse a dotted-quad address, rejecting anything that is not exactly an IPv4 address.
pub fn parse_ipv4_strict(s: &str) -> Result<u32, ParseError> {
    s.parse::<Ipv4Addr>()
        .map(u32::from)
        .map_err(|_| ParseError::InvalidAddress(s.to_string()))
}

fn parse_dotted(s: &str, input: &str) -> Result<u32, ParseError> {
    let mut addr: u32 = 0;
    let mut octets = 0;
    for part in s.split('.') {
        octets += 1;
        if octets > 4 {
            return Err(ParseError::InvalidFormat(input.to_string()));
        }
        let octet = parse_decimal(part, input)?;
        if octet > 255 {
            return Err(ParseError::OctetOverflow(octet));
        }
        addr = (addr << 8) | octet;
    }
    if octets != 4 {
        return Err(ParseError::InvalidFormat(input.to_string()));
    }
    Ok(addr)
}

fn parse_decimal(s: &str, input: &str) -> Result<u32, ParseError> {
    if s.is_empty() {
        return Err(ParseError::InvalidFormat(input.to_string()));
    }
    s.chars().try_fold(0u32, |acc, c| {
        let digit = c.to_digit(10).ok_or(ParseError::InvalidCharacter(c))?;
        Ok(acc.saturating_mul(10).saturating_add(digit))
    })
}

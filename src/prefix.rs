//! Description of the IPv4 prefix type `Ipv4Prefix`.

use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

#[cfg(feature = "ipnet")]
use ipnet::Ipv4Net;
#[cfg(feature = "ipnetwork")]
use ipnetwork::Ipv4Network;
use num_traits::{PrimInt, Zero};

use crate::parse::{parse_cidr, ParseError};

/// An IPv4 network prefix: a network address together with a prefix length in `0..=32`.
///
/// The address is always stored masked to the prefix length, so two prefixes describing the same
/// address range compare equal no matter which host address they were created from.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Ipv4Prefix {
    addr: u32,
    len: u8,
}

impl Ipv4Prefix {
    /// Create a new prefix, masking `addr` to `len` bits.
    ///
    /// # Panics
    ///
    /// Panics if `len` is larger than 32.
    ///
    /// ```
    /// # use ipv4_patricia::Ipv4Prefix;
    /// let p = Ipv4Prefix::new(0x0a01_0203, 16);
    /// assert_eq!(p.addr(), 0x0a01_0000);
    /// assert_eq!(p.to_string(), "10.1.0.0/16");
    /// ```
    pub fn new(addr: u32, len: u8) -> Self {
        assert!(len <= 32, "IPv4 prefix length must be at most 32, got {len}");
        Self {
            addr: addr & mask_from_prefix_len::<u32>(len),
            len,
        }
    }

    /// Create a prefix that matches everything (`0.0.0.0/0`).
    pub fn zero() -> Self {
        Self::default()
    }

    /// The network address, with all bits beyond the prefix length cleared.
    pub fn addr(&self) -> u32 {
        self.addr
    }

    /// The network address as [`Ipv4Addr`].
    pub fn network(&self) -> Ipv4Addr {
        self.addr.into()
    }

    /// Prefix length
    pub fn prefix_len(&self) -> u8 {
        self.len
    }

    /// The netmask as an integer (e.g., `0xffffff00` for a `/24`).
    pub fn mask(&self) -> u32 {
        mask_from_prefix_len(self.len)
    }

    /// Check if `addr` lies within the address range of `self`.
    pub fn contains_addr(&self, addr: u32) -> bool {
        addr & self.mask() == self.addr
    }

    /// Check if `self` contains `other` in its prefix range. This function also returns `true` if
    /// `self` is identical to `other`.
    pub fn contains(&self, other: &Self) -> bool {
        self.len <= other.len && self.contains_addr(other.addr)
    }

    /// Check if a specific bit of the network address is set (counted from the left, where 0 is the
    /// first bit from the left). Bits at position 32 or beyond are never set.
    pub fn is_bit_set(&self, bit: u8) -> bool {
        is_bit_set(self.addr, bit)
    }

    /// Longest common prefix of `self` and `other`.
    ///
    /// ```
    /// # use ipv4_patricia::Ipv4Prefix;
    /// let a: Ipv4Prefix = "1.2.3.0/24".parse().unwrap();
    /// let b: Ipv4Prefix = "1.3.3.0/24".parse().unwrap();
    /// assert_eq!(a.longest_common_prefix(&b).to_string(), "1.2.0.0/15");
    /// ```
    pub fn longest_common_prefix(&self, other: &Self) -> Self {
        let len = common_prefix_len(self.addr, other.addr)
            .min(self.len)
            .min(other.len);
        Self::new(self.addr, len)
    }
}

/// Netmask with the `len` most significant bits set. `len = 0` yields zero and `len` equal to the
/// bit width of `R` yields all ones.
pub(crate) fn mask_from_prefix_len<R>(len: u8) -> R
where
    R: PrimInt + Zero,
{
    if len as u32 >= R::zero().count_zeros() {
        !R::zero()
    } else if len == 0 {
        R::zero()
    } else {
        !((!R::zero()) >> len as usize)
    }
}

/// Number of leading bits in which `a` and `b` agree.
#[inline(always)]
pub(crate) fn common_prefix_len(a: u32, b: u32) -> u8 {
    (a ^ b).leading_zeros() as u8
}

/// Check if bit `pos` of `addr` is set, counting from the most significant bit.
#[inline(always)]
pub(crate) fn is_bit_set(addr: u32, pos: u8) -> bool {
    0x8000_0000u32
        .checked_shr(pos as u32)
        .map_or(false, |bit| addr & bit != 0)
}

impl fmt::Display for Ipv4Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.network(), self.len)
    }
}

impl fmt::Debug for Ipv4Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl FromStr for Ipv4Prefix {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_cidr(s)
    }
}

impl From<Ipv4Addr> for Ipv4Prefix {
    fn from(addr: Ipv4Addr) -> Self {
        Self::new(addr.into(), 32)
    }
}

#[cfg(feature = "ipnet")]
impl From<Ipv4Net> for Ipv4Prefix {
    fn from(net: Ipv4Net) -> Self {
        Self::new(net.network().into(), net.prefix_len())
    }
}

#[cfg(feature = "ipnet")]
impl From<Ipv4Prefix> for Ipv4Net {
    fn from(prefix: Ipv4Prefix) -> Self {
        Ipv4Net::new(prefix.network(), prefix.len).unwrap()
    }
}

#[cfg(feature = "ipnetwork")]
impl From<Ipv4Network> for Ipv4Prefix {
    fn from(net: Ipv4Network) -> Self {
        Self::new(net.network().into(), net.prefix())
    }
}

#[cfg(feature = "ipnetwork")]
impl From<Ipv4Prefix> for Ipv4Network {
    fn from(prefix: Ipv4Prefix) -> Self {
        Ipv4Network::new(prefix.network(), prefix.len).unwrap()
    }
}

#[cfg(feature = "cidr")]
impl From<cidr::Ipv4Cidr> for Ipv4Prefix {
    fn from(net: cidr::Ipv4Cidr) -> Self {
        Self::new(net.first_address().into(), net.network_length())
    }
}

#[cfg(feature = "cidr")]
impl From<Ipv4Prefix> for cidr::Ipv4Cidr {
    fn from(prefix: Ipv4Prefix) -> Self {
        cidr::Ipv4Cidr::new(prefix.network(), prefix.len).unwrap()
    }
}

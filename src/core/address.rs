use crate::core::errors::AddressError;
use lazy_static::lazy_static;
use regex::Regex;
use std::cmp::Ordering;
use std::fmt;
use std::net::Ipv6Addr;
use std::str::FromStr;

/*-------------------------------------------------------------------------------------------------
  IPv6 Address
-------------------------------------------------------------------------------------------------*/

/// Number of bytes in a canonical IPv6 address.
pub const IPV6_BYTES: usize = 16;

/// Number of octets in an embedded IPv4 suffix.
pub const IPV4_OCTETS: usize = 4;

const IPV4_OFFSET: usize = IPV6_BYTES - IPV4_OCTETS;
const MAX_HEX_DIGITS: usize = 4;

lazy_static! {
    // A dotted-decimal group preceded by `:` and anchored at the end of the address.
    static ref IPV4_SUFFIX_ANYWHERE: Regex = Regex::new(r":((?:\d{1,3}\.)+\d{1,3})$").unwrap();

    // A dotted-decimal group following a literal IPv4-mapped `::ffff:` prefix.
    static ref IPV4_SUFFIX_MAPPED: Regex =
        Regex::new(r"(?i)^::ffff:((?:\d{1,3}\.)+\d{1,3})$").unwrap();
}

/// Canonical 16-byte, network-order IPv6 address.
///
/// Addresses are ordered by unsigned lexicographic comparison of their bytes, which is the order
/// GeoIP network-block tables are sorted in.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Ipv6Address([u8; IPV6_BYTES]);

/*--------------------------------------------------------------------------------------
  Suffix Policy
--------------------------------------------------------------------------------------*/

/// Where an embedded IPv4 dotted-decimal suffix may appear in a textual address.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum SuffixPolicy {
    /// After any `:` or `::`, e.g. `::1.2.3.4`, `64:ff9b::1.2.3.4` or `::ffff:1.2.3.4`.
    #[default]
    Anywhere,

    /// Only after a literal IPv4-mapped prefix, i.e. `::ffff:1.2.3.4`.
    MappedOnly,
}

impl SuffixPolicy {
    /// Split `text` into the hex-group part and the dotted-decimal suffix, when present.
    fn split_suffix(self, text: &str) -> Option<(&str, &str)> {
        let regex: &Regex = match self {
            SuffixPolicy::Anywhere => &IPV4_SUFFIX_ANYWHERE,
            SuffixPolicy::MappedOnly => &IPV4_SUFFIX_MAPPED,
        };
        let suffix = regex.captures(text)?.get(1)?;

        // Drop the colon separating the groups from the suffix, unless it is half of a `::`.
        let mut groups = &text[..suffix.start() - 1];
        if groups.ends_with(':') && !groups.ends_with("::") {
            groups = &text[..suffix.start()];
        }

        Some((groups, suffix.as_str()))
    }
}

impl FromStr for SuffixPolicy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "anywhere" => Ok(SuffixPolicy::Anywhere),
            "mapped" | "mapped-only" => Ok(SuffixPolicy::MappedOnly),
            _ => Err(format!(
                "invalid IPv4 suffix policy {value:?}; expected `anywhere` or `mapped`"
            )),
        }
    }
}

impl fmt::Display for SuffixPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SuffixPolicy::Anywhere => write!(f, "anywhere"),
            SuffixPolicy::MappedOnly => write!(f, "mapped"),
        }
    }
}

/*--------------------------------------------------------------------------------------
  IPv6 Address Implementation
--------------------------------------------------------------------------------------*/

impl Ipv6Address {
    /// Parse a textual IPv6 address, accepting an embedded IPv4 suffix anywhere it may appear.
    ///
    /// ```
    /// use geoipblocks::Ipv6Address;
    ///
    /// let address = Ipv6Address::parse("::ffff:1.2.3.4")?;
    /// assert_eq!(address.octets(), &[0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0xFF, 0xFF, 1, 2, 3, 4]);
    /// # Ok::<(), geoipblocks::AddressError>(())
    /// ```
    pub fn parse(text: &str) -> Result<Self, AddressError> {
        Self::parse_with(text, SuffixPolicy::default())
    }

    /// Parse a textual IPv6 address using the provided embedded-IPv4 [SuffixPolicy].
    pub fn parse_with(text: &str, policy: SuffixPolicy) -> Result<Self, AddressError> {
        let mut bytes = [0u8; IPV6_BYTES];

        let (groups, end) = match policy.split_suffix(text) {
            Some((groups, suffix)) => {
                bytes[IPV4_OFFSET..].copy_from_slice(&parse_ipv4_suffix(text, suffix)?);
                (groups, IPV4_OFFSET)
            }
            None => (text, IPV6_BYTES),
        };
        let suffix_len = IPV6_BYTES - end;

        match groups.split("::").collect::<Vec<&str>>().as_slice() {
            [whole] => {
                let whole = parse_hex_groups(text, whole)?;
                let total = whole.len() + suffix_len;
                match whole.len().cmp(&end) {
                    Ordering::Greater => {
                        return Err(AddressError::TooManyBytes {
                            address: text.to_string(),
                            bytes: total,
                        })
                    }
                    Ordering::Less => {
                        return Err(AddressError::Incomplete {
                            address: text.to_string(),
                            bytes: total,
                        })
                    }
                    Ordering::Equal => bytes[..end].copy_from_slice(&whole),
                }
            }
            [left, right] => {
                let left = parse_hex_groups(text, left)?;
                let right = parse_hex_groups(text, right)?;
                if left.len() + right.len() > end {
                    return Err(AddressError::TooManyBytes {
                        address: text.to_string(),
                        bytes: left.len() + right.len() + suffix_len,
                    });
                }
                bytes[..left.len()].copy_from_slice(&left);
                bytes[end - right.len()..end].copy_from_slice(&right);
            }
            _ => {
                return Err(AddressError::MultipleCompressionMarkers {
                    address: text.to_string(),
                })
            }
        }

        Ok(Self(bytes))
    }

    /// The 16 network-order bytes of the address.
    pub fn octets(&self) -> &[u8; IPV6_BYTES] {
        &self.0
    }

    /// Exact 16-byte equality; an absent address is never equal to anything.
    pub fn equal(&self, other: Option<&Ipv6Address>) -> bool {
        other.is_some_and(|other| self.0 == other.0)
    }

    /// Unsigned lexicographic byte-wise comparison.
    pub fn compare(&self, other: &Ipv6Address) -> Ordering {
        self.0.cmp(&other.0)
    }
}

/*--------------------------------------------------------------------------------------
  Conversions
--------------------------------------------------------------------------------------*/

impl FromStr for Ipv6Address {
    type Err = AddressError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Self::parse(text)
    }
}

impl From<[u8; IPV6_BYTES]> for Ipv6Address {
    fn from(bytes: [u8; IPV6_BYTES]) -> Self {
        Self(bytes)
    }
}

impl From<Ipv6Addr> for Ipv6Address {
    fn from(address: Ipv6Addr) -> Self {
        Self(address.octets())
    }
}

impl From<Ipv6Address> for Ipv6Addr {
    fn from(address: Ipv6Address) -> Self {
        Ipv6Addr::from(address.0)
    }
}

impl AsRef<[u8]> for Ipv6Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Ipv6Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&Ipv6Addr::from(self.0), f)
    }
}

/*-------------------------------------------------------------------------------------------------
  Helper Functions
-------------------------------------------------------------------------------------------------*/

/// Parse the four dotted-decimal octets of an embedded IPv4 suffix.
fn parse_ipv4_suffix(address: &str, suffix: &str) -> Result<[u8; IPV4_OCTETS], AddressError> {
    let parts: Vec<&str> = suffix.split('.').collect();
    if parts.len() != IPV4_OCTETS {
        return Err(AddressError::Ipv4OctetCount {
            address: address.to_string(),
            count: parts.len(),
        });
    }

    let mut octets = [0u8; IPV4_OCTETS];
    for (octet, part) in octets.iter_mut().zip(parts) {
        if part.is_empty() || !part.bytes().all(|byte| byte.is_ascii_digit()) {
            return Err(AddressError::InvalidOctet {
                address: address.to_string(),
                octet: part.to_string(),
            });
        }
        *octet = part.parse().map_err(|_| AddressError::OctetOutOfRange {
            address: address.to_string(),
            octet: part.to_string(),
        })?;
    }

    Ok(octets)
}

/// Parse colon-separated 16-bit hex groups into big-endian bytes. An empty side yields no bytes.
fn parse_hex_groups(address: &str, side: &str) -> Result<Vec<u8>, AddressError> {
    if side.is_empty() {
        return Ok(Vec::new());
    }

    let mut bytes = Vec::with_capacity(IPV6_BYTES);
    for group in side.split(':') {
        bytes.extend_from_slice(&parse_hex_group(address, group)?.to_be_bytes());
    }

    Ok(bytes)
}

fn parse_hex_group(address: &str, group: &str) -> Result<u16, AddressError> {
    let invalid = || AddressError::InvalidHexGroup {
        address: address.to_string(),
        group: group.to_string(),
    };

    if group.is_empty()
        || group.len() > MAX_HEX_DIGITS
        || !group.bytes().all(|byte| byte.is_ascii_hexdigit())
    {
        return Err(invalid());
    }

    u16::from_str_radix(group, 16).map_err(|_| invalid())
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/

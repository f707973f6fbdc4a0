use crate::core::address::{Ipv6Address, SuffixPolicy, IPV6_BYTES};
use crate::core::errors::RecordError;
use crate::core::schema;
use ipnetwork::Ipv6Network;
use std::fmt;
use std::net::Ipv6Addr;

/*-------------------------------------------------------------------------------------------------
  Network Record
-------------------------------------------------------------------------------------------------*/

const BITS_PER_BYTE: u8 = 8;

/// Longest allowed network mask length.
pub const MAX_PREFIX_LEN: u8 = (IPV6_BYTES as u8) * BITS_PER_BYTE;

/// One network block: a start address, a prefix (mask) length and a GeoNames location id.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct NetworkRecord {
    network: Ipv6Address,
    prefix_len: u8,
    geoname_id: u64,
}

/*--------------------------------------------------------------------------------------
  Row Outcome
--------------------------------------------------------------------------------------*/

/// Why a well-formed data row is left out of the table.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ExclusionReason {
    AnonymousProxy,
    SatelliteProvider,
}

impl fmt::Display for ExclusionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExclusionReason::AnonymousProxy => write!(f, "anonymous proxy"),
            ExclusionReason::SatelliteProvider => write!(f, "satellite provider"),
        }
    }
}

/// Successful outcome of parsing one data row.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RowOutcome {
    /// The row describes a record to add to the table.
    Accepted(NetworkRecord),

    /// The row is flagged and must be skipped; this is not an error.
    Excluded(ExclusionReason),
}

/*--------------------------------------------------------------------------------------
  Network Record Implementation
--------------------------------------------------------------------------------------*/

impl NetworkRecord {
    /// Create a record, rejecting prefix lengths longer than 128 bits.
    pub fn new(network: Ipv6Address, prefix_len: u8, geoname_id: u64) -> Result<Self, RecordError> {
        if prefix_len > MAX_PREFIX_LEN {
            return Err(RecordError::PrefixRange {
                value: prefix_len.to_string(),
            });
        }

        Ok(Self {
            network,
            prefix_len,
            geoname_id,
        })
    }

    /// Parse one data row using the default [SuffixPolicy].
    pub fn parse_row<S: AsRef<str>>(row: &[S]) -> Result<RowOutcome, RecordError> {
        Self::parse_row_with(row, SuffixPolicy::default())
    }

    /// Parse one data row of the fixed ten-column schema.
    ///
    /// Rows flagged as anonymous proxies or satellite providers are
    /// [excluded](RowOutcome::Excluded) before their fields are validated.
    pub fn parse_row_with<S: AsRef<str>>(
        row: &[S],
        policy: SuffixPolicy,
    ) -> Result<RowOutcome, RecordError> {
        if row.len() != schema::COLUMN_COUNT {
            return Err(RecordError::ColumnCount {
                expected: schema::COLUMN_COUNT,
                found: row.len(),
            });
        }

        if cell(row, schema::IS_ANONYMOUS_PROXY_INDEX) == schema::FLAG_SET {
            return Ok(RowOutcome::Excluded(ExclusionReason::AnonymousProxy));
        }
        if cell(row, schema::IS_SATELLITE_PROVIDER_INDEX) == schema::FLAG_SET {
            return Ok(RowOutcome::Excluded(ExclusionReason::SatelliteProvider));
        }

        let network = Ipv6Address::parse_with(cell(row, schema::NETWORK_START_IP_INDEX), policy)?;

        let mask_length = cell(row, schema::NETWORK_MASK_LENGTH_INDEX);
        let prefix_len = parse_decimal::<u8>(mask_length)
            .filter(|prefix_len| *prefix_len <= MAX_PREFIX_LEN)
            .ok_or_else(|| RecordError::PrefixRange {
                value: mask_length.to_string(),
            })?;

        let geoname_id = cell(row, schema::GEONAME_ID_INDEX);
        let geoname_id =
            parse_decimal::<u64>(geoname_id).ok_or_else(|| RecordError::LocationIdRange {
                value: geoname_id.to_string(),
            })?;

        Ok(RowOutcome::Accepted(Self {
            network,
            prefix_len,
            geoname_id,
        }))
    }

    /*-------------------------------------------------------------------------
      Getters
    -------------------------------------------------------------------------*/

    /// Start address of the network.
    pub fn network(&self) -> &Ipv6Address {
        &self.network
    }

    /// Network mask length in bits (`0..=128`).
    pub fn prefix_len(&self) -> u8 {
        self.prefix_len
    }

    /// GeoNames location identifier.
    pub fn geoname_id(&self) -> u64 {
        self.geoname_id
    }

    /// The network as an [Ipv6Network] CIDR, e.g. `::ffff:100:4000/114`.
    pub fn cidr(&self) -> Ipv6Network {
        let ip = Ipv6Addr::from(self.network);
        // prefix_len <= 128 holds for every constructed record
        Ipv6Network::new(ip, self.prefix_len).unwrap_or_else(|_| Ipv6Network::from(ip))
    }

    /*-------------------------------------------------------------------------
      Containment
    -------------------------------------------------------------------------*/

    /// Check whether the leading `prefix_len` bits of `address` equal those of the network.
    pub fn match_ip_address(&self, address: &Ipv6Address) -> bool {
        let full_bytes = (self.prefix_len / BITS_PER_BYTE) as usize;
        let network = self.network.octets();
        let address = address.octets();

        if network[..full_bytes] != address[..full_bytes] {
            return false;
        }

        let rem_bits = self.prefix_len % BITS_PER_BYTE;
        if rem_bits == 0 {
            return true;
        }

        let bit_mask: u8 = 0xFF << (BITS_PER_BYTE - rem_bits);
        (network[full_bytes] & bit_mask) == (address[full_bytes] & bit_mask)
    }
}

impl fmt::Display for NetworkRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} {}", self.network, self.prefix_len, self.geoname_id)
    }
}

/*-------------------------------------------------------------------------------------------------
  Helper Functions
-------------------------------------------------------------------------------------------------*/

fn cell<S: AsRef<str>>(row: &[S], index: usize) -> &str {
    row[index].as_ref()
}

/// Parse an unsigned decimal integer made of ASCII digits only.
fn parse_decimal<T: std::str::FromStr>(value: &str) -> Option<T> {
    if value.is_empty() || !value.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    value.parse().ok()
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/

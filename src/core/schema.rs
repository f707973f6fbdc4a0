/*-------------------------------------------------------------------------------------------------
  Network Blocks Schema
-------------------------------------------------------------------------------------------------*/

/// Column names of a GeoIP network-blocks table, in their fixed order.
pub const HEADER: [&str; COLUMN_COUNT] = [
    "network_start_ip",
    "network_mask_length",
    "geoname_id",
    "registered_country_geoname_id",
    "represented_country_geoname_id",
    "postal_code",
    "latitude",
    "longitude",
    "is_anonymous_proxy",
    "is_satellite_provider",
];

pub const COLUMN_COUNT: usize = 10;

pub const NETWORK_START_IP_INDEX: usize = 0;
pub const NETWORK_MASK_LENGTH_INDEX: usize = 1;
pub const GEONAME_ID_INDEX: usize = 2;
pub const IS_ANONYMOUS_PROXY_INDEX: usize = 8;
pub const IS_SATELLITE_PROVIDER_INDEX: usize = 9;

/// Value of a flag column marking the row as set.
pub const FLAG_SET: &str = "1";

/// Check that `header` names exactly the schema columns, in order.
pub fn is_valid_header<S: AsRef<str>>(header: &[S]) -> bool {
    header.len() == HEADER.len()
        && header
            .iter()
            .zip(HEADER)
            .all(|(found, expected)| found.as_ref() == expected)
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/

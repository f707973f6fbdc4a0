/*-------------------------------------------------------------------------------------------------
  Errors and Results
-------------------------------------------------------------------------------------------------*/

/*--------------------------------------------------------------------------------------
  Address Errors
--------------------------------------------------------------------------------------*/

/// Errors raised while parsing the textual form of an IPv6 address.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum AddressError {
    /// The address contains more than one `::` zero-compression marker.
    #[error("address {address:?} contains more than one '::' marker")]
    MultipleCompressionMarkers { address: String },

    /// A colon-separated group is empty, longer than four digits, or not hexadecimal.
    #[error("address {address:?} contains an invalid hex group {group:?}")]
    InvalidHexGroup { address: String, group: String },

    /// An embedded IPv4 octet is not a decimal number.
    #[error("address {address:?} contains an invalid IPv4 octet {octet:?}")]
    InvalidOctet { address: String, octet: String },

    /// An embedded IPv4 octet is greater than 255.
    #[error("address {address:?} contains an IPv4 octet out of range {octet:?}")]
    OctetOutOfRange { address: String, octet: String },

    /// The embedded IPv4 suffix does not have exactly four octets.
    #[error("address {address:?} has an IPv4 suffix with {count} octets; expected 4")]
    Ipv4OctetCount { address: String, count: usize },

    /// The groups (and suffix) describe more than 16 bytes.
    #[error("address {address:?} describes {bytes} bytes; at most 16 are allowed")]
    TooManyBytes { address: String, bytes: usize },

    /// Without a `::` marker the groups (and suffix) must describe exactly 16 bytes.
    #[error("address {address:?} describes {bytes} bytes; expected 16")]
    Incomplete { address: String, bytes: usize },
}

/*--------------------------------------------------------------------------------------
  Record Errors
--------------------------------------------------------------------------------------*/

/// Errors raised while parsing one data row into a network record.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum RecordError {
    #[error("row has {found} columns; expected {expected}")]
    ColumnCount { expected: usize, found: usize },

    #[error("invalid network start address: {0}")]
    Address(#[from] AddressError),

    /// The prefix length is not an integer in `0..=128`.
    #[error("invalid network mask length {value:?}; expected an integer between 0 and 128")]
    PrefixRange { value: String },

    /// The location identifier is not an unsigned 64-bit integer.
    #[error("invalid geoname id {value:?}; expected an unsigned 64-bit integer")]
    LocationIdRange { value: String },
}

/*--------------------------------------------------------------------------------------
  Load Errors
--------------------------------------------------------------------------------------*/

/// Fatal errors raised while loading a table. A load that fails never returns a partial table.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The header row does not match the fixed column schema.
    #[error("database has an invalid header: {found:?}")]
    Schema { found: Vec<String> },

    /// The row source reported a read failure.
    #[error("failed to read database rows: {0}")]
    SourceRead(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),

    /// A data row could not be parsed. `row` is the 1-based index among the data rows that
    /// were not excluded.
    #[error("row #{row} {content:?} parsed with error: {source}")]
    RowMalformed {
        row: usize,
        content: Vec<String>,
        #[source]
        source: RecordError,
    },
}

/*--------------------------------------------------------------------------------------
  Crate Error
--------------------------------------------------------------------------------------*/

/// Error type used throughout the crate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Address(#[from] AddressError),

    #[error(transparent)]
    Record(#[from] RecordError),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/*--------------------------------------------------------------------------------------
  Log Error Function
--------------------------------------------------------------------------------------*/

#[cfg(test)]
pub(crate) fn log_error<E: std::fmt::Display>(error: &E) {
    log::error!("{}", error);
}

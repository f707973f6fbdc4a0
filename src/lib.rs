//! Resolve IP addresses to [GeoNames](https://www.geonames.org) location identifiers using
//! GeoIP network-block CSV tables (e.g. `GeoLite2-City-Blocks-IPv6.csv`).
//!
//! The table is loaded once into an immutable, sorted [Database]; lookups binary-search it
//! for the [NetworkRecord] whose network prefix contains the query address.
//!
//! ```no_run
//! // Load the network blocks from the configured CSV file
//! let database = geoipblocks::load_database()?;
//!
//! // Resolve an address to its GeoNames id
//! match database.lookup("::ffff:81.2.69.160")? {
//!     Some(geoname_id) => println!("geoname_id: {geoname_id}"),
//!     None => println!("not found"),
//! }
//! # Ok::<(), geoipblocks::Error>(())
//! ```

/*-------------------------------------------------------------------------------------------------
  Library Modules
-------------------------------------------------------------------------------------------------*/

mod core;

/*-------------------------------------------------------------------------------------------------
  Library Interface
-------------------------------------------------------------------------------------------------*/

pub use crate::core::address::{Ipv6Address, SuffixPolicy, IPV4_OCTETS, IPV6_BYTES};
pub use crate::core::database::Database;
pub use crate::core::errors::{AddressError, Error, LoadError, RecordError, Result};
pub use crate::core::loader::{load_database, Loader, LoaderBuilder};
pub use crate::core::record::{ExclusionReason, NetworkRecord, RowOutcome, MAX_PREFIX_LEN};
pub use crate::core::schema;
pub use crate::core::search_results::SearchResults;

/*--------------------------------------------------------------------------------------
  Re-exported Crates
--------------------------------------------------------------------------------------*/

pub use ipnetwork;

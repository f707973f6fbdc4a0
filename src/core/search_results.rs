use crate::core::address::Ipv6Address;
use crate::core::record::NetworkRecord;
use std::collections::{BTreeMap, BTreeSet};

/*-------------------------------------------------------------------------------------------------
  Search Results
-------------------------------------------------------------------------------------------------*/

/// Search results containing a map of found addresses to the [NetworkRecord] that contains
/// them, and the set of addresses not found in the table.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SearchResults {
    /// Map of found [Ipv6Address] queries to the records that contain them.
    pub matches: BTreeMap<Ipv6Address, NetworkRecord>,

    /// Set of [Ipv6Address] queries not contained in any record.
    pub not_found: BTreeSet<Ipv6Address>,
}

impl SearchResults {
    /// Distinct GeoNames location ids of the matched records.
    pub fn geoname_ids(&self) -> BTreeSet<u64> {
        self.matches
            .values()
            .map(|record| record.geoname_id())
            .collect()
    }

    /// The record matched for a query address; `None` for addresses that were not found or
    /// that could not be parsed.
    pub fn lookup(&self, address: Option<&Ipv6Address>) -> Option<&NetworkRecord> {
        address.and_then(|address| self.matches.get(address))
    }
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/

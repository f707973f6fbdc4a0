use geoipblocks::{Database, SearchResults};
use log::{info, warn};

/*-------------------------------------------------------------------------------------------------
  Logging Functions
-------------------------------------------------------------------------------------------------*/

/*--------------------------------------------------------------------------------------
  Search Results
--------------------------------------------------------------------------------------*/

pub fn search_results(requested: usize, parsed: usize, search_results: &SearchResults) {
    info!("Searched for {parsed} address(es) in the network blocks");

    let count_invalid = requested - parsed;
    if count_invalid > 0 {
        warn!("{count_invalid} invalid address(es) reported as not found");
    };

    let count_found = search_results.matches.len();
    let count_geoname_ids = search_results.geoname_ids().len();
    if count_found > 0 {
        info!("Found {count_found} address(es) in {count_geoname_ids} GeoNames location(s)");
    };

    let count_not_found = search_results.not_found.len();
    if count_not_found > 0 {
        warn!("Did not find {count_not_found} address(es)");
    };
}

/*--------------------------------------------------------------------------------------
  Database
--------------------------------------------------------------------------------------*/

pub fn database(database: &Database) {
    if !database.is_sorted() {
        warn!("Network blocks are not sorted by start address; lookups may miss records");
    }
}

use geoipblocks::{Ipv6Address, Result, SearchResults};
use serde::Serialize;
use std::path::Path;

/*-------------------------------------------------------------------------------------------------
  Save Search Results to CSV File
-------------------------------------------------------------------------------------------------*/

#[derive(Serialize)]
struct ResultRow<'a> {
    address: &'a str,
    network: Option<String>,
    geoname_id: Option<u64>,
}

pub fn save(
    queries: &[(String, Option<Ipv6Address>)],
    search_results: &SearchResults,
    path: &Path,
) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;

    // Header is written from the ResultRow field names
    for (text, address) in queries {
        let record = search_results.lookup(address.as_ref());
        writer.serialize(ResultRow {
            address: text,
            network: record.map(|record| record.cidr().to_string()),
            geoname_id: record.map(|record| record.geoname_id()),
        })?;
    }

    writer.flush()?;

    Ok(())
}

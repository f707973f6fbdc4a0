use crate::core::address::{Ipv6Address, SuffixPolicy};
use crate::core::errors::{AddressError, LoadError};
use crate::core::record::{NetworkRecord, RowOutcome};
use crate::core::schema;
use crate::core::search_results::SearchResults;
use log::{debug, info, trace, warn};
use std::cmp::Ordering;
use std::io;

/*-------------------------------------------------------------------------------------------------
  Database
-------------------------------------------------------------------------------------------------*/

/// Immutable table of [NetworkRecord]s, in the order they were loaded, providing
/// [Database::find] and [Database::search] lookups.
///
/// Lookups binary-search the table and rely on the records being sorted by network start
/// address without nested networks, which is how GeoIP network-block files are published.
/// The order is not verified on load; see [Database::is_sorted].
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Database {
    records: Vec<NetworkRecord>,
    policy: SuffixPolicy,
}

/*--------------------------------------------------------------------------------------
  Database Implementation
--------------------------------------------------------------------------------------*/

impl Database {
    /*-------------------------------------------------------------------------
      Load
    -------------------------------------------------------------------------*/

    /// Load a table from a header row and a sequence of data rows using the default
    /// [SuffixPolicy].
    pub fn load<H, I, S, E>(header: &[H], rows: I) -> Result<Self, LoadError>
    where
        H: AsRef<str>,
        I: IntoIterator<Item = Result<Vec<S>, E>>,
        S: AsRef<str>,
        E: Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
    {
        Self::load_with(header, rows, SuffixPolicy::default())
    }

    /// Load a table from a header row and a sequence of data rows.
    ///
    /// The header must name the schema columns in order. Flagged rows are dropped, and any row
    /// read failure or malformed row aborts the whole load.
    ///
    /// ```
    /// use geoipblocks::{schema, Database};
    ///
    /// let rows = vec![
    ///     Ok::<_, String>(vec!["::ffff:1.0.64.0", "114", "1861060", "", "", "", "", "", "0", "0"]),
    ///     Ok(vec!["::ffff:1.0.128.0", "113", "1605651", "", "", "", "", "", "1", "0"]),
    /// ];
    /// let database = Database::load(&schema::HEADER, rows)?;
    ///
    /// assert_eq!(database.len(), 1);
    /// assert_eq!(database.lookup("::ffff:1.0.100.7")?, Some(1861060));
    /// # Ok::<(), geoipblocks::Error>(())
    /// ```
    pub fn load_with<H, I, S, E>(
        header: &[H],
        rows: I,
        policy: SuffixPolicy,
    ) -> Result<Self, LoadError>
    where
        H: AsRef<str>,
        I: IntoIterator<Item = Result<Vec<S>, E>>,
        S: AsRef<str>,
        E: Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
    {
        if !schema::is_valid_header(header) {
            return Err(LoadError::Schema {
                found: header.iter().map(|name| name.as_ref().to_string()).collect(),
            });
        }

        let mut records: Vec<NetworkRecord> = Vec::new();
        let mut excluded: usize = 0;
        // Excluded rows do not advance the row index.
        let mut row_index: usize = 0;

        for row in rows {
            let row = row.map_err(|error| LoadError::SourceRead(error.into()))?;

            match NetworkRecord::parse_row_with(&row, policy) {
                Ok(RowOutcome::Excluded(reason)) => {
                    debug!(
                        "Excluded {} network: {}",
                        reason,
                        row[schema::NETWORK_START_IP_INDEX].as_ref()
                    );
                    excluded += 1;
                }
                Ok(RowOutcome::Accepted(record)) => {
                    row_index += 1;
                    records.push(record);
                }
                Err(source) => {
                    row_index += 1;
                    return Err(LoadError::RowMalformed {
                        row: row_index,
                        content: row.iter().map(|cell| cell.as_ref().to_string()).collect(),
                        source,
                    });
                }
            }
        }

        info!(
            "Loaded {} network records ({} rows excluded)",
            records.len(),
            excluded
        );

        Ok(Self { records, policy })
    }

    /// Load a table from CSV data whose first row is the header.
    pub fn from_reader<R: io::Read>(reader: R, policy: SuffixPolicy) -> Result<Self, LoadError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);
        let mut rows = reader.records();

        let header = match rows.next() {
            Some(header) => header.map_err(|error| LoadError::SourceRead(error.into()))?,
            None => return Err(LoadError::Schema { found: Vec::new() }),
        };
        let header: Vec<&str> = header.iter().collect();

        let rows = rows.map(|row| row.map(|row| row.iter().map(String::from).collect::<Vec<_>>()));

        Self::load_with(&header, rows, policy)
    }

    /*-------------------------------------------------------------------------
      Getters
    -------------------------------------------------------------------------*/

    /// Records in load order.
    pub fn records(&self) -> &[NetworkRecord] {
        &self.records
    }

    /// Number of records in the table.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// [SuffixPolicy] used to parse the table and textual lookups.
    pub fn suffix_policy(&self) -> SuffixPolicy {
        self.policy
    }

    /// Check whether the records are in non-decreasing network start address order.
    pub fn is_sorted(&self) -> bool {
        self.records
            .windows(2)
            .all(|pair| pair[0].network() <= pair[1].network())
    }

    /*-------------------------------------------------------------------------
      Find
    -------------------------------------------------------------------------*/

    /// Find the record whose network contains `address`.
    pub fn find(&self, address: &Ipv6Address) -> Option<&NetworkRecord> {
        if self.records.is_empty() {
            return None;
        }

        let mut lo: usize = 0;
        let mut hi: usize = self.records.len() - 1;

        loop {
            let mid = lo + (hi - lo) / 2;
            let record = &self.records[mid];
            trace!("Find {address}: lo={lo} mid={mid} hi={hi} record={record}");

            if record.match_ip_address(address) {
                return Some(record);
            }
            if lo == hi {
                return None;
            }

            if lo == mid {
                lo = hi;
            } else if record.network().compare(address) == Ordering::Less {
                lo = mid;
            } else {
                hi = mid;
            }
        }
    }

    /// Parse a textual address with the table's [SuffixPolicy] and return the GeoNames id of
    /// the record that contains it.
    pub fn lookup(&self, address: &str) -> Result<Option<u64>, AddressError> {
        let address = Ipv6Address::parse_with(address, self.policy)?;
        Ok(self.find(&address).map(NetworkRecord::geoname_id))
    }

    /*-------------------------------------------------------------------------
      Search
    -------------------------------------------------------------------------*/

    /// Find the records containing each of the provided addresses.
    pub fn search<'a, I>(&self, addresses: I) -> SearchResults
    where
        I: IntoIterator<Item = &'a Ipv6Address>,
    {
        let mut search_results = SearchResults::default();

        for address in addresses {
            match self.find(address) {
                Some(record) => {
                    search_results.matches.insert(*address, *record);
                }
                None => {
                    warn!("Address not found in the network blocks: {address}");
                    search_results.not_found.insert(*address);
                }
            }
        }

        search_results
    }
}

/*--------------------------------------------------------------------------------------
  Create Database from a Vec of Network Records
--------------------------------------------------------------------------------------*/

impl From<Vec<NetworkRecord>> for Database {
    fn from(records: Vec<NetworkRecord>) -> Self {
        Self {
            records,
            policy: SuffixPolicy::default(),
        }
    }
}

impl FromIterator<NetworkRecord> for Database {
    fn from_iter<T: IntoIterator<Item = NetworkRecord>>(iter: T) -> Self {
        Self::from(iter.into_iter().collect::<Vec<_>>())
    }
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::core::address::tests::address;
    use crate::core::errors::{log_error, RecordError};
    use crate::core::record::tests::record;
    use std::collections::BTreeSet;
    use test_log::test;

    /*----------------------------------------------------------------------------------
      Test Data
    ----------------------------------------------------------------------------------*/

    const HEADER_LINE: &str = "network_start_ip,network_mask_length,geoname_id,\
        registered_country_geoname_id,represented_country_geoname_id,postal_code,\
        latitude,longitude,is_anonymous_proxy,is_satellite_provider";

    pub(crate) const VALID_DATA: &str = "\
network_start_ip,network_mask_length,geoname_id,registered_country_geoname_id,represented_country_geoname_id,postal_code,latitude,longitude,is_anonymous_proxy,is_satellite_provider
::ffff:1.0.16.0,116,1850147,1861060,,,35.6850,139.7514,0,0
::ffff:1.0.32.0,115,1809858,1814991,,,23.1167,113.2500,0,0
::ffff:1.0.64.0,114,1861060,1861060,,,35.6900,139.6900,0,0
";

    const INVALID_IP_DATA: &str = "\
network_start_ip,network_mask_length,geoname_id,registered_country_geoname_id,represented_country_geoname_id,postal_code,latitude,longitude,is_anonymous_proxy,is_satellite_provider
::GGGG:0.0.0.0,0,0,0,,,0.0,0.0,0,0
";

    const INVALID_MASK_DATA: &str = "\
network_start_ip,network_mask_length,geoname_id,registered_country_geoname_id,represented_country_geoname_id,postal_code,latitude,longitude,is_anonymous_proxy,is_satellite_provider
:::0.0.0.0,129,0,0,,,0.0,0.0,0,0
";

    const INVALID_GEONAME_ID_DATA: &str = "\
network_start_ip,network_mask_length,geoname_id,registered_country_geoname_id,represented_country_geoname_id,postal_code,latitude,longitude,is_anonymous_proxy,is_satellite_provider
:::0.0.0.0,0,18446744073709551617,0,,,0.0,0.0,0,0
";

    const INVALID_HEADER: &str = "column1,column2,column3\n";

    const EXCLUDED_DATA: &str = "\
network_start_ip,network_mask_length,geoname_id,registered_country_geoname_id,represented_country_geoname_id,postal_code,latitude,longitude,is_anonymous_proxy,is_satellite_provider
::ffff:1.2.3.4,0,0,0,,,0.0,0.0,1,0
::ffff:1.2.3.4,0,0,0,,,0.0,0.0,0,1
";

    fn load_str(data: &str) -> Result<Database, LoadError> {
        Database::from_reader(data.as_bytes(), SuffixPolicy::default())
    }

    fn three_networks() -> Database {
        Database::from(vec![
            record("::8800", 120, 1),
            record("::9800", 120, 2),
            record("::a800", 120, 3),
        ])
    }

    /*----------------------------------------------------------------------------------
      Load
    ----------------------------------------------------------------------------------*/

    #[test]
    fn test_load_valid_data() {
        let database = load_str(VALID_DATA).inspect_err(log_error).unwrap();

        assert_eq!(database.len(), 3);
        assert!(database.is_sorted());
        assert_eq!(
            database.records(),
            &[
                record("::ffff:1.0.16.0", 116, 1850147),
                record("::ffff:1.0.32.0", 115, 1809858),
                record("::ffff:1.0.64.0", 114, 1861060),
            ]
        );
    }

    #[test]
    fn test_load_invalid_data() {
        for data in [
            INVALID_IP_DATA,
            INVALID_MASK_DATA,
            INVALID_HEADER,
            INVALID_GEONAME_ID_DATA,
            "",
        ] {
            let result = load_str(data).inspect_err(log_error);
            assert!(result.is_err(), "loading {data:?} should fail");
        }
    }

    #[test]
    fn test_load_error_kinds() {
        assert!(matches!(
            load_str(INVALID_HEADER),
            Err(LoadError::Schema { found }) if found == ["column1", "column2", "column3"]
        ));
        assert!(matches!(
            load_str(INVALID_IP_DATA),
            Err(LoadError::RowMalformed { row: 1, source: RecordError::Address(_), .. })
        ));
        assert!(matches!(
            load_str(INVALID_MASK_DATA),
            Err(LoadError::RowMalformed { row: 1, source: RecordError::PrefixRange { .. }, .. })
        ));
        assert!(matches!(
            load_str(INVALID_GEONAME_ID_DATA),
            Err(LoadError::RowMalformed { row: 1, source: RecordError::LocationIdRange { .. }, .. })
        ));
    }

    #[test]
    fn test_load_reordered_or_missing_header_columns() {
        let mut reordered = schema::HEADER;
        reordered.swap(8, 9);
        let rows: Vec<Result<Vec<&str>, String>> = Vec::new();
        assert!(matches!(
            Database::load(&reordered, rows),
            Err(LoadError::Schema { .. })
        ));

        let missing = &schema::HEADER[1..];
        let rows: Vec<Result<Vec<&str>, String>> = Vec::new();
        assert!(matches!(
            Database::load(missing, rows),
            Err(LoadError::Schema { .. })
        ));
    }

    #[test]
    fn test_load_excluded_rows() {
        let database = load_str(EXCLUDED_DATA).unwrap();
        assert!(database.is_empty());

        let header_only = format!("{HEADER_LINE}\n");
        assert!(load_str(&header_only).unwrap().is_empty());
    }

    #[test]
    fn test_load_excludes_exactly_flagged_rows() {
        let rows: Vec<Result<Vec<&str>, String>> = vec![
            Ok(vec!["::8800", "120", "1", "", "", "", "", "", "0", "0"]),
            Ok(vec!["::9000", "120", "9", "", "", "", "", "", "1", "0"]),
            Ok(vec!["::9800", "120", "2", "", "", "", "", "", "0", "0"]),
            Ok(vec!["::a000", "120", "9", "", "", "", "", "", "0", "1"]),
            Ok(vec!["::a800", "120", "3", "", "", "", "", "", "0", "0"]),
        ];

        let database = Database::load(&schema::HEADER, rows).unwrap();
        assert_eq!(database, three_networks());
    }

    #[test]
    fn test_load_malformed_row_reports_index_and_content() {
        let rows: Vec<Result<Vec<&str>, String>> = vec![
            Ok(vec!["::8800", "120", "1", "", "", "", "", "", "0", "0"]),
            Ok(vec!["::9000", "120", "9", "", "", "", "", "", "1", "0"]),
            Ok(vec!["::9800", "120", "2", "", "", "", ""]),
        ];

        match Database::load(&schema::HEADER, rows) {
            Err(LoadError::RowMalformed {
                row,
                content,
                source,
            }) => {
                assert_eq!(row, 2);
                assert_eq!(content, ["::9800", "120", "2", "", "", "", ""]);
                assert_eq!(
                    source,
                    RecordError::ColumnCount {
                        expected: 10,
                        found: 7
                    }
                );
            }
            other => panic!("unexpected load result: {other:?}"),
        }
    }

    #[test]
    fn test_load_malformed_row_index_skips_excluded_rows() {
        let rows: Vec<Result<Vec<&str>, String>> = vec![
            Ok(vec!["::8800", "120", "9", "", "", "", "", "", "1", "0"]),
            Ok(vec!["::9000", "120", "9", "", "", "", "", "", "0", "1"]),
            Ok(vec!["::9800", "129", "2", "", "", "", "", "", "0", "0"]),
        ];

        match Database::load(&schema::HEADER, rows) {
            Err(LoadError::RowMalformed { row, source, .. }) => {
                assert_eq!(row, 1);
                assert_eq!(
                    source,
                    RecordError::PrefixRange {
                        value: "129".to_string()
                    }
                );
            }
            other => panic!("unexpected load result: {other:?}"),
        }
    }

    #[test]
    fn test_load_source_read_error() {
        let rows: Vec<Result<Vec<&str>, String>> = vec![
            Ok(vec!["::8800", "120", "1", "", "", "", "", "", "0", "0"]),
            Err("connection reset".to_string()),
            Ok(vec!["::9800", "120", "2", "", "", "", "", "", "0", "0"]),
        ];

        let result = Database::load(&schema::HEADER, rows);
        assert!(
            matches!(&result, Err(LoadError::SourceRead(error)) if error.to_string() == "connection reset")
        );
    }

    #[test]
    fn test_load_csv_short_row_is_malformed() {
        let data = format!("{HEADER_LINE}\n::8800,120,1\n");
        assert!(matches!(
            load_str(&data),
            Err(LoadError::RowMalformed {
                row: 1,
                source: RecordError::ColumnCount { found: 3, .. },
                ..
            })
        ));
    }

    #[test]
    fn test_load_mapped_only_policy() {
        let data = format!("{HEADER_LINE}\n::1.2.3.0,120,1,,,,,,0,0\n");
        assert!(Database::from_reader(data.as_bytes(), SuffixPolicy::Anywhere).is_ok());
        assert!(Database::from_reader(data.as_bytes(), SuffixPolicy::MappedOnly).is_err());

        let database =
            Database::from_reader(VALID_DATA.as_bytes(), SuffixPolicy::MappedOnly).unwrap();
        assert_eq!(database.suffix_policy(), SuffixPolicy::MappedOnly);
        assert_eq!(database.lookup("::ffff:1.0.17.1"), Ok(Some(1850147)));
    }

    /*----------------------------------------------------------------------------------
      Find
    ----------------------------------------------------------------------------------*/

    #[test]
    fn test_find_empty_database() {
        let database = Database::default();
        assert_eq!(database.find(&address("::1")), None);
    }

    #[test]
    fn test_find_single_record() {
        let database = Database::from(vec![record("::8800", 120, 1)]);
        assert_eq!(database.find(&address("::8842")).map(|r| r.geoname_id()), Some(1));
        assert_eq!(database.find(&address("::87ff")), None);
        assert_eq!(database.find(&address("::8900")), None);
    }

    #[test]
    fn test_find_three_networks() {
        let database = three_networks();

        for (base, geoname_id) in [(0x8800u16, 1u64), (0x9800, 2), (0xa800, 3)] {
            for offset in 0..=0xffu16 {
                let query = Ipv6Address::from(std::net::Ipv6Addr::new(0, 0, 0, 0, 0, 0, 0, base + offset));
                let found = database.find(&query);
                assert_eq!(found.map(|r| r.geoname_id()), Some(geoname_id), "query {query}");
            }
        }

        for gap in ["::", "::87ff", "::8900", "::97ff", "::9900", "::a7ff", "::a900", "ffff::"] {
            assert_eq!(database.find(&address(gap)), None, "query {gap}");
        }
    }

    #[test]
    fn test_find_many_networks() {
        // Every other /120 block from ::0 to ::fe00
        let records: Vec<NetworkRecord> = (0..128u16)
            .map(|block| {
                let base = block * 0x200;
                let network = Ipv6Address::from(std::net::Ipv6Addr::new(0, 0, 0, 0, 0, 0, 0, base));
                NetworkRecord::new(network, 120, block as u64).unwrap()
            })
            .collect();
        let database = Database::from(records);
        assert!(database.is_sorted());

        for block in 0..128u16 {
            let base = block * 0x200;
            let inside = Ipv6Address::from(std::net::Ipv6Addr::new(0, 0, 0, 0, 0, 0, 0, base + 0x7f));
            let gap = Ipv6Address::from(std::net::Ipv6Addr::new(0, 0, 0, 0, 0, 0, 0, base + 0x17f));
            assert_eq!(database.find(&inside).map(|r| r.geoname_id()), Some(block as u64));
            assert_eq!(database.find(&gap), None);
        }
    }

    #[test]
    fn test_find_loaded_data() {
        let database = load_str(VALID_DATA).unwrap();

        assert_eq!(database.lookup("::ffff:1.0.16.0"), Ok(Some(1850147)));
        assert_eq!(database.lookup("::ffff:1.0.31.255"), Ok(Some(1850147)));
        assert_eq!(database.lookup("::ffff:1.0.32.1"), Ok(Some(1809858)));
        assert_eq!(database.lookup("::ffff:1.0.127.255"), Ok(Some(1861060)));
        assert_eq!(database.lookup("::ffff:1.0.15.255"), Ok(None));
        assert_eq!(database.lookup("::ffff:1.0.128.0"), Ok(None));
        assert!(database.lookup("::ffff:1.0.300.0").is_err());
    }

    #[test]
    fn test_find_concurrently() {
        let database = three_networks();

        std::thread::scope(|scope| {
            for (query, expected) in [("::8801", Some(1)), ("::9901", None), ("::a8ff", Some(3))] {
                let database = &database;
                scope.spawn(move || {
                    assert_eq!(database.lookup(query), Ok(expected));
                });
            }
        });
    }

    /*----------------------------------------------------------------------------------
      Search
    ----------------------------------------------------------------------------------*/

    #[test]
    fn test_search() {
        let database = three_networks();
        let queries = [address("::8801"), address("::9000"), address("::a8ff")];

        let search_results = database.search(&queries);

        assert_eq!(search_results.matches.len(), 2);
        assert_eq!(search_results.matches[&address("::8801")], record("::8800", 120, 1));
        assert_eq!(search_results.matches[&address("::a8ff")], record("::a800", 120, 3));
        assert!(search_results.not_found.contains(&address("::9000")));
        assert_eq!(search_results.geoname_ids(), BTreeSet::from([1, 3]));
    }

    #[test]
    fn test_is_sorted() {
        assert!(three_networks().is_sorted());
        assert!(Database::default().is_sorted());

        let unsorted: Database = [record("::9800", 120, 2), record("::8800", 120, 1)]
            .into_iter()
            .collect();
        assert!(!unsorted.is_sorted());
    }
}

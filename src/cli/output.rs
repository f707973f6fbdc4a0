use geoipblocks::{Database, Ipv6Address, SearchResults};
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::{NOTHING, UTF8_FULL};
use comfy_table::*;

/*-------------------------------------------------------------------------------------------------
  Output Functions
-------------------------------------------------------------------------------------------------*/

/*--------------------------------------------------------------------------------------
  Results Table
--------------------------------------------------------------------------------------*/

pub fn results_table(queries: &[(String, Option<Ipv6Address>)], search_results: &SearchResults) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("IP Address")
            .add_attribute(Attribute::Bold)
            .fg(Color::Green),
        Cell::new("Network")
            .add_attribute(Attribute::Bold)
            .fg(Color::Green),
        Cell::new("GeoNames ID")
            .add_attribute(Attribute::Bold)
            .fg(Color::Green),
    ]);

    for (text, address) in queries {
        let row = match search_results.lookup(address.as_ref()) {
            Some(record) => vec![
                Cell::new(text).add_attribute(Attribute::Bold),
                Cell::new(record.cidr()),
                Cell::new(record.geoname_id()),
            ],
            None => vec![
                Cell::new(text).add_attribute(Attribute::Bold),
                Cell::new("not found").fg(Color::Yellow),
                Cell::new(""),
            ],
        };
        table.add_row(row);
    }

    // Right-align the IP Address column
    if let Some(column) = table.column_mut(0) {
        column.set_cell_alignment(CellAlignment::Right);
    }

    println!("{table}");
}

/*--------------------------------------------------------------------------------------
  GeoNames IDs
--------------------------------------------------------------------------------------*/

pub fn geoname_ids(queries: &[(String, Option<Ipv6Address>)], search_results: &SearchResults) {
    for (_, address) in queries {
        match search_results.lookup(address.as_ref()) {
            Some(record) => println!("{}", record.geoname_id()),
            None => println!("-"),
        }
    }
}

/*--------------------------------------------------------------------------------------
  Networks In CIDR Format
--------------------------------------------------------------------------------------*/

pub fn networks(queries: &[(String, Option<Ipv6Address>)], search_results: &SearchResults) {
    for (_, address) in queries {
        match search_results.lookup(address.as_ref()) {
            Some(record) => println!("{}", record.cidr()),
            None => println!("-"),
        }
    }
}

/*--------------------------------------------------------------------------------------
  Database Summary
--------------------------------------------------------------------------------------*/

pub fn summary(database: &Database) {
    let mut summary_table = Table::new();
    summary_table
        .load_preset(NOTHING)
        .set_content_arrangement(ContentArrangement::Dynamic);

    summary_table.add_row(vec![Cell::new(database.len()), Cell::new("Network Blocks")]);
    summary_table.add_row(vec![
        Cell::new(database.suffix_policy()),
        Cell::new("IPv4 Suffix Policy"),
    ]);
    summary_table.add_row(vec![
        Cell::new(if database.is_sorted() { "yes" } else { "no" }),
        Cell::new("Sorted"),
    ]);

    if let Some(column) = summary_table.column_mut(0) {
        column.set_cell_alignment(CellAlignment::Right);
    }

    println!("{summary_table}");
}

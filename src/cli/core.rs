use crate::cli;
use geoipblocks::{Ipv6Address, LoaderBuilder, SuffixPolicy};
use log::error;

/*-------------------------------------------------------------------------------------------------
  Core functions
-------------------------------------------------------------------------------------------------*/

/*--------------------------------------------------------------------------------------
  Build the database loader from CLI arguments
--------------------------------------------------------------------------------------*/

pub fn build_loader(args: &cli::Args) -> geoipblocks::Loader {
    let mut builder = LoaderBuilder::new();

    if let Some(database_file) = &args.database_file {
        builder.database_file(database_file);
    }
    if let Some(suffix_policy) = args.suffix_policy {
        builder.suffix_policy(suffix_policy);
    }

    builder.build()
}

/*--------------------------------------------------------------------------------------
  Parse IP addresses from CLI arguments
--------------------------------------------------------------------------------------*/

/// Parse the query addresses in input order, logging the ones that are not valid. Invalid
/// addresses are kept (as `None`) so they are reported as not found.
pub fn parse_addresses(
    args: &cli::Args,
    policy: SuffixPolicy,
) -> Vec<(String, Option<Ipv6Address>)> {
    args.addresses
        .iter()
        .map(|text| {
            let address = Ipv6Address::parse_with(text, policy)
                .inspect_err(|error| error!("Invalid IP address: {}", error))
                .ok();
            (text.clone(), address)
        })
        .collect()
}

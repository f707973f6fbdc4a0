use clap::{Parser, ValueEnum};
use geoipblocks::SuffixPolicy;
use std::path::PathBuf;

/*-------------------------------------------------------------------------------------------------
  Command Line Interface (CLI) Arguments
-------------------------------------------------------------------------------------------------*/

#[derive(Parser, Debug)]
#[command(author, version, about="Resolve IP addresses to GeoNames ids.", long_about = None)]
pub struct Args {
    /// Network blocks CSV file [default: $GEOIPBLOCKS_DATABASE_FILE or ~/.geoip/GeoLite2-City-Blocks-IPv6.csv]
    #[arg(short = 'd', long = "database")]
    pub database_file: Option<PathBuf>,

    /// Where an embedded IPv4 suffix is accepted: `anywhere` or `mapped` (only after ::ffff:)
    #[arg(long = "ipv4-suffix")]
    pub suffix_policy: Option<SuffixPolicy>,

    /// Output format
    #[arg(short = 'o', long, value_enum, default_value_t = OutputFormat::Table)]
    pub output: OutputFormat,

    /// Include a summary of the loaded network blocks
    #[arg(long)]
    pub summary: bool,

    /// Save the results to a CSV file
    #[arg(long = "csv")]
    pub csv_file: Option<PathBuf>,

    /// Logging verbosity
    #[command(flatten)]
    pub verbose: clap_verbosity_flag::Verbosity,

    /// IP addresses to resolve
    pub addresses: Vec<String>,
}

/*--------------------------------------------------------------------------------------
  Output Format
--------------------------------------------------------------------------------------*/

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    /// Table of addresses, containing networks, and GeoNames ids
    Table,
    /// One GeoNames id per address (`-` when not found)
    Ids,
    /// One containing network (CIDR) per address (`-` when not found)
    Networks,
}

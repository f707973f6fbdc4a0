mod cli;

use clap::Parser;
use log::error;
use std::process::ExitCode;

/*-------------------------------------------------------------------------------------------------
  Main
-------------------------------------------------------------------------------------------------*/

fn main() -> ExitCode {
    let args = cli::Args::parse();

    stderrlog::new()
        .module(module_path!())
        .verbosity(args.verbose.log_level_filter())
        .init()
        .unwrap_or_else(|error| eprintln!("Failed to initialize logging: {error}"));

    let loader = cli::build_loader(&args);
    let database = match loader.load() {
        Ok(database) => database,
        Err(error) => {
            error!("{error}");
            return ExitCode::FAILURE;
        }
    };
    cli::log::database(&database);

    if args.summary {
        cli::output::summary(&database);
    }

    let queries = cli::parse_addresses(&args, database.suffix_policy());
    let search_results =
        database.search(queries.iter().filter_map(|(_, address)| address.as_ref()));
    let count_parsed = queries.iter().filter(|(_, address)| address.is_some()).count();
    cli::log::search_results(queries.len(), count_parsed, &search_results);

    match args.output {
        cli::OutputFormat::Table => {
            if !queries.is_empty() {
                cli::output::results_table(&queries, &search_results)
            }
        }
        cli::OutputFormat::Ids => cli::output::geoname_ids(&queries, &search_results),
        cli::OutputFormat::Networks => cli::output::networks(&queries, &search_results),
    }

    if let Some(csv_file) = &args.csv_file {
        if let Err(error) = cli::csv::save(&queries, &search_results, csv_file) {
            error!("Failed to save results to {:?}: {}", csv_file, error);
            return ExitCode::FAILURE;
        }
    }

    ExitCode::SUCCESS
}

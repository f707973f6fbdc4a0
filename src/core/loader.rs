use crate::core::address::SuffixPolicy;
use crate::core::database::Database;
use crate::core::errors::{Error, Result};
use log::{info, warn};
use std::env;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

/*-------------------------------------------------------------------------------------------------
  Simple Interface
-------------------------------------------------------------------------------------------------*/

/// _**Simple library interface**_ loads the network-blocks table using the default loader
/// configuration (environment variables, then built-in defaults).
///
/// ```no_run
/// let database = geoipblocks::load_database()?;
/// let geoname_id = database.lookup("::ffff:81.2.69.160")?;
/// # Ok::<(), geoipblocks::Error>(())
/// ```
pub fn load_database() -> Result<Database> {
    Loader::new().load()
}

/*-------------------------------------------------------------------------------------------------
  Loader Builder
-------------------------------------------------------------------------------------------------*/

/// A builder for the [Loader] struct that allows you to customize the loader configuration.
///
/// ```
/// use geoipblocks::{LoaderBuilder, SuffixPolicy};
///
/// let loader = LoaderBuilder::new()
///     .database_file("/var/lib/geoip/GeoLite2-City-Blocks-IPv6.csv")
///     .suffix_policy(SuffixPolicy::MappedOnly)
///     .build();
/// ```
///
/// The [LoaderBuilder::new] method sources configuration values from environment variables
/// when set and uses default values otherwise. [LoaderBuilder::default] ignores the
/// environment.
#[derive(Debug, Clone)]
pub struct LoaderBuilder {
    database_file: PathBuf,
    suffix_policy: SuffixPolicy,
}

/*--------------------------------------------------------------------------------------
  Loader Builder Implementation
--------------------------------------------------------------------------------------*/

impl Default for LoaderBuilder {
    /// Create a new [LoaderBuilder] with default configuration values.
    ///
    /// ```
    /// let loader = geoipblocks::LoaderBuilder::default().build();
    ///
    /// assert!(loader.database_file().ends_with(".geoip/GeoLite2-City-Blocks-IPv6.csv"));
    /// assert_eq!(loader.suffix_policy(), geoipblocks::SuffixPolicy::Anywhere);
    /// ```
    fn default() -> Self {
        Self {
            database_file: dirs::home_dir()
                .unwrap_or_default()
                .join(".geoip")
                .join("GeoLite2-City-Blocks-IPv6.csv"), // ${HOME}/.geoip/GeoLite2-City-Blocks-IPv6.csv
            suffix_policy: SuffixPolicy::default(),
        }
    }
}

impl LoaderBuilder {
    /// Create a new [LoaderBuilder] reading initial configuration values from environment
    /// variables when set and default values when they are not.
    ///
    /// The environment variables used are:
    /// - `GEOIPBLOCKS_DATABASE_FILE`
    /// - `GEOIPBLOCKS_IPV4_SUFFIX` (`anywhere` or `mapped`)
    pub fn new() -> Self {
        let default = LoaderBuilder::default();

        Self {
            database_file: get_env_var("GEOIPBLOCKS_DATABASE_FILE", default.database_file),
            suffix_policy: get_env_var("GEOIPBLOCKS_IPV4_SUFFIX", default.suffix_policy),
        }
    }

    /*-------------------------------------------------------------------------
      Setters
    -------------------------------------------------------------------------*/

    /// Set the path of the network-blocks CSV file; defaults to
    /// `${HOME}/.geoip/GeoLite2-City-Blocks-IPv6.csv`.
    pub fn database_file<P: AsRef<Path>>(&mut self, database_file: P) -> &mut Self {
        self.database_file = database_file.as_ref().to_path_buf();
        self
    }

    /// Set where an embedded IPv4 suffix is accepted in network and query addresses; defaults
    /// to [SuffixPolicy::Anywhere].
    pub fn suffix_policy(&mut self, suffix_policy: SuffixPolicy) -> &mut Self {
        self.suffix_policy = suffix_policy;
        self
    }

    /*-------------------------------------------------------------------------
      Build Method
    -------------------------------------------------------------------------*/

    pub fn build(&self) -> Loader {
        Loader {
            database_file: self.database_file.clone(),
            suffix_policy: self.suffix_policy,
        }
    }
}

/*-------------------------------------------------------------------------------------------------
  Loader
-------------------------------------------------------------------------------------------------*/

/// Loads a [Database] from a network-blocks CSV file.
///
/// ```no_run
/// let loader = geoipblocks::Loader::new();
/// let database = loader.load()?;
/// # Ok::<(), geoipblocks::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Loader {
    database_file: PathBuf,
    suffix_policy: SuffixPolicy,
}

/*--------------------------------------------------------------------------------------
  Loader Implementation
--------------------------------------------------------------------------------------*/

impl Default for Loader {
    fn default() -> Self {
        LoaderBuilder::default().build()
    }
}

impl Loader {
    pub fn new() -> Self {
        LoaderBuilder::new().build()
    }

    /*-------------------------------------------------------------------------
      Getters
    -------------------------------------------------------------------------*/

    /// Path of the network-blocks CSV file.
    pub fn database_file(&self) -> &Path {
        &self.database_file
    }

    pub fn suffix_policy(&self) -> SuffixPolicy {
        self.suffix_policy
    }

    /*-------------------------------------------------------------------------
      Load
    -------------------------------------------------------------------------*/

    /// Read and parse the configured database file.
    pub fn load(&self) -> Result<Database> {
        info!("Loading network blocks from: {:?}", &self.database_file);

        let file = File::open(&self.database_file)
            .map_err(Error::from)
            .inspect_err(|error| {
                log::error!(
                    "Failed to open network blocks file `{:?}`: {}",
                    &self.database_file,
                    error
                )
            })?;

        self.load_from_reader(io::BufReader::new(file))
    }

    /// Parse network-blocks CSV data from any reader.
    pub fn load_from_reader<R: io::Read>(&self, reader: R) -> Result<Database> {
        Database::from_reader(reader, self.suffix_policy)
            .map_err(Error::from)
            .inspect_err(|error| log::error!("Failed to load network blocks: {}", error))
    }
}

/*-------------------------------------------------------------------------------------------------
  Helper Functions
-------------------------------------------------------------------------------------------------*/

/// Get and parse an environment variable value or return a default value.
fn get_env_var<T: std::str::FromStr>(env_var: &str, default: T) -> T {
    env::var(env_var)
        .ok()
        .and_then(|value| {
            value
                .parse::<T>()
                .inspect(|_| info!("Using {}: {}", env_var, value))
                .inspect_err(|_| warn!("Invalid {}: {}", env_var, value))
                .ok()
        })
        .unwrap_or(default)
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/

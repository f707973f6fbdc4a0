/*-------------------------------------------------------------------------------------------------
  Core Modules
-------------------------------------------------------------------------------------------------*/

pub mod address;
pub mod database;
pub mod errors;
pub mod loader;
pub mod record;
pub mod schema;
pub mod search_results;

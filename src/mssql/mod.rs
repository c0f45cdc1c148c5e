// SQL Server driver glue over tiberius:
// - config: driver config built from `ConnectionOptions`
// - query: parameter binding and result-set materialization

pub mod config;
pub mod query;

pub use config::{MssqlClient, build_tiberius_config};
pub use query::{bind_query_params, build_result_set};

pub mod api;
pub mod archive;
pub mod assembler;
pub mod batch;
pub mod config;
pub mod driver;
pub mod errors;
pub mod job;
pub mod observer;
pub mod retry;
pub mod search;
pub mod seq;
pub mod shutdown;
pub mod templates;
mod runner;

use crate::errors::MsaFetchError;

pub use crate::assembler::SearchResult;
pub use crate::job::SearchOptions;
pub use crate::search::run_search;

pub fn run() -> Result<(), MsaFetchError> {
    runner::run()
}

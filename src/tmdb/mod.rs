mod client;
pub mod types;

pub use client::{detail_record, TmdbClient, TmdbConfig, TmdbError};

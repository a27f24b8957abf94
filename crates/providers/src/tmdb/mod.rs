pub mod client;
pub mod config;

pub use client::TmdbClient;
pub use config::TmdbConfig;

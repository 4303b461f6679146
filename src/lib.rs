//! Fetch CSV objects from an S3 bucket into in-memory tables.
//!
//! ```no_run
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = bucket_csv::FetcherConfig::from_env()?;
//! let fetcher = bucket_csv::ObjectFetcher::new(&config).await;
//! if let Some(table) = fetcher.maybe_fetch("data.csv").await {
//!     println!("{} records", table.len());
//! }
//! # Ok(())
//! # }
//! ```
#![forbid(unsafe_code)]
pub mod config;
pub mod decode;
mod error;
mod fetcher;
mod fs;
pub mod fs_s3;
mod table;

pub use config::{AccessKeys, ConfigError, FetcherConfig, DEFAULT_REGION};
pub use error::{FetchError, StorageError};
pub use fetcher::ObjectFetcher;
pub use fs::{BlobStorageProvider, InMemory, LocalDisk};
pub use table::{ParseError, Table};

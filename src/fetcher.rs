use crate::{
    config::FetcherConfig,
    decode::{decode, Encoding},
    error::{report, FetchError, StorageError},
    fs::BlobStorageProvider,
    fs_s3::{self, ContainerClient},
    table::Table,
};

/// Fetches CSV objects from a container and parses them into [`Table`]s.
pub struct ObjectFetcher<P = ContainerClient> {
    provider: P,
}

impl ObjectFetcher<ContainerClient> {
    /// Returns an [`ObjectFetcher`] over the S3 bucket in `config`.
    /// Credentials are not checked until the first fetch.
    pub async fn new(config: &FetcherConfig) -> Self {
        let fetcher = Self::with_provider(fs_s3::client(config).await);
        log::info!("S3 connection initialized for bucket: {}", config.bucket);
        fetcher
    }
}

impl<P: BlobStorageProvider> ObjectFetcher<P> {
    pub fn with_provider(provider: P) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Fetches `key` and parses it as CSV, first line as header.
    /// Bytes that are not valid UTF-8 are decoded as Latin-1.
    /// # Error
    /// Errors if the object does not exist, cannot be read, or is not valid CSV.
    /// The error is logged before it is returned.
    pub async fn fetch(&self, key: &str) -> Result<Table, FetchError> {
        let container = self.provider.container();
        log::info!("Fetching '{key}' from '{container}'");

        self.try_fetch(key)
            .await
            .inspect(|table| {
                log::info!(
                    "Fetched '{key}' from '{container}' ({} records)",
                    table.len()
                )
            })
            .inspect_err(|e| {
                log::error!("Failed to fetch '{key}' from '{container}': {}", report(e))
            })
    }

    /// Like [`ObjectFetcher::fetch`], returning `None` on any error
    pub async fn maybe_fetch(&self, key: &str) -> Option<Table> {
        self.fetch(key).await.ok()
    }

    /// Writes `table` to `key` as UTF-8 CSV
    pub async fn store(&self, key: &str, table: &Table) -> Result<(), FetchError> {
        let contents = table.to_csv().map_err(crate::table::ParseError::from)?;
        self.provider
            .put(key, contents)
            .await
            .map_err(|e| self.storage_error(key, e))?;
        log::info!(
            "Stored '{key}' in '{}' ({} records)",
            self.provider.container(),
            table.len()
        );
        Ok(())
    }

    async fn try_fetch(&self, key: &str) -> Result<Table, FetchError> {
        let data = self
            .provider
            .maybe_get(key)
            .await
            .map_err(|e| self.storage_error(key, e))?
            .ok_or_else(|| FetchError::NotFound {
                container: self.provider.container().to_string(),
                key: key.to_string(),
            })?;

        let decoded = decode(data);
        if decoded.encoding == Encoding::Latin1 {
            log::warn!("'{key}' is not valid UTF-8; decoded as {}", decoded.encoding);
        }

        Ok(Table::from_csv(&decoded.text)?)
    }

    fn storage_error(&self, key: &str, error: StorageError) -> FetchError {
        match error {
            StorageError::AccessDenied(_) => FetchError::AccessDenied {
                container: self.provider.container().to_string(),
                key: key.to_string(),
            },
            e => FetchError::Storage(e),
        }
    }
}

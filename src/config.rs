use thiserror::Error;

/// Region used when none is configured
pub const DEFAULT_REGION: &str = "us-east-1";

/// An access key and its secret
#[derive(Clone, PartialEq, Eq)]
pub struct AccessKeys {
    pub access_key: String,
    pub secret_key: String,
}

impl std::fmt::Debug for AccessKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessKeys")
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("environment variable {0} is not set")]
    MissingVar(&'static str),
    #[error("ACCESS_KEY and SECRET_KEY must be set together")]
    PartialCredentials,
}

/// Where and how to reach the bucket holding the objects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetcherConfig {
    pub bucket: String,
    /// `None` uses the default AWS credential chain
    pub credentials: Option<AccessKeys>,
    pub region: String,
    /// Custom endpoint for S3-compatible services (e.g. MinIO)
    pub endpoint_url: Option<String>,
}

impl FetcherConfig {
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            credentials: None,
            region: DEFAULT_REGION.to_string(),
            endpoint_url: None,
        }
    }

    pub fn with_credentials(
        mut self,
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Self {
        self.credentials = Some(AccessKeys {
            access_key: access_key.into(),
            secret_key: secret_key.into(),
        });
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    pub fn with_endpoint_url(mut self, endpoint_url: impl Into<String>) -> Self {
        self.endpoint_url = Some(endpoint_url.into());
        self
    }

    /// Loads `.env` (if any) and reads `BUCKET_NAME`, `ACCESS_KEY`, `SECRET_KEY`,
    /// `REGION` and `ENDPOINT_URL` from the process environment.
    /// # Error
    /// Errors if `BUCKET_NAME` is missing or only one of the keys is set
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                log::warn!("ignoring .env file: {e}");
            }
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`FetcherConfig::from_env`] with variables resolved by `lookup`.
    /// Empty values are treated as unset.
    pub fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).filter(|value| !value.is_empty());

        let bucket = var("BUCKET_NAME").ok_or(ConfigError::MissingVar("BUCKET_NAME"))?;
        let credentials = match (var("ACCESS_KEY"), var("SECRET_KEY")) {
            (Some(access_key), Some(secret_key)) => Some(AccessKeys {
                access_key,
                secret_key,
            }),
            (None, None) => None,
            _ => return Err(ConfigError::PartialCredentials),
        };

        Ok(Self {
            bucket,
            credentials,
            region: var("REGION").unwrap_or_else(|| DEFAULT_REGION.to_string()),
            endpoint_url: var("ENDPOINT_URL"),
        })
    }
}

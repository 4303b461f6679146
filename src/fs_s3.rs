use aws_credential_types::Credentials;
use aws_sdk_s3::{
    error::{ProvideErrorMetadata, SdkError},
    operation::get_object::GetObjectError,
    primitives::ByteStream,
};

use crate::{config::FetcherConfig, error::StorageError, fs::BlobStorageProvider};

pub struct ContainerClient {
    pub client: aws_sdk_s3::Client,
    pub bucket: String,
}

fn is_access_denied(err: &impl ProvideErrorMetadata) -> bool {
    matches!(
        err.code(),
        Some("AccessDenied" | "Forbidden" | "InvalidAccessKeyId" | "SignatureDoesNotMatch")
    )
}

fn classify<E, R>(err: SdkError<E, R>) -> StorageError
where
    E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
    R: std::fmt::Debug + Send + Sync + 'static,
{
    match err {
        SdkError::ServiceError(ref e) if is_access_denied(e.err()) => StorageError::AccessDenied(
            e.err().message().unwrap_or("access denied").to_string(),
        ),
        err => StorageError::Request(Box::new(err)),
    }
}

/// A missing key is `Ok(None)`; every other error is classified
fn classify_get<R>(err: SdkError<GetObjectError, R>) -> Result<Option<Vec<u8>>, StorageError>
where
    R: std::fmt::Debug + Send + Sync + 'static,
{
    match err {
        SdkError::ServiceError(ref e) if matches!(e.err(), GetObjectError::NoSuchKey(_)) => Ok(None),
        err => Err(classify(err)),
    }
}

async fn get(client: &ContainerClient, blob_name: &str) -> Result<Option<Vec<u8>>, StorageError> {
    let maybe_object = client
        .client
        .get_object()
        .bucket(&client.bucket)
        .key(blob_name)
        .send()
        .await;

    let object = match maybe_object {
        Err(err) => return classify_get(err),
        Ok(x) => x,
    };

    object
        .body
        .collect()
        .await
        .map(|x| Some(x.into_bytes().to_vec()))
        .map_err(|e| StorageError::Request(Box::new(e)))
}

async fn put(client: &ContainerClient, blob_name: &str, content: Vec<u8>) -> Result<(), StorageError> {
    client
        .client
        .put_object()
        .bucket(&client.bucket)
        .key(blob_name)
        .body(ByteStream::from(content))
        .content_type("text/csv")
        .send()
        .await
        .map_err(classify)
        .map(|_| ())
}

/// Initialize a [`ContainerClient`] for the bucket in `config`.
/// Credentials are not validated until the first request.
pub async fn client(config: &FetcherConfig) -> ContainerClient {
    let mut loader = aws_config::ConfigLoader::default()
        .behavior_version(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new(config.region.clone()));
    if let Some(keys) = &config.credentials {
        loader = loader.credentials_provider(Credentials::new(
            keys.access_key.clone(),
            keys.secret_key.clone(),
            None,
            None,
            "bucket_csv",
        ));
    }
    if let Some(endpoint_url) = &config.endpoint_url {
        loader = loader.endpoint_url(endpoint_url);
    }
    let sdk_config = loader.load().await;

    // custom endpoints (MinIO, Spaces) address buckets path-style
    let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
        .force_path_style(config.endpoint_url.is_some())
        .build();

    ContainerClient {
        client: aws_sdk_s3::Client::from_conf(s3_config),
        bucket: config.bucket.clone(),
    }
}

#[async_trait::async_trait]
impl BlobStorageProvider for ContainerClient {
    async fn maybe_get(&self, blob_name: &str) -> Result<Option<Vec<u8>>, StorageError> {
        get(self, blob_name).await
    }

    async fn put(&self, blob_name: &str, contents: Vec<u8>) -> Result<(), StorageError> {
        put(self, blob_name, contents).await
    }

    fn container(&self) -> &str {
        &self.bucket
    }
}

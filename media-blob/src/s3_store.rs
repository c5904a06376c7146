use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_credential_types::Credentials;
use aws_sdk_s3::Client;
use media_core::MediaConfigSnapshot;

use crate::{
    BlobError, BlobResult, BlobStore, ByteRange, ByteStream, GetResult, ObjectHead,
    StoreCapabilities,
};

/// Connection settings for an S3-compatible backend
#[derive(Debug, Clone)]
pub struct S3Config {
    pub bucket: String,
    pub region: String,
    pub endpoint_url: Option<String>,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    /// Path-style addressing, needed by most self-hosted S3 servers
    pub force_path_style: bool,
}

impl S3Config {
    pub fn new<S: Into<String>>(bucket: S) -> Self {
        Self {
            bucket: bucket.into(),
            region: "us-east-1".to_string(),
            endpoint_url: None,
            access_key_id: None,
            secret_access_key: None,
            force_path_style: false,
        }
    }

    /// Read `s3.*` keys. Only `s3.bucket` is required; a custom endpoint
    /// turns on path-style addressing unless `s3.force_path_style` says otherwise.
    pub fn from_snapshot(snapshot: &MediaConfigSnapshot) -> BlobResult<Self> {
        let bucket = snapshot
            .get_string("s3.bucket")
            .ok_or_else(|| BlobError::invalid("s3.bucket is required for the s3 store"))?;

        let mut config = Self::new(bucket);
        if let Some(region) = snapshot.get_string("s3.region") {
            config.region = region;
        }
        config.endpoint_url = snapshot.get_string("s3.endpoint_url");
        config.access_key_id = snapshot.get_string("s3.access_key_id");
        config.secret_access_key = snapshot.get_string("s3.secret_access_key");
        config.force_path_style = snapshot
            .get_bool("s3.force_path_style")
            .unwrap_or(config.endpoint_url.is_some());
        Ok(config)
    }
}

/// S3-compatible store using the AWS SDK
///
/// Metadata comes from `HeadObject`; content is streamed from `GetObject`
/// chunk by chunk, with the `Range` header set for native range reads.
#[derive(Clone)]
pub struct S3CompatibleStore {
    client: Client,
    bucket: String,
}

impl S3CompatibleStore {
    pub async fn new(config: S3Config) -> Self {
        let bucket = config.bucket.clone();
        let client = Self::create_client(config).await;
        Self { client, bucket }
    }

    /// Wrap an already configured client
    pub fn from_client(client: Client, bucket: String) -> Self {
        Self { client, bucket }
    }

    async fn create_client(config: S3Config) -> Client {
        let mut loader =
            aws_config::defaults(BehaviorVersion::latest()).region(Region::new(config.region));

        if let (Some(access_key_id), Some(secret_access_key)) =
            (config.access_key_id, config.secret_access_key)
        {
            let credentials =
                Credentials::new(access_key_id, secret_access_key, None, None, "media-config");
            loader = loader.credentials_provider(credentials);
        }
        if let Some(endpoint_url) = config.endpoint_url {
            loader = loader.endpoint_url(endpoint_url);
        }

        let aws_config = loader.load().await;

        Client::from_conf(
            aws_sdk_s3::config::Builder::from(&aws_config)
                .force_path_style(config.force_path_style)
                .build(),
        )
    }

    fn map_aws_error(err: impl std::error::Error + Send + Sync + 'static) -> BlobError {
        BlobError::backend(err)
    }
}

#[async_trait]
impl BlobStore for S3CompatibleStore {
    async fn head(&self, key: &str) -> BlobResult<ObjectHead> {
        let result = self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|err| {
                if err.as_service_error().is_some_and(|e| e.is_not_found()) {
                    BlobError::object_not_found(key)
                } else {
                    Self::map_aws_error(err)
                }
            })?;

        Ok(ObjectHead {
            size_bytes: object_size(result.content_length, key)?,
            content_type: result.content_type,
        })
    }

    async fn get(&self, key: &str, range: Option<ByteRange>) -> BlobResult<GetResult> {
        let mut request = self.client.get_object().bucket(&self.bucket).key(key);

        if let Some(ref range) = range {
            request = request.range(range.to_header_value());
        }

        let result = request.send().await.map_err(|err| {
            if err.as_service_error().is_some_and(|e| e.is_no_such_key()) {
                BlobError::object_not_found(key)
            } else {
                Self::map_aws_error(err)
            }
        })?;

        if let Some(ref range) = range {
            check_content_range(range, result.content_range.as_deref(), key)?;
        }

        let size_bytes = object_size(result.content_length, key)?;
        let mut body = result.body;
        let stream = async_stream::stream! {
            while let Some(chunk) = body.next().await {
                yield chunk.map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e));
            }
        };
        let stream: ByteStream = Box::pin(stream);

        Ok(GetResult { stream, size_bytes })
    }

    fn capabilities(&self) -> StoreCapabilities {
        StoreCapabilities::basic().with_range()
    }
}

/// Objects without a usable `Content-Length` cannot be planned against.
fn object_size(content_length: Option<i64>, key: &str) -> BlobResult<u64> {
    content_length
        .and_then(|len| u64::try_from(len).ok())
        .ok_or_else(|| {
            BlobError::backend(std::io::Error::other(format!(
                "object {key} reported no content length"
            )))
        })
}

/// A `Content-Range` reply must start where the request did. No header at
/// all means the whole object came back, which the caller checks by size.
fn check_content_range(requested: &ByteRange, content_range: Option<&str>, key: &str) -> BlobResult<()> {
    let Some(content_range) = content_range else {
        return Ok(());
    };
    let expected = format!("bytes {}-", requested.start);
    if content_range.starts_with(&expected) {
        Ok(())
    } else {
        Err(BlobError::backend(std::io::Error::other(format!(
            "range read of {key} answered with {content_range}, requested {}",
            requested.to_header_value()
        ))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use media_core::MediaConfig;

    #[test]
    fn config_requires_bucket() {
        let err = S3Config::from_snapshot(&MediaConfig::new().snapshot()).unwrap_err();
        assert!(err.to_string().contains("s3.bucket"));
    }

    #[test]
    fn custom_endpoint_implies_path_style() {
        let mut config = MediaConfig::new();
        config.set("s3.bucket", "media");
        config.set("s3.endpoint_url", "http://127.0.0.1:9000");
        config.set("s3.region", "eu-west-1");

        let s3 = S3Config::from_snapshot(&config.snapshot()).unwrap();
        assert_eq!(s3.bucket, "media");
        assert_eq!(s3.region, "eu-west-1");
        assert!(s3.force_path_style);
        assert!(s3.access_key_id.is_none());

        config.set("s3.force_path_style", "false");
        assert!(!S3Config::from_snapshot(&config.snapshot()).unwrap().force_path_style);
    }

    #[test]
    fn aws_defaults_without_endpoint() {
        let mut config = MediaConfig::new();
        config.set("s3.bucket", "media");
        let s3 = S3Config::from_snapshot(&config.snapshot()).unwrap();
        assert_eq!(s3.region, "us-east-1");
        assert!(!s3.force_path_style);
    }

    #[test]
    fn missing_or_negative_length_is_a_backend_error() {
        assert_eq!(object_size(Some(1000), "a").unwrap(), 1000);
        assert_eq!(object_size(Some(0), "a").unwrap(), 0);

        let err = object_size(None, "videos/a.mp4").unwrap_err();
        assert!(matches!(err, BlobError::Backend { .. }));
        assert!(err.to_string().contains("videos/a.mp4"));
        assert!(object_size(Some(-1), "a").is_err());
    }

    #[test]
    fn content_range_must_match_the_request() {
        let requested = ByteRange::new(500, Some(509));
        assert!(check_content_range(&requested, Some("bytes 500-509/1000"), "a").is_ok());
        assert!(check_content_range(&requested, None, "a").is_ok());

        let err = check_content_range(&requested, Some("bytes 0-999/1000"), "a").unwrap_err();
        assert!(matches!(err, BlobError::Backend { .. }));
        assert!(check_content_range(&requested, Some("bytes 5000-5009/10000"), "a").is_err());
    }
}

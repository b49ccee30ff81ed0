//! S3 implementation of the result store.

use std::collections::VecDeque;
use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use futures::stream::BoxStream;
use futures::StreamExt;

use crate::key::parse_result_key;
use crate::store::{ResultStore, StorageError, StoredResult};

/// Result store backed by an S3 bucket.
pub struct S3ResultStore {
    client: aws_sdk_s3::Client,
    bucket: String,
    prefix: String,
}

/// Listing pagination state carried between `list_completed` polls.
struct ListState {
    continuation: Option<String>,
    buffered: VecDeque<StoredResult>,
    exhausted: bool,
}

impl S3ResultStore {
    /// Create a store over an existing S3 client.
    pub fn new(client: aws_sdk_s3::Client, bucket: String, prefix: String) -> Self {
        Self {
            client,
            bucket,
            prefix,
        }
    }

    /// Build the S3 client from ambient AWS configuration.
    ///
    /// Falls back to `us-east-1` when no region is configured and honours
    /// `force_path_style` for S3-compatible stores addressed by path.
    pub async fn from_env(bucket: String, prefix: String, force_path_style: bool) -> Self {
        let region = aws_config::meta::region::RegionProviderChain::default_provider()
            .or_else("us-east-1");
        let shared = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(region)
            .load()
            .await;
        let config = aws_sdk_s3::config::Builder::from(&shared)
            .force_path_style(force_path_style)
            .build();
        Self::new(aws_sdk_s3::Client::from_conf(config), bucket, prefix)
    }

    /// Fetch one listing page and append its result keys to the state.
    async fn fetch_page(&self, state: &mut ListState) -> Result<(), StorageError> {
        let mut request = self
            .client
            .list_objects_v2()
            .bucket(&self.bucket)
            .prefix(format!("{}/", self.prefix));
        if let Some(token) = state.continuation.take() {
            request = request.continuation_token(token);
        }

        let page = request
            .send()
            .await
            .map_err(|e| StorageError::List(e.to_string()))?;

        state.continuation = page.next_continuation_token().map(str::to_string);
        state.exhausted = state.continuation.is_none();

        for object in page.contents() {
            let Some(key) = object.key() else { continue };
            match parse_result_key(&self.prefix, key) {
                Some(job_id) => state.buffered.push_back(StoredResult {
                    job_id,
                    key: key.to_string(),
                }),
                None => tracing::debug!(key, "Skipping object without a result key"),
            }
        }
        Ok(())
    }
}

#[async_trait]
impl ResultStore for S3ResultStore {
    fn list_completed(&self) -> BoxStream<'_, Result<StoredResult, StorageError>> {
        let state = ListState {
            continuation: None,
            buffered: VecDeque::new(),
            exhausted: false,
        };
        futures::stream::try_unfold(state, move |mut state| async move {
            loop {
                if let Some(item) = state.buffered.pop_front() {
                    return Ok(Some((item, state)));
                }
                if state.exhausted {
                    return Ok(None);
                }
                self.fetch_page(&mut state).await?;
            }
        })
        .boxed()
    }

    async fn store(&self, key: &str, bytes: Vec<u8>) -> Result<(), StorageError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type("image/jpeg")
            .body(ByteStream::from(bytes))
            .send()
            .await
            .map_err(|e| StorageError::Write(e.to_string()))?;

        tracing::debug!(key, "Stored result object");
        Ok(())
    }

    async fn presign(&self, key: &str, ttl: Duration) -> Result<String, StorageError> {
        let config = PresigningConfig::expires_in(ttl)
            .map_err(|e| StorageError::Access(e.to_string()))?;

        let presigned = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .presigned(config)
            .await
            .map_err(|e| StorageError::Access(e.to_string()))?;

        Ok(presigned.uri().to_string())
    }

    async fn probe(&self) -> Result<(), StorageError> {
        self.client
            .list_objects_v2()
            .bucket(&self.bucket)
            .prefix(format!("{}/", self.prefix))
            .max_keys(1)
            .send()
            .await
            .map_err(|e| StorageError::Probe(e.to_string()))?;
        Ok(())
    }
}

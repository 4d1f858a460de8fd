use anyhow::Context;
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::Client as S3Client;
use aws_sdk_s3::error::SdkError;
use aws_sdk_s3::primitives::ByteStream;
use chrono::{DateTime, Utc};
use std::sync::Arc;

use super::object_store::{ObjectInfo, ObjectStore};
use crate::error::EtlError;

/// ObjectStore implementation backed by S3.
#[derive(Clone)]
pub struct S3ObjectStore {
    client: Arc<S3Client>,
}

impl S3ObjectStore {
    pub fn new(client: Arc<S3Client>) -> Self {
        Self { client }
    }

    /// Build a client from the ambient AWS environment (credential chain,
    /// region resolution).
    pub async fn from_env() -> Self {
        let aws_config = aws_config::defaults(BehaviorVersion::latest()).load().await;
        Self::new(Arc::new(S3Client::new(&aws_config)))
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put(&self, bucket: &str, key: &str, bytes: Vec<u8>) -> Result<(), EtlError> {
        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(bytes))
            .send()
            .await
            .context("Failed to upload object to S3")?;
        Ok(())
    }

    async fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>, EtlError> {
        let response = match self.client.get_object().bucket(bucket).key(key).send().await {
            Ok(response) => response,
            Err(SdkError::ServiceError(err)) if err.err().is_no_such_key() => {
                return Err(EtlError::NotFound(format!("s3://{bucket}/{key}")));
            }
            Err(err) => {
                return Err(anyhow::Error::from(err)
                    .context("Failed to get object from S3")
                    .into());
            }
        };

        let bytes = response
            .body
            .collect()
            .await
            .context("Failed to collect S3 response body")?
            .into_bytes()
            .to_vec();

        Ok(bytes)
    }

    async fn exists(&self, bucket: &str, key: &str) -> Result<bool, EtlError> {
        match self.client.head_object().bucket(bucket).key(key).send().await {
            Ok(_) => Ok(true),
            // A missing object is an answer, not a failure. Anything else
            // (auth, network) must surface so the caller never mistakes an
            // access-denied probe for "not present".
            Err(SdkError::ServiceError(err)) if err.err().is_not_found() => Ok(false),
            Err(err) => Err(anyhow::Error::from(err)
                .context("Failed to probe object in S3")
                .into()),
        }
    }

    async fn list(&self, bucket: &str) -> Result<Vec<ObjectInfo>, EtlError> {
        let mut objects = Vec::new();
        let mut pages = self
            .client
            .list_objects_v2()
            .bucket(bucket)
            .into_paginator()
            .send();

        while let Some(page) = pages.next().await {
            let page = page.context("Failed to list bucket objects")?;
            for object in page.contents() {
                let key = match object.key() {
                    Some(key) => key.to_string(),
                    None => continue,
                };
                let last_modified = object
                    .last_modified()
                    .and_then(|ts| DateTime::<Utc>::from_timestamp(ts.secs(), ts.subsec_nanos()))
                    .unwrap_or(DateTime::<Utc>::UNIX_EPOCH);
                objects.push(ObjectInfo { key, last_modified });
            }
        }

        Ok(objects)
    }
}

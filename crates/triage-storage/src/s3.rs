use aws_sdk_s3::Client;
use tracing::debug;

use crate::error::StorageError;
use crate::objects;
use crate::store::{BoxFuture, KeyValueStore};

/// Durable store backed by an S3 bucket. Every key is placed under `prefix`.
pub struct S3Store {
    client: Client,
    bucket: String,
    prefix: String,
}

impl S3Store {
    pub fn new(client: Client, bucket: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
            prefix: prefix.into(),
        }
    }

    fn object_key(&self, key: &str) -> String {
        if self.prefix.is_empty() {
            key.to_string()
        } else {
            format!("{}/{key}", self.prefix.trim_end_matches('/'))
        }
    }
}

impl KeyValueStore for S3Store {
    fn get<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<Option<Vec<u8>>, StorageError>> {
        Box::pin(async move {
            let object_key = self.object_key(key);
            debug!(bucket = %self.bucket, key = %object_key, "s3 get");
            objects::get_object(&self.client, &self.bucket, &object_key).await
        })
    }

    fn put<'a>(&'a self, key: &'a str, value: Vec<u8>) -> BoxFuture<'a, Result<(), StorageError>> {
        Box::pin(async move {
            let object_key = self.object_key(key);
            debug!(bucket = %self.bucket, key = %object_key, bytes = value.len(), "s3 put");
            objects::put_object(
                &self.client,
                &self.bucket,
                &object_key,
                value,
                Some("application/json"),
            )
            .await
        })
    }

    fn remove<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<(), StorageError>> {
        Box::pin(async move {
            let object_key = self.object_key(key);
            debug!(bucket = %self.bucket, key = %object_key, "s3 delete");
            objects::delete_object(&self.client, &self.bucket, &object_key).await
        })
    }
}

use std::sync::Arc;

use aws_sdk_bedrockruntime::config::Credentials;

use triage_storage::memory::MemoryStore;
use triage_storage::s3::S3Store;
use triage_storage::store::KeyValueStore;

use crate::config::{CredentialSource, StorageConfig};

/// Build an `SdkConfig` from a region and credential source.
pub async fn build_aws_config(region: &str, creds: &CredentialSource) -> aws_config::SdkConfig {
    let mut builder = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new(region.to_string()));

    match creds {
        CredentialSource::Inline {
            access_key_id,
            secret_access_key,
            session_token,
        } => {
            builder = builder.credentials_provider(Credentials::new(
                access_key_id,
                secret_access_key,
                session_token.clone(),
                None,
                "triage-config",
            ));
        }
        CredentialSource::Profile { profile_name } => {
            builder = builder.profile_name(profile_name);
        }
        CredentialSource::DefaultChain => {}
    }

    builder.load().await
}

/// Open the configured key-value store.
pub fn build_store(
    storage: &StorageConfig,
    sdk_config: &aws_config::SdkConfig,
) -> Arc<dyn KeyValueStore> {
    match storage {
        StorageConfig::Memory => Arc::new(MemoryStore::new()),
        StorageConfig::S3 { bucket, prefix } => Arc::new(S3Store::new(
            aws_sdk_s3::Client::new(sdk_config),
            bucket.clone(),
            prefix.clone(),
        )),
    }
}

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use triage_core::models::emergency::Coordinates;
use triage_core::models::profile::PatientProfile;
use triage_engine::decision::{DEFAULT_DEDUP_WINDOW, DecisionSettings};
use triage_engine::followup::DelayRange;
use triage_engine::hospital::Facility;
use triage_gateway::context::DEFAULT_TURN_CHAR_LIMIT;
use triage_gateway::gateway::CompletionOptions;

/// Current config version. Bump this when adding fields or changing shape.
/// Each bump requires a corresponding entry in [`migrate`].
const CURRENT_VERSION: u32 = 1;

/// Overrides the config file location.
pub const CONFIG_ENV: &str = "TRIAGE_CONFIG";

const DEFAULT_REGION: &str = "us-east-1";
const DEFAULT_MODEL_ID: &str = "us.anthropic.claude-sonnet-4-20250514-v1:0";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriageConfig {
    /// Schema version. Missing or 0 = pre-versioned config.
    #[serde(default)]
    pub config_version: u32,
    #[serde(default = "default_region")]
    pub region: String,
    #[serde(default = "default_model_id")]
    pub model_id: String,
    #[serde(default)]
    pub credentials: CredentialSource,
    #[serde(default)]
    pub gateway: CompletionOptions,
    #[serde(default = "default_context_char_limit")]
    pub context_char_limit: usize,
    #[serde(default = "default_dedup_window_secs")]
    pub dedup_window_secs: u64,
    #[serde(default)]
    pub follow_up: DelayRange,
    #[serde(default)]
    pub storage: StorageConfig,
    /// Profile of the person answering; contact fields are never sent out.
    #[serde(default)]
    pub patient: PatientProfile,
    /// Where the patient is, for hospital referrals.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Coordinates>,
    #[serde(default)]
    pub hospitals: Vec<Facility>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CredentialSource {
    Inline {
        access_key_id: String,
        secret_access_key: String,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        session_token: Option<String>,
    },
    Profile {
        profile_name: String,
    },
    #[default]
    DefaultChain,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StorageConfig {
    /// Sessions and escalation state live only for this process.
    #[default]
    Memory,
    S3 {
        bucket: String,
        #[serde(default)]
        prefix: String,
    },
}

fn default_region() -> String {
    DEFAULT_REGION.to_string()
}

fn default_model_id() -> String {
    DEFAULT_MODEL_ID.to_string()
}

fn default_context_char_limit() -> usize {
    DEFAULT_TURN_CHAR_LIMIT
}

fn default_dedup_window_secs() -> u64 {
    DEFAULT_DEDUP_WINDOW.as_secs()
}

impl Default for TriageConfig {
    fn default() -> Self {
        Self {
            config_version: CURRENT_VERSION,
            region: default_region(),
            model_id: default_model_id(),
            credentials: CredentialSource::default(),
            gateway: CompletionOptions::default(),
            context_char_limit: default_context_char_limit(),
            dedup_window_secs: default_dedup_window_secs(),
            follow_up: DelayRange::default(),
            storage: StorageConfig::default(),
            patient: PatientProfile::default(),
            location: None,
            hospitals: Vec::new(),
        }
    }
}

impl TriageConfig {
    pub fn decision_settings(&self) -> DecisionSettings {
        DecisionSettings {
            options: self.gateway.clone(),
            context_char_limit: self.context_char_limit,
            dedup_window: Duration::from_secs(self.dedup_window_secs.max(1)),
        }
    }
}

fn config_dir() -> eyre::Result<PathBuf> {
    let base = dirs::config_dir().ok_or_else(|| eyre::eyre!("no config directory found"))?;
    Ok(base.join("triage-engine"))
}

/// `$TRIAGE_CONFIG`, or `config.json` in the platform config directory.
pub fn config_path() -> eyre::Result<PathBuf> {
    match std::env::var_os(CONFIG_ENV) {
        Some(path) if !path.is_empty() => Ok(PathBuf::from(path)),
        _ => Ok(config_dir()?.join("config.json")),
    }
}

/// Load the config, or defaults when no file exists yet.
pub fn load_config() -> eyre::Result<TriageConfig> {
    let path = config_path()?;
    if !path.exists() {
        tracing::info!(path = %path.display(), "no config file; using defaults");
        return Ok(TriageConfig::default());
    }
    load_config_from(&path)
}

pub fn load_config_from(path: &Path) -> eyre::Result<TriageConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("failed to read config at {}: {e}", path.display()))?;
    parse_config(&contents)
}

pub fn parse_config(contents: &str) -> eyre::Result<TriageConfig> {
    // Parse as raw JSON so we can run migrations before deserializing.
    let json: serde_json::Value = serde_json::from_str(contents)?;
    let on_disk_version = json
        .get("config_version")
        .and_then(|v| v.as_u64())
        .unwrap_or(0) as u32;

    let migrated = migrate(json, on_disk_version)?;
    let config: TriageConfig = serde_json::from_value(migrated)?;
    Ok(config)
}

/// Run sequential migrations from `from_version` up to [`CURRENT_VERSION`].
fn migrate(mut json: serde_json::Value, from_version: u32) -> eyre::Result<serde_json::Value> {
    if from_version > CURRENT_VERSION {
        return Err(eyre::eyre!(
            "config_version {from_version} is newer than this build supports ({CURRENT_VERSION}). \
             Please update triage."
        ));
    }

    // v0 → v1: `bedrock_model` became `model_id`; a bare `bucket` became
    // an S3 storage section.
    if from_version < 1 {
        let obj = json
            .as_object_mut()
            .ok_or_else(|| eyre::eyre!("config is not a JSON object"))?;
        if let Some(model) = obj.remove("bedrock_model") {
            obj.entry("model_id").or_insert(model);
        }
        if let Some(bucket) = obj.remove("bucket") {
            obj.entry("storage")
                .or_insert(serde_json::json!({ "type": "s3", "bucket": bucket }));
        }
        obj.insert(
            "config_version".to_string(),
            serde_json::Value::Number(1.into()),
        );
        tracing::info!("migrated config v0 → v1 (model_id, storage)");
    }

    Ok(json)
}

pub fn save_config(config: &TriageConfig) -> eyre::Result<()> {
    save_config_to(&config_path()?, config)
}

pub fn save_config_to(path: &Path, config: &TriageConfig) -> eyre::Result<()> {
    let dir = path
        .parent()
        .ok_or_else(|| eyre::eyre!("config path {} has no parent", path.display()))?;
    std::fs::create_dir_all(dir)?;

    // Always write the current version, regardless of what was loaded.
    let mut stamped = config.clone();
    stamped.config_version = CURRENT_VERSION;
    let json = serde_json::to_string_pretty(&stamped)?;

    // Write to a temp file then rename for atomicity
    let tmp_path = path.with_extension("json.tmp");
    std::fs::write(&tmp_path, json.as_bytes())?;

    // Inline credentials may be stored here
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&tmp_path, std::fs::Permissions::from_mode(0o600))?;
    }

    std::fs::rename(&tmp_path, path)?;

    tracing::info!(path = %path.display(), "config saved");
    Ok(())
}

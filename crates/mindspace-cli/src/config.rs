use std::path::PathBuf;
use std::time::Duration;

use mindspace_client::client::{ApiConfig, DEFAULT_BASE_URL};
use mindspace_core::models::credentials::Credentials;
use mindspace_screening::timer::{DEFAULT_DURATION_SECS, DEFAULT_LOW_TIME_SECS, TimerSettings};
use serde::{Deserialize, Serialize};

/// Current config version. Bump this when adding fields or changing shape.
/// Each bump requires a corresponding entry in [`migrate`].
const CURRENT_VERSION: u32 = 1;

const DEFAULT_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MindspaceConfig {
    /// Schema version. Missing or 0 = pre-versioned config.
    #[serde(default)]
    pub config_version: u32,
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    /// Added in v1 together with `low_time_threshold_secs`.
    pub screening_duration_secs: u32,
    pub low_time_threshold_secs: u32,
    pub created_at: jiff::Timestamp,
}

impl Default for MindspaceConfig {
    fn default() -> Self {
        Self {
            config_version: CURRENT_VERSION,
            api_base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            screening_duration_secs: DEFAULT_DURATION_SECS,
            low_time_threshold_secs: DEFAULT_LOW_TIME_SECS,
            created_at: jiff::Timestamp::now(),
        }
    }
}

impl MindspaceConfig {
    pub fn api_config(&self) -> ApiConfig {
        ApiConfig {
            base_url: self.api_base_url.clone(),
            timeout: Duration::from_secs(self.request_timeout_secs),
        }
    }

    pub fn timer_settings(&self) -> TimerSettings {
        TimerSettings {
            duration_secs: self.screening_duration_secs,
            low_time_secs: self.low_time_threshold_secs,
            ..TimerSettings::default()
        }
    }

    /// Apply `MINDSPACE_API_URL` on top of the file contents.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var("MINDSPACE_API_URL")
            && !url.trim().is_empty()
        {
            self.api_base_url = url.trim().to_string();
        }
        self
    }
}

/// Read the signed-in user's identity from the environment. The login flow
/// that produces these values lives outside this tool.
pub fn credentials_from_env() -> eyre::Result<Credentials> {
    let user_id = std::env::var("MINDSPACE_USER_ID")
        .map_err(|_| eyre::eyre!("MINDSPACE_USER_ID is not set; please log in again"))?;
    let access_token = std::env::var("MINDSPACE_ACCESS_TOKEN")
        .map_err(|_| eyre::eyre!("MINDSPACE_ACCESS_TOKEN is not set; please log in again"))?;
    Ok(Credentials::new(user_id, access_token))
}

fn config_dir() -> eyre::Result<PathBuf> {
    let base = dirs::config_dir().ok_or_else(|| eyre::eyre!("no config directory found"))?;
    Ok(base.join("com.mindspace.screening"))
}

pub fn config_path() -> eyre::Result<PathBuf> {
    Ok(config_dir()?.join("config.json"))
}

/// Load the config file, or defaults when none has been written yet.
pub fn load_config() -> eyre::Result<MindspaceConfig> {
    let path = config_path()?;
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file; using defaults");
        return Ok(MindspaceConfig::default());
    }

    let contents = std::fs::read_to_string(&path)
        .map_err(|e| eyre::eyre!("failed to read config at {}: {e}", path.display()))?;
    parse_config(&contents)
}

/// Parse raw JSON, running migrations before deserializing.
pub fn parse_config(contents: &str) -> eyre::Result<MindspaceConfig> {
    let json: serde_json::Value = serde_json::from_str(contents)?;
    let on_disk_version = json
        .get("config_version")
        .and_then(|v| v.as_u64())
        .unwrap_or(0) as u32;

    let migrated = migrate(json, on_disk_version)?;
    let config: MindspaceConfig = serde_json::from_value(migrated)?;
    Ok(config)
}

/// Run sequential migrations from `from_version` up to [`CURRENT_VERSION`].
fn migrate(mut json: serde_json::Value, from_version: u32) -> eyre::Result<serde_json::Value> {
    if from_version > CURRENT_VERSION {
        return Err(eyre::eyre!(
            "config_version {from_version} is newer than this build supports ({CURRENT_VERSION}). \
             Please update MindSpace."
        ));
    }

    // v0 → v1: timer settings became configurable
    if from_version < 1 {
        let obj = json
            .as_object_mut()
            .ok_or_else(|| eyre::eyre!("config is not a JSON object"))?;
        obj.entry("screening_duration_secs")
            .or_insert(serde_json::Value::Number(DEFAULT_DURATION_SECS.into()));
        obj.entry("low_time_threshold_secs")
            .or_insert(serde_json::Value::Number(DEFAULT_LOW_TIME_SECS.into()));
        obj.entry("request_timeout_secs")
            .or_insert(serde_json::Value::Number(DEFAULT_TIMEOUT_SECS.into()));
        obj.insert(
            "config_version".to_string(),
            serde_json::Value::Number(1.into()),
        );
        tracing::info!("migrated config v0 → v1 (added timer settings)");
    }

    Ok(json)
}

pub fn save_config(config: &MindspaceConfig) -> eyre::Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir)?;

    let mut stamped = config.clone();
    stamped.config_version = CURRENT_VERSION;

    let path = dir.join("config.json");
    let json = serde_json::to_string_pretty(&stamped)?;

    // Write to a temp file then rename
    let tmp_path = dir.join("config.json.tmp");
    std::fs::write(&tmp_path, json.as_bytes())?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&tmp_path, std::fs::Permissions::from_mode(0o600))?;
    }

    std::fs::rename(&tmp_path, &path)?;

    tracing::info!(path = %path.display(), "config saved");
    Ok(path)
}

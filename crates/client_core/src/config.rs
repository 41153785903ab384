use std::{fs, path::Path, time::Duration};

use anyhow::{anyhow, Context};
use serde::Deserialize;
use shared::{domain::DEFAULT_MAX_UPLOAD_BYTES, error::Locale};
use tracing::warn;
use url::Url;

pub const DEFAULT_SETTINGS_FILE: &str = "analyzer.toml";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub endpoint: String,
    pub request_timeout_secs: u64,
    pub max_upload_bytes: u64,
    pub locale: Locale,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:8000/predict".into(),
            request_timeout_secs: 30,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            locale: Locale::Es,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSettings {
    endpoint: Option<String>,
    request_timeout_secs: Option<u64>,
    max_upload_bytes: Option<u64>,
    locale: Option<String>,
}

impl Settings {
    pub fn endpoint_url(&self) -> anyhow::Result<Url> {
        let url = Url::parse(self.endpoint.trim())
            .with_context(|| format!("invalid prediction endpoint '{}'", self.endpoint))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(anyhow!(
                "prediction endpoint must use http or https, got '{other}'"
            )),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        self.endpoint_url()?;
        if self.request_timeout_secs == 0 {
            return Err(anyhow!("request_timeout_secs must be greater than zero"));
        }
        if self.max_upload_bytes == 0 {
            return Err(anyhow!("max_upload_bytes must be greater than zero"));
        }
        Ok(())
    }
}

/// Defaults, then `analyzer.toml` in the working directory, then environment.
pub fn load_settings() -> anyhow::Result<Settings> {
    load_settings_from(Path::new(DEFAULT_SETTINGS_FILE), |key| std::env::var(key).ok())
}

pub fn load_settings_from(
    path: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    match fs::read_to_string(path) {
        Ok(raw) => {
            let file_cfg: FileSettings = toml::from_str(&raw)
                .with_context(|| format!("failed to parse '{}'", path.display()))?;
            if let Some(v) = file_cfg.endpoint {
                settings.endpoint = v;
            }
            if let Some(v) = file_cfg.request_timeout_secs {
                settings.request_timeout_secs = v;
            }
            if let Some(v) = file_cfg.max_upload_bytes {
                settings.max_upload_bytes = v;
            }
            if let Some(v) = file_cfg.locale {
                settings.locale = Locale::try_from(v).map_err(|e| anyhow!(e))?;
            }
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
        Err(err) => {
            return Err(err).with_context(|| format!("failed to read '{}'", path.display()));
        }
    }

    if let Some(v) = env("PREDICT_ENDPOINT") {
        settings.endpoint = v;
    }
    if let Some(v) = env("APP__PREDICT_ENDPOINT") {
        settings.endpoint = v;
    }

    if let Some(v) = env("APP__REQUEST_TIMEOUT_SECS") {
        match v.parse::<u64>() {
            Ok(parsed) => settings.request_timeout_secs = parsed,
            Err(_) => warn!(value = %v, "ignoring unparsable APP__REQUEST_TIMEOUT_SECS"),
        }
    }

    if let Some(v) = env("APP__MAX_UPLOAD_BYTES") {
        match v.parse::<u64>() {
            Ok(parsed) => settings.max_upload_bytes = parsed,
            Err(_) => warn!(value = %v, "ignoring unparsable APP__MAX_UPLOAD_BYTES"),
        }
    }

    if let Some(v) = env("APP__LOCALE") {
        settings.locale = Locale::try_from(v).map_err(|e| anyhow!(e))?;
    }

    Ok(settings)
}

//! NCloud Authentication
//!
//! Loads API keys from the environment or the ncloud CLI configure file and
//! signs API Gateway requests (signature v2).

use super::error::{ApiError, Result};
use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::fmt;
use std::path::{Path, PathBuf};

pub const ACCESS_KEY_ENV: &str = "NCLOUD_ACCESS_KEY";
pub const SECRET_KEY_ENV: &str = "NCLOUD_SECRET_KEY";

pub const HEADER_TIMESTAMP: &str = "x-ncp-apigw-timestamp";
pub const HEADER_ACCESS_KEY: &str = "x-ncp-iam-access-key";
pub const HEADER_SIGNATURE: &str = "x-ncp-apigw-signature-v2";

/// Access key / secret key pair
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey {
    pub access_key: String,
    pub secret_key: String,
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiKey")
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

impl ApiKey {
    pub fn new(access_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            access_key: access_key.into(),
            secret_key: secret_key.into(),
        }
    }

    /// Read the key pair from `NCLOUD_ACCESS_KEY` / `NCLOUD_SECRET_KEY`
    pub fn from_env() -> Option<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read the key pair through `lookup`; empty values count as unset
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Option<Self> {
        let access_key = lookup(ACCESS_KEY_ENV).filter(|v| !v.is_empty())?;
        let secret_key = lookup(SECRET_KEY_ENV).filter(|v| !v.is_empty())?;
        Some(Self::new(access_key, secret_key))
    }
}

/// Get the ncloud CLI configure file path (~/.ncloud/configure)
pub fn get_ncloud_configure_path() -> Option<PathBuf> {
    dirs::home_dir().map(|p| p.join(".ncloud").join("configure"))
}

/// Parse the ncloud CLI configure file format
///
/// Only the first `ncloud_access_key_id` / `ncloud_secret_access_key` pair is used.
pub fn parse_configure_file(content: &str) -> Option<ApiKey> {
    let mut access_key = None;
    let mut secret_key = None;

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let value = value.trim();
        if value.is_empty() {
            continue;
        }
        match key.trim() {
            "ncloud_access_key_id" if access_key.is_none() => access_key = Some(value.to_string()),
            "ncloud_secret_access_key" if secret_key.is_none() => {
                secret_key = Some(value.to_string())
            }
            _ => {}
        }
    }

    Some(ApiKey::new(access_key?, secret_key?))
}

/// Load API credentials (env > ~/.ncloud/configure)
pub fn load_api_key() -> Result<ApiKey> {
    load_api_key_from(ApiKey::from_env(), get_ncloud_configure_path().as_deref())
}

/// Resolve credentials from an environment key pair, then a configure file
pub fn load_api_key_from(env_key: Option<ApiKey>, configure_path: Option<&Path>) -> Result<ApiKey> {
    if let Some(key) = env_key {
        tracing::debug!("Using API key from environment");
        return Ok(key);
    }

    if let Some(path) = configure_path {
        if let Ok(content) = std::fs::read_to_string(path) {
            if let Some(key) = parse_configure_file(&content) {
                tracing::debug!("Using API key from {:?}", path);
                return Ok(key);
            }
            tracing::warn!("No usable key pair in {:?}", path);
        }
    }

    Err(ApiError::MissingCredentials(format!(
        "set {} and {}, or run 'ncloud configure'",
        ACCESS_KEY_ENV, SECRET_KEY_ENV
    )))
}

/// Compute the API Gateway v2 signature
///
/// Message is `"{METHOD} {path_and_query}\n{timestamp}\n{access_key}"`, signed
/// with HMAC-SHA256 over the secret key and base64 encoded.
pub fn sign(method: &str, path_and_query: &str, timestamp_ms: &str, api_key: &ApiKey) -> Result<String> {
    let message = format!(
        "{} {}\n{}\n{}",
        method, path_and_query, timestamp_ms, api_key.access_key
    );

    let mut mac = Hmac::<Sha256>::new_from_slice(api_key.secret_key.as_bytes())
        .map_err(|e| ApiError::Signing(format!("HMAC-SHA256 key error: {e}")))?;
    mac.update(message.as_bytes());

    Ok(base64::engine::general_purpose::STANDARD.encode(mac.finalize().into_bytes()))
}

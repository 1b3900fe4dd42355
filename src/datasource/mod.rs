//! Data source lifecycle
//!
//! A data source is configured once with the provider configuration, reports
//! its type name and schema, and is then read any number of times. Each read
//! takes a user configuration and returns the refreshed state.
//!
//! - [`schema`] - Attribute/block declaration and config validation
//! - [`diag`] - Diagnostics returned from lifecycle calls
//!
//! [`DataSource`] is the typed trait implementations write against;
//! [`DynamicDataSource`] is its object-safe JSON form, used by the provider
//! registry.

pub mod diag;
pub mod schema;

use crate::provider::ProviderConfig;
use async_trait::async_trait;
use chrono::SecondsFormat;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::sync::Arc;

pub use diag::{Diagnostic, Diagnostics, Severity};
pub use schema::{Attribute, AttributeType, Block, Mode, Schema};

#[async_trait]
pub trait DataSource: Send + Sync {
    type Config: DeserializeOwned + Send;
    type State: Serialize + Send;

    /// Suffix appended to the provider type name
    fn type_name_suffix(&self) -> &'static str;

    fn metadata(&self, provider_type_name: &str) -> String {
        format!("{}_{}", provider_type_name, self.type_name_suffix())
    }

    fn schema(&self) -> Schema;

    /// Hand the provider configuration to the data source
    ///
    /// `None` means the provider has not been configured yet.
    fn configure(&mut self, provider_data: Option<Arc<ProviderConfig>>);

    async fn read(&self, diags: &mut Diagnostics, config: Self::Config) -> Option<Self::State>;
}

/// JSON-in / JSON-out form of [`DataSource`]
#[async_trait]
pub trait DynamicDataSource: Send + Sync {
    fn metadata(&self, provider_type_name: &str) -> String;

    fn schema(&self) -> Schema;

    fn configure(&mut self, provider_data: Option<Arc<ProviderConfig>>);

    async fn read_value(&self, diags: &mut Diagnostics, config: Value) -> Option<Value>;
}

#[async_trait]
impl<T: DataSource + 'static> DynamicDataSource for T {
    fn metadata(&self, provider_type_name: &str) -> String {
        DataSource::metadata(self, provider_type_name)
    }

    fn schema(&self) -> Schema {
        DataSource::schema(self)
    }

    fn configure(&mut self, provider_data: Option<Arc<ProviderConfig>>) {
        DataSource::configure(self, provider_data)
    }

    async fn read_value(&self, diags: &mut Diagnostics, config: Value) -> Option<Value> {
        DataSource::schema(self).validate(&config, diags);
        if diags.has_error() {
            return None;
        }

        let config: T::Config = match serde_json::from_value(config) {
            Ok(config) => config,
            Err(e) => {
                diags.add_error("Invalid Configuration", e.to_string());
                return None;
            }
        };

        let state = DataSource::read(self, diags, config).await?;

        match serde_json::to_value(state) {
            Ok(value) => Some(value),
            Err(e) => {
                diags.add_error("State Serialization Failed", e.to_string());
                None
            }
        }
    }
}

/// How the synthetic `id` of a refreshed data source is produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum IdStrategy {
    /// Current UTC time; every refresh yields a new id
    #[default]
    Timestamp,
    /// SHA-256 of the computed list; unchanged remote state keeps its id
    ContentHash,
}

impl IdStrategy {
    /// Id for a refreshed list; fails only if a content hash cannot serialize `computed`
    pub fn refresh_id<T: Serialize>(self, computed: &T) -> serde_json::Result<String> {
        match self {
            IdStrategy::Timestamp => Ok(chrono::Utc::now().to_rfc3339_opts(SecondsFormat::Nanos, true)),
            IdStrategy::ContentHash => {
                let bytes = serde_json::to_vec(computed)?;
                Ok(format!("{:x}", Sha256::digest(&bytes)))
            }
        }
    }
}

/// Error diagnostic for a read before configure
pub(crate) fn unconfigured(diags: &mut Diagnostics, type_name: &str) {
    diags.add_error(
        "Unconfigured Data Source",
        format!(
            "{} was read before the provider was configured. Please report this issue to the provider developers.",
            type_name
        ),
    );
}

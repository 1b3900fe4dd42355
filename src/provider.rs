//! NCloud provider
//!
//! Owns the provider configuration and the registry of data sources,
//! keyed by their full type name (`ncloud_mysql_products`, ...).

use crate::datasource::{Diagnostics, DynamicDataSource, IdStrategy, Schema};
use crate::mysql::{MysqlImageProductsDataSource, MysqlProductsDataSource};
use crate::ncloud::client::NcloudClient;
use crate::ncloud::configuration::Site;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

pub const PROVIDER_TYPE_NAME: &str = "ncloud";

/// Configuration handed to every data source on configure
#[derive(Clone)]
pub struct ProviderConfig {
    pub client: NcloudClient,
    pub region_code: String,
    pub site: Site,
    pub id_strategy: IdStrategy,
}

pub struct NcloudProvider {
    config: Option<Arc<ProviderConfig>>,
    data_sources: BTreeMap<String, Box<dyn DynamicDataSource>>,
}

impl Default for NcloudProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl NcloudProvider {
    pub fn new() -> Self {
        let all: Vec<Box<dyn DynamicDataSource>> = vec![
            Box::new(MysqlProductsDataSource::new()),
            Box::new(MysqlImageProductsDataSource::new()),
        ];

        let data_sources = all
            .into_iter()
            .map(|ds| (ds.metadata(PROVIDER_TYPE_NAME), ds))
            .collect();

        Self {
            config: None,
            data_sources,
        }
    }

    pub fn configure(&mut self, config: ProviderConfig) {
        tracing::info!(
            region = %config.region_code,
            site = ?config.site,
            id_strategy = ?config.id_strategy,
            "Configuring provider"
        );

        let config = Arc::new(config);
        for ds in self.data_sources.values_mut() {
            ds.configure(Some(config.clone()));
        }
        self.config = Some(config);
    }

    pub fn config(&self) -> Option<&ProviderConfig> {
        self.config.as_deref()
    }

    /// Registered data source type names, sorted
    pub fn data_source_names(&self) -> Vec<&str> {
        self.data_sources.keys().map(String::as_str).collect()
    }

    pub fn schema(&self, type_name: &str) -> Option<Schema> {
        self.data_sources.get(type_name).map(|ds| ds.schema())
    }

    /// Read a data source by type name
    pub async fn read_data_source(&self, type_name: &str, config: Value) -> (Option<Value>, Diagnostics) {
        let mut diags = Diagnostics::new();

        let Some(ds) = self.data_sources.get(type_name) else {
            diags.add_error(
                "Unknown data source",
                format!(
                    "The provider does not support data source \"{}\". Available: {}",
                    type_name,
                    self.data_source_names().join(", ")
                ),
            );
            return (None, diags);
        };

        tracing::debug!("Reading data source {}", type_name);
        let state = ds.read_value(&mut diags, config).await;
        (state, diags)
    }
}

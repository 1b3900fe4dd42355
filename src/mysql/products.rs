//! `ncloud_mysql_products` data source
//!
//! Server products available for a Cloud DB for MySQL image.

use crate::common::{dump_output, filters_block, marshal_unchecked_string, refresh_list, DataSourceFilter};
use crate::datasource::{unconfigured, Attribute, AttributeType, DataSource, Diagnostics, Schema};
use crate::provider::{ProviderConfig, PROVIDER_TYPE_NAME};
use crate::vmysql::{code_of, GetCloudMysqlProductListRequest, Product};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Default)]
pub struct MysqlProductsDataSource {
    config: Option<Arc<ProviderConfig>>,
}

impl MysqlProductsDataSource {
    pub fn new() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MysqlProductsConfig {
    pub cloud_mysql_image_product_code: String,
    pub product_code: Option<String>,
    pub exclusion_product_code: Option<String>,
    pub output_file: Option<String>,
    pub filter: Option<Vec<DataSourceFilter>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MysqlProductsState {
    pub id: String,
    pub cloud_mysql_image_product_code: String,
    pub product_code: Option<String>,
    pub exclusion_product_code: Option<String>,
    pub output_file: Option<String>,
    pub filter: Option<Vec<DataSourceFilter>>,
    pub product_list: Vec<MysqlProductModel>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MysqlProductModel {
    pub product_code: Option<String>,
    pub product_name: Option<String>,
    pub product_type: Option<String>,
    pub product_description: Option<String>,
    pub infra_resource_type: Option<String>,
    pub cpu_count: Option<i64>,
    pub memory_size: Option<i64>,
    pub disk_type: Option<String>,
}

impl From<&Product> for MysqlProductModel {
    fn from(output: &Product) -> Self {
        Self {
            product_code: output.product_code.clone(),
            product_name: output.product_name.clone(),
            product_type: code_of(&output.product_type),
            product_description: output.product_description.clone(),
            infra_resource_type: code_of(&output.infra_resource_type),
            cpu_count: output.cpu_count.map(i64::from),
            memory_size: output.memory_size,
            disk_type: code_of(&output.disk_type),
        }
    }
}

/// Shape written to `output_file`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct MysqlProductOutput {
    product_code: String,
    product_name: String,
    product_type: String,
    product_description: String,
    infra_resource_type: String,
    cpu_count: i64,
    memory_size: i64,
    disk_type: String,
}

impl From<&MysqlProductModel> for MysqlProductOutput {
    fn from(m: &MysqlProductModel) -> Self {
        Self {
            product_code: m.product_code.clone().unwrap_or_default(),
            product_name: m.product_name.clone().unwrap_or_default(),
            product_type: m.product_type.clone().unwrap_or_default(),
            product_description: m.product_description.clone().unwrap_or_default(),
            infra_resource_type: m.infra_resource_type.clone().unwrap_or_default(),
            cpu_count: m.cpu_count.unwrap_or_default(),
            memory_size: m.memory_size.unwrap_or_default(),
            disk_type: m.disk_type.clone().unwrap_or_default(),
        }
    }
}

pub fn flatten_mysql_products(list: &[Product]) -> Vec<MysqlProductModel> {
    list.iter().map(MysqlProductModel::from).collect()
}

fn product_attributes() -> BTreeMap<String, Attribute> {
    let string = || Attribute::computed(AttributeType::String);
    let int64 = || Attribute::computed(AttributeType::Int64);

    BTreeMap::from([
        ("product_code".to_string(), string()),
        ("product_name".to_string(), string()),
        ("product_type".to_string(), string()),
        ("product_description".to_string(), string()),
        ("infra_resource_type".to_string(), string()),
        ("cpu_count".to_string(), int64()),
        ("memory_size".to_string(), int64()),
        ("disk_type".to_string(), string()),
    ])
}

#[async_trait]
impl DataSource for MysqlProductsDataSource {
    type Config = MysqlProductsConfig;
    type State = MysqlProductsState;

    fn type_name_suffix(&self) -> &'static str {
        "mysql_products"
    }

    fn schema(&self) -> Schema {
        let attributes = BTreeMap::from([
            ("id".to_string(), Attribute::computed(AttributeType::String)),
            (
                "cloud_mysql_image_product_code".to_string(),
                Attribute::required(AttributeType::String),
            ),
            ("product_code".to_string(), Attribute::optional(AttributeType::String)),
            (
                "exclusion_product_code".to_string(),
                Attribute::optional(AttributeType::String),
            ),
            ("output_file".to_string(), Attribute::optional(AttributeType::String)),
            (
                "product_list".to_string(),
                Attribute::computed(AttributeType::ListNested {
                    attributes: product_attributes(),
                }),
            ),
        ]);

        Schema {
            attributes,
            blocks: BTreeMap::from([("filter".to_string(), filters_block())]),
        }
    }

    fn configure(&mut self, provider_data: Option<Arc<ProviderConfig>>) {
        if provider_data.is_some() {
            self.config = provider_data;
        }
    }

    async fn read(&self, diags: &mut Diagnostics, data: MysqlProductsConfig) -> Option<MysqlProductsState> {
        let Some(provider) = self.config.as_ref() else {
            unconfigured(diags, &DataSource::metadata(self, PROVIDER_TYPE_NAME));
            return None;
        };

        let req_params = GetCloudMysqlProductListRequest {
            region_code: Some(provider.region_code.clone()),
            cloud_mysql_image_product_code: data.cloud_mysql_image_product_code.clone(),
            product_code: data.product_code.clone(),
            exclusion_product_code: data.exclusion_product_code.clone(),
        };
        let req_json = marshal_unchecked_string(&req_params);

        tracing::info!(req_params = %req_json, "GetMysqlProductsList");

        let response = match provider.client.vmysql.get_cloud_mysql_product_list(&req_params).await {
            Ok(response) => response,
            Err(e) => {
                diags.add_error("GetMysqlProductList", format!("error: {}, reqParams: {}", e, req_json));
                return None;
            }
        };

        tracing::info!(
            mysql_product_response = %marshal_unchecked_string(&response),
            "GetMysqlProductList response"
        );

        let products = flatten_mysql_products(&response.product_list);
        let refreshed = refresh_list(
            diags,
            data.filter.as_deref(),
            &product_attributes(),
            products,
            provider.id_strategy,
        )?;

        let outputs: Vec<MysqlProductOutput> = refreshed.items.iter().map(MysqlProductOutput::from).collect();
        dump_output(diags, data.output_file.as_deref(), &outputs);
        if diags.has_error() {
            return None;
        }

        Some(MysqlProductsState {
            id: refreshed.id,
            cloud_mysql_image_product_code: data.cloud_mysql_image_product_code,
            product_code: data.product_code,
            exclusion_product_code: data.exclusion_product_code,
            output_file: data.output_file,
            filter: data.filter,
            product_list: refreshed.items,
        })
    }
}

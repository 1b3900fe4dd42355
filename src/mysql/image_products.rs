//! `ncloud_mysql_image_products` data source
//!
//! MySQL image products; their codes feed `cloud_mysql_image_product_code`.

use crate::common::{dump_output, filters_block, marshal_unchecked_string, refresh_list, DataSourceFilter};
use crate::datasource::{unconfigured, Attribute, AttributeType, DataSource, Diagnostics, Schema};
use crate::provider::{ProviderConfig, PROVIDER_TYPE_NAME};
use crate::vmysql::{code_of, GetCloudMysqlImageProductListRequest, Product};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Default)]
pub struct MysqlImageProductsDataSource {
    config: Option<Arc<ProviderConfig>>,
}

impl MysqlImageProductsDataSource {
    pub fn new() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MysqlImageProductsConfig {
    pub product_code: Option<String>,
    pub generation_code: Option<String>,
    pub exclusion_product_code: Option<String>,
    pub output_file: Option<String>,
    pub filter: Option<Vec<DataSourceFilter>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MysqlImageProductsState {
    pub id: String,
    pub product_code: Option<String>,
    pub generation_code: Option<String>,
    pub exclusion_product_code: Option<String>,
    pub output_file: Option<String>,
    pub filter: Option<Vec<DataSourceFilter>>,
    pub image_product_list: Vec<MysqlImageProductModel>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MysqlImageProductModel {
    pub product_code: Option<String>,
    pub generation_code: Option<String>,
    pub product_name: Option<String>,
    pub product_description: Option<String>,
    pub product_type: Option<String>,
    pub infra_resource_type: Option<String>,
    pub platform_type: Option<String>,
    pub os_information: Option<String>,
    pub base_block_storage_size: Option<i64>,
}

impl From<&Product> for MysqlImageProductModel {
    fn from(output: &Product) -> Self {
        Self {
            product_code: output.product_code.clone(),
            generation_code: output.generation_code.clone(),
            product_name: output.product_name.clone(),
            product_description: output.product_description.clone(),
            product_type: code_of(&output.product_type),
            infra_resource_type: code_of(&output.infra_resource_type),
            platform_type: code_of(&output.platform_type),
            os_information: output.os_information.clone(),
            base_block_storage_size: output.base_block_storage_size,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct MysqlImageProductOutput {
    product_code: String,
    generation_code: String,
    product_name: String,
    product_description: String,
    product_type: String,
    infra_resource_type: String,
    platform_type: String,
    os_information: String,
    base_block_storage_size: i64,
}

impl From<&MysqlImageProductModel> for MysqlImageProductOutput {
    fn from(m: &MysqlImageProductModel) -> Self {
        Self {
            product_code: m.product_code.clone().unwrap_or_default(),
            generation_code: m.generation_code.clone().unwrap_or_default(),
            product_name: m.product_name.clone().unwrap_or_default(),
            product_description: m.product_description.clone().unwrap_or_default(),
            product_type: m.product_type.clone().unwrap_or_default(),
            infra_resource_type: m.infra_resource_type.clone().unwrap_or_default(),
            platform_type: m.platform_type.clone().unwrap_or_default(),
            os_information: m.os_information.clone().unwrap_or_default(),
            base_block_storage_size: m.base_block_storage_size.unwrap_or_default(),
        }
    }
}

fn image_product_attributes() -> BTreeMap<String, Attribute> {
    let computed = Attribute::computed;

    BTreeMap::from([
        ("product_code".to_string(), computed(AttributeType::String)),
        ("generation_code".to_string(), computed(AttributeType::String)),
        ("product_name".to_string(), computed(AttributeType::String)),
        ("product_description".to_string(), computed(AttributeType::String)),
        ("product_type".to_string(), computed(AttributeType::String)),
        ("infra_resource_type".to_string(), computed(AttributeType::String)),
        ("platform_type".to_string(), computed(AttributeType::String)),
        ("os_information".to_string(), computed(AttributeType::String)),
        ("base_block_storage_size".to_string(), computed(AttributeType::Int64)),
    ])
}

#[async_trait]
impl DataSource for MysqlImageProductsDataSource {
    type Config = MysqlImageProductsConfig;
    type State = MysqlImageProductsState;

    fn type_name_suffix(&self) -> &'static str {
        "mysql_image_products"
    }

    fn schema(&self) -> Schema {
        let computed = Attribute::computed;
        let attributes = BTreeMap::from([
            ("id".to_string(), computed(AttributeType::String)),
            ("product_code".to_string(), Attribute::optional(AttributeType::String)),
            ("generation_code".to_string(), Attribute::optional(AttributeType::String)),
            (
                "exclusion_product_code".to_string(),
                Attribute::optional(AttributeType::String),
            ),
            ("output_file".to_string(), Attribute::optional(AttributeType::String)),
            (
                "image_product_list".to_string(),
                computed(AttributeType::ListNested {
                    attributes: image_product_attributes(),
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

    async fn read(
        &self,
        diags: &mut Diagnostics,
        data: MysqlImageProductsConfig,
    ) -> Option<MysqlImageProductsState> {
        let Some(provider) = self.config.as_ref() else {
            unconfigured(diags, &DataSource::metadata(self, PROVIDER_TYPE_NAME));
            return None;
        };

        let req_params = GetCloudMysqlImageProductListRequest {
            region_code: Some(provider.region_code.clone()),
            product_code: data.product_code.clone(),
            generation_code: data.generation_code.clone(),
            exclusion_product_code: data.exclusion_product_code.clone(),
        };
        let req_json = marshal_unchecked_string(&req_params);

        tracing::info!(req_params = %req_json, "GetMysqlImageProductList");

        let response = match provider
            .client
            .vmysql
            .get_cloud_mysql_image_product_list(&req_params)
            .await
        {
            Ok(response) => response,
            Err(e) => {
                diags.add_error(
                    "GetMysqlImageProductList",
                    format!("error: {}, reqParams: {}", e, req_json),
                );
                return None;
            }
        };

        tracing::info!(
            mysql_image_product_response = %marshal_unchecked_string(&response),
            "GetMysqlImageProductList response"
        );

        let images: Vec<MysqlImageProductModel> =
            response.product_list.iter().map(MysqlImageProductModel::from).collect();
        let refreshed = refresh_list(
            diags,
            data.filter.as_deref(),
            &image_product_attributes(),
            images,
            provider.id_strategy,
        )?;

        let outputs: Vec<MysqlImageProductOutput> =
            refreshed.items.iter().map(MysqlImageProductOutput::from).collect();
        dump_output(diags, data.output_file.as_deref(), &outputs);
        if diags.has_error() {
            return None;
        }

        Some(MysqlImageProductsState {
            id: refreshed.id,
            product_code: data.product_code,
            generation_code: data.generation_code,
            exclusion_product_code: data.exclusion_product_code,
            output_file: data.output_file,
            filter: data.filter,
            image_product_list: refreshed.items,
        })
    }
}

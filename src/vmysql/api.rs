//! Cloud DB for MySQL (vmysql) v2 API

use super::model::{GetCloudMysqlImageProductListRequest, GetCloudMysqlProductListRequest, ProductListResponse};
use crate::ncloud::configuration::Configuration;
use crate::ncloud::error::Result;
use crate::ncloud::http::{to_query_pairs, NcloudHttpClient};
use serde_json::Value;

#[derive(Clone)]
pub struct V2Api {
    configuration: Configuration,
    http: NcloudHttpClient,
}

impl V2Api {
    pub fn new(configuration: Configuration, http: NcloudHttpClient) -> Self {
        Self { configuration, http }
    }

    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    /// List the server products available for a MySQL image
    pub async fn get_cloud_mysql_product_list(
        &self,
        request: &GetCloudMysqlProductListRequest,
    ) -> Result<ProductListResponse> {
        self.invoke_product_list("getCloudMysqlProductList", &to_query_pairs(request)?)
            .await
    }

    /// List the MySQL image products
    pub async fn get_cloud_mysql_image_product_list(
        &self,
        request: &GetCloudMysqlImageProductListRequest,
    ) -> Result<ProductListResponse> {
        self.invoke_product_list("getCloudMysqlImageProductList", &to_query_pairs(request)?)
            .await
    }

    async fn invoke_product_list(&self, action: &str, params: &[(String, String)]) -> Result<ProductListResponse> {
        tracing::debug!("invoke: service=vmysql, action={}", action);

        let response = self.http.get(&self.configuration, action, params).await?;
        Ok(unwrap_envelope(response, action)?)
    }
}

/// Responses are wrapped as `{"<action>Response": {...}}`
fn unwrap_envelope(mut response: Value, action: &str) -> serde_json::Result<ProductListResponse> {
    let key = format!("{}Response", action);
    let inner = response.get_mut(&key).map(Value::take);
    serde_json::from_value(inner.unwrap_or(response))
}

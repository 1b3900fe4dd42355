//! Cloud DB for MySQL request/response types
//!
//! Every vendor field is optional; a field the API omits stays `None`.

use serde::{Deserialize, Serialize};

/// Code / display-name pair used for enumerated vendor values
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommonCode {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub code_name: Option<String>,
}

/// Code of an optional CommonCode, unset when either level is absent
pub fn code_of(value: &Option<CommonCode>) -> Option<String> {
    value.as_ref().and_then(|c| c.code.clone())
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Product {
    pub product_code: Option<String>,
    pub product_name: Option<String>,
    pub product_type: Option<CommonCode>,
    pub product_description: Option<String>,
    pub infra_resource_type: Option<CommonCode>,
    pub infra_resource_detail_type: Option<CommonCode>,
    pub cpu_count: Option<i32>,
    pub memory_size: Option<i64>,
    pub base_block_storage_size: Option<i64>,
    pub platform_type: Option<CommonCode>,
    pub os_information: Option<String>,
    pub disk_type: Option<CommonCode>,
    pub db_kind_code: Option<String>,
    pub add_block_storage_size: Option<i64>,
    pub generation_code: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetCloudMysqlProductListRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region_code: Option<String>,
    pub cloud_mysql_image_product_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclusion_product_code: Option<String>,
}

impl GetCloudMysqlProductListRequest {
    pub fn new(region_code: impl Into<String>, image_product_code: impl Into<String>) -> Self {
        Self {
            region_code: Some(region_code.into()),
            cloud_mysql_image_product_code: image_product_code.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetCloudMysqlImageProductListRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclusion_product_code: Option<String>,
}

/// Body shared by the product list actions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductListResponse {
    pub request_id: Option<String>,
    pub return_code: Option<String>,
    pub return_message: Option<String>,
    pub total_rows: Option<i32>,
    pub product_list: Vec<Product>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_product_missing_fields_stay_unset() {
        let product: Product = serde_json::from_value(json!({
            "productCode": "SVR.VDBAS.STAND.C002.M008.NET.SSD.B050.G002",
            "productType": {"code": "STAND", "codeName": "Standard"},
            "cpuCount": 2
        }))
        .unwrap();

        assert_eq!(product.product_code.as_deref(), Some("SVR.VDBAS.STAND.C002.M008.NET.SSD.B050.G002"));
        assert_eq!(code_of(&product.product_type).as_deref(), Some("STAND"));
        assert_eq!(product.cpu_count, Some(2));
        assert_eq!(product.memory_size, None);
        assert_eq!(code_of(&product.disk_type), None);
    }

    #[test]
    fn test_code_of_handles_missing_code() {
        let partial = Some(CommonCode {
            code: None,
            code_name: Some("Standard".into()),
        });
        assert_eq!(code_of(&partial), None);
        assert_eq!(code_of(&None), None);
    }

    #[test]
    fn test_request_serializes_camel_case() {
        let mut req = GetCloudMysqlProductListRequest::new("KR", "IMG");
        req.product_code = Some("P".into());
        let value = serde_json::to_value(&req).unwrap();

        assert_eq!(value["regionCode"], "KR");
        assert_eq!(value["cloudMysqlImageProductCode"], "IMG");
        assert_eq!(value["productCode"], "P");
        assert!(value.get("exclusionProductCode").is_none());
    }

    #[test]
    fn test_response_without_list_is_empty() {
        let resp: ProductListResponse = serde_json::from_value(json!({
            "requestId": "r-1",
            "returnCode": "0",
            "totalRows": 0
        }))
        .unwrap();
        assert!(resp.product_list.is_empty());
        assert_eq!(resp.total_rows, Some(0));
    }
}

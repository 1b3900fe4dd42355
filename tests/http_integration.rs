//! Integration tests for the NCloud client and data sources using wiremock
//!
//! These tests run signed requests and full data source reads against a
//! mocked API gateway.

use ncloud_products::datasource::{IdStrategy, Severity};
use ncloud_products::ncloud::auth::ApiKey;
use ncloud_products::ncloud::client::NcloudClient;
use ncloud_products::ncloud::configuration::Site;
use ncloud_products::ncloud::ApiError;
use ncloud_products::provider::{NcloudProvider, ProviderConfig};
use ncloud_products::vmysql::GetCloudMysqlProductListRequest;
use serde_json::{json, Value};
use wiremock::matchers::{header, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const IMAGE_CODE: &str = "SW.VMYSL.OS.LNX64.ROCKY.0810.MYSQL.B050";

fn client(server: &MockServer) -> NcloudClient {
    NcloudClient::new(ApiKey::new("test-access", "test-secret"), Site::Public, Some(&server.uri()))
        .expect("client should build")
}

fn provider(server: &MockServer, id_strategy: IdStrategy) -> NcloudProvider {
    let mut provider = NcloudProvider::new();
    provider.configure(ProviderConfig {
        client: client(server),
        region_code: "KR".to_string(),
        site: Site::Public,
        id_strategy,
    });
    provider
}

fn product_list_body() -> Value {
    json!({
        "getCloudMysqlProductListResponse": {
            "requestId": "req-1",
            "returnCode": "0",
            "returnMessage": "success",
            "totalRows": 3,
            "productList": [
                {
                    "productCode": "SVR.VMYSL.STAND.C002.M008.NET.SSD.B050.G002",
                    "productName": "vCPU 2EA, Memory 8GB",
                    "productType": {"code": "STAND", "codeName": "Standard"},
                    "productDescription": "vCPU 2EA, Memory 8GB",
                    "infraResourceType": {"code": "VMYSL", "codeName": "Cloud DB for MySQL"},
                    "cpuCount": 2,
                    "memorySize": 8589934592i64,
                    "diskType": {"code": "NET", "codeName": "Network Storage"}
                },
                {
                    "productCode": "SVR.VMYSL.HICPU.C004.M008.NET.SSD.B050.G002",
                    "productName": "vCPU 4EA, Memory 8GB",
                    "productType": {"code": "HICPU", "codeName": "High CPU"},
                    "infraResourceType": {"code": "VMYSL"},
                    "cpuCount": 4,
                    "memorySize": 8589934592i64,
                    "diskType": {"code": "NET"}
                },
                {
                    "productCode": "SVR.VMYSL.STAND.C004.M016.NET.SSD.B050.G002",
                    "productName": "vCPU 4EA, Memory 16GB"
                }
            ]
        }
    })
}

async fn mount_product_list(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/vmysql/v2/getCloudMysqlProductList"))
        .and(query_param("regionCode", "KR"))
        .and(query_param("cloudMysqlImageProductCode", IMAGE_CODE))
        .and(query_param("responseFormatType", "json"))
        .and(header("x-ncp-iam-access-key", "test-access"))
        .and(header_exists("x-ncp-apigw-timestamp"))
        .and(header_exists("x-ncp-apigw-signature-v2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(product_list_body()))
        .mount(server)
        .await;
}

/// Test module for the signed HTTP client
mod client_tests {
    use super::*;

    #[tokio::test]
    async fn test_product_list_is_signed_and_parsed() {
        let server = MockServer::start().await;
        mount_product_list(&server).await;

        let req = GetCloudMysqlProductListRequest::new("KR", IMAGE_CODE);
        let response = client(&server)
            .vmysql
            .get_cloud_mysql_product_list(&req)
            .await
            .expect("request should succeed");

        assert_eq!(response.total_rows, Some(3));
        assert_eq!(response.product_list.len(), 3);
        assert_eq!(response.product_list[2].cpu_count, None);
    }

    #[tokio::test]
    async fn test_optional_params_are_sent_only_when_set() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/vmysql/v2/getCloudMysqlProductList"))
            .and(query_param("exclusionProductCode", "SVR.X"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "getCloudMysqlProductListResponse": {"productList": []}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let mut req = GetCloudMysqlProductListRequest::new("KR", IMAGE_CODE);
        req.exclusion_product_code = Some("SVR.X".into());
        let response = client(&server)
            .vmysql
            .get_cloud_mysql_product_list(&req)
            .await
            .expect("request should succeed");

        assert!(response.product_list.is_empty());

        let received = server.received_requests().await.expect("recording enabled");
        let query = received[0].url.query().unwrap_or_default().to_string();
        assert!(!query.contains("productCode="), "unset productCode leaked: {}", query);
    }

    #[tokio::test]
    async fn test_401_maps_to_status_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/vmysql/v2/getCloudMysqlProductList"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "responseError": {
                    "returnCode": "200",
                    "returnMessage": "Authentication Failed"
                }
            })))
            .mount(&server)
            .await;

        let req = GetCloudMysqlProductListRequest::new("KR", IMAGE_CODE);
        let err = client(&server)
            .vmysql
            .get_cloud_mysql_product_list(&req)
            .await
            .expect_err("request should fail");

        match err {
            ApiError::Status {
                status,
                return_code,
                return_message,
            } => {
                assert_eq!(status, 401);
                assert_eq!(return_code, "200");
                assert_eq!(return_message, "Authentication Failed");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_region_list() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/server/v2/getRegionList"))
            .and(header_exists("x-ncp-apigw-signature-v2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "getRegionListResponse": {
                    "totalRows": 2,
                    "regionList": [
                        {"regionCode": "KR", "regionName": "Korea"},
                        {"regionCode": "JPN", "regionName": "Japan"}
                    ]
                }
            })))
            .mount(&server)
            .await;

        let regions = client(&server).server.get_region_list().await.expect("request should succeed");

        assert_eq!(regions.len(), 2);
        assert_eq!(regions[1].region_code.as_deref(), Some("JPN"));
    }

    #[tokio::test]
    async fn test_invalid_json_is_decode_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/server/v2/getRegionList"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
            .mount(&server)
            .await;

        let err = client(&server).server.get_region_list().await.expect_err("should fail");
        assert!(matches!(err, ApiError::Decode(_)));
    }
}

/// Test module for full data source reads
mod data_source_tests {
    use super::*;

    #[tokio::test]
    async fn test_mysql_products_read() {
        let server = MockServer::start().await;
        mount_product_list(&server).await;

        let (state, diags) = provider(&server, IdStrategy::Timestamp)
            .read_data_source(
                "ncloud_mysql_products",
                json!({"cloud_mysql_image_product_code": IMAGE_CODE}),
            )
            .await;

        assert!(!diags.has_error(), "{:?}", diags);
        let state = state.expect("state");

        assert!(!state["id"].as_str().unwrap().is_empty());
        assert_eq!(state["cloud_mysql_image_product_code"], IMAGE_CODE);
        assert_eq!(state["product_code"], Value::Null);

        let list = state["product_list"].as_array().unwrap();
        assert_eq!(list.len(), 3);
        assert_eq!(list[0]["product_type"], "STAND");
        assert_eq!(list[0]["infra_resource_type"], "VMYSL");
        assert_eq!(list[0]["disk_type"], "NET");
        assert_eq!(list[0]["cpu_count"], 2);
        // vendor omitted these: unset, not zero
        assert_eq!(list[2]["cpu_count"], Value::Null);
        assert_eq!(list[2]["disk_type"], Value::Null);
    }

    #[tokio::test]
    async fn test_mysql_products_filters() {
        let server = MockServer::start().await;
        mount_product_list(&server).await;

        let (state, diags) = provider(&server, IdStrategy::Timestamp)
            .read_data_source(
                "ncloud_mysql_products",
                json!({
                    "cloud_mysql_image_product_code": IMAGE_CODE,
                    "filter": [
                        {"name": "product_type", "values": ["STAND"]},
                        {"name": "product_code", "values": ["C002"], "regex": true}
                    ]
                }),
            )
            .await;

        assert!(!diags.has_error(), "{:?}", diags);
        let list = state.unwrap()["product_list"].as_array().unwrap().clone();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0]["product_code"], "SVR.VMYSL.STAND.C002.M008.NET.SSD.B050.G002");
    }

    #[tokio::test]
    async fn test_unknown_filter_rejected_for_empty_list() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/vmysql/v2/getCloudMysqlProductList"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "getCloudMysqlProductListResponse": {
                    "returnCode": "0",
                    "totalRows": 0,
                    "productList": []
                }
            })))
            .mount(&server)
            .await;

        let (state, diags) = provider(&server, IdStrategy::Timestamp)
            .read_data_source(
                "ncloud_mysql_products",
                json!({
                    "cloud_mysql_image_product_code": IMAGE_CODE,
                    "filter": [{"name": "no_such_field", "values": ["x"]}]
                }),
            )
            .await;

        assert!(state.is_none());
        let diag = diags.errors().next().expect("error diagnostic");
        assert_eq!(diag.summary, "Invalid filter");
        assert!(diag.detail.contains("no_such_field"), "{}", diag.detail);
    }

    #[tokio::test]
    async fn test_content_hash_id_is_stable_across_refreshes() {
        let server = MockServer::start().await;
        mount_product_list(&server).await;

        let provider = provider(&server, IdStrategy::ContentHash);
        let config = json!({"cloud_mysql_image_product_code": IMAGE_CODE});

        let (first, _) = provider.read_data_source("ncloud_mysql_products", config.clone()).await;
        let (second, _) = provider.read_data_source("ncloud_mysql_products", config).await;

        assert_eq!(first.unwrap()["id"], second.unwrap()["id"]);
    }

    #[tokio::test]
    async fn test_timestamp_id_changes_across_refreshes() {
        let server = MockServer::start().await;
        mount_product_list(&server).await;

        let provider = provider(&server, IdStrategy::Timestamp);
        let config = json!({"cloud_mysql_image_product_code": IMAGE_CODE});

        let (first, _) = provider.read_data_source("ncloud_mysql_products", config.clone()).await;
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let (second, _) = provider.read_data_source("ncloud_mysql_products", config).await;

        assert_ne!(first.unwrap()["id"], second.unwrap()["id"]);
    }

    #[tokio::test]
    async fn test_mysql_products_output_file() {
        let server = MockServer::start().await;
        mount_product_list(&server).await;

        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("products.json");

        let (state, diags) = provider(&server, IdStrategy::Timestamp)
            .read_data_source(
                "ncloud_mysql_products",
                json!({
                    "cloud_mysql_image_product_code": IMAGE_CODE,
                    "output_file": output.to_str().unwrap()
                }),
            )
            .await;

        assert!(!diags.has_error(), "{:?}", diags);
        assert!(state.is_some());

        let written: Value = serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
        let items = written.as_array().unwrap();
        assert_eq!(items.len(), 3);
        // every key present, unset fields written as zero values
        assert_eq!(items[2]["cpu_count"], 0);
        assert_eq!(items[2]["disk_type"], "");
        assert_eq!(items[0]["memory_size"], 8589934592i64);
    }

    #[tokio::test]
    async fn test_api_error_becomes_diagnostic() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/vmysql/v2/getCloudMysqlProductList"))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({
                "responseError": {"returnCode": "800", "returnMessage": "Permission denied"}
            })))
            .mount(&server)
            .await;

        let (state, diags) = provider(&server, IdStrategy::Timestamp)
            .read_data_source(
                "ncloud_mysql_products",
                json!({"cloud_mysql_image_product_code": IMAGE_CODE}),
            )
            .await;

        assert!(state.is_none());
        let diag = diags.iter().next().expect("diagnostic");
        assert_eq!(diag.severity, Severity::Error);
        assert_eq!(diag.summary, "GetMysqlProductList");
        assert!(diag.detail.starts_with("error: API request failed: 403"));
        assert!(diag.detail.contains("reqParams: {"));
        assert!(diag.detail.contains(IMAGE_CODE));
    }

    #[tokio::test]
    async fn test_mysql_image_products_read() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/vmysql/v2/getCloudMysqlImageProductList"))
            .and(query_param("regionCode", "KR"))
            .and(query_param("generationCode", "G2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "getCloudMysqlImageProductListResponse": {
                    "totalRows": 2,
                    "productList": [
                        {
                            "productCode": IMAGE_CODE,
                            "generationCode": "G2",
                            "productName": "mysql(8.0.36)",
                            "productType": {"code": "LINUX"},
                            "platformType": {"code": "LNX64"},
                            "osInformation": "Rocky Linux 8.10 with MySQL 8.0.36",
                            "baseBlockStorageSize": 53687091200i64
                        },
                        {
                            "productCode": "SW.VMYSL.OS.LNX64.ROCKY.0810.MYSQL.B050.OLD",
                            "generationCode": "G2"
                        }
                    ]
                }
            })))
            .mount(&server)
            .await;

        let (state, diags) = provider(&server, IdStrategy::Timestamp)
            .read_data_source(
                "ncloud_mysql_image_products",
                json!({
                    "generation_code": "G2",
                    "filter": [{"name": "platform_type", "values": ["LNX64"]}]
                }),
            )
            .await;

        assert!(!diags.has_error(), "{:?}", diags);
        let state = state.unwrap();
        let list = state["image_product_list"].as_array().unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0]["product_code"], IMAGE_CODE);
        assert_eq!(list[0]["base_block_storage_size"], 53687091200i64);
        assert_eq!(state["generation_code"], "G2");
    }
}

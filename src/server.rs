//! Server API
//!
//! Region catalog, used to check credentials and pick a region.

use crate::ncloud::configuration::Configuration;
use crate::ncloud::error::Result;
use crate::ncloud::http::NcloudHttpClient;
use serde::Serialize;
use serde_json::Value;

/// Region information
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Region {
    pub region_code: Option<String>,
    pub region_name: Option<String>,
}

impl From<&Value> for Region {
    fn from(value: &Value) -> Self {
        let field = |name: &str| value.get(name).and_then(|v| v.as_str()).map(|s| s.to_string());
        Self {
            region_code: field("regionCode"),
            region_name: field("regionName"),
        }
    }
}

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

    /// List all regions visible to the account
    pub async fn get_region_list(&self) -> Result<Vec<Region>> {
        let response = self.http.get(&self.configuration, "getRegionList", &[]).await?;
        Ok(parse_region_list(&response))
    }
}

fn parse_region_list(response: &Value) -> Vec<Region> {
    response
        .get("getRegionListResponse")
        .unwrap_or(response)
        .get("regionList")
        .and_then(|v| v.as_array())
        .map(|arr| arr.iter().map(Region::from).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_region_list() {
        let response = json!({
            "getRegionListResponse": {
                "totalRows": 2,
                "regionList": [
                    {"regionCode": "KR", "regionName": "Korea"},
                    {"regionCode": "JPN"}
                ]
            }
        });
        let regions = parse_region_list(&response);
        assert_eq!(regions.len(), 2);
        assert_eq!(regions[0].region_name.as_deref(), Some("Korea"));
        assert_eq!(regions[1].region_code.as_deref(), Some("JPN"));
        assert_eq!(regions[1].region_name, None);
    }

    #[test]
    fn test_parse_region_list_missing() {
        assert!(parse_region_list(&json!({})).is_empty());
    }
}

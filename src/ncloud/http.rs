//! HTTP utilities for NCloud REST API calls

use super::auth::{self, HEADER_ACCESS_KEY, HEADER_SIGNATURE, HEADER_TIMESTAMP};
use super::configuration::Configuration;
use super::error::{ApiError, Result};
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use url::Url;

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Sanitize response body for logging
/// Truncates long responses and strips control characters
fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        let mut end = MAX_LOG_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... [truncated, {} bytes total]", &body[..end], body.len())
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| c.is_control(), "")
}

/// Flatten a request struct into query pairs
///
/// Unset fields are skipped; nested values are JSON encoded.
pub fn to_query_pairs<T: Serialize>(request: &T) -> Result<Vec<(String, String)>> {
    let Value::Object(map) = serde_json::to_value(request)? else {
        return Ok(Vec::new());
    };

    Ok(map
        .into_iter()
        .filter_map(|(k, v)| match v {
            Value::Null => None,
            Value::String(s) => Some((k, s)),
            other => Some((k, other.to_string())),
        })
        .collect())
}

/// Pull `responseError.returnCode` / `returnMessage` out of an error body
fn parse_response_error(body: &str) -> (String, String) {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    let error = parsed.as_ref().and_then(|v| v.get("responseError"));
    let field = |name: &str| {
        error
            .and_then(|e| e.get(name))
            .and_then(|v| v.as_str())
            .unwrap_or("-")
            .to_string()
    };
    (field("returnCode"), field("returnMessage"))
}

/// HTTP client wrapper for NCloud API calls
#[derive(Clone)]
pub struct NcloudHttpClient {
    client: Client,
}

impl NcloudHttpClient {
    /// Create a new HTTP client
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(format!("ncloud-products/{}", crate::VERSION))
            .build()?;

        Ok(Self { client })
    }

    /// Build the full URL for an action
    pub fn action_url(configuration: &Configuration, action: &str, params: &[(String, String)]) -> Result<Url> {
        let mut url = Url::parse(&format!("{}/{}", configuration.base_path, action))?;
        {
            let mut query = url.query_pairs_mut();
            for (k, v) in params {
                query.append_pair(k, v);
            }
            query.append_pair("responseFormatType", "json");
        }
        Ok(url)
    }

    /// Make a signed GET request to an NCloud API action
    pub async fn get(
        &self,
        configuration: &Configuration,
        action: &str,
        params: &[(String, String)],
    ) -> Result<Value> {
        let url = Self::action_url(configuration, action, params)?;
        tracing::debug!("GET {}", url.path());

        let path_and_query = match url.query() {
            Some(q) => format!("{}?{}", url.path(), q),
            None => url.path().to_string(),
        };
        let timestamp = chrono::Utc::now().timestamp_millis().to_string();
        let signature = auth::sign("GET", &path_and_query, &timestamp, &configuration.api_key)?;

        let mut request = self
            .client
            .get(url)
            .header(reqwest::header::USER_AGENT, &configuration.user_agent)
            .header(HEADER_TIMESTAMP, &timestamp)
            .header(HEADER_ACCESS_KEY, &configuration.api_key.access_key)
            .header(HEADER_SIGNATURE, signature);

        for (k, v) in &configuration.default_header {
            request = request.header(k.as_str(), v.as_str());
        }

        let response = request.send().await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            // Security: Only log sanitized/truncated error body to avoid leaking sensitive data
            tracing::error!("API error: {} - {}", status, sanitize_for_log(&body));
            let (return_code, return_message) = parse_response_error(&body);
            return Err(ApiError::Status {
                status: status.as_u16(),
                return_code,
                return_message,
            });
        }

        if body.is_empty() {
            return Ok(Value::Null);
        }

        Ok(serde_json::from_str(&body)?)
    }
}

/// Format an NCloud API error for display
pub fn format_ncloud_error(error: &ApiError) -> String {
    match error {
        ApiError::MissingCredentials(_) => {
            return "NCloud credentials not found. Set NCLOUD_ACCESS_KEY and NCLOUD_SECRET_KEY."
                .to_string();
        }
        ApiError::Decode(_) => return "Unexpected response from NCloud API.".to_string(),
        _ => {}
    }

    match error.status() {
        Some(401) => "Authentication failed. Check your NCloud access key and secret key.".to_string(),
        Some(403) => "Permission denied. Check the sub account policy for this API.".to_string(),
        Some(404) => "API action not found. Check the region and API gateway.".to_string(),
        Some(429) => "Rate limit exceeded. Please try again later.".to_string(),
        Some(400) => "Invalid request. Check your parameters.".to_string(),
        Some(s) if s >= 500 => "NCloud service temporarily unavailable. Please try again.".to_string(),
        _ => {
            let error_str = error.to_string();
            let sanitized = error_str
                .chars()
                .filter(|c| c.is_ascii_graphic() || *c == ' ')
                .take(80)
                .collect::<String>();

            if sanitized.len() < error_str.len() {
                format!("{}...", sanitized)
            } else {
                sanitized
            }
        }
    }
}

//! NCloud API interaction module
//!
//! This module provides the core functionality for talking to the NAVER Cloud
//! Platform API Gateway: credentials, request signing, per-service
//! configuration and the HTTP transport.
//!
//! # Module Structure
//!
//! - [`auth`] - API keys and API Gateway v2 request signing
//! - [`client`] - Client bundling the per-service APIs
//! - [`configuration`] - Per-service base path, headers and user agent
//! - [`error`] - Error type shared by all API calls
//! - [`http`] - HTTP utilities for REST API calls
//!
//! # Example
//!
//! ```ignore
//! use ncloud_products::ncloud::{auth::ApiKey, client::NcloudClient, configuration::Site};
//! use ncloud_products::vmysql::GetCloudMysqlProductListRequest;
//!
//! async fn example() -> anyhow::Result<()> {
//!     let client = NcloudClient::new(ApiKey::new("ak", "sk"), Site::Public, None)?;
//!     let req = GetCloudMysqlProductListRequest::new("KR", "SW.VMYSL.OS.LNX64.ROCKY.0810.MYSQL.B050");
//!     let products = client.vmysql.get_cloud_mysql_product_list(&req).await?;
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod client;
pub mod configuration;
pub mod error;
pub mod http;

pub use client::NcloudClient;
pub use error::ApiError;

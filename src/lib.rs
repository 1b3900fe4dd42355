//! Terraform-style data sources for the NAVER Cloud Platform product catalogs.
//!
//! - [`ncloud`] - Credentials, signing, per-service configuration, HTTP transport
//! - [`vmysql`] / [`server`] - Typed service APIs
//! - [`datasource`] - Data source lifecycle, schema and diagnostics
//! - [`common`] - Filter / refresh / output pipeline shared by list data sources
//! - [`mysql`] - `ncloud_mysql_products` and `ncloud_mysql_image_products`
//! - [`provider`] - Provider configuration and data source registry

pub mod common;
pub mod config;
pub mod datasource;
pub mod mysql;
pub mod ncloud;
pub mod provider;
pub mod server;
pub mod vmysql;

/// Version injected at compile time via NCLOUD_PRODUCTS_VERSION env var (set by CI/CD),
/// or the crate version for local builds.
pub const VERSION: &str = match option_env!("NCLOUD_PRODUCTS_VERSION") {
    Some(v) => v,
    None => env!("CARGO_PKG_VERSION"),
};

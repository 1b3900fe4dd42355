//! NCloud Client
//!
//! Bundles one signed service API per NCloud service, sharing a single
//! HTTP client.

use super::auth::{self, ApiKey};
use super::configuration::{Configuration, Service, Site};
use super::error::Result;
use super::http::NcloudHttpClient;
use crate::{server, vmysql};

/// Main NCloud client
#[derive(Clone)]
pub struct NcloudClient {
    pub vmysql: vmysql::V2Api,
    pub server: server::V2Api,
}

impl NcloudClient {
    /// Create a client for the given site
    ///
    /// `api_gw` overrides the gateway host; when `None`, `NCLOUD_API_GW` is honored.
    pub fn new(api_key: ApiKey, site: Site, api_gw: Option<&str>) -> Result<Self> {
        let http = NcloudHttpClient::new()?;

        let configure = |service: Service| match api_gw {
            Some(gw) => Configuration::with_api_gw(service, api_key.clone(), site, Some(gw)),
            None => Configuration::new(service, api_key.clone(), site),
        };

        Ok(Self {
            vmysql: vmysql::V2Api::new(configure(Service::Vmysql), http.clone()),
            server: server::V2Api::new(configure(Service::Server), http),
        })
    }

    /// Create a client from ambient credentials (env or ncloud CLI configure file)
    pub fn from_default_credentials(site: Site, api_gw: Option<&str>) -> Result<Self> {
        let api_key = auth::load_api_key()?;
        Self::new(api_key, site, api_gw)
    }
}

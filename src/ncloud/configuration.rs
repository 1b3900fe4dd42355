//! Per-service client configuration
//!
//! Each NCloud service lives under its own path on the API gateway. The
//! gateway host depends on the site and may be overridden with `NCLOUD_API_GW`.

use super::auth::ApiKey;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

pub const API_GW_ENV: &str = "NCLOUD_API_GW";

/// NCloud site (platform partition)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Site {
    #[default]
    Public,
    Gov,
    Fin,
}

impl Site {
    /// API gateway host for this site
    pub fn api_gw(self) -> &'static str {
        match self {
            Site::Public => "https://ncloud.apigw.ntruss.com",
            Site::Gov => "https://apigw.gov-ntruss.com",
            Site::Fin => "https://fin-ncloud.apigw.fin-ntruss.com",
        }
    }
}

/// NCloud API service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    Server,
    Vmysql,
}

impl Service {
    pub fn name(self) -> &'static str {
        match self {
            Service::Server => "server",
            Service::Vmysql => "vmysql",
        }
    }

    /// Path of the service on the gateway
    pub fn path(self) -> &'static str {
        match self {
            Service::Server => "/server/v2",
            Service::Vmysql => "/vmysql/v2",
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone)]
pub struct Configuration {
    pub base_path: String,
    pub default_header: HashMap<String, String>,
    pub user_agent: String,
    pub api_key: ApiKey,
}

impl Configuration {
    /// Build a configuration, honoring `NCLOUD_API_GW`
    pub fn new(service: Service, api_key: ApiKey, site: Site) -> Self {
        Self::from_lookup(service, api_key, site, |name| std::env::var(name).ok())
    }

    /// Same as [`Configuration::new`], reading `NCLOUD_API_GW` through `lookup`
    pub fn from_lookup(
        service: Service,
        api_key: ApiKey,
        site: Site,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let env_gw = lookup(API_GW_ENV);
        Self::with_api_gw(service, api_key, site, env_gw.as_deref())
    }

    /// Build a configuration with an explicit gateway override
    pub fn with_api_gw(service: Service, api_key: ApiKey, site: Site, api_gw: Option<&str>) -> Self {
        let gateway = api_gw
            .filter(|gw| !gw.is_empty())
            .map(|gw| gw.trim_end_matches('/'))
            .unwrap_or_else(|| site.api_gw());

        Self {
            base_path: format!("{}{}", gateway, service.path()),
            default_header: HashMap::new(),
            user_agent: format!("{}/{}/rust", service.name(), crate::VERSION),
            api_key,
        }
    }

    pub fn add_default_header(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.default_header.insert(key.into(), value.into());
    }
}

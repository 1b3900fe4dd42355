use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use ncloud_products::config::Config;
use ncloud_products::datasource::{AttributeType, Diagnostics, IdStrategy, Schema};
use ncloud_products::ncloud::client::NcloudClient;
use ncloud_products::ncloud::configuration::Site;
use ncloud_products::ncloud::http::format_ncloud_error;
use ncloud_products::provider::{NcloudProvider, ProviderConfig};
use serde_json::{Map, Value};
use std::io::Read;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::EnvFilter;

/// Read NCloud product catalogs through Terraform-style data sources
#[derive(Parser, Debug)]
#[command(name = "ncloud-products", version = ncloud_products::VERSION, about, long_about = None)]
struct Args {
    /// NCloud region code (e.g. KR, JPN, SGN)
    #[arg(short, long, global = true)]
    region: Option<String>,

    /// NCloud site
    #[arg(long, value_enum, global = true)]
    site: Option<Site>,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List supported data source types
    DataSources,

    /// Print the schema of a data source
    Schema {
        /// Data source type, e.g. ncloud_mysql_products
        type_name: String,
    },

    /// Read a data source and print its state
    Read {
        /// Data source type, e.g. ncloud_mysql_products
        type_name: String,

        /// JSON configuration file ("-" for stdin)
        #[arg(short, long)]
        config: Option<String>,

        /// Set a single attribute (string attributes take VALUE as is, others parse it as JSON)
        #[arg(long = "set", value_name = "KEY=VALUE")]
        set: Vec<String>,
    },

    /// List regions visible to the account
    Regions,

    /// Persist defaults to the config file
    Configure {
        #[arg(long)]
        region: Option<String>,

        #[arg(long, value_enum)]
        site: Option<Site>,

        /// API gateway override
        #[arg(long)]
        api_gw: Option<String>,

        #[arg(long, value_enum)]
        id_strategy: Option<IdStrategy>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

fn setup_logging(level: LogLevel) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let env_filter = EnvFilter::try_from_default_env().ok();
    let tracing_level = match (level.to_tracing_level(), &env_filter) {
        (Some(level), _) => level,
        (None, Some(_)) => Level::TRACE,
        (None, None) => return None,
    };

    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = match std::fs::OpenOptions::new().create(true).append(true).open(&log_path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Failed to open log file {:?}: {}", log_path, e);
            return None;
        }
    };

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    let filter = env_filter.unwrap_or_else(|| EnvFilter::new(tracing_level.as_str()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(non_blocking.with_max_level(tracing_level))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("ncloud-products started with log level: {:?}", level);
    tracing::info!("Log file: {:?}", log_path);

    Some(guard)
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("ncloud-products").join("ncloud-products.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".ncloud-products").join("ncloud-products.log");
    }
    PathBuf::from("ncloud-products.log")
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let _log_guard = setup_logging(args.log_level);

    let config = Config::load();

    match args.command {
        Command::DataSources => {
            for name in NcloudProvider::new().data_source_names() {
                println!("{}", name);
            }
        }
        Command::Schema { type_name } => {
            let schema = NcloudProvider::new()
                .schema(&type_name)
                .ok_or_else(|| anyhow!("Unknown data source: {}", type_name))?;
            println!("{}", serde_json::to_string_pretty(&schema)?);
        }
        Command::Read {
            type_name,
            config: config_file,
            set,
        } => {
            let provider = configured_provider(&config, args.region.as_deref(), args.site)?;
            let schema = provider.schema(&type_name);
            let ds_config = load_data_source_config(config_file.as_deref(), &set, schema.as_ref())?;

            let (state, diags) = provider.read_data_source(&type_name, ds_config).await;
            print_diagnostics(&diags);

            match state {
                Some(state) if !diags.has_error() => {
                    println!("{}", serde_json::to_string_pretty(&state)?);
                }
                _ => bail!("Failed to read {}", type_name),
            }
        }
        Command::Regions => {
            let site = config.effective_site(args.site);
            let client = NcloudClient::from_default_credentials(site, config.api_gw.as_deref())
                .map_err(|e| anyhow!(format_ncloud_error(&e)))?;

            let regions = client.server.get_region_list().await.map_err(|e| {
                tracing::error!("getRegionList failed: {}", e);
                anyhow!(format_ncloud_error(&e))
            })?;

            for region in regions {
                println!(
                    "{}\t{}",
                    region.region_code.as_deref().unwrap_or("-"),
                    region.region_name.as_deref().unwrap_or("-")
                );
            }
        }
        Command::Configure {
            region,
            site,
            api_gw,
            id_strategy,
        } => {
            let mut config = config;
            if region.is_some() {
                config.region = region;
            }
            if site.is_some() {
                config.site = site;
            }
            if api_gw.is_some() {
                config.api_gw = api_gw;
            }
            if id_strategy.is_some() {
                config.id_strategy = id_strategy;
            }
            config.save()?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }

    Ok(())
}

fn configured_provider(config: &Config, region: Option<&str>, site: Option<Site>) -> Result<NcloudProvider> {
    let site = config.effective_site(site);
    let region_code = config.effective_region(region);

    tracing::info!("Using region: {}, site: {:?}", region_code, site);

    let client = NcloudClient::from_default_credentials(site, config.api_gw.as_deref())
        .map_err(|e| anyhow!(format_ncloud_error(&e)))?;

    let mut provider = NcloudProvider::new();
    provider.configure(ProviderConfig {
        client,
        region_code,
        site,
        id_strategy: config.effective_id_strategy(),
    });
    Ok(provider)
}

/// Build the data source config from a JSON file/stdin plus `--set` overrides
fn load_data_source_config(path: Option<&str>, set: &[String], schema: Option<&Schema>) -> Result<Value> {
    let mut object = match path {
        None => Map::new(),
        Some(path) => {
            let content = if path == "-" {
                let mut buf = String::new();
                std::io::stdin()
                    .read_to_string(&mut buf)
                    .context("Failed to read config from stdin")?;
                buf
            } else {
                std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path))?
            };
            match serde_json::from_str(&content).context("Config is not valid JSON")? {
                Value::Object(map) => map,
                _ => bail!("Config must be a JSON object"),
            }
        }
    };

    for assignment in set {
        let (key, raw) = assignment
            .split_once('=')
            .ok_or_else(|| anyhow!("Expected KEY=VALUE, got {:?}", assignment))?;
        object.insert(key.to_string(), parse_set_value(schema, key, raw));
    }

    Ok(Value::Object(object))
}

/// `--set` value: verbatim for string attributes, otherwise JSON with a string fallback
fn parse_set_value(schema: Option<&Schema>, key: &str, raw: &str) -> Value {
    let is_string = schema
        .and_then(|s| s.attributes.get(key))
        .is_some_and(|attr| attr.attr_type == AttributeType::String);
    if is_string {
        return Value::String(raw.to_string());
    }
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

fn print_diagnostics(diags: &Diagnostics) {
    for diag in diags.iter() {
        eprintln!("{}", diag);
    }
}

use std::fmt;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::shards::ShardId;

#[derive(Debug, Deserialize, Clone)]
pub struct Server {
    pub address: String,
    pub frontend_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Database {
    pub host: String,
    pub port: String,
    pub user: String,
    pub password: String,
    pub name: String,
}

impl Database {
    pub fn url(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.user, self.password, self.host, self.port, self.name
        )
    }
}

/// Historical databases are optional: a missing section degrades the shard
/// instead of failing startup.
#[derive(Debug, Deserialize, Clone)]
pub struct Shards {
    pub old: Option<Database>,
    pub new: Option<Database>,
    pub bolt: Option<Database>,
    pub merge_priority: Vec<ShardId>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SMTP {
    pub host: String,
    pub port: String,
    pub user: String,
    pub password: String,
    pub sender: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Monitoring {
    pub base_url: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RateLimit {
    pub interval_seconds: u64,
    pub max_requests: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Affiliates {
    pub min_payout: i64,
    pub default_commission_rate: f64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChallengeTypeSettings {
    pub code: String,
    pub display_name: String,
    pub description: Option<String>,
    pub tiers: Vec<PricingTier>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PricingTier {
    pub account_size: i64,
    pub price: f64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub server: Server,
    pub database: Database,
    pub shards: Shards,
    pub smtp: SMTP,
    pub monitoring: Monitoring,
    pub rate_limit: RateLimit,
    pub affiliates: Affiliates,
    pub challenge_types: Vec<ChallengeTypeSettings>,
    pub env: ENV,
}

#[derive(Clone, Debug, Deserialize)]
pub enum ENV {
    Development,
    Testing,
    Production,
    Local,
}

impl fmt::Display for ENV {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ENV::Development => write!(f, "Development"),
            ENV::Testing => write!(f, "Testing"),
            ENV::Production => write!(f, "Production"),
            ENV::Local => write!(f, "Local"),
        }
    }
}

impl From<&str> for ENV {
    fn from(env: &str) -> Self {
        match env {
            "Testing" => ENV::Testing,
            "Production" => ENV::Production,
            "Development" => ENV::Development,
            _ => ENV::Local,
        }
    }
}

const CONFIG_FILE_PATH: &str = "./config/Default.toml";
const CONFIG_FILE_PREFIX: &str = "./config/";

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("RUN_ENV").unwrap_or_else(|_| "Local".into());
        let mut s = Config::new();
        s.set("env", env.clone())?;
        println!("RUN ENV: {}", env);
        s.merge(File::with_name(CONFIG_FILE_PATH))?;
        s.merge(File::with_name(&format!("{}{}", CONFIG_FILE_PREFIX, env)))?;

        // This makes it so "F8R_SERVER__ADDRESS" overrides server.address
        s.merge(Environment::with_prefix("f8r").separator("__"))?;

        s.try_into()
    }
}

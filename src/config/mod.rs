use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub geo: GeoConfig,
    pub frontend: FrontendConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoConfig {
    /// ipinfo.io API token. When unset, every lookup degrades to the
    /// fallback location instead of going to the network.
    #[serde(default)]
    pub token: Option<String>,
    pub api_base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrontendConfig {
    /// Directory containing the index and stats page templates
    pub templates_dir: String,
    /// Directory served under /static
    pub static_dir: String,
}

impl GeoConfig {
    fn default_api_base_url() -> String {
        "https://ipinfo.io".to_string()
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "8905".to_string())
            .parse::<u16>()?;

        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://./db/database.sqlite?mode=rwc".to_string());
        let max_connections = std::env::var("DATABASE_MAX_CONNECTIONS")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(5);

        let token = std::env::var("IPINFO_TOKEN").ok().filter(|t| !t.is_empty());
        let api_base_url =
            std::env::var("IPINFO_API_URL").unwrap_or_else(|_| GeoConfig::default_api_base_url());

        let templates_dir =
            std::env::var("TEMPLATES_DIR").unwrap_or_else(|_| "templates".to_string());
        let static_dir = std::env::var("STATIC_DIR").unwrap_or_else(|_| "static".to_string());

        Ok(Config {
            server: ServerConfig { host, port },
            database: DatabaseConfig {
                url: database_url,
                max_connections,
            },
            geo: GeoConfig {
                token,
                api_base_url,
            },
            frontend: FrontendConfig {
                templates_dir,
                static_dir,
            },
        })
    }
}

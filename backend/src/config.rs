use std::env;
use dotenv::dotenv;
use serde::Deserialize;
use log::{info, warn};

#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
pub enum Environment {
    #[default]
    Development,
    Test,
    Production,
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dev" | "development" => Ok(Environment::Development),
            "test" => Ok(Environment::Test),
            "prod" | "production" => Ok(Environment::Production),
            _ => Err(format!("Unknown environment: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub platforms: PlatformApiConfig,
    pub cors: CorsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub name: String,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RedisConfig {
    pub url: String,
    /// Expiry for cached platform payloads. Freshness is decided by fetch day, this only bounds memory.
    pub cache_ttl_seconds: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlatformApiConfig {
    pub codeforces_api_url: String,
    pub leetcode_api_url: String,
    pub codechef_api_url: String,
    pub codechef_site_url: String,
    pub request_timeout_seconds: u64,
}

impl Default for PlatformApiConfig {
    fn default() -> Self {
        Self {
            codeforces_api_url: "https://codeforces.com/api".to_string(),
            leetcode_api_url: "https://leetcode-api.vercel.app/api".to_string(),
            codechef_api_url: "https://codechef-api.vercel.app".to_string(),
            codechef_site_url: "https://www.codechef.com".to_string(),
            request_timeout_seconds: 10,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

type ConfigResult<T> = Result<T, Box<dyn std::error::Error>>;

fn required_var(name: &str, env: &Environment) -> ConfigResult<String> {
    env::var(name).map_err(|_| format!("{} must be set in {:?}", name, env).into())
}

fn var_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn parsed_var_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}

impl Config {
    fn parse_backend_url(url: &str) -> (String, u16) {
        // Parse BACKEND_URL like "http://localhost:50002" or "http://127.0.0.1:50002"
        if let Ok(parsed_url) = url::Url::parse(url) {
            let host = parsed_url.host_str().unwrap_or("127.0.0.1").to_string();
            let port = parsed_url.port().unwrap_or(50002);
            (host, port)
        } else {
            ("127.0.0.1".to_string(), 50002)
        }
    }

    fn load_env_files() {
        if let Ok(env_file_path) = env::var("ENV_FILE_PATH") {
            if !env_file_path.is_empty() {
                info!("Loading environment from ENV_FILE_PATH: {}", env_file_path);
                dotenv::from_filename(&env_file_path).ok();
                return;
            }
        }

        // Base .env is optional; .env.<env> overrides it outside development
        dotenv().ok();
        let environment_hint = Self::environment_from_env();
        let env_file = format!(".env.{:?}", environment_hint).to_lowercase();
        if env_file != ".env.development" {
            let _ = dotenv::from_filename(&env_file);
        }
    }

    fn environment_from_env() -> Environment {
        env::var("RUST_ENV")
            .unwrap_or_else(|_| "development".to_string())
            .parse()
            .unwrap_or(Environment::Development)
    }

    pub fn load() -> ConfigResult<Self> {
        Self::load_env_files();

        let environment = Self::environment_from_env();
        info!("Loading configuration for environment: {:?}", environment);

        let config = Config {
            server: Self::load_server_config(&environment),
            database: Self::load_database_config(&environment)?,
            redis: Self::load_redis_config(&environment)?,
            platforms: Self::load_platform_config(&environment),
            cors: Self::load_cors_config(&environment),
            environment,
        };

        config.validate()?;
        config.log_configuration();

        Ok(config)
    }

    fn load_server_config(env: &Environment) -> ServerConfig {
        let backend_url = var_or("BACKEND_URL", "http://0.0.0.0:50002");
        let (host, port) = Self::parse_backend_url(&backend_url);
        let default_workers = match env {
            Environment::Production => 8,
            Environment::Development | Environment::Test => 1,
        };

        ServerConfig {
            // SERVER_HOST takes precedence over the BACKEND_URL host
            host: env::var("SERVER_HOST").unwrap_or(host),
            port: parsed_var_or("SERVER_PORT", port),
            workers: parsed_var_or("BACKEND_WORKERS", default_workers),
        }
    }

    fn load_database_config(env: &Environment) -> ConfigResult<DatabaseConfig> {
        Ok(match env {
            Environment::Development => {
                match env::var("ARANGO_URL") {
                    Ok(url) => info!("Found ARANGO_URL in environment: {}", url),
                    Err(_) => warn!("ARANGO_URL not found in environment, using default"),
                }

                DatabaseConfig {
                    url: var_or("ARANGO_URL", "http://localhost:8529"),
                    name: var_or("ARANGO_DB", "cp_tracker_dev"),
                    username: var_or("ARANGO_USERNAME", "root"),
                    password: var_or("ARANGO_PASSWORD", "test"),
                }
            }
            Environment::Production => DatabaseConfig {
                url: required_var("ARANGO_URL", env)?,
                name: required_var("ARANGO_DB", env)?,
                username: required_var("ARANGO_USERNAME", env)?,
                password: required_var("ARANGO_PASSWORD", env)?,
            },
            Environment::Test => DatabaseConfig {
                url: var_or("ARANGO_URL", "http://test-arangodb:8529"),
                name: var_or("ARANGO_DB", "cp_tracker_test"),
                username: var_or("ARANGO_USERNAME", "root"),
                password: var_or("ARANGO_PASSWORD", "test"),
            },
        })
    }

    fn load_redis_config(env: &Environment) -> ConfigResult<RedisConfig> {
        let url = match env {
            Environment::Development => var_or("REDIS_URL", "redis://127.0.0.1/"),
            Environment::Production => required_var("REDIS_URL", env)?,
            Environment::Test => var_or("REDIS_URL", "redis://test-redis:6379/"),
        };

        Ok(RedisConfig {
            url,
            // Two days, so yesterday's payload is still around when today's fetch fails
            cache_ttl_seconds: parsed_var_or("CACHE_TTL_SECONDS", 172_800),
        })
    }

    fn load_platform_config(_env: &Environment) -> PlatformApiConfig {
        let defaults = PlatformApiConfig::default();
        PlatformApiConfig {
            codeforces_api_url: var_or("CODEFORCES_API_URL", &defaults.codeforces_api_url),
            leetcode_api_url: var_or("LEETCODE_API_URL", &defaults.leetcode_api_url),
            codechef_api_url: var_or("CODECHEF_API_URL", &defaults.codechef_api_url),
            codechef_site_url: var_or("CODECHEF_SITE_URL", &defaults.codechef_site_url),
            request_timeout_seconds: parsed_var_or("PLATFORM_TIMEOUT_SECONDS", defaults.request_timeout_seconds),
        }
    }

    fn load_cors_config(env: &Environment) -> CorsConfig {
        let default_origin = match env {
            Environment::Production => "",
            Environment::Development | Environment::Test => "http://localhost:5173",
        };

        CorsConfig {
            allowed_origins: var_or("FRONTEND_URL", default_origin)
                .split(',')
                .map(|o| o.trim().trim_end_matches('/').to_string())
                .filter(|o| !o.is_empty())
                .collect(),
        }
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.environment == Environment::Production {
            if self.database.password == "test" {
                return Err("Production database password cannot be 'test'".into());
            }
            if self.cors.allowed_origins.is_empty() {
                return Err("FRONTEND_URL must be set in production".into());
            }
        }

        if self.server.port == 0 {
            return Err("Server port cannot be 0".into());
        }

        if self.server.workers == 0 {
            return Err("BACKEND_WORKERS must be at least 1".into());
        }

        let urls = [
            ("ARANGO_URL", &self.database.url),
            ("REDIS_URL", &self.redis.url),
            ("CODEFORCES_API_URL", &self.platforms.codeforces_api_url),
            ("LEETCODE_API_URL", &self.platforms.leetcode_api_url),
            ("CODECHEF_API_URL", &self.platforms.codechef_api_url),
            ("CODECHEF_SITE_URL", &self.platforms.codechef_site_url),
        ];
        for (name, value) in urls {
            if value.trim().is_empty() {
                return Err(format!("{} cannot be empty", name).into());
            }
        }

        if self.platforms.request_timeout_seconds == 0 {
            return Err("Platform request timeout cannot be 0".into());
        }

        // Redis SETEX rejects an expiry of 0.
        if self.redis.cache_ttl_seconds == 0 {
            return Err("CACHE_TTL_SECONDS must be at least 1".into());
        }

        Ok(())
    }

    fn log_configuration(&self) {
        info!("Configuration loaded successfully");
        info!("Environment: {:?}", self.environment);
        info!("Server: {}:{} (workers: {})", self.server.host, self.server.port, self.server.workers);
        info!("Database: {}", self.database.name);
        info!("Redis: {} (ttl: {}s)", self.redis.url, self.redis.cache_ttl_seconds);
        info!(
            "Platforms: codeforces={} leetcode={} codechef={} (timeout: {}s)",
            self.platforms.codeforces_api_url,
            self.platforms.leetcode_api_url,
            self.platforms.codechef_api_url,
            self.platforms.request_timeout_seconds
        );

        if self.environment == Environment::Development {
            warn!("Running in development mode - CORS allows {:?}", self.cors.allowed_origins);
        }
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }
}

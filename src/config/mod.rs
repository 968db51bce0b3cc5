use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub api: ApiConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    /// Base URL used when building share links and verification links.
    pub public_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub max_connections: u32,
    pub connection_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub page_size: u32,
    pub max_page_size: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub jwt_expiry_hours: u64,
    pub verify_expiry_hours: u64,
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Server overrides
        if let Ok(v) = env::var("PORT") {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }
        if let Ok(v) = env::var("APP_PUBLIC_URL") {
            self.server.public_url = v;
        }

        // Database overrides
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout_secs =
                v.parse().unwrap_or(self.database.connection_timeout_secs);
        }

        // API overrides
        if let Ok(v) = env::var("API_PAGE_SIZE") {
            self.api.page_size = v.parse().unwrap_or(self.api.page_size);
        }
        if let Ok(v) = env::var("API_MAX_PAGE_SIZE") {
            self.api.max_page_size = v.parse().unwrap_or(self.api.max_page_size);
        }

        // Security overrides
        if let Ok(v) = env::var("JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("SECURITY_JWT_EXPIRY_HOURS") {
            self.security.jwt_expiry_hours = v.parse().unwrap_or(self.security.jwt_expiry_hours);
        }
        if let Ok(v) = env::var("SECURITY_VERIFY_EXPIRY_HOURS") {
            self.security.verify_expiry_hours =
                v.parse().unwrap_or(self.security.verify_expiry_hours);
        }
        if let Ok(v) = env::var("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = v.parse().unwrap_or(self.security.enable_cors);
        }
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v.split(',').map(|s| s.trim().to_string()).collect();
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                port: 3000,
                public_url: "http://localhost:3000".to_string(),
            },
            database: DatabaseConfig {
                max_connections: 10,
                connection_timeout_secs: 30,
            },
            api: ApiConfig {
                page_size: 10,
                max_page_size: 100,
            },
            security: SecurityConfig {
                jwt_secret: "dev-secret-change-me".to_string(),
                jwt_expiry_hours: 24 * 7, // 1 week
                verify_expiry_hours: 48,
                enable_cors: true,
                cors_origins: vec![
                    "http://localhost:3000".to_string(),
                    "http://localhost:5173".to_string(),
                ],
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig {
                port: 3000,
                public_url: "https://staging.example.com".to_string(),
            },
            database: DatabaseConfig {
                max_connections: 20,
                connection_timeout_secs: 10,
            },
            api: ApiConfig {
                page_size: 10,
                max_page_size: 50,
            },
            security: SecurityConfig {
                jwt_secret: String::new(), // must come from JWT_SECRET
                jwt_expiry_hours: 24,
                verify_expiry_hours: 24,
                enable_cors: true,
                cors_origins: vec!["https://staging.example.com".to_string()],
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig {
                port: 3000,
                public_url: "https://app.example.com".to_string(),
            },
            database: DatabaseConfig {
                max_connections: 50,
                connection_timeout_secs: 5,
            },
            api: ApiConfig {
                page_size: 10,
                max_page_size: 50,
            },
            security: SecurityConfig {
                jwt_secret: String::new(), // must come from JWT_SECRET
                jwt_expiry_hours: 4,
                verify_expiry_hours: 24,
                enable_cors: true,
                cors_origins: vec!["https://app.example.com".to_string()],
            },
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::development();
        assert_eq!(config.api.page_size, 10);
        assert_eq!(config.server.port, 3000);
        assert!(!config.security.jwt_secret.is_empty());
    }

    #[test]
    fn test_default_production_config() {
        let config = AppConfig::production();
        assert_eq!(config.security.jwt_expiry_hours, 4);
        assert!(config.security.jwt_secret.is_empty());
    }
}

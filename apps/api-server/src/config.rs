//! Server configuration.

use std::env;

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// MongoDB connection string.
    pub mongodb_uri: String,
    /// Database name.
    pub database_name: String,
    /// JWT signing secret.
    pub jwt_secret: String,
    /// JWT expiration in hours.
    pub jwt_expiration_hours: u64,
    /// Log level.
    pub log_level: String,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        let jwt_secret = env::var("WAYMATE_JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("WAYMATE_JWT_SECRET is required"))?;

        Ok(Self {
            host: env::var("WAYMATE_SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("WAYMATE_SERVER_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            mongodb_uri: env::var("MONGODB_URI")
                .unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
            database_name: env::var("WAYMATE_DATABASE_NAME")
                .unwrap_or_else(|_| "waymate".to_string()),
            jwt_secret,
            jwt_expiration_hours: env::var("WAYMATE_JWT_EXPIRATION_HOURS")
                .unwrap_or_else(|_| "24".to_string())
                .parse()
                .unwrap_or(24),
            log_level: env::var("WAYMATE_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Returns the server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            host: "127.0.0.1".to_string(),
            port: 9090,
            mongodb_uri: "mongodb://localhost:27017".to_string(),
            database_name: "waymate-test".to_string(),
            jwt_secret: "test-secret".to_string(),
            jwt_expiration_hours: 24,
            log_level: "debug".to_string(),
        }
    }

    #[test]
    fn test_server_addr() {
        assert_eq!(config().server_addr(), "127.0.0.1:9090");
    }
}

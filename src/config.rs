//! Application configuration loaded from environment variables.

use std::env;

use secrecy::{ExposeSecret, SecretString};

/// Development default values - NEVER use in production.
pub mod defaults {
    pub const DEV_DATABASE_URL: &str = "postgres://qa:qa@localhost:5432/qa_scenarios";
    pub const DEV_HOST: &str = "127.0.0.1";
    pub const DEV_PORT: u16 = 8080;
    pub const DEV_DB_MAX_CONNECTIONS: u32 = 10;
    pub const DEV_DB_MIN_CONNECTIONS: u32 = 1;
    pub const DEV_ALLOWED_EMAIL_DOMAIN: &str = "example.com";
    pub const DEV_SESSION_SECRET: &str = "dev-session-secret-do-not-use-in-production";
    pub const SESSION_TTL_SECS: u64 = 7 * 24 * 60 * 60;

    pub const LLM_BASE_URL: &str = "https://api.anthropic.com";
    pub const LLM_MODEL: &str = "claude-sonnet-4-20250514";
    pub const LLM_MAX_TOKENS: u32 = 8192;
    pub const LLM_TIMEOUT_SECS: u64 = 300;
}

/// Runtime environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    /// Parse environment from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Some(Self::Development),
            "production" | "prod" => Some(Self::Production),
            _ => None,
        }
    }

    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
        }
    }
}

/// Database connection settings.
#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    /// Connection URL (PostgreSQL, or SQLite for tests)
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

/// Session token settings.
#[derive(Debug, Clone)]
pub struct SessionSettings {
    /// HS256 signing secret for session JWTs
    pub secret: SecretString,
    /// Session lifetime in seconds
    pub ttl_secs: u64,
}

/// LLM completion provider settings.
#[derive(Debug, Clone)]
pub struct LlmSettings {
    /// Provider API key; generation is refused when absent
    pub api_key: Option<SecretString>,
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub timeout_secs: u64,
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Runtime environment
    pub environment: Environment,
    /// Server host address
    pub host: String,
    /// Server port
    pub port: u16,
    pub database: DatabaseSettings,
    /// Only addresses in this domain may register
    pub allowed_email_domain: String,
    pub session: SessionSettings,
    pub llm: LlmSettings,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// In development mode every variable except `RUST_ENV` has a default.
    /// In production mode the server refuses to start with the development
    /// database URL or session secret.
    ///
    /// Environment variables:
    /// - `RUST_ENV`: Environment (development/production) - REQUIRED
    /// - `QA_HOST`: Server host (default: 127.0.0.1)
    /// - `QA_PORT`: Server port (default: 8080)
    /// - `DATABASE_URL`: Database connection string
    /// - `QA_DB_MAX_CONNECTIONS` / `QA_DB_MIN_CONNECTIONS`: Pool bounds (default: 10 / 1)
    /// - `ALLOWED_EMAIL_DOMAIN`: Domain accepted at registration
    /// - `QA_SESSION_SECRET`: Session JWT signing secret
    /// - `QA_SESSION_TTL_SECS`: Session lifetime (default: 7 days)
    /// - `ANTHROPIC_API_KEY`: LLM provider key (optional)
    /// - `QA_LLM_BASE_URL`, `QA_LLM_MODEL`, `QA_LLM_MAX_TOKENS`, `QA_LLM_TIMEOUT_SECS`
    pub fn from_env() -> Result<Self, ConfigError> {
        let env_str = env::var("RUST_ENV").map_err(|_| ConfigError::MissingEnvVar("RUST_ENV"))?;

        let environment = Environment::parse(&env_str).ok_or(ConfigError::InvalidValue(
            "RUST_ENV must be 'development' or 'production'",
        ))?;

        let host = env::var("QA_HOST").unwrap_or_else(|_| defaults::DEV_HOST.to_string());

        let port = env::var("QA_PORT")
            .unwrap_or_else(|_| defaults::DEV_PORT.to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidValue("QA_PORT must be a valid port number"))?;

        let database = DatabaseSettings {
            url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| defaults::DEV_DATABASE_URL.to_string()),
            max_connections: parse_var(
                "QA_DB_MAX_CONNECTIONS",
                defaults::DEV_DB_MAX_CONNECTIONS,
                "QA_DB_MAX_CONNECTIONS must be a valid number",
            )?,
            min_connections: parse_var(
                "QA_DB_MIN_CONNECTIONS",
                defaults::DEV_DB_MIN_CONNECTIONS,
                "QA_DB_MIN_CONNECTIONS must be a valid number",
            )?,
        };

        let allowed_email_domain = env::var("ALLOWED_EMAIL_DOMAIN")
            .unwrap_or_else(|_| defaults::DEV_ALLOWED_EMAIL_DOMAIN.to_string())
            .trim_start_matches('@')
            .to_lowercase();

        let session = SessionSettings {
            secret: SecretString::from(
                env::var("QA_SESSION_SECRET")
                    .unwrap_or_else(|_| defaults::DEV_SESSION_SECRET.to_string()),
            ),
            ttl_secs: parse_var(
                "QA_SESSION_TTL_SECS",
                defaults::SESSION_TTL_SECS,
                "QA_SESSION_TTL_SECS must be a valid number",
            )?,
        };

        let llm = LlmSettings {
            api_key: env::var("ANTHROPIC_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty())
                .map(SecretString::from),
            base_url: env::var("QA_LLM_BASE_URL")
                .unwrap_or_else(|_| defaults::LLM_BASE_URL.to_string()),
            model: env::var("QA_LLM_MODEL").unwrap_or_else(|_| defaults::LLM_MODEL.to_string()),
            max_tokens: parse_var(
                "QA_LLM_MAX_TOKENS",
                defaults::LLM_MAX_TOKENS,
                "QA_LLM_MAX_TOKENS must be a valid number",
            )?,
            timeout_secs: parse_var(
                "QA_LLM_TIMEOUT_SECS",
                defaults::LLM_TIMEOUT_SECS,
                "QA_LLM_TIMEOUT_SECS must be a valid number",
            )?,
        };

        let config = Config {
            environment,
            host,
            port,
            database,
            allowed_email_domain,
            session,
            llm,
        };

        if environment.is_production() {
            config.validate_production()?;
        }

        Ok(config)
    }

    /// Validate that production configuration does not use development defaults.
    fn validate_production(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.database.url == defaults::DEV_DATABASE_URL {
            errors.push(format!(
                "DATABASE_URL is using development default '{}'. Set a production PostgreSQL URL.",
                defaults::DEV_DATABASE_URL
            ));
        }

        if self.session.secret.expose_secret() == defaults::DEV_SESSION_SECRET {
            errors.push(
                "QA_SESSION_SECRET is using development default. Set a secure session secret."
                    .to_string(),
            );
        }

        if self.database.min_connections > self.database.max_connections {
            errors.push(
                "QA_DB_MIN_CONNECTIONS must not exceed QA_DB_MAX_CONNECTIONS".to_string(),
            );
        }

        if !errors.is_empty() {
            return Err(ConfigError::ProductionValidation(errors));
        }

        Ok(())
    }

    /// Get the server bind address.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Check if running in development mode.
    pub fn is_development(&self) -> bool {
        self.environment.is_development()
    }

    /// Whether an email address belongs to the registration domain.
    pub fn is_allowed_email(&self, email: &str) -> bool {
        email
            .to_lowercase()
            .ends_with(&format!("@{}", self.allowed_email_domain))
    }
}

fn parse_var<T: std::str::FromStr>(
    name: &str,
    default: T,
    message: &'static str,
) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw.trim().parse::<T>().map_err(|_| ConfigError::InvalidValue(message)),
        Err(_) => Ok(default),
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(&'static str),

    #[error("Production configuration validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    ProductionValidation(Vec<String>),
}

use anyhow::{Context, Result, bail};
use clap::Parser;
use std::{env, fmt, str::FromStr};

/// Deployment environment. Controls log format and how much detail
/// internal errors expose to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Test,
    Production,
}

impl Environment {
    pub fn is_production(self) -> bool {
        self == Environment::Production
    }
}

impl FromStr for Environment {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "test" => Ok(Self::Test),
            "production" | "prod" => Ok(Self::Production),
            other => bail!("unknown environment `{}`", other),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Development => "development",
            Self::Test => "test",
            Self::Production => "production",
        };
        f.write_str(name)
    }
}

/// Centralized application configuration.
/// Combines environment variables and CLI arguments.
#[derive(Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub api_token: String,
    pub environment: Environment,
}

// Hand-written so the API token never ends up in logs.
impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database_url", &self.database_url)
            .field("api_token", &"<redacted>")
            .field("environment", &self.environment)
            .finish()
    }
}

/// Command-line + environment configuration.
#[derive(Parser, Debug, Default)]
#[command(author, version, about = "Bookmarks HTTP API")]
pub struct Args {
    /// Host to bind to (overrides BOOKMARKS_HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind to (overrides BOOKMARKS_PORT)
    #[arg(long)]
    pub port: Option<u16>,

    /// Database URL (overrides BOOKMARKS_DATABASE_URL)
    #[arg(long)]
    pub database_url: Option<String>,

    /// Bearer token clients must present (overrides BOOKMARKS_API_TOKEN)
    #[arg(long)]
    pub api_token: Option<String>,

    /// development, test or production (overrides BOOKMARKS_ENV)
    #[arg(long = "env")]
    pub environment: Option<Environment>,

    /// Run migrations and exit
    #[arg(long)]
    pub migrate: bool,
}

impl AppConfig {
    /// Parse environment variables + CLI args into AppConfig and migrate flag.
    pub fn from_env_and_args() -> Result<(Self, bool)> {
        Self::resolve(Args::parse(), |key| env::var(key))
    }

    /// Merge parsed CLI args over values read through `lookup`.
    pub fn resolve<F>(args: Args, lookup: F) -> Result<(Self, bool)>
    where
        F: Fn(&str) -> Result<String, env::VarError>,
    {
        // --- Environment fallback ---
        let env_host = lookup("BOOKMARKS_HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let env_port = match lookup("BOOKMARKS_PORT") {
            Ok(value) => value
                .parse::<u16>()
                .with_context(|| format!("parsing BOOKMARKS_PORT value `{}`", value))?,
            Err(env::VarError::NotPresent) => 8000,
            Err(err) => return Err(err).context("reading BOOKMARKS_PORT"),
        };
        let env_db = lookup("BOOKMARKS_DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://./data/bookmarks.db".into());
        let env_environment = match lookup("BOOKMARKS_ENV") {
            Ok(value) => value
                .parse::<Environment>()
                .context("parsing BOOKMARKS_ENV")?,
            Err(env::VarError::NotPresent) => Environment::default(),
            Err(err) => return Err(err).context("reading BOOKMARKS_ENV"),
        };

        let api_token = match args.api_token {
            Some(token) => token,
            None => lookup("BOOKMARKS_API_TOKEN")
                .context("BOOKMARKS_API_TOKEN must be set (or pass --api-token)")?,
        };
        if api_token.trim().is_empty() {
            bail!("API token must not be empty");
        }

        // --- Merge ---
        let cfg = Self {
            host: args.host.unwrap_or(env_host),
            port: args.port.unwrap_or(env_port),
            database_url: args.database_url.unwrap_or(env_db),
            api_token,
            environment: args.environment.unwrap_or(env_environment),
        };

        Ok((cfg, args.migrate))
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

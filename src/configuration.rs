use std::env;
use std::env::current_dir;
use std::fmt::Display;
use std::time::Duration;

use config::Config;
use config::ConfigError;
use secrecy::ExposeSecret;
use secrecy::Secret;
use serde::Deserialize;
use serde_aux::field_attributes::deserialize_number_from_string;
use sqlx::postgres::PgConnectOptions;
use sqlx::postgres::PgSslMode;

use crate::domain::SubscriberEmail;
use crate::email_client::EmailClient;

/// Global configuration, loaded from `configuration/*.yaml` and `APP_*` env
/// vars. See `get_configuration`.
#[derive(Deserialize, Clone)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub application: ApplicationSettings,
    pub email_client: EmailClientSettings,
    pub admin: AdminSettings,
    pub redis_uri: Secret<String>,
}

/// Server configuration
#[derive(Deserialize, Clone)]
pub struct ApplicationSettings {
    /// Should be localhost on dev machine, 0.0.0.0 on prod
    pub host: String,

    /// 0 picks a random free port (tests)
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,

    /// Public address of the landing page, quoted in outgoing emails
    pub base_url: String,

    /// Signs session and flash message cookies
    pub hmac_secret: Secret<String>,
}

/// Database configuration
#[derive(Deserialize, Clone)]
pub struct DatabaseSettings {
    pub username: String,
    pub password: Secret<String>,
    pub host: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    pub database_name: String,

    /// Should be `true` in production.
    /// https://www.postgresql.org/docs/current/libpq-ssl.html#LIBPQ-SSL-SSLMODE-STATEMENTS
    pub require_ssl: bool,
}

impl DatabaseSettings {
    /// Connection to the named database
    pub fn connection(&self) -> PgConnectOptions { self.connection_without_db().database(&self.database_name) }

    /// Connection to the Postgres instance, with `database_name` unset. Used to
    /// create a randomised db for testing.
    pub fn connection_without_db(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .username(&self.username)
            .password(self.password.expose_secret())
            .host(&self.host)
            .port(self.port)
            .ssl_mode(match self.require_ssl {
                true => PgSslMode::Require,
                false => PgSslMode::Prefer,
            })
    }
}

/// Email delivery API (Postmark-compatible)
#[derive(Deserialize, Clone)]
pub struct EmailClientSettings {
    pub base_url: String,
    pub sender_email: String,
    pub authorization_token: Secret<String>,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub timeout_milliseconds: u64,
}

impl EmailClientSettings {
    pub fn sender(&self) -> Result<SubscriberEmail, String> { SubscriberEmail::parse(self.sender_email.clone()) }

    pub fn timeout(&self) -> Duration { Duration::from_millis(self.timeout_milliseconds) }

    pub fn client(self) -> Result<EmailClient, anyhow::Error> {
        let sender = self.sender().map_err(anyhow::Error::msg)?;
        let timeout = self.timeout();
        EmailClient::new(self.base_url, sender, self.authorization_token, timeout)
    }
}

/// The single admin account, seeded on startup if it does not exist yet.
/// Changing `password` here does not update an already seeded account.
#[derive(Deserialize, Clone)]
pub struct AdminSettings {
    pub username: String,
    pub password: Secret<String>,
}

#[derive(Debug, PartialEq)]
pub enum Environment {
    Local,
    Production,
}

impl Display for Environment {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Environment::Local => "local",
                Environment::Production => "production",
            }
        )
    }
}

impl TryFrom<String> for Environment {
    type Error = String;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            e => Err(format!(
                "{e} is not a supported environment; use either `local` or `production`"
            )),
        }
    }
}

/// Load yaml configuration files at `<project_root>/configuration`:
/// `base.yaml`, then `{local,production}.yaml` depending on `APP_ENVIRONMENT`
/// (default `local`), then `APP_*` env vars, e.g. `APP_APPLICATION__PORT=5001`
/// -> `Settings.application.port`.
///
/// All fields must be present, otherwise the server will not start.
pub fn get_configuration() -> Result<Settings, ConfigError> {
    let cfg_dir = current_dir()
        .map_err(|e| ConfigError::Foreign(Box::new(e)))?
        .join("configuration");

    let env: Environment = env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".to_string())
        .try_into()
        .map_err(ConfigError::Message)?;

    tracing::info!("loading config for {env} env");

    let settings = Config::builder()
        .add_source(config::File::from(cfg_dir.join("base.yaml")))
        .add_source(config::File::from(cfg_dir.join(format!("{env}.yaml"))))
        // env vars are always strings; numeric fields go through `serde-aux`
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}

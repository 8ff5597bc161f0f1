use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub server: Server,
    pub db: Db,
    pub retention: Retention,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Server {
    pub host: String,
    pub port: u16,
}

/// Which store implementation backs the webhook event collection.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DbBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Db {
    pub backend: DbBackend,
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
}

/// Upper bound on retention: ten years.
pub const MAX_TTL_SECONDS: i64 = 10 * 365 * 86_400;
/// Upper bound on the sweep interval: one day.
pub const MAX_SWEEP_INTERVAL_MS: u64 = 86_400_000;

#[derive(Debug, Deserialize, Clone)]
pub struct Retention {
    pub ttl_seconds: i64,
    pub sweep_interval_ms: u64,
}

impl Retention {
    /// Age after which a claimed event is considered expired.
    pub fn ttl(&self) -> time::Duration {
        time::Duration::seconds(self.ttl_seconds)
    }

    pub fn sweep_interval(&self) -> time::Duration {
        time::Duration::milliseconds(i64::try_from(self.sweep_interval_ms).unwrap_or(i64::MAX))
    }

    /// A non-positive TTL would disable deduplication; a zero interval spins the sweeper.
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if self.ttl_seconds <= 0 || self.ttl_seconds > MAX_TTL_SECONDS {
            return Err(config::ConfigError::Message(format!(
                "retention.ttl_seconds must be in 1..={MAX_TTL_SECONDS}, got {}",
                self.ttl_seconds
            )));
        }
        if self.sweep_interval_ms == 0 || self.sweep_interval_ms > MAX_SWEEP_INTERVAL_MS {
            return Err(config::ConfigError::Message(format!(
                "retention.sweep_interval_ms must be in 1..={MAX_SWEEP_INTERVAL_MS}, got {}",
                self.sweep_interval_ms
            )));
        }
        Ok(())
    }
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

fn default_connect_timeout_ms() -> u64 {
    5000
}

/// Load settings from `config/default.toml`, `config/<env>.toml`, and env overrides.
pub fn load() -> Result<Settings, config::ConfigError> {
    let env_name = std::env::var("APP_ENV").unwrap_or_else(|_| "dev".to_string());
    let cfg = config::Config::builder()
        .add_source(config::File::with_name("config/default"))
        .add_source(config::File::with_name(&format!("config/{env_name}")).required(false))
        .add_source(config::Environment::with_prefix("WEBHOOK_DEDUP").separator("__"))
        .build()?;
    from_config(cfg)
}

/// Deserialize and validate settings from an already-built source stack.
pub fn from_config(cfg: config::Config) -> Result<Settings, config::ConfigError> {
    let settings: Settings = cfg.try_deserialize()?;
    settings.retention.validate()?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::{DbBackend, MAX_TTL_SECONDS, Settings, from_config};

    fn try_parse(toml: &str) -> Result<Settings, config::ConfigError> {
        from_config(
            config::Config::builder()
                .add_source(config::File::from_str(toml, config::FileFormat::Toml))
                .build()
                .unwrap(),
        )
    }

    fn parse(toml: &str) -> Settings {
        try_parse(toml).unwrap()
    }

    fn with_retention(ttl_seconds: i64, sweep_interval_ms: u64) -> String {
        format!(
            r#"
            [server]
            host = "127.0.0.1"
            port = 8080

            [db]
            backend = "memory"

            [retention]
            ttl_seconds = {ttl_seconds}
            sweep_interval_ms = {sweep_interval_ms}
            "#
        )
    }

    #[test]
    fn given_memory_backend_without_url_when_parsed_should_apply_pool_defaults() {
        let settings = parse(
            r#"
            [server]
            host = "127.0.0.1"
            port = 8080

            [db]
            backend = "memory"

            [retention]
            ttl_seconds = 604800
            sweep_interval_ms = 60000
            "#,
        );

        assert_eq!(settings.db.backend, DbBackend::Memory);
        assert!(settings.db.url.is_empty());
        assert_eq!(settings.db.max_connections, 10);
        assert_eq!(settings.db.connect_timeout_ms, 5000);
    }

    #[test]
    fn given_seven_day_retention_when_ttl_called_should_return_seven_days() {
        let settings = parse(
            r#"
            [server]
            host = "127.0.0.1"
            port = 8080

            [db]
            backend = "postgres"
            url = "postgres://localhost/test"

            [retention]
            ttl_seconds = 604800
            sweep_interval_ms = 250
            "#,
        );

        assert_eq!(settings.retention.ttl(), time::Duration::days(7));
        assert_eq!(
            settings.retention.sweep_interval(),
            time::Duration::milliseconds(250)
        );
    }

    #[test]
    fn given_non_positive_ttl_when_loaded_should_fail() {
        assert!(try_parse(&with_retention(-1, 60_000)).is_err());
        assert!(try_parse(&with_retention(0, 60_000)).is_err());
    }

    #[test]
    fn given_zero_sweep_interval_when_loaded_should_fail() {
        assert!(try_parse(&with_retention(604_800, 0)).is_err());
    }

    #[test]
    fn given_ttl_above_ceiling_when_loaded_should_fail() {
        assert!(try_parse(&with_retention(i64::MAX / 2, 60_000)).is_err());
        assert!(try_parse(&with_retention(MAX_TTL_SECONDS, 60_000)).is_ok());
    }
}

use serde::Deserialize;
use std::env;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub bind_addr: String,
    pub jwt_secret: String,
    pub access_token_ttl_seconds: i64,
    /// How often expired identity sessions and their orphans are swept.
    pub session_sweep_interval_seconds: u64,
    pub chat: ChatSettings,
    pub seed_demo_accounts: bool,
}

/// Bounds of the artificial delay before a scripted reply, `[min, max)` in ms.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
pub struct ChatSettings {
    pub reply_delay_min_ms: u64,
    pub reply_delay_max_ms: u64,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            reply_delay_min_ms: 1000,
            reply_delay_max_ms: 3000,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8081".to_string(),
            jwt_secret: "dev-secret-only-for-local-testing".to_string(),
            access_token_ttl_seconds: 3600,
            session_sweep_interval_seconds: 60,
            chat: ChatSettings::default(),
            seed_demo_accounts: true,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        // Determine environment (defaults to dev)
        let env = env::var("APP_ENV").unwrap_or_else(|_| "dev".to_string());

        // Build configuration from config/*.toml + ENV overrides
        let settings = config::Config::builder()
            .add_source(config::File::with_name(&format!("config/{}", env)).required(false))
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()?;

        let defaults = Config::default();

        let bind_addr = settings
            .get_string("server.bind_addr")
            .or_else(|_| env::var("BIND_ADDR"))
            .unwrap_or(defaults.bind_addr);

        let jwt_secret = match settings
            .get_string("auth.jwt_secret")
            .or_else(|_| env::var("JWT_SECRET"))
        {
            Ok(secret) => secret,
            Err(_) if env == "prod" => {
                return Err(config::ConfigError::Message(
                    "JWT_SECRET must be set in production".to_string(),
                ));
            }
            Err(_) => {
                tracing::warn!("Using default JWT secret (dev mode only!)");
                defaults.jwt_secret
            }
        };

        let access_token_ttl_seconds = settings
            .get_int("auth.access_token_ttl_seconds")
            .ok()
            .filter(|v| *v > 0)
            .unwrap_or(defaults.access_token_ttl_seconds);

        let session_sweep_interval_seconds = settings
            .get_int("auth.session_sweep_interval_seconds")
            .ok()
            .and_then(|v| u64::try_from(v).ok())
            .filter(|v| *v > 0)
            .unwrap_or(defaults.session_sweep_interval_seconds);

        let chat = ChatSettings {
            reply_delay_min_ms: settings
                .get_int("chat.reply_delay_min_ms")
                .ok()
                .and_then(|v| u64::try_from(v).ok())
                .unwrap_or(defaults.chat.reply_delay_min_ms),
            reply_delay_max_ms: settings
                .get_int("chat.reply_delay_max_ms")
                .ok()
                .and_then(|v| u64::try_from(v).ok())
                .unwrap_or(defaults.chat.reply_delay_max_ms),
        };
        chat.validate()?;

        let seed_demo_accounts = settings
            .get_bool("seed.demo_accounts")
            .unwrap_or(env != "prod");

        Ok(Config {
            bind_addr,
            jwt_secret,
            access_token_ttl_seconds,
            session_sweep_interval_seconds,
            chat,
            seed_demo_accounts,
        })
    }

    /// Identity sessions live exactly as long as the tokens issued for them.
    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(u64::try_from(self.access_token_ttl_seconds).unwrap_or(0))
    }

    pub fn session_sweep_interval(&self) -> Duration {
        Duration::from_secs(self.session_sweep_interval_seconds)
    }
}

impl ChatSettings {
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if self.reply_delay_min_ms >= self.reply_delay_max_ms {
            return Err(config::ConfigError::Message(format!(
                "chat.reply_delay_min_ms ({}) must be below chat.reply_delay_max_ms ({})",
                self.reply_delay_min_ms, self.reply_delay_max_ms
            )));
        }
        Ok(())
    }
}

use std::env;

/// Process-wide configuration, loaded once at startup.
///
/// Defaults match the compile-time defaults in the design doc; every value
/// is overridable via environment variable for deployment flexibility.
#[derive(Debug, Clone)]
pub struct Config {
    // Database
    pub database_url: String,

    // AI provider
    pub anthropic_api_key: String,

    // Outbound email provider (Resend/SendGrid-shaped HTTP API)
    pub email_api_url: String,
    pub email_api_key: String,

    // Restate
    pub restate_ingress_url: String,

    // Control plane bind address
    pub api_host: String,
    pub api_port: u16,

    // Scout policy knobs (spec.md §6.3)
    pub max_emails_per_scout_per_day: u32,
    pub default_lifetime_hours: u32,
    pub max_lifetime_hours: u32,
    pub poll_interval_secs: u64,
    pub max_cycles: u32,
    pub max_snapshot_text_length: usize,
    pub max_ai_text_length: usize,
    pub dedupe_lookback: usize,
}

impl Config {
    /// Load configuration from environment variables.
    /// Panics with a clear message if required vars are missing.
    pub fn from_env() -> Self {
        Self {
            database_url: required_env("DATABASE_URL"),
            anthropic_api_key: required_env("ANTHROPIC_API_KEY"),
            email_api_url: env::var("EMAIL_API_URL")
                .unwrap_or_else(|_| "https://api.resend.com/emails".to_string()),
            email_api_key: env::var("EMAIL_API_KEY").unwrap_or_default(),
            restate_ingress_url: env::var("RESTATE_INGRESS_URL")
                .unwrap_or_else(|_| "http://localhost:8080".to_string()),
            api_host: env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            api_port: env::var("API_PORT")
                .unwrap_or_else(|_| "8787".to_string())
                .parse()
                .expect("API_PORT must be a number"),
            max_emails_per_scout_per_day: parse_env_or("MAX_EMAILS_PER_SCOUT_PER_DAY", 10),
            default_lifetime_hours: parse_env_or("DEFAULT_LIFETIME_HOURS", 72),
            max_lifetime_hours: parse_env_or("MAX_LIFETIME_HOURS", 168),
            poll_interval_secs: parse_env_or("POLL_INTERVAL_SECS", 600),
            max_cycles: parse_env_or("MAX_CYCLES", 200),
            max_snapshot_text_length: parse_env_or("MAX_SNAPSHOT_TEXT_LENGTH", 5_000),
            max_ai_text_length: parse_env_or("MAX_AI_TEXT_LENGTH", 2_500),
            dedupe_lookback: parse_env_or("DEDUPE_LOOKBACK", 5),
        }
    }

    /// Log the shape of sensitive env vars without leaking their values.
    pub fn log_redacted(&self) {
        let vars = [
            ("DATABASE_URL", &self.database_url),
            ("ANTHROPIC_API_KEY", &self.anthropic_api_key),
            ("RESTATE_INGRESS_URL", &self.restate_ingress_url),
        ];
        for (name, value) in vars {
            if value.is_empty() {
                tracing::info!("{name} = (empty)");
            } else {
                tracing::info!("{name} = ({} chars)", value.len());
            }
        }
    }
}

fn required_env(key: &str) -> String {
    env::var(key).unwrap_or_else(|_| panic!("{key} environment variable is required"))
}

fn parse_env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}

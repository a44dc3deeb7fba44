//! Server configuration

type BoxError = Box<dyn std::error::Error + Send + Sync>;

const MIN_JWT_SECRET_LEN: usize = 32;

/// Server configuration, read once at startup
#[derive(Debug, Clone)]
pub struct Config {
    /// sqlx connection URL (SQLite)
    pub database_url: String,
    /// HTTP port
    pub http_port: u16,
    /// Environment: development | staging | production
    pub environment: String,
    /// HMAC secret for session tokens
    pub jwt_secret: String,
    /// Session token lifetime
    pub jwt_expiry_hours: i64,
    /// How long a PENDING order waits for payment before it expires
    pub order_expiry_minutes: i64,
    /// Connection pool size
    pub db_max_connections: u32,
    /// Emit JSON log lines instead of the human-readable format
    pub log_json: bool,
    /// Directory for the daily rolling log file
    pub log_dir: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite://flashdrop.db?mode=rwc".into(),
            http_port: 8080,
            environment: "development".into(),
            jwt_secret: "dev-JWT_SECRET-not-for-production-use".into(),
            jwt_expiry_hours: 24,
            order_expiry_minutes: 20,
            db_max_connections: 5,
            log_json: false,
            log_dir: None,
        }
    }
}

impl Config {
    /// Require a secret env var: must be set, non-empty and long enough
    /// outside development.
    fn require_secret(name: &str, environment: &str) -> Result<String, BoxError> {
        let val = match std::env::var(name) {
            Ok(v) => v,
            Err(_) => {
                if environment != "development" {
                    return Err(format!("{name} must be set in {environment} environment").into());
                }
                format!("dev-{name}-not-for-production-use")
            }
        };
        if environment != "development" && val.len() < MIN_JWT_SECRET_LEN {
            return Err(
                format!("{name} must be at least {MIN_JWT_SECRET_LEN} characters long").into(),
            );
        }
        Ok(val)
    }

    fn parse_or<T: std::str::FromStr>(name: &str, default: T) -> T {
        std::env::var(name)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        let defaults = Self::default();
        let environment = std::env::var("ENVIRONMENT").unwrap_or(defaults.environment);

        let order_expiry_minutes =
            Self::parse_or("ORDER_EXPIRY_MINUTES", defaults.order_expiry_minutes);
        if order_expiry_minutes <= 0 {
            return Err("ORDER_EXPIRY_MINUTES must be positive".into());
        }

        Ok(Self {
            database_url: std::env::var("DATABASE_URL").unwrap_or(defaults.database_url),
            http_port: Self::parse_or("HTTP_PORT", defaults.http_port),
            jwt_secret: Self::require_secret("JWT_SECRET", &environment)?,
            jwt_expiry_hours: Self::parse_or("JWT_EXPIRY_HOURS", defaults.jwt_expiry_hours),
            order_expiry_minutes,
            db_max_connections: Self::parse_or("DB_MAX_CONNECTIONS", defaults.db_max_connections),
            log_json: std::env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json")),
            log_dir: std::env::var("LOG_DIR").ok().filter(|s| !s.is_empty()),
            environment,
        })
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Pending-order horizon in milliseconds
    pub fn order_expiry_millis(&self) -> i64 {
        self.order_expiry_minutes * 60 * 1000
    }
}

/// Portal API configuration, loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL connection string.
    pub database_url: String,
    /// Maximum number of pooled database connections.
    pub db_max_connections: usize,
    /// Port the HTTP server binds to.
    pub port: u16,
    /// How many import errors are spelled out in an upload summary before
    /// the rest collapse into a `+N more` tail.
    pub import_error_preview: usize,
    /// Upper bound for CSV upload bodies, in bytes.
    pub max_upload_bytes: usize,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Panics with a descriptive message if a required variable is missing.
    pub fn from_env() -> Self {
        Self {
            database_url: required_var("DATABASE_URL"),
            db_max_connections: parsed_var("DB_MAX_CONNECTIONS").unwrap_or(20),
            port: parsed_var("PORT").unwrap_or(4010),
            import_error_preview: parsed_var("IMPORT_ERROR_PREVIEW").unwrap_or(5),
            max_upload_bytes: parsed_var("MAX_UPLOAD_BYTES").unwrap_or(2 * 1024 * 1024),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            db_max_connections: 20,
            port: 4010,
            import_error_preview: 5,
            max_upload_bytes: 2 * 1024 * 1024,
        }
    }
}

fn required_var(name: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| panic!("{name} env var is required"))
}

fn parsed_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.parse().ok())
}

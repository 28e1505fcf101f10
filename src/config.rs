use std::env;

/// How the server resolves the acting user for each request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    /// Per-session "active user" switched via /add and /changeUser
    Local,
    /// Google OAuth login; book routes require an authenticated session
    Google,
}

impl AuthMode {
    fn parse(s: &str) -> Result<Self, String> {
        match s {
            "local" => Ok(AuthMode::Local),
            "google" => Ok(AuthMode::Google),
            other => Err(format!(
                "Invalid AUTH_MODE: {other} (expected local or google)"
            )),
        }
    }
}

/// Google OAuth client credentials (google variant only)
#[derive(Debug, Clone)]
pub struct GoogleConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_url: String,
}

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub database_url: String,
    pub environment: String,
    pub auth_mode: AuthMode,
    /// Default active user id for sessions that have not switched yet (local variant)
    pub initial_user_id: i32,
    pub google: Option<GoogleConfig>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if it exists (development)
        dotenvy::dotenv().ok();

        let server_host = env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let server_port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .map_err(|_| "Invalid SERVER_PORT")?;

        let database_url =
            env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set".to_string())?;

        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        let auth_mode =
            AuthMode::parse(&env::var("AUTH_MODE").unwrap_or_else(|_| "local".to_string()))?;

        let initial_user_id = env::var("ACTIVE_USER_ID")
            .unwrap_or_else(|_| "1".to_string())
            .parse()
            .map_err(|_| "Invalid ACTIVE_USER_ID")?;

        let google = match auth_mode {
            AuthMode::Google => Some(GoogleConfig {
                client_id: env::var("GOOGLE_CLIENT_ID")
                    .map_err(|_| "GOOGLE_CLIENT_ID must be set for AUTH_MODE=google")?,
                client_secret: env::var("GOOGLE_CLIENT_SECRET")
                    .map_err(|_| "GOOGLE_CLIENT_SECRET must be set for AUTH_MODE=google")?,
                redirect_url: env::var("OAUTH_REDIRECT_URL")
                    .unwrap_or_else(|_| "http://localhost:3000/auth/google/callback".to_string()),
            }),
            AuthMode::Local => None,
        };

        Ok(Config {
            server_host,
            server_port,
            database_url,
            environment,
            auth_mode,
            initial_user_id,
            google,
        })
    }

    /// Get server address as string
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

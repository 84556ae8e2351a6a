use std::env;

const DEFAULT_ANALYSIS_ENDPOINT: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent";
const DEFAULT_FROM_EMAIL: &str = "noreply@sitewatch.dev";

#[derive(Clone)]
pub struct ServerConfig {
    pub database_url: String,
    /// Base URL of the dashboard, used for deep links in notifications.
    pub app_url: String,
    pub analysis_endpoint: String,
    pub analysis_api_key: String,
    /// Email delivery is disabled when no provider key is configured.
    pub email_api_key: Option<String>,
    pub from_email: String,
    /// When set, /api/cron/daily-check requires `Authorization: Bearer <secret>`.
    pub cron_secret: Option<String>,
    pub check_pacing_ms: u64,
    pub fetch_timeout_secs: u64,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, String> {
        let database_url =
            env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set".to_string())?;

        let app_url = env::var("APP_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());

        let analysis_endpoint = env::var("GEMINI_API_URL")
            .unwrap_or_else(|_| DEFAULT_ANALYSIS_ENDPOINT.to_string());

        let analysis_api_key =
            env::var("GEMINI_API_KEY").map_err(|_| "GEMINI_API_KEY must be set".to_string())?;

        let email_api_key = env::var("RESEND_API_KEY").ok().filter(|k| !k.is_empty());
        let from_email =
            env::var("FROM_EMAIL").unwrap_or_else(|_| DEFAULT_FROM_EMAIL.to_string());

        let cron_secret = env::var("CRON_SECRET").ok().filter(|s| !s.is_empty());

        let check_pacing_ms = env::var("CHECK_PACING_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(1000);

        let fetch_timeout_secs = env::var("FETCH_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(30);

        Ok(ServerConfig {
            database_url,
            app_url,
            analysis_endpoint,
            analysis_api_key,
            email_api_key,
            from_email,
            cron_secret,
            check_pacing_ms,
            fetch_timeout_secs,
        })
    }
}

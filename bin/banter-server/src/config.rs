//! Server configuration, loaded from environment variables at startup.

use std::collections::HashMap;

/// Runtime configuration for banter-server.
///
/// Every field except the identity settings has a sensible default. At least
/// one of `jwt_secret` / `dev_tokens` must be set or startup fails.
#[derive(Debug, Clone)]
pub struct Config {
    /// TCP address to bind (default: `"0.0.0.0:3000"`).
    pub bind_address: String,

    /// `tracing` filter string, e.g. `"info"` or `"debug,tower_http=warn"`.
    pub log_level: String,

    /// When `true`, emit log records as newline-delimited JSON.
    pub log_json: bool,

    /// Comma-separated list of allowed CORS origins. `None` means wildcard.
    pub cors_allowed_origins: Option<String>,

    /// Serve Swagger UI and the OpenAPI document.
    pub enable_swagger: bool,

    /// Hold one lock per chat id across each append, including the
    /// completion call for bot replies.
    pub serialize_appends: bool,

    /// HS256 shared secret used to verify bearer JWTs.
    pub jwt_secret: Option<String>,
    /// Expected `iss` claim, if any.
    pub jwt_issuer: Option<String>,
    /// Expected `aud` claim, if any.
    pub jwt_audience: Option<String>,

    /// Fixed `token -> user id` table for local development.
    pub dev_tokens: HashMap<String, String>,

    /// Base URL of the OpenAI-compatible API, without a trailing slash.
    pub openai_base_url: String,
    pub openai_api_key: Option<String>,
    pub openai_model: String,

    /// Timeout applied to each completion request, in seconds.
    pub completion_timeout_secs: u64,
}

impl Config {
    /// Build [`Config`] from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self {
            bind_address: env_or("BANTER_BIND", "0.0.0.0:3000"),
            log_level: env_or("BANTER_LOG", "info"),
            log_json: env_flag("BANTER_LOG_JSON", false),
            cors_allowed_origins: env_opt("BANTER_CORS_ORIGINS"),
            enable_swagger: env_flag("BANTER_ENABLE_SWAGGER", true),
            serialize_appends: env_flag("BANTER_SERIALIZE_APPENDS", true),
            jwt_secret: env_opt("BANTER_JWT_SECRET"),
            jwt_issuer: env_opt("BANTER_JWT_ISSUER"),
            jwt_audience: env_opt("BANTER_JWT_AUDIENCE"),
            dev_tokens: env_opt("BANTER_DEV_TOKENS")
                .map(|raw| parse_token_table(&raw))
                .unwrap_or_default(),
            openai_base_url: env_or("BANTER_OPENAI_BASE_URL", "https://api.openai.com/v1")
                .trim_end_matches('/')
                .to_owned(),
            openai_api_key: env_opt("BANTER_OPENAI_API_KEY"),
            openai_model: env_or("BANTER_OPENAI_MODEL", "gpt-3.5-turbo"),
            completion_timeout_secs: parse_env("BANTER_COMPLETION_TIMEOUT_SECS", 60),
        }
    }
}

/// Parse `token=user,token2=user2`. Malformed pairs are skipped.
pub fn parse_token_table(raw: &str) -> HashMap<String, String> {
    raw.split(',')
        .filter_map(|pair| {
            let (token, user) = pair.split_once('=')?;
            let (token, user) = (token.trim(), user.trim());
            if token.is_empty() || user.is_empty() {
                return None;
            }
            Some((token.to_owned(), user.to_owned()))
        })
        .collect()
}

// ── private helpers ──────────────────────────────────────────────────────────

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}

fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_flag(key: &str, default: bool) -> bool {
    std::env::var(key)
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(default)
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

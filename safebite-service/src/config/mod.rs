use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

/// Google's public signing keys for Firebase ID tokens.
const DEFAULT_FIREBASE_JWKS_URL: &str =
    "https://www.googleapis.com/service_accounts/v1/jwk/securetoken@system.gserviceaccount.com";

const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Clone)]
pub struct SafebiteConfig {
    pub common: core_config::Config,
    pub mongodb: MongoConfig,
    pub firebase: FirebaseConfig,
    pub gemini: GeminiSettings,
    pub otlp_endpoint: Option<String>,
}

#[derive(Debug, Clone)]
pub struct MongoConfig {
    pub uri: String,
    pub database: String,
}

#[derive(Debug, Clone)]
pub struct FirebaseConfig {
    /// Expected `aud` of ID tokens, also part of the expected `iss`.
    pub project_id: String,
    pub jwks_url: String,
}

#[derive(Debug, Clone)]
pub struct GeminiSettings {
    pub api_key: String,
    pub model: String,
    pub api_base: String,
}

impl SafebiteConfig {
    /// Credentials have no defaults: a missing one aborts startup.
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;
        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        Ok(SafebiteConfig {
            common: common_config,
            mongodb: MongoConfig {
                uri: get_env("MONGODB_URI", None, is_prod)?,
                database: get_env("MONGODB_DATABASE", Some("safebite"), is_prod)?,
            },
            firebase: FirebaseConfig {
                project_id: get_env("FIREBASE_PROJECT_ID", None, is_prod)?,
                jwks_url: get_env("FIREBASE_JWKS_URL", Some(DEFAULT_FIREBASE_JWKS_URL), false)?,
            },
            gemini: GeminiSettings {
                api_key: get_env("GEMINI_API_KEY", None, is_prod)?,
                model: get_env("GEMINI_MODEL", Some("gemini-1.5-flash"), false)?,
                api_base: get_env("GEMINI_API_BASE", Some(DEFAULT_GEMINI_API_BASE), false)?,
            },
            otlp_endpoint: env::var("OTLP_ENDPOINT").ok().filter(|v| !v.is_empty()),
        })
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) if !val.trim().is_empty() => Ok(val),
        _ => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}

use std::env;

use anyhow::{Context, Result, bail};

use crate::nim::ModelPolicy;

const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";
const DEFAULT_NIM_API_URL: &str = "https://integrate.api.nvidia.com";
const DEFAULT_PORT: u16 = 8080;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub telegram_token: String,
    pub telegram_api_url: String,
    pub nim_api_key: String,
    pub nim_api_url: String,
    /// 0 means every sender is allowed.
    pub allowed_user_id: i64,
    pub model: &'static ModelPolicy,
    pub port: u16,
}

impl AppConfig {
    /// Read configuration from the environment. Missing credentials are a
    /// startup failure, not something to limp along without.
    pub fn from_env() -> Result<Self> {
        let telegram_token =
            env::var("TELEGRAM_TOKEN").context("Missing env var TELEGRAM_TOKEN")?;
        let nim_api_key = env::var("NVIDIA_API_KEY").context("Missing env var NVIDIA_API_KEY")?;

        let allowed_user_id = match env::var("ALLOWED_USER_ID") {
            Ok(raw) => raw
                .parse()
                .with_context(|| format!("ALLOWED_USER_ID must be an integer, got {:?}", raw))?,
            Err(_) => 0,
        };

        let model_id = env::var("MODEL").unwrap_or_else(|_| ModelPolicy::default_id().to_string());
        let Some(model) = ModelPolicy::lookup(&model_id) else {
            bail!(
                "Unknown model {:?}, expected one of: {}",
                model_id,
                ModelPolicy::known_ids().join(", ")
            );
        };

        let port = match env::var("PORT") {
            Ok(raw) => raw
                .parse()
                .with_context(|| format!("PORT must be a port number, got {:?}", raw))?,
            Err(_) => DEFAULT_PORT,
        };

        let telegram_api_url = env::var("TELEGRAM_API_URL")
            .unwrap_or_else(|_| DEFAULT_TELEGRAM_API_URL.to_string());
        let nim_api_url =
            env::var("NIM_API_URL").unwrap_or_else(|_| DEFAULT_NIM_API_URL.to_string());

        Ok(Self {
            telegram_token,
            telegram_api_url,
            nim_api_key,
            nim_api_url,
            allowed_user_id,
            model,
            port,
        })
    }
}

use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

pub const DEFAULT_CALLER_MARKER: &str = "AppsheetBot";
pub const DEFAULT_CLAUDE_MODEL: &str = "anthropic.claude-v2";
pub const DEFAULT_LLAMA_MODEL: &str = "meta.llama2-13b-chat-v1";
pub const DEFAULT_IMAGE_MODEL: &str = "stability.stable-diffusion-xl-v0";

#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub log_level: String,
    pub aws: AwsConfig,
    pub auth: AuthConfig,
    pub models: ModelConfig,
    pub kendra: KendraConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AwsConfig {
    /// Falls back to the SDK's default region chain when unset.
    pub region: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Substring the caller's user-agent must contain.
    pub caller_marker: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    /// Anthropic model for the `claude` and `kendra` handlers and for image prompts.
    pub claude_model: String,
    /// Llama model for the `llama` handler.
    pub llama_model: String,
    /// Stable Diffusion model for the `image` handler.
    pub image_model: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct KendraConfig {
    pub index_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub bucket_name: String,
}

impl GatewayConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;
        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        Ok(GatewayConfig {
            common: common_config,
            log_level: get_env("LOG_LEVEL", Some("INFO"), false)?,
            aws: AwsConfig {
                region: env::var("AWS_DEFAULT_REGION")
                    .ok()
                    .filter(|r| !r.is_empty()),
            },
            auth: AuthConfig {
                caller_marker: get_env("CALLER_AGENT_MARKER", Some(DEFAULT_CALLER_MARKER), false)?,
            },
            models: ModelConfig {
                claude_model: get_env("CLAUDE_MODEL_ID", Some(DEFAULT_CLAUDE_MODEL), false)?,
                llama_model: get_env("LLAMA_MODEL_ID", Some(DEFAULT_LLAMA_MODEL), false)?,
                image_model: get_env("IMAGE_MODEL_ID", Some(DEFAULT_IMAGE_MODEL), false)?,
            },
            kendra: KendraConfig {
                index_id: get_env("KENDRA_INDEX_ID", None, is_prod)?,
            },
            storage: StorageConfig {
                bucket_name: get_env("BUCKET_NAME", None, is_prod)?,
            },
        })
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_env_uses_default_outside_prod() {
        let value = get_env("GENAI_GATEWAY_TEST_UNSET_KEY", Some("fallback"), false).unwrap();
        assert_eq!(value, "fallback");
    }

    #[test]
    fn get_env_requires_value_without_default() {
        assert!(matches!(
            get_env("GENAI_GATEWAY_TEST_UNSET_KEY", None, false),
            Err(AppError::ConfigError(_))
        ));
    }

    #[test]
    fn get_env_requires_value_in_prod() {
        assert!(matches!(
            get_env("GENAI_GATEWAY_TEST_UNSET_KEY", Some("fallback"), true),
            Err(AppError::ConfigError(_))
        ));
    }
}

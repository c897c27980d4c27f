//! Configuration loading from the environment.
//! Kept in its own test binary since it mutates process environment.

use genai_gateway::config::GatewayConfig;

#[test]
fn loads_settings_from_environment() {
    std::env::set_var("ENVIRONMENT", "test");
    std::env::set_var("APP__PORT", "0");
    std::env::set_var("LOG_LEVEL", "WARNING");
    std::env::set_var("AWS_DEFAULT_REGION", "ap-northeast-1");
    std::env::set_var("KENDRA_INDEX_ID", "index-123");
    std::env::set_var("BUCKET_NAME", "images-bucket");
    std::env::remove_var("CALLER_AGENT_MARKER");
    std::env::remove_var("CLAUDE_MODEL_ID");
    std::env::set_var("LLAMA_MODEL_ID", "meta.llama2-70b-chat-v1");

    let config = GatewayConfig::load().expect("Failed to load config");

    assert_eq!(config.common.port, 0);
    assert_eq!(config.log_level, "WARNING");
    assert_eq!(config.aws.region.as_deref(), Some("ap-northeast-1"));
    assert_eq!(config.kendra.index_id, "index-123");
    assert_eq!(config.storage.bucket_name, "images-bucket");
    assert_eq!(config.auth.caller_marker, "AppsheetBot");
    assert_eq!(config.models.claude_model, "anthropic.claude-v2");
    assert_eq!(config.models.llama_model, "meta.llama2-70b-chat-v1");
    assert_eq!(config.models.image_model, "stability.stable-diffusion-xl-v0");

    std::env::set_var("ENVIRONMENT", "prod");
    std::env::remove_var("BUCKET_NAME");
    assert!(GatewayConfig::load().is_err());
}

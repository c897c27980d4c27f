//! genai-gateway: prompt handlers in front of Amazon Bedrock, Kendra and S3.
pub mod auth;
pub mod config;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;

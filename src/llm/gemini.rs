//! Gemini 客户端（走 Google 的 OpenAI 兼容端点）
//!
//! - Base URL: https://generativelanguage.googleapis.com/v1beta/openai/
//! - 默认模型: gemini-2.0-flash-001

use crate::llm::OpenAiClient;

pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai/";
pub const GEMINI_FLASH: &str = "gemini-2.0-flash-001";

/// 创建 Gemini 客户端
///
/// - 使用环境变量 `GEMINI_API_KEY`
/// - 模型可通过 `model` 参数或 `GEMINI_MODEL` 环境变量指定
pub fn create_gemini_client(model: Option<&str>) -> OpenAiClient {
    let api_key = std::env::var("GEMINI_API_KEY").unwrap_or_else(|_| "placeholder".to_string());

    let model = model
        .map(String::from)
        .or_else(|| std::env::var("GEMINI_MODEL").ok())
        .unwrap_or_else(|| GEMINI_FLASH.to_string());

    OpenAiClient::new(Some(GEMINI_BASE_URL), &model, Some(api_key.as_str())).with_name("gemini")
}

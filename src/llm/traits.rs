//! LLM 客户端抽象
//!
//! 所有后端（OpenAI 兼容 / DeepSeek / Gemini / Mock）实现 LlmClient。
//! 生成服务被视为不可信黑盒：可能失败、可能不返回文本、可能返回非法 JSON，
//! 调用方必须对输出做结构校验后再使用。

use async_trait::async_trait;
use thiserror::Error;

use crate::memory::Message;

/// 生成服务调用失败（不做重试，交由上层按单元处理）
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LlmError {
    #[error("Failed to build LLM request: {0}")]
    Request(String),

    #[error("LLM provider error: {0}")]
    Provider(String),

    #[error("LLM request timed out after {0}s")]
    Timeout(u64),
}

/// 单次生成期望的输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseFormat {
    #[default]
    Text,
    /// 要求后端返回 JSON 文本（OpenAI `response_format: json_object`）
    Json,
}

/// LLM 客户端 trait：一次调用，返回文本或「无文本」
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// 非流式完成；`Ok(None)` 表示后端没有返回任何文本
    async fn complete(
        &self,
        messages: &[Message],
        format: ResponseFormat,
    ) -> Result<Option<String>, LlmError>;

    /// 后端名（日志、健康检查用）
    fn name(&self) -> &str;

    /// 获取累计 token 使用统计：(prompt_tokens, completion_tokens, total_tokens)
    /// 默认返回 (0, 0, 0)，具体实现可覆盖
    fn token_usage(&self) -> (u64, u64, u64) {
        (0, 0, 0)
    }
}

//! 智能体层：主控 Coordinator 与子智能体 SubAgent
//!
//! 两者共享同一条「生成 → 解析 JSON → 结构校验」路径，差别只在提示词与校验器。

pub mod coordinator;
pub mod sub_agent;

pub use coordinator::{default_coordinator_prompt, Coordinator};
pub use sub_agent::{default_sub_agent_prompt, offline_plan, SubAgent};

use serde_json::Value;

use crate::actions::SchemaViolation;
use crate::core::{AgentError, AgentRole};
use crate::llm::{LlmClient, ResponseFormat};
use crate::memory::Message;
use crate::observability::preview;

/// 调用一次 LLM（要求 JSON 输出），依次处理：无文本 / 非 JSON / 结构不合法。不重试。
pub(crate) async fn generate_structured<T>(
    llm: &dyn LlmClient,
    role: AgentRole,
    messages: &[Message],
    parse: fn(&Value) -> Result<T, SchemaViolation>,
) -> Result<T, AgentError> {
    tracing::info!(%role, backend = llm.name(), "calling LLM");
    let text = llm
        .complete(messages, ResponseFormat::Json)
        .await
        .map_err(|source| {
            tracing::error!(%role, error = %source, "LLM call failed");
            AgentError::Llm { role, source }
        })?;

    let text = match text {
        Some(t) if !t.is_empty() => t,
        _ => {
            tracing::error!(%role, "empty response");
            return Err(AgentError::EmptyGeneration { role });
        }
    };
    tracing::info!(%role, raw = %preview(&text, 200), "raw response");

    let value: Value = match serde_json::from_str(&text) {
        Ok(v) => v,
        Err(e) => {
            tracing::error!(%role, error = %e, raw = %text, "failed to parse JSON");
            return Err(AgentError::MalformedGeneration { role, raw: text });
        }
    };

    parse(&value).map_err(|violation| {
        tracing::error!(%role, issues = ?violation.issues, "schema validation failed");
        AgentError::SchemaViolation { role, violation }
    })
}

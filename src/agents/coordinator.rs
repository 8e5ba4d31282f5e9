//! Coordinator：主控决策
//!
//! 把固定的角色说明作为 system 消息拼到对话前，要求 LLM 输出 `{reply, actions}` JSON，
//! 校验通过后得到唯一一个 Decision。

use std::sync::Arc;

use crate::actions::{decision_schema_json, parse_decision, Decision};
use crate::agents::generate_structured;
use crate::core::{AgentError, AgentRole};
use crate::llm::LlmClient;
use crate::memory::Message;

/// 内置主控提示词（末尾附带 Decision 的 JSON Schema）
pub fn default_coordinator_prompt() -> String {
    format!(
        r#"You are the main coordinator for Reddit lead generation.

You delegate work to a sub-agent that handles browser automation and data extraction.

Your responsibilities:
1. Clarify missing details (subreddit, keywords, lead format, minimum karma) with the user
2. When you have enough information, create actions for the sub-agent to execute
3. Let the sub-agent report if tools are unavailable - you just coordinate

Response format (JSON ONLY):
{{
  "reply": "Your message to the user explaining what you're doing",
  "actions": [] or [{{"type":"generate_lead", "subreddit":"...", "criteria":{{...}}, "count":N}}]
}}

Guidelines:
- When you have complete information (subreddit, keywords, format, count, minKarma), create actions
- Your reply should tell the user you're delegating to the sub-agent (e.g., "I'm asking my sub-agent to find those leads...")
- If information is missing, ask for it with actions set to []
- Trust the sub-agent to report if it can't complete the task

The response must validate against this JSON Schema:
{}"#,
        decision_schema_json()
    )
}

/// 主控：持有 LLM 与 system prompt
pub struct Coordinator {
    llm: Arc<dyn LlmClient>,
    system_prompt: String,
}

impl Coordinator {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self {
            llm,
            system_prompt: default_coordinator_prompt(),
        }
    }

    /// 替换 system prompt（如从 config/prompts/coordinator.md 加载）
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    /// 基于完整对话产出一个已校验的决策
    pub async fn decide(&self, messages: &[Message]) -> Result<Decision, AgentError> {
        tracing::info!(messages = messages.len(), "coordinator starting");

        let mut full_messages = Vec::with_capacity(messages.len() + 1);
        full_messages.push(Message::system(self.system_prompt.clone()));
        full_messages.extend_from_slice(messages);

        let decision = generate_structured(
            self.llm.as_ref(),
            AgentRole::Coordinator,
            &full_messages,
            parse_decision,
        )
        .await?;

        tracing::info!(
            reply_len = decision.reply.len(),
            actions = decision.actions.len(),
            "decision validated"
        );
        Ok(decision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{LlmError, MockLlmClient};
    use crate::memory::Role;

    const DECISION: &str = r#"{"reply":"Delegating...","actions":[{"type":"generate_lead","subreddit":"forhire","criteria":{"keywords":["wordpress","plugin"]},"count":2}]}"#;

    fn conversation() -> Vec<Message> {
        vec![Message::user(
            "Find 2 WordPress plugin leads from r/forhire with e-commerce focus.",
        )]
    }

    #[tokio::test]
    async fn test_decide_prepends_instructions() {
        let llm = Arc::new(MockLlmClient::new().with_text(DECISION));
        let coordinator = Coordinator::new(llm.clone());
        let history = vec![
            Message::user("I need leads"),
            Message::assistant("Which subreddit?"),
            Message::user("r/forhire, wordpress, 2 leads"),
        ];

        let decision = coordinator.decide(&history).await.unwrap();
        assert_eq!(decision.reply, "Delegating...");
        assert_eq!(decision.actions[0].subreddit, "forhire");

        let calls = llm.calls();
        assert_eq!(calls.len(), 1);
        let sent = &calls[0];
        assert_eq!(sent.len(), 4);
        assert_eq!(sent[0].role, Role::System);
        assert!(sent[0].content.contains("main coordinator"));
        assert_eq!(&sent[1..], history.as_slice());
    }

    #[tokio::test]
    async fn test_custom_prompt() {
        let llm = Arc::new(MockLlmClient::new().with_text(DECISION));
        let coordinator = Coordinator::new(llm.clone()).with_system_prompt("custom");
        coordinator.decide(&conversation()).await.unwrap();
        assert_eq!(llm.calls()[0][0].content, "custom");
    }

    #[tokio::test]
    async fn test_empty_generation() {
        for llm in [MockLlmClient::new().with_empty(), MockLlmClient::new().with_text("")] {
            let llm = Arc::new(llm);
            let err = Coordinator::new(llm.clone())
                .decide(&conversation())
                .await
                .unwrap_err();
            assert_eq!(
                err,
                AgentError::EmptyGeneration {
                    role: AgentRole::Coordinator
                }
            );
            assert_eq!(llm.call_count(), 1);
        }
    }

    #[tokio::test]
    async fn test_malformed_generation_keeps_raw_text() {
        let llm = Arc::new(MockLlmClient::new().with_text("Sure! Here are your leads"));
        let err = Coordinator::new(llm.clone())
            .decide(&conversation())
            .await
            .unwrap_err();
        match err {
            AgentError::MalformedGeneration { role, raw } => {
                assert_eq!(role, AgentRole::Coordinator);
                assert_eq!(raw, "Sure! Here are your leads");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(llm.call_count(), 1);
    }

    #[tokio::test]
    async fn test_schema_violation() {
        let llm = Arc::new(
            MockLlmClient::new().with_text(r#"{"reply":"ok","actions":[{"type":"generate_lead"}]}"#),
        );
        let err = Coordinator::new(llm).decide(&conversation()).await.unwrap_err();
        assert!(matches!(err, AgentError::SchemaViolation { .. }));
    }

    #[tokio::test]
    async fn test_provider_failure_not_retried() {
        let llm = Arc::new(
            MockLlmClient::new()
                .with_error(LlmError::Provider("503".to_string()))
                .with_text(DECISION),
        );
        let err = Coordinator::new(llm.clone())
            .decide(&conversation())
            .await
            .unwrap_err();
        assert!(matches!(err, AgentError::Llm { .. }));
        assert_eq!(llm.call_count(), 1);
    }
}

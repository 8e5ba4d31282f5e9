//! SubAgent：为单个 LeadAction 生成提取计划
//!
//! 浏览器自动化不可用时不调用 LLM，直接返回固定的降级计划；
//! 可用时把角色说明与 `{instruction, action}` 负载发给 LLM，并按 Plan 结构校验。

use std::sync::Arc;

use serde_json::json;

use crate::actions::{parse_plan, ExtractionPlan, LeadAction, Plan};
use crate::agents::generate_structured;
use crate::core::{AgentError, AgentRole};
use crate::llm::LlmClient;
use crate::memory::Message;

const PLAN_INSTRUCTION: &str = "Prepare a lead harvesting plan";

/// 内置子智能体提示词
pub fn default_sub_agent_prompt() -> String {
    r#"You are a research specialist who prepares actionable steps for harvesting leads from Reddit using Playwright MCP.
Input will contain subreddit, criteria, and desired count.
Return JSON with: summary, suggestedSearch (array), extractionPlan { steps[], cssSelectors[] }, risks[].
Do not suggest automation steps that violate Reddit policies."#
        .to_string()
}

/// 自动化不可用时的固定计划（确定性，不经过 LLM）
pub fn offline_plan() -> Plan {
    Plan {
        summary: "Playwright MCP browser automation is currently offline and cannot execute this task."
            .to_string(),
        suggested_search: Some(Vec::new()),
        extraction_plan: ExtractionPlan {
            steps: vec!["Wait for Playwright MCP to be enabled".to_string()],
            css_selectors: Some(Vec::new()),
        },
        risks: Some(vec!["Browser automation is unavailable".to_string()]),
    }
}

/// 子智能体：持有 LLM 与 system prompt
pub struct SubAgent {
    llm: Arc<dyn LlmClient>,
    system_prompt: String,
}

impl SubAgent {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self {
            llm,
            system_prompt: default_sub_agent_prompt(),
        }
    }

    /// 替换 system prompt（如从 config/prompts/sub_agent.md 加载）
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    /// 为一个动作产出一个计划
    pub async fn plan(
        &self,
        action: &LeadAction,
        playwright_available: bool,
    ) -> Result<Plan, AgentError> {
        tracing::info!(
            subreddit = %action.subreddit,
            count = action.count,
            playwright_available,
            "sub-agent starting"
        );

        if !playwright_available {
            tracing::info!("playwright unavailable, returning offline plan");
            return Ok(offline_plan());
        }

        let payload = json!({
            "instruction": PLAN_INSTRUCTION,
            "action": action,
        });
        let messages = [
            Message::system(self.system_prompt.clone()),
            Message::user(payload.to_string()),
        ];

        let plan = generate_structured(
            self.llm.as_ref(),
            AgentRole::SubAgent,
            &messages,
            parse_plan,
        )
        .await?;

        tracing::info!(
            summary_len = plan.summary.len(),
            steps = plan.extraction_plan.steps.len(),
            "plan validated"
        );
        Ok(plan)
    }
}

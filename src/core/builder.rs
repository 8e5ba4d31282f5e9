//! 组件构建：按配置选择 LLM 后端，组装 Coordinator / SubAgent / ActionDispatcher / ChatGateway
//!
//! LLM 客户端作为显式依赖注入各组件，测试中可直接替换为 MockLlmClient。

use std::sync::Arc;
use std::time::Duration;

use crate::agents::{Coordinator, SubAgent};
use crate::config::AppConfig;
use crate::dispatch::ActionDispatcher;
use crate::gateway::{ChatGateway, HttpState};
use crate::llm::{
    create_deepseek_client, create_gemini_client, LlmClient, MockLlmClient, OpenAiClient,
};

/// 实际使用的 LLM 后端
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmProvider {
    Gemini,
    DeepSeek,
    OpenAi,
    Mock,
}

impl LlmProvider {
    fn key_var(self) -> Option<&'static str> {
        match self {
            LlmProvider::Gemini => Some("GEMINI_API_KEY"),
            LlmProvider::DeepSeek => Some("DEEPSEEK_API_KEY"),
            LlmProvider::OpenAi => Some("OPENAI_API_KEY"),
            LlmProvider::Mock => None,
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "gemini" | "google" => Some(LlmProvider::Gemini),
            "deepseek" => Some(LlmProvider::DeepSeek),
            "openai" => Some(LlmProvider::OpenAi),
            "mock" => Some(LlmProvider::Mock),
            _ => None,
        }
    }

    /// 配置的后端有 Key 时使用它，否则按 Gemini → DeepSeek → OpenAI 顺序找第一个有 Key 的，都没有则用 Mock
    pub fn select(configured: &str, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let has_key = |p: LlmProvider| {
            p.key_var()
                .and_then(&lookup)
                .is_some_and(|v| !v.trim().is_empty())
        };
        match Self::from_name(configured) {
            Some(LlmProvider::Mock) => return LlmProvider::Mock,
            Some(p) if has_key(p) => return p,
            Some(p) => tracing::warn!(provider = ?p, "configured provider has no API key"),
            None => tracing::warn!(provider = configured, "unknown LLM provider"),
        }
        [LlmProvider::Gemini, LlmProvider::DeepSeek, LlmProvider::OpenAi]
            .into_iter()
            .find(|p| has_key(*p))
            .unwrap_or(LlmProvider::Mock)
    }
}

/// 从配置创建 LLM 客户端
pub fn create_llm_from_config(cfg: &AppConfig) -> Arc<dyn LlmClient> {
    let provider = LlmProvider::select(&cfg.llm.provider, |k| std::env::var(k).ok());
    let timeout = cfg.llm.timeouts.request;
    if timeout.is_none() {
        tracing::info!("no LLM request timeout configured");
    }

    let client = match provider {
        LlmProvider::Gemini => {
            let model = cfg.llm.gemini.model.as_deref().or(cfg.llm.model.as_deref());
            create_gemini_client(model)
        }
        LlmProvider::DeepSeek => {
            let model = cfg.llm.deepseek.model.as_deref().or(cfg.llm.model.as_deref());
            create_deepseek_client(model)
        }
        LlmProvider::OpenAi => {
            let model = cfg
                .llm
                .openai
                .model
                .clone()
                .or_else(|| cfg.llm.model.clone())
                .unwrap_or_else(|| "gpt-4o-mini".to_string());
            OpenAiClient::new(
                cfg.llm.base_url.as_deref(),
                &model,
                std::env::var("OPENAI_API_KEY").ok().as_deref(),
            )
        }
        LlmProvider::Mock => {
            tracing::warn!("No API key set or provider is mock, using Mock LLM");
            return Arc::new(MockLlmClient::new());
        }
    };
    tracing::info!(provider = client.name(), model = client.model(), "using LLM");
    Arc::new(client.with_request_timeout(timeout))
}

/// 读取 config/prompts/{name}.md（或上级目录），不存在返回 None
pub fn load_prompt(name: &str) -> Option<String> {
    [
        format!("config/prompts/{name}.md"),
        format!("../config/prompts/{name}.md"),
    ]
    .into_iter()
    .find_map(|p| std::fs::read_to_string(p).ok())
    .map(|s| s.trim().to_string())
    .filter(|s| !s.is_empty())
}

/// 管线构建器：LLM 客户端显式注入，提示词可覆盖
pub struct PipelineBuilder {
    config: AppConfig,
    llm: Arc<dyn LlmClient>,
    coordinator_prompt: Option<String>,
    sub_agent_prompt: Option<String>,
}

impl PipelineBuilder {
    pub fn new(config: AppConfig, llm: Arc<dyn LlmClient>) -> Self {
        Self {
            config,
            llm,
            coordinator_prompt: None,
            sub_agent_prompt: None,
        }
    }

    /// 从 config/prompts/coordinator.md、sub_agent.md 加载提示词（存在时覆盖内置）
    pub fn with_prompts_from_files(mut self) -> Self {
        self.coordinator_prompt = load_prompt("coordinator");
        self.sub_agent_prompt = load_prompt("sub_agent");
        self
    }

    pub fn with_coordinator_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.coordinator_prompt = Some(prompt.into());
        self
    }

    pub fn with_sub_agent_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.sub_agent_prompt = Some(prompt.into());
        self
    }

    pub fn build_gateway(&self) -> ChatGateway {
        let mut coordinator = Coordinator::new(Arc::clone(&self.llm));
        if let Some(ref p) = self.coordinator_prompt {
            coordinator = coordinator.with_system_prompt(p.clone());
        }
        let mut sub_agent = SubAgent::new(Arc::clone(&self.llm));
        if let Some(ref p) = self.sub_agent_prompt {
            sub_agent = sub_agent.with_system_prompt(p.clone());
        }

        let available = self.config.automation.playwright_available;
        tracing::info!(playwright_available = available, "building chat gateway");
        ChatGateway::new(
            Arc::new(coordinator),
            Arc::new(ActionDispatcher::new(Arc::new(sub_agent), available)),
        )
    }

    pub fn build_http_state(&self) -> HttpState {
        HttpState {
            gateway: Arc::new(self.build_gateway()),
            llm: Arc::clone(&self.llm),
            keep_alive: Duration::from_secs(self.config.server.keep_alive_secs.max(1)),
        }
    }
}

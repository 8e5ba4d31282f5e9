//! OpenAI 兼容 API 客户端
//!
//! 通过 async_openai 调用任意 OpenAI 兼容端点（可配置 base_url）；支持 Gemini、DeepSeek、OpenAI、自建代理等。

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_openai::config::OpenAIConfig;
use async_openai::types::chat::{
    ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
    ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequestArgs, ResponseFormat as ApiResponseFormat,
};
use async_openai::Client;
use async_trait::async_trait;

use crate::llm::{LlmClient, LlmError, ResponseFormat};
use crate::memory::{Message, Role};

/// Token 使用统计（累计值）
#[derive(Debug, Clone, Default)]
pub struct TokenUsage {
    pub prompt_tokens: Arc<AtomicU64>,
    pub completion_tokens: Arc<AtomicU64>,
    pub total_tokens: Arc<AtomicU64>,
}

impl TokenUsage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, prompt: u64, completion: u64) {
        self.prompt_tokens.fetch_add(prompt, Ordering::Relaxed);
        self.completion_tokens.fetch_add(completion, Ordering::Relaxed);
        self.total_tokens.fetch_add(prompt + completion, Ordering::Relaxed);
    }

    pub fn get(&self) -> (u64, u64, u64) {
        (
            self.prompt_tokens.load(Ordering::Relaxed),
            self.completion_tokens.load(Ordering::Relaxed),
            self.total_tokens.load(Ordering::Relaxed),
        )
    }
}

/// OpenAI 兼容客户端：持有 Client 与 model 名，complete 时转 Message 为 API 格式并取首条 content
pub struct OpenAiClient {
    client: Client<OpenAIConfig>,
    model: String,
    name: String,
    /// 单次请求超时；None 表示不限时
    request_timeout: Option<Duration>,
    /// 累计 token 使用统计
    pub usage: TokenUsage,
}

impl OpenAiClient {
    pub fn new(base_url: Option<&str>, model: &str, api_key: Option<&str>) -> Self {
        let api_key = api_key
            .map(String::from)
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
            .unwrap_or_else(|| "sk-placeholder".to_string());

        let config = if let Some(url) = base_url {
            OpenAIConfig::new().with_api_base(url).with_api_key(api_key)
        } else {
            OpenAIConfig::new().with_api_key(api_key)
        };

        Self {
            client: Client::with_config(config),
            model: model.to_string(),
            name: "openai".to_string(),
            request_timeout: None,
            usage: TokenUsage::new(),
        }
    }

    /// 设置后端名（Gemini / DeepSeek 复用本客户端时区分日志）
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_request_timeout(mut self, secs: Option<u64>) -> Self {
        self.request_timeout = secs.map(Duration::from_secs);
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn to_openai_messages(
        &self,
        messages: &[Message],
    ) -> Result<Vec<ChatCompletionRequestMessage>, LlmError> {
        let build_err = |e: async_openai::error::OpenAIError| LlmError::Request(e.to_string());
        messages
            .iter()
            .map(|m| {
                Ok(match m.role {
                    Role::System => ChatCompletionRequestMessage::System(
                        ChatCompletionRequestSystemMessageArgs::default()
                            .content(m.content.clone())
                            .build()
                            .map_err(build_err)?,
                    ),
                    Role::User => ChatCompletionRequestMessage::User(
                        ChatCompletionRequestUserMessageArgs::default()
                            .content(m.content.clone())
                            .build()
                            .map_err(build_err)?,
                    ),
                    Role::Assistant => ChatCompletionRequestMessage::Assistant(
                        ChatCompletionRequestAssistantMessageArgs::default()
                            .content(m.content.clone())
                            .build()
                            .map_err(build_err)?,
                    ),
                })
            })
            .collect()
    }
}

#[async_trait]
impl LlmClient for OpenAiClient {
    fn name(&self) -> &str {
        &self.name
    }

    fn token_usage(&self) -> (u64, u64, u64) {
        self.usage.get()
    }

    async fn complete(
        &self,
        messages: &[Message],
        format: ResponseFormat,
    ) -> Result<Option<String>, LlmError> {
        let mut args = CreateChatCompletionRequestArgs::default();
        args.model(&self.model)
            .messages(self.to_openai_messages(messages)?);
        if format == ResponseFormat::Json {
            args.response_format(ApiResponseFormat::JsonObject);
        }
        let request = args.build().map_err(|e| LlmError::Request(e.to_string()))?;

        let chat = self.client.chat();
        let call = chat.create(request);
        let response = match self.request_timeout {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .map_err(|_| LlmError::Timeout(limit.as_secs()))?,
            None => call.await,
        }
        .map_err(|e| LlmError::Provider(e.to_string()))?;

        // 提取 token 使用统计
        if let Some(usage) = &response.usage {
            self.usage
                .add(usage.prompt_tokens as u64, usage.completion_tokens as u64);
        }

        Ok(response
            .choices
            .first()
            .and_then(|c| c.message.content.clone()))
    }
}

//! Mock LLM 客户端（用于测试与无 API Key 的本地运行）
//!
//! 按顺序回放预设响应；脚本耗尽后返回一个「无动作」的主控决策，便于本地跑通流程。
//! 同时记录每次调用收到的消息，供测试断言提示词与调用次数。

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::llm::{LlmClient, LlmError, ResponseFormat};
use crate::memory::Message;

const FALLBACK_DECISION: &str = r#"{"reply":"(mock) Tell me which subreddit, keywords and how many leads you need.","actions":[]}"#;

/// Mock 客户端：脚本化响应队列 + 调用记录
#[derive(Debug, Default)]
pub struct MockLlmClient {
    script: Mutex<VecDeque<Result<Option<String>, LlmError>>>,
    calls: Mutex<Vec<Vec<Message>>>,
}

impl MockLlmClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加一条文本响应
    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.push(Ok(Some(text.into())));
        self
    }

    /// 追加一条「无文本」响应
    pub fn with_empty(self) -> Self {
        self.push(Ok(None));
        self
    }

    /// 追加一条调用失败
    pub fn with_error(self, err: LlmError) -> Self {
        self.push(Err(err));
        self
    }

    fn push(&self, item: Result<Option<String>, LlmError>) {
        if let Ok(mut script) = self.script.lock() {
            script.push_back(item);
        }
    }

    /// 已发生的调用次数
    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|c| c.len()).unwrap_or(0)
    }

    /// 每次调用收到的完整消息（含 system 提示词）
    pub fn calls(&self) -> Vec<Vec<Message>> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    fn name(&self) -> &str {
        "mock"
    }

    async fn complete(
        &self,
        messages: &[Message],
        _format: ResponseFormat,
    ) -> Result<Option<String>, LlmError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(messages.to_vec());
        }
        let next = self.script.lock().ok().and_then(|mut s| s.pop_front());
        next.unwrap_or_else(|| Ok(Some(FALLBACK_DECISION.to_string())))
    }
}

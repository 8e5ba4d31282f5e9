//! ChatGateway：一次聊天请求的完整流程
//!
//! 主控运行一次 → 发出 reply → 串行分派动作并透传每个事件 → 发出 complete。
//! 只有主控失败会进入 ErrorTerminal（发出唯一一条 error）；动作级失败只是普通的 subagent:error 事件。

use std::fmt;
use std::sync::Arc;

use crate::agents::Coordinator;
use crate::dispatch::ActionDispatcher;
use crate::gateway::StreamEvent;
use crate::memory::Message;

/// 请求状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayPhase {
    AwaitingDecision,
    StreamingReply,
    DispatchingActions,
    Complete,
    ErrorTerminal,
}

impl fmt::Display for GatewayPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GatewayPhase::AwaitingDecision => "awaiting_decision",
            GatewayPhase::StreamingReply => "streaming_reply",
            GatewayPhase::DispatchingActions => "dispatching_actions",
            GatewayPhase::Complete => "complete",
            GatewayPhase::ErrorTerminal => "error_terminal",
        };
        f.write_str(name)
    }
}

pub struct ChatGateway {
    coordinator: Arc<Coordinator>,
    dispatcher: Arc<ActionDispatcher>,
}

impl ChatGateway {
    pub fn new(coordinator: Arc<Coordinator>, dispatcher: Arc<ActionDispatcher>) -> Self {
        Self {
            coordinator,
            dispatcher,
        }
    }

    pub fn dispatcher(&self) -> &ActionDispatcher {
        &self.dispatcher
    }

    /// 跑完整个请求，事件按顺序交给 `emit`；返回终止状态（Complete 或 ErrorTerminal）
    pub async fn run<F>(&self, messages: &[Message], mut emit: F) -> GatewayPhase
    where
        F: FnMut(StreamEvent),
    {
        let mut phase = GatewayPhase::AwaitingDecision;
        tracing::info!(%phase, messages = messages.len(), "calling coordinator");

        let decision = match self.coordinator.decide(messages).await {
            Ok(d) => d,
            Err(e) => {
                phase = GatewayPhase::ErrorTerminal;
                tracing::error!(%phase, error = %e, "coordinator failed");
                emit(StreamEvent::Error {
                    message: e.to_string(),
                });
                return phase;
            }
        };

        phase = GatewayPhase::StreamingReply;
        tracing::info!(%phase, actions = decision.actions.len(), "streaming reply");
        emit(StreamEvent::Reply {
            text: decision.reply,
        });

        if !decision.actions.is_empty() {
            phase = GatewayPhase::DispatchingActions;
            tracing::info!(%phase, count = decision.actions.len(), "dispatching actions");
            self.dispatcher
                .dispatch(&decision.actions, |event| {
                    tracing::debug!(event = event.kind(), "streaming event");
                    emit(StreamEvent::Dispatch(event));
                })
                .await;
        }

        phase = GatewayPhase::Complete;
        tracing::info!(%phase, "sending complete");
        emit(StreamEvent::Complete);
        phase
    }
}

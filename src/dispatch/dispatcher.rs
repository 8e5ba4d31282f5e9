//! ActionDispatcher：严格串行的动作处理循环
//!
//! 第 i+1 个动作的 SubAgent 调用一定在第 i 个动作的结果事件发出之后才开始；
//! 单个动作失败只转成 error 事件，不中断后续动作。

use std::sync::Arc;

use crate::actions::LeadAction;
use crate::agents::SubAgent;
use crate::dispatch::DispatchEvent;

pub const UNAVAILABLE_MESSAGE: &str =
    "Playwright MCP is not available. Browser automation cannot be performed.";

/// 一次分派的结果计数（只用于日志，不作为事件发出）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchStats {
    pub planned: usize,
    pub failed: usize,
    pub unavailable: usize,
}

pub struct ActionDispatcher {
    sub_agent: Arc<SubAgent>,
    playwright_available: bool,
}

impl ActionDispatcher {
    pub fn new(sub_agent: Arc<SubAgent>, playwright_available: bool) -> Self {
        Self {
            sub_agent,
            playwright_available,
        }
    }

    pub fn playwright_available(&self) -> bool {
        self.playwright_available
    }

    /// 按输入顺序处理全部动作，`emit` 按发出顺序同步调用；全部处理完才返回
    pub async fn dispatch<F>(&self, actions: &[LeadAction], mut emit: F) -> DispatchStats
    where
        F: FnMut(DispatchEvent),
    {
        tracing::info!(count = actions.len(), "processing actions");
        let mut stats = DispatchStats::default();

        for action in actions {
            tracing::info!(subreddit = %action.subreddit, "emitting subagent:start");
            emit(DispatchEvent::Start(action.clone()));

            if !self.playwright_available {
                tracing::info!(subreddit = %action.subreddit, "playwright unavailable, emitting subagent:unavailable");
                stats.unavailable += 1;
                emit(DispatchEvent::Unavailable {
                    action: action.clone(),
                    message: UNAVAILABLE_MESSAGE.to_string(),
                });
                continue;
            }

            match self.sub_agent.plan(action, self.playwright_available).await {
                Ok(plan) => {
                    tracing::info!(subreddit = %action.subreddit, "sub-agent completed");
                    stats.planned += 1;
                    emit(DispatchEvent::Result {
                        action: action.clone(),
                        result: plan,
                    });
                }
                Err(e) => {
                    tracing::warn!(subreddit = %action.subreddit, error = %e, "sub-agent failed");
                    stats.failed += 1;
                    emit(DispatchEvent::Error {
                        action: action.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(?stats, "all actions processed");
        stats
    }
}

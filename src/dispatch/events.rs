//! 分派事件：每个动作先发 start，随后恰好一个 result / error / unavailable
//!
//! 序列化格式与前端约定一致：`{"type": "subagent:start", "payload": ...}`。

use serde::{Deserialize, Serialize};

use crate::actions::{LeadAction, Plan};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum DispatchEvent {
    /// 开始处理该动作
    #[serde(rename = "subagent:start")]
    Start(LeadAction),
    /// 子智能体给出了合法计划
    #[serde(rename = "subagent:result")]
    Result { action: LeadAction, result: Plan },
    /// 子智能体失败（只影响该动作）
    #[serde(rename = "subagent:error")]
    Error { action: LeadAction, error: String },
    /// 浏览器自动化不可用，未调用子智能体
    #[serde(rename = "subagent:unavailable")]
    Unavailable { action: LeadAction, message: String },
}

impl DispatchEvent {
    pub fn action(&self) -> &LeadAction {
        match self {
            DispatchEvent::Start(action)
            | DispatchEvent::Result { action, .. }
            | DispatchEvent::Error { action, .. }
            | DispatchEvent::Unavailable { action, .. } => action,
        }
    }

    /// 事件类型名（日志用）
    pub fn kind(&self) -> &'static str {
        match self {
            DispatchEvent::Start(_) => "subagent:start",
            DispatchEvent::Result { .. } => "subagent:result",
            DispatchEvent::Error { .. } => "subagent:error",
            DispatchEvent::Unavailable { .. } => "subagent:unavailable",
        }
    }

    pub fn is_start(&self) -> bool {
        matches!(self, DispatchEvent::Start(_))
    }
}

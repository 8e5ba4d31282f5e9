//! 生成管线错误类型
//!
//! 四类失败均只终止「当前这一次生成调用」：
//! 在主控处会终止整个请求（网关发出一条 error 事件），在子智能体处只终止对应动作。

use std::fmt;

use thiserror::Error;

use crate::actions::SchemaViolation;
use crate::llm::LlmError;

/// 发起生成调用的角色
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentRole {
    /// 主控（决策）
    Coordinator,
    /// 子智能体（提取计划）
    SubAgent,
}

impl fmt::Display for AgentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgentRole::Coordinator => write!(f, "Main agent"),
            AgentRole::SubAgent => write!(f, "Sub agent"),
        }
    }
}

/// 生成 → 解析 → 校验 过程中的失败
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AgentError {
    #[error("{role} returned empty response")]
    EmptyGeneration { role: AgentRole },

    /// 原始文本保留用于排查
    #[error("{role} returned non-JSON payload: {raw}")]
    MalformedGeneration { role: AgentRole, raw: String },

    #[error("{role} {violation}")]
    SchemaViolation {
        role: AgentRole,
        #[source]
        violation: SchemaViolation,
    },

    #[error("{role} call failed: {source}")]
    Llm {
        role: AgentRole,
        #[source]
        source: LlmError,
    },
}

impl AgentError {
    pub fn role(&self) -> AgentRole {
        match self {
            AgentError::EmptyGeneration { role }
            | AgentError::MalformedGeneration { role, .. }
            | AgentError::SchemaViolation { role, .. }
            | AgentError::Llm { role, .. } => *role,
        }
    }
}

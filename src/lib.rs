//! LeadBee - Rust 线索生成智能体服务
//!
//! 模块划分：
//! - **actions**: 主控决策 / 子智能体计划的数据模型与校验（Decision / LeadAction / Plan）
//! - **agents**: 主控 Coordinator（决策生成）与 SubAgent（提取计划生成）
//! - **config**: 应用配置加载（TOML + 环境变量）
//! - **core**: 错误类型、组件构建
//! - **dispatch**: 动作分派器，逐个驱动子智能体并产出事件
//! - **gateway**: 流式网关（请求状态机 + HTTP/SSE 接口）
//! - **llm**: LLM 客户端抽象与实现（OpenAI 兼容 / DeepSeek / Gemini / Mock）
//! - **memory**: 对话消息
//! - **observability**: 日志初始化

pub mod actions;
pub mod agents;
pub mod config;
pub mod core;
pub mod dispatch;
pub mod gateway;
pub mod llm;
pub mod memory;
pub mod observability;

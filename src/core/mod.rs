//! 核心层：错误类型与组件构建

pub mod builder;
pub mod error;

pub use builder::{create_llm_from_config, load_prompt, LlmProvider, PipelineBuilder};
pub use error::{AgentError, AgentRole};

//! LLM 层：客户端抽象与实现（OpenAI 兼容 / DeepSeek / Gemini / Mock）

pub mod deepseek;
pub mod gemini;
pub mod mock;
pub mod openai;
pub mod traits;

pub use deepseek::{create_deepseek_client, DEEPSEEK_CHAT};
pub use gemini::{create_gemini_client, GEMINI_FLASH};
pub use mock::MockLlmClient;
pub use openai::{OpenAiClient, TokenUsage};
pub use traits::{LlmClient, LlmError, ResponseFormat};

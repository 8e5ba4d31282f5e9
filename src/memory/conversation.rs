//! 对话消息
//!
//! 客户端按顺序提交 user / assistant（Gemini 风格的 `model` 视为 assistant）消息；
//! System 仅由服务端在拼接提示词时使用，不接受客户端传入。

use serde::{Deserialize, Serialize};

/// 消息角色（与 LLM API 一致）
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    #[serde(alias = "model")]
    Assistant,
    #[serde(skip_deserializing)]
    System,
}

/// 单条消息
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_role_is_assistant() {
        let msg: Message = serde_json::from_str(r#"{"role":"model","content":"hi"}"#).unwrap();
        assert_eq!(msg, Message::assistant("hi"));
    }

    #[test]
    fn test_client_cannot_send_system() {
        let res = serde_json::from_str::<Message>(r#"{"role":"system","content":"x"}"#);
        assert!(res.is_err());
    }
}

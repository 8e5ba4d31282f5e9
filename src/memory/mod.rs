//! 对话层：客户端提交的消息序列（单次请求内只追加、不修改）

pub mod conversation;

pub use conversation::{Message, Role};

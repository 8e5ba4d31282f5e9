//! 流式网关
//!
//! - **chat**: 单次请求的状态机（AwaitingDecision → StreamingReply → DispatchingActions → Complete，
//!   任何阶段的主控失败直接进入 ErrorTerminal）
//! - **events**: 推给客户端的事件（reply / subagent:* / complete / error）
//! - **http**: axum 路由，`POST /chat` 以 SSE 推送事件

pub mod chat;
pub mod events;
pub mod http;

pub use chat::{ChatGateway, GatewayPhase};
pub use events::StreamEvent;
pub use http::{router, HttpState};

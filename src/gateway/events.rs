//! 网关事件：生命周期事件 + 透传的分派事件
//!
//! 每个事件序列化为一个 JSON 对象，对应 SSE 中的一条 `data:`。

use serde::{Serialize, Serializer};

use crate::dispatch::DispatchEvent;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// 主控给用户的回复
    Reply { text: String },
    /// 分派过程事件
    Dispatch(DispatchEvent),
    /// 正常结束
    Complete,
    /// 主控失败，流提前结束
    Error { message: String },
}

impl StreamEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            StreamEvent::Reply { .. } => "reply",
            StreamEvent::Dispatch(e) => e.kind(),
            StreamEvent::Complete => "complete",
            StreamEvent::Error { .. } => "error",
        }
    }

    /// complete / error 之后不会再有事件
    pub fn is_terminal(&self) -> bool {
        matches!(self, StreamEvent::Complete | StreamEvent::Error { .. })
    }
}

impl From<DispatchEvent> for StreamEvent {
    fn from(event: DispatchEvent) -> Self {
        StreamEvent::Dispatch(event)
    }
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum Lifecycle<'a> {
    Reply { text: &'a str },
    Complete,
    Error { message: &'a str },
}

impl Serialize for StreamEvent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            StreamEvent::Reply { text } => Lifecycle::Reply { text }.serialize(serializer),
            StreamEvent::Dispatch(event) => event.serialize(serializer),
            StreamEvent::Complete => Lifecycle::Complete.serialize(serializer),
            StreamEvent::Error { message } => Lifecycle::Error { message }.serialize(serializer),
        }
    }
}

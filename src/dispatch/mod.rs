//! 动作分派：逐个把 LeadAction 交给 SubAgent，并为每个阶段发出事件

pub mod dispatcher;
pub mod events;

pub use dispatcher::{ActionDispatcher, DispatchStats, UNAVAILABLE_MESSAGE};
pub use events::DispatchEvent;

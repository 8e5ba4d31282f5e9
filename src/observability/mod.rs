//! 可观测性：tracing 日志初始化（默认 info，可通过 RUST_LOG 覆盖）

use tracing_subscriber::{filter::LevelFilter, fmt, prelude::*, EnvFilter};

pub fn init() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .with(fmt::layer())
        .init();
}

/// LLM 原始输出预览（日志用，按字符截断）
pub fn preview(text: &str, max_chars: usize) -> String {
    let mut out: String = text.chars().take(max_chars).collect();
    if text.chars().count() > max_chars {
        out.push_str("...");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_truncates_on_char_boundary() {
        assert_eq!(preview("短文本", 10), "短文本");
        assert_eq!(preview("线索生成智能体", 2), "线索...");
    }
}

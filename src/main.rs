//! LeadBee 服务入口
//!
//! 启动: cargo run
//! 加载 .env 与配置，初始化日志，构建管线后在 [server] host:port 上提供 `POST /chat`（SSE）。

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use leadbee::config::{load_config, AppConfig};
use leadbee::core::{create_llm_from_config, PipelineBuilder};
use leadbee::gateway::router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env 不存在时忽略
    let _ = dotenvy::dotenv();
    leadbee::observability::init();

    let cfg = load_config(None).unwrap_or_else(|e| {
        tracing::warn!("Config load failed ({}), using defaults", e);
        AppConfig::default()
    });

    let llm = create_llm_from_config(&cfg);
    let state = PipelineBuilder::new(cfg.clone(), llm)
        .with_prompts_from_files()
        .build_http_state();
    let app = router(Arc::new(state));

    let addr: SocketAddr = format!("{}:{}", cfg.server.host, cfg.server.port)
        .parse()
        .with_context(|| format!("invalid listen address {}:{}", cfg.server.host, cfg.server.port))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(
        playwright_available = cfg.automation.playwright_available,
        "Main agent listening on http://{}",
        addr
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for ctrl-c: {}", e);
        std::future::pending::<()>().await;
    }
}

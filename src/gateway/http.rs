//! HTTP 接口
//!
//! - `POST /chat`：body `{"messages": [...]}`，响应为 SSE，每条 `data:` 是一个 JSON 事件
//! - `GET /api/health`：健康检查与 token 统计
//!
//! 请求处理在独立任务中运行，SSE 响应头立即返回，客户端在第一个事件前就能看到连接建立。

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header::HeaderName, HeaderValue, StatusCode},
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Response,
    },
    routing::{get, post},
    Json, Router,
};
use futures_util::stream;
use serde_json::{json, Value};
use tokio::sync::mpsc;
use tracing::Instrument;

use crate::gateway::{ChatGateway, StreamEvent};
use crate::llm::LlmClient;
use crate::memory::Message;

/// 路由共享状态
pub struct HttpState {
    pub gateway: Arc<ChatGateway>,
    pub llm: Arc<dyn LlmClient>,
    pub keep_alive: Duration,
}

pub fn router(state: Arc<HttpState>) -> Router {
    Router::new()
        .route("/chat", post(chat_stream))
        .route("/api/health", get(health))
        .with_state(state)
}

fn bad_request(message: impl Into<String>) -> Response {
    let message = message.into();
    tracing::warn!(%message, "rejecting chat request");
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
}

/// POST /chat：主控回复、子智能体事件、complete / error，全部经 SSE 推送
async fn chat_stream(
    State(state): State<Arc<HttpState>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Response {
    let body = match body {
        Ok(Json(body)) => body,
        Err(rejection) => {
            return bad_request(format!("invalid request body: {}", rejection.body_text()))
        }
    };
    let raw = match body.get("messages") {
        Some(v) if v.is_array() => v.clone(),
        _ => return bad_request("messages must be an array"),
    };
    let messages: Vec<Message> = match serde_json::from_value(raw) {
        Ok(m) => m,
        Err(e) => return bad_request(format!("invalid message: {e}")),
    };

    let request_id = uuid::Uuid::new_v4();
    tracing::info!(%request_id, messages = messages.len(), "chat request received");
    if let Some(last) = messages.last() {
        tracing::debug!(%request_id, role = ?last.role, content = %last.content, "last message");
    }

    let (tx, rx) = mpsc::unbounded_channel::<StreamEvent>();
    let gateway = Arc::clone(&state.gateway);
    let span = tracing::info_span!("chat", %request_id);
    tokio::spawn(
        async move {
            let phase = gateway
                .run(&messages, |event| {
                    // 客户端断开后剩余事件直接丢弃，流程照常跑完
                    if tx.send(event).is_err() {
                        tracing::debug!("client disconnected, dropping event");
                    }
                })
                .await;
            tracing::info!(%phase, "chat request finished");
        }
        .instrument(span),
    );

    let events = stream::unfold(rx, |mut rx| async move {
        loop {
            let event = rx.recv().await?;
            match Event::default().json_data(&event) {
                Ok(sse_event) => return Some((Ok::<_, Infallible>(sse_event), rx)),
                Err(e) => tracing::error!(error = %e, kind = event.kind(), "failed to encode event"),
            }
        }
    });

    let sse = Sse::new(events).keep_alive(
        KeepAlive::new()
            .interval(state.keep_alive)
            .text("keepalive"),
    );
    (
        [(
            HeaderName::from_static("x-accel-buffering"),
            HeaderValue::from_static("no"),
        )],
        sse,
    )
        .into_response()
}

/// GET /api/health
async fn health(State(state): State<Arc<HttpState>>) -> Json<Value> {
    let (prompt, completion, total) = state.llm.token_usage();
    Json(json!({
        "status": "ok",
        "provider": state.llm.name(),
        "playwright_available": state.gateway.dispatcher().playwright_available(),
        "tokens": {
            "prompt": prompt,
            "completion": completion,
            "total": total,
        },
    }))
}

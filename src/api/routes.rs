//! HTTP 路由
//!
//! ```text
//! GET  /health           - 存活检查
//! POST /calculate        - 执行计算，返回 PNG 附件
//! POST /calculate-json   - 执行计算，返回 JSON（含截图地址）
//! GET  /screenshot/{id}  - 按运行 ID 读取截图
//! ```

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value as JsonValue};
use tokio::sync::Semaphore;
use tower_http::cors::CorsLayer;
use tracing::{error, info};
use uuid::Uuid;

use crate::api::artifact_store::ArtifactStore;
use crate::models::{AutomationResult, CalculationRequest};
use crate::orchestrator::AutomationEngine;
use crate::workflow::RunCtx;

const CALCULATION_ID_HEADER: &str = "x-calculation-id";
const SHARE_LINK_HEADER: &str = "x-share-link";

/// 路由共享状态
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<dyn AutomationEngine>,
    pub store: ArtifactStore,
    /// 同时运行的自动化任务上限
    pub permits: Arc<Semaphore>,
}

impl AppState {
    pub fn new(engine: Arc<dyn AutomationEngine>, store: ArtifactStore, max_concurrent_runs: usize) -> Self {
        Self {
            engine,
            store,
            permits: Arc::new(Semaphore::new(max_concurrent_runs.clamp(1, Semaphore::MAX_PERMITS))),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/calculate", post(calculate))
        .route("/calculate-json", post(calculate_json))
        .route("/screenshot/{id}", get(screenshot))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> Json<JsonValue> {
    Json(json!({
        "status": "healthy",
        "timestamp": timestamp(),
    }))
}

async fn calculate(State(state): State<AppState>, body: Bytes) -> Response {
    let request = match parse_request(&body) {
        Ok(request) => request,
        Err(response) => return response,
    };

    let (id, result) = execute(&state, request).await;
    let png = if result.success {
        state.store.read(&id).await
    } else {
        None
    };
    let Some(png) = png else {
        return failure(StatusCode::INTERNAL_SERVER_ERROR, &id, &result, None);
    };

    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("image/png"));
    if let Ok(value) =
        HeaderValue::from_str(&format!("attachment; filename=\"iol_calculation_{}.png\"", id))
    {
        headers.insert(header::CONTENT_DISPOSITION, value);
    }
    if let Ok(value) = HeaderValue::from_str(&id.to_string()) {
        headers.insert(HeaderName::from_static(CALCULATION_ID_HEADER), value);
    }
    if let Some(value) = result
        .share_link
        .as_deref()
        .and_then(|link| HeaderValue::from_str(link).ok())
    {
        headers.insert(HeaderName::from_static(SHARE_LINK_HEADER), value);
    }

    (StatusCode::OK, headers, png).into_response()
}

async fn calculate_json(State(state): State<AppState>, body: Bytes) -> Response {
    let request = match parse_request(&body) {
        Ok(request) => request,
        Err(response) => return response,
    };

    let (id, result) = execute(&state, request).await;
    let captured = result.success
        && tokio::fs::try_exists(state.store.path_for(&id))
            .await
            .unwrap_or(false);
    if !captured {
        return failure(
            StatusCode::INTERNAL_SERVER_ERROR,
            &id,
            &result,
            Some(timestamp()),
        );
    }

    Json(json!({
        "success": true,
        "calculation_id": id.to_string(),
        "screenshot_url": format!("/screenshot/{}", id),
        "share_link": result.share_link,
        "message": result.message,
        "warnings": result.warnings,
        "timestamp": timestamp(),
    }))
    .into_response()
}

async fn screenshot(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let png = match Uuid::parse_str(&id) {
        Ok(id) => state.store.read(&id).await,
        Err(_) => None,
    };
    match png {
        Some(png) => ([(header::CONTENT_TYPE, "image/png")], png).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Screenshot not found" })),
        )
            .into_response(),
    }
}

/// 解析请求体；空请求与无法解析的请求直接返回 400
#[allow(clippy::result_large_err)]
fn parse_request(body: &[u8]) -> Result<CalculationRequest, Response> {
    let no_data = || bad_request("No data provided".to_string());

    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(no_data());
    }
    let value: JsonValue =
        serde_json::from_slice(body).map_err(|e| bad_request(format!("Invalid JSON: {}", e)))?;
    let empty = match &value {
        JsonValue::Null => true,
        JsonValue::Object(map) => map.is_empty(),
        _ => false,
    };
    if empty {
        return Err(no_data());
    }
    // 直接从原始字节反序列化，数字字段保留请求中的写法
    serde_json::from_slice(body).map_err(|e| bad_request(format!("Invalid request: {}", e)))
}

/// 在独立任务中执行一次运行
///
/// 请求被放弃时任务仍会走完清理流程。
async fn execute(state: &AppState, request: CalculationRequest) -> (Uuid, AutomationResult) {
    let id = Uuid::new_v4();
    let ctx = RunCtx::new(id.to_string(), state.store.path_for(&id));
    info!("{} 📋 收到计算请求", ctx);

    let permit = match state.permits.clone().acquire_owned().await {
        Ok(permit) => permit,
        Err(e) => {
            error!("{} ❌ 获取运行许可失败: {}", ctx, e);
            return (id, AutomationResult::failed("service is shutting down", Vec::new()));
        }
    };

    let engine = state.engine.clone();
    let handle = tokio::spawn(async move {
        let _permit = permit;
        engine.run(&request, &ctx).await
    });

    match handle.await {
        Ok(result) => (id, result),
        Err(e) => {
            error!("[运行 {}] ❌ 任务执行失败: {}", id, e);
            (id, AutomationResult::failed(format!("run task failed: {}", e), Vec::new()))
        }
    }
}

fn failure(status: StatusCode, id: &Uuid, result: &AutomationResult, timestamp: Option<String>) -> Response {
    let message = if result.success {
        "Screenshot was not captured".to_string()
    } else {
        result.message.clone()
    };
    let mut body = json!({
        "error": "Calculation failed",
        "message": message,
        "calculation_id": id.to_string(),
    });
    if let Some(ts) = timestamp {
        body["success"] = JsonValue::Bool(false);
        body["timestamp"] = JsonValue::String(ts);
    }
    if !result.warnings.is_empty() {
        body["warnings"] = json!(result.warnings);
    }
    (status, Json(body)).into_response()
}

fn bad_request(error: String) -> Response {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": error }))).into_response()
}

fn timestamp() -> String {
    chrono::Local::now().to_rfc3339()
}

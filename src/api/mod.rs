//! HTTP 接口层
//!
//! 只负责请求解析、运行 ID 分配与响应格式，自动化本身交给 [`AutomationEngine`]。

pub mod artifact_store;
pub mod routes;

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::info;

use crate::config::Config;
use crate::orchestrator::AutomationEngine;

pub use artifact_store::ArtifactStore;
pub use routes::{router, AppState};

/// 启动 HTTP 服务，直到进程退出
pub async fn serve(config: &Config, engine: Arc<dyn AutomationEngine>) -> Result<()> {
    let store = ArtifactStore::new(&config.screenshots_dir);
    store
        .ensure_dir()
        .await
        .with_context(|| format!("创建截图目录失败: {}", config.screenshots_dir))?;

    let state = AppState::new(engine, store, config.max_concurrent_runs);
    let app = router(state);

    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("监听 {} 失败", config.bind_addr))?;
    info!("🌐 HTTP 服务已启动: http://{}", config.bind_addr);

    axum::serve(listener, app).await.context("HTTP 服务异常退出")?;
    Ok(())
}

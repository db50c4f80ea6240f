//! 会话驱动 - 编排层
//!
//! ## 职责
//!
//! 1. **独占会话**：每次运行启动一个全新会话，运行结束即销毁，从不复用
//! 2. **导航**：打开目标页面，失败立即结束运行
//! 3. **委托流程**：把页面交给 `CalculationFlow` 执行全部阶段
//! 4. **兜底**：流程中的 panic 在这里被捕获并转换为失败结果
//! 5. **清理**：无论哪条路径退出（包括调用方放弃等待），会话都恰好关闭一次

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use async_trait::async_trait;
use futures::FutureExt;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::error::{AppResult, AutomationError};
use crate::infrastructure::{AutomationSession, SessionLauncher};
use crate::models::{AutomationResult, CalculationRequest};
use crate::utils::logging::{log_run_finished, log_run_start};
use crate::workflow::{CalculationFlow, Degradations, RunCtx, RunOutput};

/// 请求层看到的自动化引擎
#[async_trait]
pub trait AutomationEngine: Send + Sync {
    /// 执行一次完整运行；从不返回原始错误，所有失败都归类到结果里
    async fn run(&self, request: &CalculationRequest, ctx: &RunCtx) -> AutomationResult;
}

/// 会话驱动
///
/// 每次运行都在独立任务中执行：调用方放弃等待（超时、任务被丢弃）时，
/// 运行仍会走到清理步骤。
pub struct SessionDriver<L: SessionLauncher> {
    inner: Arc<DriverInner<L>>,
}

struct DriverInner<L> {
    launcher: L,
    flow: CalculationFlow,
    target_url: String,
}

impl<L: SessionLauncher + 'static> SessionDriver<L> {
    pub fn new(launcher: L, config: &Config) -> Self {
        Self {
            inner: Arc::new(DriverInner {
                launcher,
                flow: CalculationFlow::new(config),
                target_url: config.target_url.clone(),
            }),
        }
    }

    pub async fn run_automation(&self, request: &CalculationRequest, ctx: &RunCtx) -> AutomationResult {
        let inner = Arc::clone(&self.inner);
        let request = request.clone();
        let task_ctx = ctx.clone();
        let handle = tokio::spawn(async move { inner.run(&request, &task_ctx).await });

        match handle.await {
            Ok(result) => result,
            Err(e) => {
                error!("{} ❌ 运行任务异常结束: {}", ctx, e);
                AutomationResult::failed(format!("run task failed: {}", e), Vec::new())
            }
        }
    }
}

impl<L: SessionLauncher> DriverInner<L> {
    async fn run(&self, request: &CalculationRequest, ctx: &RunCtx) -> AutomationResult {
        log_run_start(ctx, request);

        // 会话都没起来时没有需要清理的资源
        let session = match self.launcher.launch(ctx).await {
            Ok(session) => session,
            Err(e) => {
                error!("{} ❌ 启动浏览器会话失败: {}", ctx, e);
                let result = AutomationResult::failed(e.to_string(), Vec::new());
                log_run_finished(ctx, &result);
                return result;
            }
        };

        let mut degradations = Degradations::default();
        let outcome = AssertUnwindSafe(self.drive(session.as_ref(), request, ctx, &mut degradations))
            .catch_unwind()
            .await
            .unwrap_or_else(|panic| Err(AutomationError::Unexpected(panic_message(panic))));

        if let Err(e) = session.close().await {
            warn!("{} ⚠️ 关闭浏览器会话失败: {}", ctx, e);
        }

        let warnings = degradations.into_notes();
        let result = match outcome {
            Ok(output) => AutomationResult {
                success: true,
                message: AutomationResult::SUCCESS_MESSAGE.to_string(),
                artifact_captured: output.artifact_captured,
                share_link: output.share_link,
                warnings,
            },
            Err(e) => {
                error!("{} ❌ 运行失败: {}", ctx, e);
                AutomationResult::failed(e.to_string(), warnings)
            }
        };

        log_run_finished(ctx, &result);
        result
    }

    async fn drive(
        &self,
        session: &dyn AutomationSession,
        request: &CalculationRequest,
        ctx: &RunCtx,
        degradations: &mut Degradations,
    ) -> AppResult<RunOutput> {
        let ui = session.surface();
        info!("{} 🌐 打开 {}", ctx, self.target_url);
        ui.navigate(&self.target_url).await?;
        self.flow.run(ui, request, ctx, degradations).await
    }
}

#[async_trait]
impl<L: SessionLauncher + 'static> AutomationEngine for SessionDriver<L> {
    async fn run(&self, request: &CalculationRequest, ctx: &RunCtx) -> AutomationResult {
        self.run_automation(request, ctx).await
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    let detail = payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string());
    format!("panic during run: {}", detail)
}

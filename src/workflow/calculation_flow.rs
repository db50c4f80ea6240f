//! 一次计算的完整流程 - 流程层
//!
//! 流程顺序（严格串行，后一阶段依赖前一阶段留下的页面状态）：
//! 1. 同意页 → 取消默认勾选
//! 2. 性别 → 患者信息字段
//! 3. OD / OS 区块
//! 4. 计算 → 等待结果
//! 5. 截图 → 分享链接

use std::sync::Arc;

use tracing::{debug, info};

use crate::config::{Config, Timings};
use crate::error::AppResult;
use crate::infrastructure::wait::poll_until;
use crate::infrastructure::{Scope, UiSurface};
use crate::models::{CalculationRequest, TopField};
use crate::services::{
    enter_text, ArtifactCapture, Calculator, ConsentGate, FieldResolver, LabelBindingResolver,
    PopoverSelect, ShareLinkExtractor,
};
use crate::workflow::eye_config::EyeConfigurator;
use crate::workflow::run_ctx::RunCtx;
use crate::workflow::stage::{Degradations, StageOutcome};

/// 流程产出（成功/失败由调用方根据 `Result` 判断）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOutput {
    pub artifact_captured: bool,
    pub share_link: Option<String>,
}

/// 计算流程
///
/// - 编排全部阶段，决定哪些失败致命、哪些只记录
/// - 不持有任何资源（page）
/// - 只依赖业务能力（services）
pub struct CalculationFlow {
    consent: ConsentGate,
    popover: PopoverSelect,
    resolver: Arc<dyn FieldResolver>,
    eyes: EyeConfigurator,
    calculator: Calculator,
    artifact: ArtifactCapture,
    share: ShareLinkExtractor,
    timings: Timings,
}

impl CalculationFlow {
    pub fn new(config: &Config) -> Self {
        Self::with_resolver(config, Arc::new(LabelBindingResolver))
    }

    /// 使用自定义字段解析策略
    pub fn with_resolver(config: &Config, resolver: Arc<dyn FieldResolver>) -> Self {
        let timings = &config.timings;
        Self {
            consent: ConsentGate::new(timings),
            popover: PopoverSelect::new(timings),
            eyes: EyeConfigurator::new(resolver.clone(), timings),
            resolver,
            calculator: Calculator::new(timings),
            artifact: ArtifactCapture::new(config),
            share: ShareLinkExtractor::new(timings),
            timings: timings.clone(),
        }
    }

    pub async fn run(
        &self,
        ui: &dyn UiSurface,
        request: &CalculationRequest,
        ctx: &RunCtx,
        degradations: &mut Degradations,
    ) -> AppResult<RunOutput> {
        // ========== 1. 进入可配置状态 ==========
        info!("{} 📋 处理同意页...", ctx);
        self.consent.dismiss(ui).await?;
        degradations.record("opt-in checkbox", self.consent.clear_opt_in(ui).await);

        // ========== 2. 患者信息 ==========
        self.popover.select_gender(ui, request.gender).await?;
        for (field, value) in &request.top_fields {
            let outcome = self.fill_top_field(ui, *field, value.as_str()).await;
            degradations.record(&format!("field {}", field.label()), outcome);
        }

        // ========== 3. 眼别区块 ==========
        for (section, config) in request.eye_sections() {
            self.eyes
                .configure_eye_section(ui, section, config, degradations)
                .await?;
        }

        // ========== 4. 计算 ==========
        info!("{} 🧮 开始计算...", ctx);
        self.calculator.trigger(ui).await?;
        degradations.record("results", self.calculator.await_results(ui).await);

        // ========== 5. 产物 ==========
        let captured = self.artifact.capture(ui, &ctx.artifact_path).await;
        let artifact_captured = captured.is_ok();
        degradations.record("screenshot", captured);

        let share_link = self.share.extract(ui).await;
        if share_link.is_none() {
            degradations.record("share link", StageOutcome::degraded("no share link found"));
        }

        Ok(RunOutput {
            artifact_captured,
            share_link,
        })
    }

    /// 顶部字段：label 可能晚于页面渲染，短时间内等待其出现
    async fn fill_top_field(&self, ui: &dyn UiSurface, field: TopField, value: &str) -> StageOutcome {
        let label = field.label();
        let input = match poll_until(
            &format!("label '{}'", label),
            self.timings.field_timeout,
            self.timings.poll_interval,
            || self.resolver.resolve(ui, Scope::Page, label),
        )
        .await
        {
            Ok(input) => input,
            Err(e) => return StageOutcome::degraded(format!("no input bound to this label ({})", e)),
        };

        match enter_text(ui, &input, label, value).await {
            Ok(()) => {
                debug!("{} = {}", label, value);
                StageOutcome::Ok
            }
            Err(e) => StageOutcome::degraded(format!("typing failed ({})", e)),
        }
    }
}

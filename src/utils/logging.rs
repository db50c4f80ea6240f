/// 日志工具模块
///
/// 提供日志初始化和输出的辅助函数
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::models::{AutomationResult, CalculationRequest};
use crate::workflow::RunCtx;

/// 初始化日志
///
/// `RUST_LOG` 优先；未设置时按 `verbose` 选择 debug 或 info。
/// 重复初始化（例如测试中）会被忽略。
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - IOL 计算自动化服务");
    info!("🎯 目标页面: {}", config.target_url);
    info!("📊 最大并发数: {}", config.max_concurrent_runs);
    info!("🖥️ 无头模式: {}", config.headless);
    info!("📁 截图目录: {}", config.screenshots_dir);
    info!("{}", "=".repeat(60));
}

/// 记录一次运行的开始
pub fn log_run_start(ctx: &RunCtx, request: &CalculationRequest) {
    info!("\n{}", "=".repeat(60));
    info!("{} 📋 新的计算任务", ctx);
    info!(
        "{} 患者字段 {} 个，性别 {}，眼别区块 {} 个",
        ctx,
        request.top_fields.len(),
        request.gender.label(),
        request.eye_sections().len()
    );
    info!("{}", "=".repeat(60));
}

/// 记录一次运行的结果
pub fn log_run_finished(ctx: &RunCtx, result: &AutomationResult) {
    info!("\n{}", "─".repeat(60));
    if result.success {
        info!("{} ✅ 计算完成", ctx);
    } else {
        info!("{} ❌ 计算失败: {}", ctx, result.message);
    }
    info!(
        "{} 截图: {} | 分享链接: {}",
        ctx,
        if result.artifact_captured { "已保存" } else { "无" },
        result.share_link.as_deref().unwrap_or("无")
    );
    for note in &result.warnings {
        warn!("{} ⚠️ {}", ctx, note);
    }
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "─".repeat(60));
}

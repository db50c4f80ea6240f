//! # IOL Calculator Submit
//!
//! 驱动 ESCRS IOL 计算器网页完成一次计算，返回结果截图和分享链接
//!
//! ## 架构设计
//!
//! 本系统沿用严格的四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源（Page），只暴露能力
//! - `UiSurface` - 全部页面能力的接口，测试中可替换为内存页面
//! - `JsExecutor` - 唯一的 page owner，基于脚本和 CDP 输入事件实现 `UiSurface`
//! - `wait` - 有界等待原语
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，每个能力只操作一种控件
//! - `ConsentGate` / `FieldResolver` / `PopoverSelect` / `ToggleSwitch`
//! - `Calculator` / `ArtifactCapture` / `ShareLinkExtractor`
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一次计算"的完整处理流程
//! - `RunCtx` - 上下文封装（run_id + 截图路径）
//! - `EyeConfigurator` - 单个眼别区块的配置顺序
//! - `CalculationFlow` - 流程编排（同意页 → 字段 → 眼别 → 计算 → 截图 → 分享）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/session_driver` - 会话生命周期，保证每次运行恰好清理一次
//! - `api/` - HTTP 接口，按运行 ID 存放截图
//!
//! ## 模块结构

pub mod api;
pub mod browser;
pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use browser::ChromeLauncher;
pub use config::{Config, Timings};
pub use error::{AppResult, AutomationError};
pub use infrastructure::{AutomationSession, JsExecutor, SessionLauncher, UiSurface};
pub use models::{AutomationResult, CalculationRequest, EyeConfig, EyeSection};
pub use orchestrator::{AutomationEngine, SessionDriver};
pub use workflow::{CalculationFlow, RunCtx};

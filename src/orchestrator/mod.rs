//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层持有稀缺资源（浏览器会话），决定一次运行的生命周期。
//!
//! ## 层次关系
//!
//! ```text
//! api (HTTP 请求 → AutomationEngine)
//!     ↓
//! session_driver (会话启动 / 导航 / 清理)
//!     ↓
//! workflow::CalculationFlow (单次计算的全部阶段)
//!     ↓
//! services (能力层：同意页 / 字段 / 下拉框 / 开关 / 计算 / 截图 / 分享)
//!     ↓
//! infrastructure (基础设施：UiSurface / JsExecutor)
//! ```
//!
//! ## 设计原则
//!
//! 1. **资源隔离**：只有编排层持有会话，且每次运行独占一个
//! 2. **向下依赖**：编排层 → workflow → services → infrastructure
//! 3. **无业务逻辑**：只做生命周期管理和结果归类

pub mod session_driver;

pub use session_driver::{AutomationEngine, SessionDriver};

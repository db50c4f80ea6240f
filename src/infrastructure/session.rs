//! 会话接口 - 基础设施层
//!
//! 每次运行独占一个会话；会话由 [`SessionLauncher`] 创建，由编排层负责关闭。

use async_trait::async_trait;

use crate::error::AppResult;
use crate::infrastructure::ui_surface::UiSurface;
use crate::workflow::RunCtx;

/// 一次运行独占的浏览器会话
#[async_trait]
pub trait AutomationSession: Send + Sync {
    /// 会话中的页面
    fn surface(&self) -> &dyn UiSurface;

    /// 释放会话占用的全部资源；每个会话只调用一次
    async fn close(&self) -> AppResult<()>;
}

/// 会话工厂
#[async_trait]
pub trait SessionLauncher: Send + Sync {
    /// 启动一个全新的、与其他运行互不共享状态的会话
    async fn launch(&self, ctx: &RunCtx) -> AppResult<Box<dyn AutomationSession>>;
}

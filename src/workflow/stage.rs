//! 阶段结果
//!
//! 每个阶段的结果分两层：`Err(AutomationError)` 是致命层，会中止运行；
//! `Ok(StageOutcome::Degraded)` 是降级层，只记录不影响继续执行。

use std::fmt::Display;

use tracing::warn;

/// 非致命的阶段结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageOutcome {
    Ok,
    Degraded(String),
}

impl StageOutcome {
    pub fn degraded(reason: impl Display) -> Self {
        StageOutcome::Degraded(reason.to_string())
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, StageOutcome::Ok)
    }
}

/// 一次运行中累计的降级事件
#[derive(Debug, Default, Clone)]
pub struct Degradations {
    notes: Vec<String>,
}

impl Degradations {
    /// 记录一个阶段结果；降级原因带上阶段名
    pub fn record(&mut self, stage: &str, outcome: StageOutcome) {
        if let StageOutcome::Degraded(reason) = outcome {
            warn!("⚠️ {} 降级: {}", stage, reason);
            self.notes.push(format!("{}: {}", stage, reason));
        }
    }

    pub fn notes(&self) -> &[String] {
        &self.notes
    }

    pub fn into_notes(self) -> Vec<String> {
        self.notes
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }
}

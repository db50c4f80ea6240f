pub mod calculation_flow;
pub mod eye_config;
pub mod run_ctx;
pub mod stage;

pub use calculation_flow::{CalculationFlow, RunOutput};
pub use eye_config::EyeConfigurator;
pub use run_ctx::RunCtx;
pub use stage::{Degradations, StageOutcome};

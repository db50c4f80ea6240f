pub mod loaders;
pub mod request;
pub mod result;

pub use loaders::load_request_file;
pub use request::{
    CalculationRequest, EyeConfig, EyeSection, FieldValue, Gender, SwitchKind, TopField,
};
pub use result::AutomationResult;

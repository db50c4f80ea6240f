pub mod js_executor;
pub mod locator_js;
pub mod session;
pub mod ui_surface;
pub mod wait;

pub use js_executor::JsExecutor;
pub use session::{AutomationSession, SessionLauncher};
pub use ui_surface::{ElementHandle, Locator, Scope, ShareStrategy, TextMatch, UiSurface, Viewport};

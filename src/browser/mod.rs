pub mod headless;
pub mod session;

pub use headless::launch_isolated_browser;
pub use session::{ChromeLauncher, ChromeSession};

pub mod artifact;
pub mod calculation;
pub mod field_resolver;
pub mod navigation;
pub mod popover_select;
pub mod share_link;
pub mod text_entry;
pub mod toggle_switch;

pub use artifact::ArtifactCapture;
pub use calculation::Calculator;
pub use field_resolver::{FieldResolver, LabelBindingResolver};
pub use navigation::ConsentGate;
pub use popover_select::PopoverSelect;
pub use share_link::{parse_clipboard_link, ShareLinkExtractor};
pub use text_entry::enter_text;
pub use toggle_switch::ToggleSwitch;

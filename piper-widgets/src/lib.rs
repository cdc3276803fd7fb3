pub mod theme;
pub mod app_trait;
pub mod components;

pub use app_trait::{AppInfo, AppRegistry, PiperApp};

use makepad_widgets::Cx;

/// Register the shared theme and components with Makepad.
///
/// Call from `LiveRegister::live_register` after `makepad_widgets::live_design`.
/// The theme goes first since the components use its fonts and colors.
pub fn live_design(cx: &mut Cx) {
    theme::live_design(cx);
    components::live_design(cx);
}

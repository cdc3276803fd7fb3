//! # PiperApp - screen plug-in interface
//!
//! Each screen lives in its own crate under `apps/` and reaches the shell
//! through three touch points:
//!
//! 1. Live Register: `<PiperTtsApp as PiperApp>::live_design(cx);`
//! 2. Metadata: `PiperTtsApp::info()`, recorded in an [`AppRegistry`]
//! 3. UI Definition: `tts_app = <TtsApp> {}` inside the shell's `live_design!`
//!
//! ```rust,ignore
//! use piper_widgets::{AppInfo, PiperApp};
//!
//! pub struct MyApp;
//!
//! impl PiperApp for MyApp {
//!     fn info() -> AppInfo {
//!         AppInfo {
//!             name: "Mine",
//!             id: "my-app",
//!             description: "Does things",
//!         }
//!     }
//!
//!     fn live_design(cx: &mut Cx) {
//!         crate::screen::design::live_design(cx);
//!     }
//! }
//! ```

use makepad_widgets::Cx;

/// Metadata about a registered screen
#[derive(Clone, Debug)]
pub struct AppInfo {
    /// Window title / display name
    pub name: &'static str,
    pub id: &'static str,
    pub description: &'static str,
}

pub trait PiperApp {
    fn info() -> AppInfo
    where
        Self: Sized;

    /// Register this screen's widgets with Makepad
    fn live_design(cx: &mut Cx);
}

/// Screens installed in the shell.
pub struct AppRegistry {
    apps: Vec<AppInfo>,
}

impl AppRegistry {
    pub const fn new() -> Self {
        Self { apps: Vec::new() }
    }

    /// Register a screen. A second registration with the same id replaces the first.
    pub fn register(&mut self, info: AppInfo) {
        match self.apps.iter_mut().find(|app| app.id == info.id) {
            Some(existing) => *existing = info,
            None => self.apps.push(info),
        }
    }

    pub fn apps(&self) -> &[AppInfo] {
        &self.apps
    }

    pub fn len(&self) -> usize {
        self.apps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.apps.is_empty()
    }
}

impl Default for AppRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(id: &'static str, name: &'static str) -> AppInfo {
        AppInfo {
            name,
            id,
            description: "",
        }
    }

    #[test]
    fn test_register_keeps_order() {
        let mut registry = AppRegistry::new();
        assert!(registry.is_empty());

        registry.register(info("piper-tts", "Piper TTS"));
        registry.register(info("other", "Other"));

        assert_eq!(registry.len(), 2);
        let ids: Vec<_> = registry.apps().iter().map(|a| a.id).collect();
        assert_eq!(ids, vec!["piper-tts", "other"]);
    }

    #[test]
    fn test_register_same_id_replaces() {
        let mut registry = AppRegistry::default();
        registry.register(info("piper-tts", "Old"));
        registry.register(info("piper-tts", "New"));

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.apps()[0].name, "New");
    }
}

pub mod screen;

use makepad_widgets::Cx;
use piper_widgets::{AppInfo, PiperApp};

pub use screen::{TtsApp, TtsAppRef, TtsAppWidgetExt};

pub struct PiperTtsApp;

impl PiperApp for PiperTtsApp {
    fn info() -> AppInfo {
        AppInfo {
            name: "Piper TTS",
            id: "piper-tts",
            description: "Convert Spanish text to speech with Piper voices",
        }
    }

    fn live_design(cx: &mut Cx) {
        crate::screen::design::live_design(cx);
    }
}

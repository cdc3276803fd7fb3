use makepad_widgets::*;

use piper_data::AppConfig;
use piper_tts::{PiperTtsApp, TtsAppWidgetExt};
use piper_widgets::{AppRegistry, PiperApp};

live_design! {
    use link::theme::*;
    use link::shaders::*;
    use link::widgets::*;
    use piper_widgets::theme::*;

    use piper_tts::screen::design::*;

    App = {{App}} {
        ui: <Window> {
            window: { title: "Piper TTS", inner_size: vec2(960, 1000) }
            pass: {
                clear_color: #f1f5f9
            }

            body = <View> {
                width: Fill, height: Fill
                flow: Down

                tts_app = <TtsApp> {}
            }
        }
    }
}

#[derive(Live)]
pub struct App {
    #[live]
    ui: WidgetRef,
    #[rust]
    config: AppConfig,
    #[rust]
    registry: AppRegistry,
    #[rust]
    initialized: bool,
}

impl LiveHook for App {
    fn after_new_from_doc(&mut self, _cx: &mut Cx) {
        if !self.initialized {
            self.config = AppConfig::from_env();
            self.registry.register(PiperTtsApp::info());
            self.initialized = true;
            ::log::info!(
                "App initialized with {} screen(s), API at {}",
                self.registry.len(),
                self.config.api_base_url
            );
        }
    }
}

impl LiveRegister for App {
    fn live_register(cx: &mut Cx) {
        makepad_widgets::live_design(cx);
        piper_widgets::live_design(cx);
        // Screens after the shared widgets they use
        <PiperTtsApp as PiperApp>::live_design(cx);
    }
}

impl MatchEvent for App {
    fn handle_startup(&mut self, _cx: &mut Cx) {
        for app in self.registry.apps() {
            ::log::info!("Screen ready: {} ({})", app.name, app.description);
        }
    }
}

impl AppMain for App {
    fn handle_event(&mut self, cx: &mut Cx, event: &Event) {
        // Unsaved-text guard: the screen vetoes the first close and warns
        if let Event::WindowCloseRequested(e) = event {
            if !self.ui.tts_app(ids!(tts_app)).request_leave(cx) {
                ::log::info!("Close vetoed, unsaved text in the form");
                e.accept_close.set(false);
            }
        }

        // Config reaches the screen through Scope.
        // ui.handle_event must run before match_event.
        let scope = &mut Scope::with_data(&mut self.config);
        self.ui.handle_event(cx, event, scope);

        self.match_event(cx, event);
    }
}

app_main!(App);

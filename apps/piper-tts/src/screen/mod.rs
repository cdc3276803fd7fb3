pub mod design;

use makepad_widgets::*;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::time::Instant;

use piper_data::notifications::SLIDE_DISTANCE;
use piper_data::{
    gender_labels, save_generated_audio, ApiError, AppConfig, FormAction, FormCommand,
    FormController, Gender, GeneratedAudio, NotificationKind, Stats, SynthesisRequest,
    SynthesisResponse, TtsApiClient, TtsBackend, UploadResponse, VoiceCatalog,
};

/// Number of notification banners the overlay can show at once.
const BANNER_SLOTS: usize = 4;

// ── Background updates ────────────────────────────────────────────────────────

enum StartupUpdate {
    Voices(Result<VoiceCatalog, ApiError>),
    Stats(Result<Stats, ApiError>),
}

enum AudioUpdate {
    Saved(PathBuf),
    Playing(PathBuf),
    Failed { playing: bool, error: ApiError },
}

fn worker_stopped(what: &str) -> ApiError {
    ApiError::io(
        format!("{} worker stopped", what),
        std::io::Error::other("channel closed before a result was sent"),
    )
}

// ── Widget ────────────────────────────────────────────────────────────────────

#[derive(Live, LiveHook, Widget)]
pub struct TtsApp {
    #[deref]
    pub view: View,

    #[rust]
    initialized: bool,

    #[rust]
    form: FormController,

    #[rust]
    client: TtsApiClient,

    #[rust]
    download_dir: PathBuf,

    // Background thread channels
    #[rust]
    startup_rx: Option<Receiver<StartupUpdate>>,

    #[rust]
    upload_rx: Option<Receiver<Result<UploadResponse, ApiError>>>,

    #[rust]
    synthesis_rx: Option<(SynthesisRequest, Receiver<Result<SynthesisResponse, ApiError>>)>,

    #[rust]
    audio_rx: Option<Receiver<AudioUpdate>>,

    // What the widgets currently show, so they are only touched on change
    #[rust]
    rendered_gender_item: usize,

    #[rust]
    rendered_voice_item: usize,

    #[rust]
    rendered_voice_labels: Vec<String>,

    #[rust]
    rendered_speed: f64,
}

impl Widget for TtsApp {
    fn handle_event(&mut self, cx: &mut Cx, event: &Event, scope: &mut Scope) {
        // ── One-time initialisation ───────────────────────────────────────
        if !self.initialized {
            let config = scope
                .data
                .get::<AppConfig>()
                .cloned()
                .unwrap_or_else(AppConfig::from_env);
            self.start(cx, config);
            self.initialized = true;
        }

        self.handle_file_drag(cx, event);

        let actions = cx.capture_actions(|cx| {
            self.view.handle_event(cx, event, scope);
        });

        // ── Inputs ────────────────────────────────────────────────────────
        if let Some(text) = self.view.text_input(ids!(text_input)).changed(&actions) {
            self.dispatch(cx, FormAction::TextChanged(text));
        }

        if let Some(item) = self.view.drop_down(ids!(gender_dropdown)).selected(&actions) {
            self.rendered_gender_item = item;
            let value = item
                .checked_sub(1)
                .and_then(|i| Gender::ALL.get(i))
                .map(|g| g.as_str())
                .unwrap_or("");
            self.dispatch(cx, FormAction::GenderChanged(value.to_string()));
        }

        if let Some(item) = self.view.drop_down(ids!(voice_dropdown)).selected(&actions) {
            self.rendered_voice_item = item;
            let value = self
                .form
                .state()
                .voice_options
                .get(item)
                .map(|o| o.value.clone())
                .unwrap_or_default();
            self.dispatch(cx, FormAction::VoiceChanged(value));
        }

        if let Some(speed) = self.view.slider(ids!(speed_slider)).slided(&actions) {
            self.rendered_speed = speed;
            self.dispatch(cx, FormAction::SpeedChanged(speed));
        }

        if self.view.view(ids!(upload_area)).finger_down(&actions).is_some() {
            self.dispatch(cx, FormAction::UploadAreaClicked);
        }

        // ── Buttons ───────────────────────────────────────────────────────
        if self.view.button(ids!(generate_btn)).clicked(&actions) {
            self.dispatch(cx, FormAction::Generate);
        }
        if self.view.button(ids!(clear_btn)).clicked(&actions) {
            self.dispatch(cx, FormAction::Clear);
        }
        if self.view.button(ids!(download_btn)).clicked(&actions) {
            self.dispatch(cx, FormAction::Download);
        }
        if self.view.button(ids!(play_btn)).clicked(&actions) {
            self.play_audio(cx);
        }

        // ── Poll background channels ──────────────────────────────────────
        let mut need_next_frame = self.poll_workers(cx);

        if let Event::NextFrame(_) = event {
            if !self.form.notifications().is_empty() {
                self.view.redraw(cx);
                need_next_frame = true;
            }
        }

        if need_next_frame {
            cx.new_next_frame();
        }
    }

    fn draw_walk(&mut self, cx: &mut Cx2d, scope: &mut Scope, walk: Walk) -> DrawStep {
        self.sync_form(cx);
        self.sync_notifications(cx);
        self.view.draw_walk(cx, scope, walk)
    }
}

impl TtsApp {
    // ── Controller plumbing ───────────────────────────────────────────────────

    fn start(&mut self, cx: &mut Cx, config: AppConfig) {
        ::log::info!(
            "Piper backend at {}, downloads go to {}",
            config.api_base_url,
            config.download_dir.display()
        );
        self.client = TtsApiClient::new(config.api_base_url);
        self.download_dir = config.download_dir;
        self.view
            .drop_down(ids!(gender_dropdown))
            .set_labels(cx, gender_labels());

        let (tx, rx) = mpsc::channel();
        self.startup_rx = Some(rx);
        let client = self.client.clone();
        std::thread::spawn(move || {
            if tx.send(StartupUpdate::Voices(client.voices())).is_ok() {
                let _ = tx.send(StartupUpdate::Stats(client.stats()));
            }
        });
        cx.new_next_frame();
    }

    fn dispatch(&mut self, cx: &mut Cx, action: FormAction) {
        if let Some(command) = self.form.handle_action(action) {
            self.run_command(cx, command);
        }
        self.view.redraw(cx);
        cx.new_next_frame();
    }

    fn run_command(&mut self, cx: &mut Cx, command: FormCommand) {
        match command {
            FormCommand::OpenFilePicker => self.open_file_picker(cx),
            FormCommand::Upload(path) => self.start_upload(path),
            FormCommand::Synthesize(request) => self.start_synthesis(request),
            FormCommand::Download(audio) => self.start_audio_job(audio, false),
        }
    }

    /// Drain finished background work into the controller. Returns true when
    /// another frame is needed.
    fn poll_workers(&mut self, cx: &mut Cx) -> bool {
        let mut pending = false;
        let mut changed = false;

        if let Some(rx) = self.startup_rx.take() {
            match rx.try_recv() {
                Ok(StartupUpdate::Voices(result)) => {
                    self.form.finish_load_voices(result);
                    self.startup_rx = Some(rx);
                    pending = true;
                    changed = true;
                }
                Ok(StartupUpdate::Stats(result)) => {
                    self.form.finish_load_stats(result);
                    ::log::info!("Aplicación TTS inicializada");
                    changed = true;
                }
                Err(TryRecvError::Empty) => {
                    self.startup_rx = Some(rx);
                    pending = true;
                }
                Err(TryRecvError::Disconnected) => {}
            }
        }

        if let Some(rx) = self.upload_rx.take() {
            match rx.try_recv() {
                Ok(result) => {
                    self.form.finish_upload(result);
                    changed = true;
                }
                Err(TryRecvError::Empty) => {
                    self.upload_rx = Some(rx);
                    pending = true;
                }
                Err(TryRecvError::Disconnected) => {
                    self.form.finish_upload(Err(worker_stopped("upload")));
                    changed = true;
                }
            }
        }

        if let Some((request, rx)) = self.synthesis_rx.take() {
            match rx.try_recv() {
                Ok(result) => {
                    self.form.finish_synthesis(&request, result);
                    changed = true;
                }
                Err(TryRecvError::Empty) => {
                    self.synthesis_rx = Some((request, rx));
                    pending = true;
                }
                Err(TryRecvError::Disconnected) => {
                    self.form
                        .finish_synthesis(&request, Err(worker_stopped("synthesis")));
                    changed = true;
                }
            }
        }

        if let Some(rx) = self.audio_rx.take() {
            match recv_audio(&rx) {
                Some(update) => {
                    self.finish_audio_job(update);
                    changed = true;
                }
                None => {
                    self.audio_rx = Some(rx);
                    pending = true;
                }
            }
        }

        if changed {
            self.view.redraw(cx);
        }
        pending || changed
    }

    // ── Background operations ─────────────────────────────────────────────────

    fn open_file_picker(&mut self, cx: &mut Cx) {
        let dialog = rfd::FileDialog::new().set_title("Seleccionar archivo de texto");
        if let Some(path) = dialog.pick_file() {
            self.dispatch(cx, FormAction::FilePicked(path));
        }
    }

    fn start_upload(&mut self, path: PathBuf) {
        let (tx, rx) = mpsc::channel();
        self.upload_rx = Some(rx);
        let client = self.client.clone();
        std::thread::spawn(move || {
            let _ = tx.send(client.upload_file(&path));
        });
    }

    fn start_synthesis(&mut self, request: SynthesisRequest) {
        let (tx, rx) = mpsc::channel();
        let client = self.client.clone();
        let body = request.clone();
        std::thread::spawn(move || {
            let _ = tx.send(client.synthesize(&body));
        });
        self.synthesis_rx = Some((request, rx));
    }

    fn play_audio(&mut self, cx: &mut Cx) {
        if let Some(audio) = self.form.generated_audio().cloned() {
            self.start_audio_job(audio, true);
            cx.new_next_frame();
        }
    }

    /// Fetch `audio` in the background, then save it to the download dir or,
    /// when `play` is set, to a scratch dir and hand it to the system player.
    fn start_audio_job(&mut self, audio: GeneratedAudio, play: bool) {
        if self.audio_rx.is_some() {
            ::log::debug!("Audio transfer already running, ignoring request");
            return;
        }

        let (tx, rx) = mpsc::channel();
        self.audio_rx = Some(rx);
        let client = self.client.clone();
        let dir = if play {
            std::env::temp_dir().join("piper-studio")
        } else {
            self.download_dir.clone()
        };

        std::thread::spawn(move || {
            let mut player = None;
            let update = match save_generated_audio(&client, &audio, &dir) {
                Ok(path) if play => match spawn_player(&path) {
                    Ok(child) => {
                        player = Some(child);
                        AudioUpdate::Playing(path)
                    }
                    Err(e) => AudioUpdate::Failed {
                        playing: true,
                        error: ApiError::io(format!("cannot play '{}'", path.display()), e),
                    },
                },
                Ok(path) => AudioUpdate::Saved(path),
                Err(error) => AudioUpdate::Failed { playing: play, error },
            };
            let _ = tx.send(update);

            if let Some(child) = player {
                reap(child);
            }
        });
    }

    fn finish_audio_job(&mut self, update: AudioUpdate) {
        match update {
            AudioUpdate::Saved(path) => {
                self.form.notify(
                    format!("Audio guardado en {}", path.display()),
                    NotificationKind::Success,
                );
            }
            AudioUpdate::Playing(path) => {
                ::log::info!("Playing {}", path.display());
            }
            AudioUpdate::Failed { playing, error } => {
                ::log::error!("Error: {}", error);
                let message = if playing {
                    "Error al reproducir el audio"
                } else {
                    "Error al descargar el audio"
                };
                self.form.notify(message, NotificationKind::Error);
            }
        }
    }

    // ── Drag and drop ─────────────────────────────────────────────────────────

    fn handle_file_drag(&mut self, cx: &mut Cx, event: &Event) {
        let drag_active = self.form.state().drag_active;

        match event {
            Event::Drag(e) => {
                let over = self.upload_area_contains(cx, e.abs);
                let has_files = e
                    .items
                    .iter()
                    .any(|item| matches!(item, DragItem::FilePath { .. }));
                if over && has_files {
                    e.response.set(DragResponse::Copy);
                    if !drag_active {
                        self.dispatch(cx, FormAction::DragOver);
                    }
                } else if drag_active {
                    self.dispatch(cx, FormAction::DragLeave);
                }
            }
            Event::Drop(e) => {
                if self.upload_area_contains(cx, e.abs) {
                    let paths = e
                        .items
                        .iter()
                        .filter_map(|item| match item {
                            DragItem::FilePath { path, .. } => Some(PathBuf::from(path)),
                            _ => None,
                        })
                        .collect();
                    self.dispatch(cx, FormAction::FilesDropped(paths));
                } else if drag_active {
                    self.dispatch(cx, FormAction::DragLeave);
                }
            }
            Event::DragEnd => {
                if drag_active {
                    self.dispatch(cx, FormAction::DragLeave);
                }
            }
            _ => {}
        }
    }

    fn upload_area_contains(&self, cx: &Cx, abs: DVec2) -> bool {
        self.view
            .view(ids!(upload_area))
            .area()
            .rect(cx)
            .contains(abs)
    }

    // ── Rendering ─────────────────────────────────────────────────────────────

    fn sync_form(&mut self, cx: &mut Cx) {
        let state = self.form.state();

        // Text and counter
        let input = self.view.text_input(ids!(text_input));
        if input.text() != state.text {
            input.set_text(cx, &state.text);
        }
        let char_count = self.view.label(ids!(char_count));
        char_count.set_text(cx, &state.char_count.to_string());
        let severity = state.char_severity.level();
        char_count.apply_over(cx, live! { draw_text: { severity: (severity) } });

        let drag = if state.drag_active { 1.0 } else { 0.0 };
        self.view
            .view(ids!(upload_area))
            .apply_over(cx, live! { draw_bg: { drag: (drag) } });

        // Gender selector
        let gender_item = state
            .gender
            .and_then(|g| Gender::ALL.iter().position(|x| *x == g))
            .map(|i| i + 1)
            .unwrap_or(0);
        if gender_item != self.rendered_gender_item {
            self.view
                .drop_down(ids!(gender_dropdown))
                .set_selected_item(cx, gender_item);
            self.rendered_gender_item = gender_item;
        }

        // Voice selector, or the disabled placeholder in its place
        let voice_dropdown = self.view.drop_down(ids!(voice_dropdown));
        let labels: Vec<String> = state.voice_options.iter().map(|o| o.label.clone()).collect();
        if labels != self.rendered_voice_labels {
            voice_dropdown.set_labels(cx, labels.clone());
            self.rendered_voice_labels = labels;
            self.rendered_voice_item = usize::MAX;
        }
        let voice_item = state
            .voice_options
            .iter()
            .position(|o| !o.is_placeholder() && o.value == state.voice)
            .unwrap_or(0);
        if voice_item != self.rendered_voice_item {
            voice_dropdown.set_selected_item(cx, voice_item);
            self.rendered_voice_item = voice_item;
        }
        voice_dropdown.set_visible(cx, state.voice_select_enabled);
        self.view
            .view(ids!(voice_placeholder))
            .set_visible(cx, !state.voice_select_enabled);
        if let Some(placeholder) = state.voice_options.first() {
            self.view
                .label(ids!(voice_placeholder.placeholder_label))
                .set_text(cx, &placeholder.label);
        }

        // Speed
        if (state.speed - self.rendered_speed).abs() > f64::EPSILON {
            self.view.slider(ids!(speed_slider)).set_value(cx, state.speed);
            self.rendered_speed = state.speed;
        }
        self.view
            .label(ids!(speed_value))
            .set_text(cx, &state.speed_label);

        // Generate button
        let disabled = if state.generate_enabled { 0.0 } else { 1.0 };
        self.view
            .button(ids!(generate_btn))
            .apply_over(cx, live! { draw_bg: { disabled: (disabled) } });

        // Progress / result panels
        self.view
            .view(ids!(progress_section))
            .set_visible(cx, state.progress_visible);
        self.view
            .view(ids!(result_section))
            .set_visible(cx, state.result_visible);
        self.view
            .label(ids!(result_info))
            .set_text(cx, &state.result_info);
        self.view
            .label(ids!(audio_src))
            .set_text(cx, state.audio_src.as_deref().unwrap_or(""));

        // Stats
        self.view
            .label(ids!(male_stat.value))
            .set_text(cx, &state.male_count);
        self.view
            .label(ids!(female_stat.value))
            .set_text(cx, &state.female_count);
    }

    fn sync_notifications(&mut self, cx: &mut Cx) {
        let now = Instant::now();
        self.form.notifications_mut().prune(now);

        let items = self.form.notifications().items();
        let newest = &items[items.len().saturating_sub(BANNER_SLOTS)..];

        for slot in 0..BANNER_SLOTS {
            let banner = match slot {
                0 => self.view.view(ids!(notif_0)),
                1 => self.view.view(ids!(notif_1)),
                2 => self.view.view(ids!(notif_2)),
                _ => self.view.view(ids!(notif_3)),
            };

            let Some(notification) = newest.get(slot) else {
                banner.set_visible(cx, false);
                continue;
            };

            let [r, g, b, a] = notification.kind.color_rgba();
            let slide = notification.slide_offset(now);
            let offset = -slide * SLIDE_DISTANCE;
            banner.set_visible(cx, true);
            banner.label(ids!(message)).set_text(cx, &notification.message);
            banner.apply_over(
                cx,
                live! {
                    margin: { right: (offset) }
                    draw_bg: { accent: (vec4(r, g, b, a)), slide: (slide) }
                },
            );
        }
    }
}

impl TtsAppRef {
    /// Ask the screen whether the window may close. A refusal shows a warning.
    pub fn request_leave(&self, cx: &mut Cx) -> bool {
        let Some(mut inner) = self.borrow_mut() else {
            return true;
        };
        let allowed = inner.form.request_leave(Instant::now());
        if !allowed {
            inner.view.redraw(cx);
            cx.new_next_frame();
        }
        allowed
    }
}

/// Next result of the audio worker, if any. A worker that went away without
/// sending counts as a failed download.
fn recv_audio(rx: &Receiver<AudioUpdate>) -> Option<AudioUpdate> {
    match rx.try_recv() {
        Ok(update) => Some(update),
        Err(TryRecvError::Empty) => None,
        Err(TryRecvError::Disconnected) => Some(AudioUpdate::Failed {
            playing: false,
            error: worker_stopped("audio"),
        }),
    }
}

/// Wait for a player process so it does not linger as a zombie.
fn reap(mut child: Child) -> Option<ExitStatus> {
    match child.wait() {
        Ok(status) => Some(status),
        Err(e) => {
            ::log::warn!("Audio player did not exit cleanly: {}", e);
            None
        }
    }
}

/// Hand a file to the platform's audio player. The caller reaps the child.
fn spawn_player(path: &Path) -> std::io::Result<Child> {
    let mut command = if cfg!(target_os = "macos") {
        Command::new("afplay")
    } else if cfg!(target_os = "windows") {
        let mut c = Command::new("cmd");
        c.args(["/C", "start", ""]);
        c
    } else {
        Command::new("xdg-open")
    };
    command.arg(path).spawn()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recv_audio_waits_while_worker_runs() {
        let (_tx, rx) = mpsc::channel::<AudioUpdate>();
        assert!(recv_audio(&rx).is_none());
    }

    #[test]
    fn test_recv_audio_passes_result_through() {
        let (tx, rx) = mpsc::channel();
        tx.send(AudioUpdate::Saved(PathBuf::from("/tmp/out.wav"))).unwrap();

        match recv_audio(&rx) {
            Some(AudioUpdate::Saved(path)) => assert_eq!(path, PathBuf::from("/tmp/out.wav")),
            _ => panic!("expected the saved path"),
        }
    }

    #[test]
    fn test_recv_audio_reports_stopped_worker_as_download_failure() {
        let (tx, rx) = mpsc::channel::<AudioUpdate>();
        drop(tx);

        match recv_audio(&rx) {
            Some(AudioUpdate::Failed { playing, error }) => {
                assert!(!playing);
                assert!(error.to_string().contains("audio worker stopped"));
            }
            _ => panic!("expected a failure"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_reap_collects_exit_status() {
        let child = Command::new("true").spawn().unwrap();
        let status = reap(child).expect("exit status");
        assert!(status.success());
    }
}

//! # FormController - state behind the synthesis form
//!
//! The controller owns the voice catalog, the last generated audio and a
//! [`FormState`] snapshot of every control. The screen forwards user input as
//! [`FormAction`]s and renders `state()` afterwards; whenever an action needs
//! I/O the controller hands back a [`FormCommand`] and the screen reports the
//! outcome through the matching `finish_*` method.
//!
//! ```rust,ignore
//! let mut form = FormController::new();
//! form.initialize_with(&client);
//! form.handle_action(FormAction::TextChanged("Hola".into()));
//! form.handle_action(FormAction::GenderChanged("female".into()));
//! form.handle_action(FormAction::VoiceChanged("es_MX-claude-high".into()));
//! if let Some(FormCommand::Synthesize(request)) = form.handle_action(FormAction::Generate) {
//!     let result = client.synthesize(&request);
//!     form.finish_synthesis(&request, result);
//! }
//! ```

use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::api::{
    Gender, GeneratedAudio, Stats, SynthesisRequest, SynthesisResponse, UploadResponse,
    VoiceCatalog,
};
use crate::error::ApiError;
use crate::notifications::{NotificationCenter, NotificationKind, LEAVE_DURATION, VISIBLE_DURATION};
use crate::tts_client::TtsBackend;

/// Above this many characters the counter turns amber.
pub const CHAR_WARNING_THRESHOLD: usize = 7000;
/// Above this many characters the counter turns red.
pub const CHAR_DANGER_THRESHOLD: usize = 9000;
/// Leaving the app with more text than this asks for confirmation.
pub const UNSAVED_TEXT_THRESHOLD: usize = 100;

pub const SPEED_MIN: f64 = 0.5;
pub const SPEED_MAX: f64 = 2.0;
pub const SPEED_STEP: f64 = 0.1;
pub const SPEED_DEFAULT: f64 = 1.0;

pub const PLACEHOLDER_SELECT_GENDER: &str = "Seleccionar género";
pub const PLACEHOLDER_SELECT_VOICE: &str = "Seleccionar voz";
pub const PLACEHOLDER_SELECT_GENDER_FIRST: &str = "Primero selecciona un género";

const MSG_UPLOADING: &str = "Cargando archivo...";
const MSG_UPLOAD_FAILED: &str = "Error al cargar el archivo";
const MSG_UPLOAD_TRANSPORT: &str = "Error al procesar el archivo";
const MSG_SYNTHESIS_OK: &str = "Audio generado exitosamente";
const MSG_SYNTHESIS_FAILED: &str = "Error al generar audio";
const MSG_SYNTHESIS_TRANSPORT: &str = "Error al generar el audio";
const MSG_CLEARED: &str = "Formulario limpiado";
const MSG_UNSAVED_TEXT: &str = "Tienes texto sin generar. Cierra de nuevo para salir.";

// ─── Derived display values ───────────────────────────────────────────────────

/// Color tier of the character counter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CharSeverity {
    #[default]
    Normal,
    Warning,
    Danger,
}

impl CharSeverity {
    pub fn from_count(count: usize) -> Self {
        if count > CHAR_DANGER_THRESHOLD {
            Self::Danger
        } else if count > CHAR_WARNING_THRESHOLD {
            Self::Warning
        } else {
            Self::Normal
        }
    }

    /// Shader-friendly tier value (0 = normal, 1 = warning, 2 = danger).
    pub fn level(self) -> f64 {
        match self {
            Self::Normal => 0.0,
            Self::Warning => 1.0,
            Self::Danger => 2.0,
        }
    }
}

/// Speed label such as `"1.0x (Normal)"`, `"0.5x (Lento)"` or `"1.5x (Rápido)"`.
pub fn speed_label(speed: f64) -> String {
    let qualifier = if speed == 1.0 {
        "Normal"
    } else if speed < 1.0 {
        "Lento"
    } else {
        "Rápido"
    };
    format!("{:.1}x ({})", speed, qualifier)
}

/// Clamp to the slider range and snap to its step, so 0.9999 reads as 1.0.
pub fn snap_speed(speed: f64) -> f64 {
    if !speed.is_finite() {
        return SPEED_DEFAULT;
    }
    let clamped = speed.clamp(SPEED_MIN, SPEED_MAX);
    let steps = (clamped / SPEED_STEP).round();
    (steps * SPEED_STEP * 10.0).round() / 10.0
}

/// Gender selector entries: the placeholder, then one per [`Gender::ALL`] in order.
pub fn gender_labels() -> Vec<String> {
    std::iter::once(PLACEHOLDER_SELECT_GENDER)
        .chain(Gender::ALL.iter().map(|g| g.label()))
        .map(str::to_string)
        .collect()
}

/// One entry of the voice selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceOption {
    /// Voice id, or empty for the placeholder.
    pub value: String,
    pub label: String,
    pub enabled: bool,
}

impl VoiceOption {
    fn placeholder(label: &str, enabled: bool) -> Self {
        Self {
            value: String::new(),
            label: label.to_string(),
            enabled,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.value.is_empty()
    }
}

// ─── Form state ───────────────────────────────────────────────────────────────

/// Everything the screen needs to render the form.
#[derive(Debug, Clone, PartialEq)]
pub struct FormState {
    pub text: String,
    pub char_count: usize,
    pub char_severity: CharSeverity,

    pub gender: Option<Gender>,
    pub voice_options: Vec<VoiceOption>,
    /// Selected voice id, empty when none.
    pub voice: String,
    pub voice_select_enabled: bool,

    pub speed: f64,
    pub speed_label: String,

    pub generate_enabled: bool,
    pub progress_visible: bool,
    pub result_visible: bool,
    /// "Voz: {voice} | Velocidad: {speed}x"
    pub result_info: String,
    /// Source bound to the audio player.
    pub audio_src: Option<String>,

    /// A file is being dragged over the upload area.
    pub drag_active: bool,

    pub male_count: String,
    pub female_count: String,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            text: String::new(),
            char_count: 0,
            char_severity: CharSeverity::Normal,
            gender: None,
            voice_options: vec![VoiceOption::placeholder(PLACEHOLDER_SELECT_GENDER_FIRST, false)],
            voice: String::new(),
            voice_select_enabled: false,
            speed: SPEED_DEFAULT,
            speed_label: speed_label(SPEED_DEFAULT),
            generate_enabled: false,
            progress_visible: false,
            result_visible: false,
            result_info: String::new(),
            audio_src: None,
            drag_active: false,
            male_count: "0".to_string(),
            female_count: "0".to_string(),
        }
    }
}

// ─── Actions and commands ─────────────────────────────────────────────────────

/// User input forwarded by the screen.
#[derive(Debug, Clone, PartialEq)]
pub enum FormAction {
    TextChanged(String),
    /// Raw selector value; empty means no gender.
    GenderChanged(String),
    /// Raw selector value; empty means no voice.
    VoiceChanged(String),
    SpeedChanged(f64),
    UploadAreaClicked,
    DragOver,
    DragLeave,
    FilesDropped(Vec<PathBuf>),
    FilePicked(PathBuf),
    Generate,
    Download,
    Clear,
}

/// I/O the screen has to perform on behalf of the controller.
#[derive(Debug, Clone, PartialEq)]
pub enum FormCommand {
    OpenFilePicker,
    /// Upload the file, then call [`FormController::finish_upload`].
    Upload(PathBuf),
    /// Call the backend, then [`FormController::finish_synthesis`].
    Synthesize(SynthesisRequest),
    /// Fetch the audio and save it under its filename.
    Download(GeneratedAudio),
}

// ─── Controller ───────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct FormController {
    catalog: VoiceCatalog,
    generated: Option<GeneratedAudio>,
    state: FormState,
    notifications: NotificationCenter,
    synthesis_in_flight: bool,
    pending_upload: Option<PathBuf>,
    leave_warned_at: Option<Instant>,
}

impl FormController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn catalog(&self) -> &VoiceCatalog {
        &self.catalog
    }

    pub fn generated_audio(&self) -> Option<&GeneratedAudio> {
        self.generated.as_ref()
    }

    pub fn notifications(&self) -> &NotificationCenter {
        &self.notifications
    }

    pub fn notifications_mut(&mut self) -> &mut NotificationCenter {
        &mut self.notifications
    }

    pub fn is_uploading(&self) -> bool {
        self.pending_upload.is_some()
    }

    /// Dispatch one user action. Returns the I/O the host must perform, if any.
    pub fn handle_action(&mut self, action: FormAction) -> Option<FormCommand> {
        match action {
            FormAction::TextChanged(text) => {
                self.set_text(text);
                None
            }
            FormAction::GenderChanged(value) => {
                self.select_gender(&value);
                None
            }
            FormAction::VoiceChanged(value) => {
                self.select_voice(&value);
                None
            }
            FormAction::SpeedChanged(speed) => {
                self.set_speed(speed);
                None
            }
            FormAction::UploadAreaClicked => Some(FormCommand::OpenFilePicker),
            FormAction::DragOver => {
                self.state.drag_active = true;
                None
            }
            FormAction::DragLeave => {
                self.state.drag_active = false;
                None
            }
            FormAction::FilesDropped(paths) => {
                self.state.drag_active = false;
                let first = paths.into_iter().next()?;
                self.begin_upload(first).map(FormCommand::Upload)
            }
            FormAction::FilePicked(path) => self.begin_upload(path).map(FormCommand::Upload),
            FormAction::Generate => self.begin_synthesis().map(FormCommand::Synthesize),
            FormAction::Download => self.download().map(FormCommand::Download),
            FormAction::Clear => {
                self.clear();
                None
            }
        }
    }

    // ── Startup ──────────────────────────────────────────────────────────────

    /// Load catalog and stats one after the other. Failures are logged only.
    pub fn initialize_with(&mut self, backend: &dyn TtsBackend) {
        self.finish_load_voices(backend.voices());
        self.finish_load_stats(backend.stats());
        log::info!("Aplicación TTS inicializada");
    }

    pub fn finish_load_voices(&mut self, result: Result<VoiceCatalog, ApiError>) {
        match result {
            Ok(catalog) => {
                log::info!(
                    "Voice catalog loaded: {} male, {} female",
                    catalog.male.len(),
                    catalog.female.len()
                );
                self.catalog = catalog;
                if let Some(gender) = self.state.gender {
                    let keep = self.state.voice.clone();
                    self.rebuild_voice_options(Some(gender));
                    self.select_voice(&keep);
                }
            }
            Err(e) => log::error!("Error cargando voces: {}", e),
        }
        self.refresh_generate_button();
    }

    pub fn finish_load_stats(&mut self, result: Result<Stats, ApiError>) {
        match result {
            Ok(stats) => {
                self.state.male_count = stats.male_voices.to_string();
                self.state.female_count = stats.female_voices.to_string();
            }
            Err(e) => log::error!("Error cargando estadísticas: {}", e),
        }
    }

    // ── Inputs ───────────────────────────────────────────────────────────────

    pub fn set_text(&mut self, text: String) {
        self.state.char_count = text.chars().count();
        self.state.char_severity = CharSeverity::from_count(self.state.char_count);
        self.state.text = text;
        self.refresh_generate_button();
    }

    /// `value` is the raw gender selector value; anything unknown means none.
    pub fn select_gender(&mut self, value: &str) {
        let gender = value.parse::<Gender>().ok();
        if gender.is_none() && !value.is_empty() {
            log::warn!("Ignoring unknown gender value '{}'", value);
        }
        self.rebuild_voice_options(gender);
        self.refresh_generate_button();
    }

    pub fn select_voice(&mut self, value: &str) {
        let known = value.is_empty()
            || self
                .state
                .voice_options
                .iter()
                .any(|o| !o.is_placeholder() && o.value == value);

        if known {
            self.state.voice = value.to_string();
        } else {
            log::warn!("Voice '{}' is not offered for the current gender", value);
            self.state.voice.clear();
        }
        self.refresh_generate_button();
    }

    pub fn set_speed(&mut self, speed: f64) {
        self.state.speed = snap_speed(speed);
        self.state.speed_label = speed_label(self.state.speed);
    }

    fn rebuild_voice_options(&mut self, gender: Option<Gender>) {
        self.state.gender = gender;
        self.state.voice.clear();
        self.state.voice_options.clear();

        match gender {
            Some(gender) => {
                self.state
                    .voice_options
                    .push(VoiceOption::placeholder(PLACEHOLDER_SELECT_VOICE, true));
                self.state
                    .voice_options
                    .extend(self.catalog.voices(gender).iter().map(|voice| VoiceOption {
                        value: voice.id.clone(),
                        label: voice.option_label(),
                        enabled: true,
                    }));
                self.state.voice_select_enabled = true;
            }
            None => {
                self.state
                    .voice_options
                    .push(VoiceOption::placeholder(PLACEHOLDER_SELECT_GENDER_FIRST, false));
                self.state.voice_select_enabled = false;
            }
        }
    }

    /// Generate is enabled iff there is non-blank text, a voice, and no
    /// synthesis running.
    pub fn refresh_generate_button(&mut self) {
        let has_text = !self.state.text.trim().is_empty();
        let has_voice = !self.state.voice.is_empty();
        self.state.generate_enabled = has_text && has_voice && !self.synthesis_in_flight;
    }

    // ── Upload ───────────────────────────────────────────────────────────────

    /// Start uploading `path`. Returns `None` while another upload is running.
    pub fn begin_upload(&mut self, path: PathBuf) -> Option<PathBuf> {
        if let Some(running) = &self.pending_upload {
            log::warn!(
                "Upload of {} ignored, {} is still uploading",
                path.display(),
                running.display()
            );
            return None;
        }
        self.pending_upload = Some(path.clone());
        self.notify(MSG_UPLOADING, NotificationKind::Info);
        Some(path)
    }

    pub fn finish_upload(&mut self, result: Result<UploadResponse, ApiError>) {
        let uploaded = self.pending_upload.take();

        match result {
            Ok(resp) if resp.success => {
                self.set_text(resp.text.unwrap_or_default());
                let filename = resp
                    .filename
                    .or_else(|| uploaded.as_deref().and_then(file_name_of))
                    .unwrap_or_default();
                self.notify(
                    format!("Archivo \"{}\" cargado exitosamente", filename),
                    NotificationKind::Success,
                );
            }
            Ok(resp) => {
                let message = non_empty(resp.error).unwrap_or_else(|| MSG_UPLOAD_FAILED.to_string());
                self.notify(message, NotificationKind::Error);
            }
            Err(e) => {
                log::error!("Error: {}", e);
                self.notify(MSG_UPLOAD_TRANSPORT, NotificationKind::Error);
            }
        }
    }

    /// Run a whole upload against `backend`.
    pub fn upload_with(&mut self, backend: &dyn TtsBackend, path: PathBuf) {
        if let Some(path) = self.begin_upload(path) {
            let result = backend.upload_file(&path);
            self.finish_upload(result);
        }
    }

    // ── Synthesis ────────────────────────────────────────────────────────────

    /// Switch the form to "generating" and build the request.
    ///
    /// Returns `None` (and changes nothing) when text or voice is missing or a
    /// synthesis is already running.
    pub fn begin_synthesis(&mut self) -> Option<SynthesisRequest> {
        let text = self.state.text.trim();
        if text.is_empty() || self.state.voice.is_empty() {
            return None;
        }
        if self.synthesis_in_flight {
            log::debug!("Synthesis already running, ignoring generate");
            return None;
        }

        let request = SynthesisRequest {
            text: text.to_string(),
            voice: self.state.voice.clone(),
            speed: self.state.speed,
        };

        self.state.result_visible = false;
        self.state.progress_visible = true;
        self.synthesis_in_flight = true;
        self.refresh_generate_button();
        Some(request)
    }

    /// Apply the synthesis outcome. Progress is hidden and the generate
    /// button re-evaluated whatever the outcome.
    pub fn finish_synthesis(
        &mut self,
        request: &SynthesisRequest,
        result: Result<SynthesisResponse, ApiError>,
    ) {
        match result {
            Ok(resp) if resp.success && resp.download_url.is_some() => {
                let download_url = resp.download_url.unwrap_or_default();
                let voice = resp.voice.unwrap_or_else(|| request.voice.clone());
                self.generated = Some(GeneratedAudio {
                    filename: resp.filename.unwrap_or_default(),
                    download_url: download_url.clone(),
                });

                self.state.progress_visible = false;
                self.state.result_visible = true;
                self.state.result_info =
                    format!("Voz: {} | Velocidad: {:.1}x", voice, request.speed);
                self.state.audio_src = Some(download_url);

                self.notify(MSG_SYNTHESIS_OK, NotificationKind::Success);
            }
            Ok(resp) => {
                let message =
                    non_empty(resp.error).unwrap_or_else(|| MSG_SYNTHESIS_FAILED.to_string());
                log::error!("Error: {}", message);
                self.notify(message, NotificationKind::Error);
            }
            Err(e) => {
                log::error!("Error: {}", e);
                self.notify(MSG_SYNTHESIS_TRANSPORT, NotificationKind::Error);
            }
        }

        self.state.progress_visible = false;
        self.synthesis_in_flight = false;
        self.refresh_generate_button();
    }

    /// Run a whole synthesis against `backend`. Returns false if the guard
    /// rejected it.
    pub fn synthesize_with(&mut self, backend: &dyn TtsBackend) -> bool {
        let Some(request) = self.begin_synthesis() else {
            return false;
        };
        let result = backend.synthesize(&request);
        self.finish_synthesis(&request, result);
        true
    }

    // ── Download / clear / leave ─────────────────────────────────────────────

    pub fn download(&self) -> Option<GeneratedAudio> {
        self.generated.clone()
    }

    /// Reset every control to its default and hide both panels.
    ///
    /// The catalog, the stats and any running request are left alone.
    pub fn clear(&mut self) {
        let male_count = std::mem::take(&mut self.state.male_count);
        let female_count = std::mem::take(&mut self.state.female_count);
        self.state = FormState {
            male_count,
            female_count,
            ..FormState::default()
        };
        self.generated = None;
        self.refresh_generate_button();
        self.notify(MSG_CLEARED, NotificationKind::Info);
    }

    /// True when closing now would lose a meaningful amount of text.
    pub fn should_confirm_leave(&self) -> bool {
        self.state.text.trim().chars().count() > UNSAVED_TEXT_THRESHOLD
    }

    /// Decide whether a close request may proceed.
    ///
    /// With unsaved text the first request is refused and a warning shown; a
    /// second request while that warning is still on screen goes through.
    pub fn request_leave(&mut self, now: Instant) -> bool {
        if !self.should_confirm_leave() {
            return true;
        }
        let warning_window = VISIBLE_DURATION + LEAVE_DURATION;
        if let Some(warned_at) = self.leave_warned_at {
            if now.saturating_duration_since(warned_at) < warning_window {
                log::info!("Close confirmed with unsaved text");
                return true;
            }
        }
        self.leave_warned_at = Some(now);
        self.notifications
            .push_at(MSG_UNSAVED_TEXT, NotificationKind::Warning, now);
        false
    }

    // ── Notifications ────────────────────────────────────────────────────────

    pub fn notify(&mut self, message: impl Into<String>, kind: NotificationKind) {
        self.notifications.push(message, kind);
    }
}

fn non_empty(message: Option<String>) -> Option<String> {
    message.filter(|m| !m.trim().is_empty())
}

fn file_name_of(path: &Path) -> Option<String> {
    path.file_name().map(|n| n.to_string_lossy().into_owned())
}

pub mod api;
pub mod config;
pub mod error;
pub mod form;
pub mod notifications;
pub mod tts_client;

pub use api::{
    Gender, GeneratedAudio, Stats, SynthesisRequest, SynthesisResponse, UploadResponse, Voice,
    VoiceCatalog,
};
pub use config::AppConfig;
pub use error::ApiError;
pub use form::{
    gender_labels, speed_label, CharSeverity, FormAction, FormCommand, FormController, FormState, VoiceOption,
};
pub use notifications::{Notification, NotificationCenter, NotificationKind, NotificationPhase};
pub use tts_client::{save_generated_audio, TtsApiClient, TtsBackend};

//! Blocking client for the Piper TTS backend.
//!
//! All requests go to the configured `API_BASE_URL` and follow the backend contract:
//!
//!   GET  /api/voices        → voice catalog grouped by gender
//!   GET  /api/stats         → voice counts per gender
//!   POST /api/upload-file   → multipart upload, returns the extracted text
//!   POST /api/synthesize    → JSON request, returns a download URL for the audio

use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use crate::api::{
    GeneratedAudio, Stats, SynthesisRequest, SynthesisResponse, UploadResponse, VoiceCatalog,
};
use crate::config::DEFAULT_API_BASE_URL;
use crate::error::ApiError;

// ─── Backend seam ─────────────────────────────────────────────────────────────

/// Everything the form needs from the backend.
///
/// Implemented by [`TtsApiClient`] over HTTP. All calls block the calling
/// thread, so the UI runs them inside `std::thread::spawn`.
pub trait TtsBackend: Send + Sync {
    fn voices(&self) -> Result<VoiceCatalog, ApiError>;

    fn stats(&self) -> Result<Stats, ApiError>;

    /// Upload one file for text extraction.
    fn upload_file(&self, path: &Path) -> Result<UploadResponse, ApiError>;

    fn synthesize(&self, request: &SynthesisRequest) -> Result<SynthesisResponse, ApiError>;

    /// Fetch the bytes behind a `download_url` returned by `synthesize`.
    fn fetch_audio(&self, download_url: &str) -> Result<Vec<u8>, ApiError>;
}

// ─── Client ───────────────────────────────────────────────────────────────────

const CATALOG_TIMEOUT_SECS: u64 = 10;
const UPLOAD_TIMEOUT_SECS: u64 = 120;
const SYNTHESIS_TIMEOUT_SECS: u64 = 600;

#[derive(Debug, Clone)]
pub struct TtsApiClient {
    base_url: String,
}

impl TtsApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut url = base_url.into();
        while url.ends_with('/') {
            url.pop();
        }
        Self { base_url: url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Resolve a possibly relative download URL against the API base URL.
    pub fn resolve_url(&self, download_url: &str) -> Result<String, ApiError> {
        resolve_against(&self.base_url, download_url)
    }

    fn client(&self, timeout_secs: u64) -> Result<reqwest::blocking::Client, ApiError> {
        reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ApiError::Network {
                url: self.base_url.clone(),
                source: e,
            })
    }
}

impl Default for TtsApiClient {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE_URL)
    }
}

impl TtsBackend for TtsApiClient {
    /// `GET /api/voices`
    fn voices(&self) -> Result<VoiceCatalog, ApiError> {
        let url = self.endpoint("/api/voices");
        let resp = self
            .client(CATALOG_TIMEOUT_SECS)?
            .get(&url)
            .send()
            .map_err(|e| network(&url, e))?;
        read_json(&url, resp)
    }

    /// `GET /api/stats`
    fn stats(&self) -> Result<Stats, ApiError> {
        let url = self.endpoint("/api/stats");
        let resp = self
            .client(CATALOG_TIMEOUT_SECS)?
            .get(&url)
            .send()
            .map_err(|e| network(&url, e))?;
        read_json(&url, resp)
    }

    /// `POST /api/upload-file` with the file under the multipart field `file`.
    fn upload_file(&self, path: &Path) -> Result<UploadResponse, ApiError> {
        let url = self.endpoint("/api/upload-file");
        let form = reqwest::blocking::multipart::Form::new()
            .file("file", path)
            .map_err(|e| ApiError::io(format!("cannot read '{}'", path.display()), e))?;

        log::info!("Uploading {} to {}", path.display(), url);
        let resp = self
            .client(UPLOAD_TIMEOUT_SECS)?
            .post(&url)
            .multipart(form)
            .send()
            .map_err(|e| network(&url, e))?;
        read_envelope(&url, resp)
    }

    /// `POST /api/synthesize`. Blocks until the backend has written the audio.
    fn synthesize(&self, request: &SynthesisRequest) -> Result<SynthesisResponse, ApiError> {
        let url = self.endpoint("/api/synthesize");
        log::info!(
            "Synthesis request to {}: voice={}, speed={:.1}, chars={}",
            url,
            request.voice,
            request.speed,
            request.text.chars().count()
        );
        let resp = self
            .client(SYNTHESIS_TIMEOUT_SECS)?
            .post(&url)
            .json(request)
            .send()
            .map_err(|e| network(&url, e))?;
        read_envelope(&url, resp)
    }

    fn fetch_audio(&self, download_url: &str) -> Result<Vec<u8>, ApiError> {
        let url = self.resolve_url(download_url)?;
        let resp = self
            .client(SYNTHESIS_TIMEOUT_SECS)?
            .get(&url)
            .send()
            .map_err(|e| network(&url, e))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(ApiError::Response {
                url,
                status: status.as_u16(),
                body: body.trim().to_string(),
            });
        }

        let bytes = resp.bytes().map_err(|e| network(&url, e))?;
        Ok(bytes.to_vec())
    }
}

// ─── Downloads ────────────────────────────────────────────────────────────────

/// Fetch `audio` and write it into `dir` under its stored filename.
///
/// Only the final path component of the filename is used.
pub fn save_generated_audio(
    backend: &dyn TtsBackend,
    audio: &GeneratedAudio,
    dir: &Path,
) -> Result<PathBuf, ApiError> {
    let file_name = Path::new(&audio.filename)
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "audio.wav".into());

    let bytes = backend.fetch_audio(&audio.download_url)?;

    std::fs::create_dir_all(dir)
        .map_err(|e| ApiError::io(format!("cannot create '{}'", dir.display()), e))?;
    let target = dir.join(file_name);
    std::fs::write(&target, &bytes)
        .map_err(|e| ApiError::io(format!("cannot write '{}'", target.display()), e))?;

    log::info!("Saved {} bytes to {}", bytes.len(), target.display());
    Ok(target)
}

// ─── Internal ─────────────────────────────────────────────────────────────────

fn network(url: &str, source: reqwest::Error) -> ApiError {
    ApiError::Network {
        url: url.to_string(),
        source,
    }
}

fn resolve_against(base_url: &str, download_url: &str) -> Result<String, ApiError> {
    let format_err = |e: url::ParseError| ApiError::Format {
        url: download_url.to_string(),
        message: e.to_string(),
    };
    let base = url::Url::parse(base_url).map_err(format_err)?;
    let joined = base.join(download_url).map_err(format_err)?;
    Ok(joined.to_string())
}

fn snippet(text: &str) -> String {
    text.chars().take(200).collect()
}

fn read_text(
    url: &str,
    resp: reqwest::blocking::Response,
) -> Result<(StatusCode, String), ApiError> {
    let status = resp.status();
    let text = resp.text().map_err(|e| network(url, e))?;
    Ok((status, text))
}

fn read_json<T: DeserializeOwned>(
    url: &str,
    resp: reqwest::blocking::Response,
) -> Result<T, ApiError> {
    let (status, text) = read_text(url, resp)?;
    decode_json(url, status, &text)
}

fn read_envelope<T: DeserializeOwned>(
    url: &str,
    resp: reqwest::blocking::Response,
) -> Result<T, ApiError> {
    let (status, text) = read_text(url, resp)?;
    decode_envelope(url, status, &text)
}

fn format_error(url: &str, error: serde_json::Error, text: &str) -> ApiError {
    ApiError::Format {
        url: url.to_string(),
        message: format!("{} in {}", error, snippet(text)),
    }
}

fn response_error(url: &str, status: StatusCode, text: &str) -> ApiError {
    ApiError::Response {
        url: url.to_string(),
        status: status.as_u16(),
        body: text.trim().to_string(),
    }
}

/// Decode a JSON body that is only meaningful on a 2xx status.
fn decode_json<T: DeserializeOwned>(
    url: &str,
    status: StatusCode,
    text: &str,
) -> Result<T, ApiError> {
    if !status.is_success() {
        return Err(response_error(url, status, text));
    }
    serde_json::from_str(text).map_err(|e| format_error(url, e, text))
}

/// Decode a `{success, ..., error}` envelope.
///
/// The backend also uses non-2xx statuses for `success: false`, so any status
/// with a decodable body is returned as-is.
fn decode_envelope<T: DeserializeOwned>(
    url: &str,
    status: StatusCode,
    text: &str,
) -> Result<T, ApiError> {
    match serde_json::from_str::<T>(text) {
        Ok(body) => Ok(body),
        Err(e) if status.is_success() => Err(format_error(url, e, text)),
        Err(_) => Err(response_error(url, status, text)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_client_trims_trailing_slashes() {
        let client = TtsApiClient::new("http://localhost:8000//");
        assert_eq!(client.base_url(), "http://localhost:8000");
        assert_eq!(client.endpoint("/api/voices"), "http://localhost:8000/api/voices");
    }

    #[test]
    fn test_resolve_relative_download_url() {
        let client = TtsApiClient::new("http://tts.local:8000");
        assert_eq!(
            client.resolve_url("/api/download/out.wav").unwrap(),
            "http://tts.local:8000/api/download/out.wav"
        );
    }

    #[test]
    fn test_resolve_absolute_download_url() {
        let client = TtsApiClient::new("http://tts.local:8000");
        assert_eq!(
            client.resolve_url("https://cdn.example.com/a.wav").unwrap(),
            "https://cdn.example.com/a.wav"
        );
    }

    const SYNTH_URL: &str = "http://tts.local:8000/api/synthesize";

    #[test]
    fn test_envelope_error_status_with_json_body_is_returned() {
        let resp: SynthesisResponse = decode_envelope(
            SYNTH_URL,
            StatusCode::BAD_REQUEST,
            r#"{"success": false, "error": "Voz no encontrada"}"#,
        )
        .unwrap();

        assert!(!resp.success);
        assert_eq!(resp.error.as_deref(), Some("Voz no encontrada"));
    }

    #[test]
    fn test_envelope_reads_detail_as_error() {
        let resp: UploadResponse = decode_envelope(
            "http://tts.local:8000/api/upload-file",
            StatusCode::UNPROCESSABLE_ENTITY,
            r#"{"detail": "Tipo de archivo no soportado"}"#,
        )
        .unwrap();

        assert!(!resp.success);
        assert_eq!(resp.error.as_deref(), Some("Tipo de archivo no soportado"));
    }

    #[test]
    fn test_envelope_error_status_with_html_body() {
        let result: Result<SynthesisResponse, _> = decode_envelope(
            SYNTH_URL,
            StatusCode::BAD_GATEWAY,
            "  <html>Bad Gateway</html>\n",
        );

        match result {
            Err(ApiError::Response { status, body, .. }) => {
                assert_eq!(status, 502);
                assert_eq!(body, "<html>Bad Gateway</html>");
            }
            other => panic!("expected a response error, got {:?}", other),
        }
    }

    #[test]
    fn test_envelope_success_status_with_garbage_body() {
        let result: Result<SynthesisResponse, _> =
            decode_envelope(SYNTH_URL, StatusCode::OK, "not json");

        assert!(matches!(result, Err(ApiError::Format { .. })));
    }

    #[test]
    fn test_json_requires_success_status() {
        let result: Result<Stats, _> = decode_json(
            "http://tts.local:8000/api/stats",
            StatusCode::INTERNAL_SERVER_ERROR,
            r#"{"male_voices": 2, "female_voices": 1}"#,
        );
        assert!(matches!(result, Err(ApiError::Response { status: 500, .. })));

        let stats: Stats = decode_json(
            "http://tts.local:8000/api/stats",
            StatusCode::OK,
            r#"{"male_voices": 2, "female_voices": 1}"#,
        )
        .unwrap();
        assert_eq!(stats.male_voices, 2);
        assert_eq!(stats.female_voices, 1);
    }

    struct AudioOnly {
        requested: Mutex<Vec<String>>,
    }

    impl TtsBackend for AudioOnly {
        fn voices(&self) -> Result<VoiceCatalog, ApiError> {
            Ok(VoiceCatalog::default())
        }
        fn stats(&self) -> Result<Stats, ApiError> {
            Ok(Stats::default())
        }
        fn upload_file(&self, _path: &Path) -> Result<UploadResponse, ApiError> {
            Ok(UploadResponse::default())
        }
        fn synthesize(&self, _request: &SynthesisRequest) -> Result<SynthesisResponse, ApiError> {
            Ok(SynthesisResponse::default())
        }
        fn fetch_audio(&self, download_url: &str) -> Result<Vec<u8>, ApiError> {
            self.requested.lock().unwrap().push(download_url.to_string());
            Ok(b"RIFF....WAVE".to_vec())
        }
    }

    #[test]
    fn test_save_generated_audio_keeps_only_file_name() {
        let dir = std::env::temp_dir().join(format!("piper-save-{}", std::process::id()));
        let backend = AudioOnly { requested: Mutex::new(Vec::new()) };
        let audio = GeneratedAudio {
            filename: "../../etc/out.wav".to_string(),
            download_url: "/dl/out.wav".to_string(),
        };

        let path = save_generated_audio(&backend, &audio, &dir).unwrap();

        assert_eq!(path, dir.join("out.wav"));
        assert_eq!(std::fs::read(&path).unwrap(), b"RIFF....WAVE");
        assert_eq!(*backend.requested.lock().unwrap(), vec!["/dl/out.wav".to_string()]);
        let _ = std::fs::remove_dir_all(&dir);
    }
}

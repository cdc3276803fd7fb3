//! Wire types for the Piper TTS backend.
//!
//!   GET  /api/voices       → `{ "male": [Voice], "female": [Voice] }`
//!   GET  /api/stats        → `{ "male_voices": n, "female_voices": n }`
//!   POST /api/upload-file  → multipart field `file`, returns extracted text
//!   POST /api/synthesize   → JSON `{ text, voice, speed }`, returns a download URL

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ─── Gender ───────────────────────────────────────────────────────────────────

/// Grouping key of the voice catalog. Used only to filter the voice selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub const ALL: [Gender; 2] = [Gender::Male, Gender::Female];

    /// Value used by the backend and by the gender selector.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
        }
    }

    /// Label shown in the gender selector.
    pub fn label(self) -> &'static str {
        match self {
            Self::Male => "Masculino",
            Self::Female => "Femenino",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "male" => Ok(Self::Male),
            "female" => Ok(Self::Female),
            other => Err(format!("unknown gender '{}'", other)),
        }
    }
}

// ─── Voice catalog ────────────────────────────────────────────────────────────

/// One selectable voice as returned by `GET /api/voices`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Voice {
    pub id: String,
    pub name: String,
    pub accent: String,
    pub quality: String,
    /// Sent by the backend but redundant with the catalog key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Voice {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        accent: impl Into<String>,
        quality: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            accent: accent.into(),
            quality: quality.into(),
            gender: None,
            description: None,
        }
    }

    /// Text of the voice selector option: `"{name} - {accent} ({quality})"`.
    pub fn option_label(&self) -> String {
        format!("{} - {} ({})", self.name, self.accent, self.quality)
    }
}

/// Voices grouped by gender, in backend order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VoiceCatalog {
    #[serde(default)]
    pub male: Vec<Voice>,
    #[serde(default)]
    pub female: Vec<Voice>,
}

impl VoiceCatalog {
    pub fn voices(&self, gender: Gender) -> &[Voice] {
        match gender {
            Gender::Male => &self.male,
            Gender::Female => &self.female,
        }
    }

    pub fn len(&self) -> usize {
        self.male.len() + self.female.len()
    }

    pub fn is_empty(&self) -> bool {
        self.male.is_empty() && self.female.is_empty()
    }
}

// ─── Stats ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct Stats {
    #[serde(default)]
    pub male_voices: u32,
    #[serde(default)]
    pub female_voices: u32,
}

// ─── Upload ───────────────────────────────────────────────────────────────────

/// Body of `POST /api/upload-file`, successful or not.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct UploadResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
    /// FastAPI style error bodies use `detail`.
    #[serde(default, alias = "detail")]
    pub error: Option<String>,
}

// ─── Synthesis ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SynthesisRequest {
    pub text: String,
    pub voice: String,
    pub speed: f64,
}

/// Body of `POST /api/synthesize`, successful or not.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SynthesisResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub download_url: Option<String>,
    /// Display name of the voice that was used.
    #[serde(default)]
    pub voice: Option<String>,
    /// FastAPI style error bodies use `detail`.
    #[serde(default, alias = "detail")]
    pub error: Option<String>,
}

/// Audio produced by the last successful synthesis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedAudio {
    pub filename: String,
    pub download_url: String,
}

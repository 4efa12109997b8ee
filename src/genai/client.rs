use serde::{Deserialize, Serialize};

use super::GenAiError;

/// Seam between the AI services and the model endpoint.
///
/// Implementations are blocking — callers on an async runtime wrap
/// invocations in `spawn_blocking`. Test doubles implement this to
/// script outputs and count calls.
pub trait GenerativeModel: Send + Sync {
    /// One text generation round: system instruction + rendered prompt
    /// in, raw model text out.
    fn generate_text(&self, system: &str, prompt: &str) -> Result<String, GenAiError>;

    /// One generation round requesting {TEXT, IMAGE} response
    /// modalities; returns the image payload.
    fn generate_image(&self, prompt: &str) -> Result<GeneratedImage, GenAiError>;
}

/// Inline image payload returned by an image-capable model.
#[derive(Debug, Clone)]
pub struct GeneratedImage {
    pub mime_type: String,
    /// Base64-encoded image bytes, as delivered by the endpoint.
    pub data: String,
}

impl GeneratedImage {
    /// Render as a data URI for storage/display. The blob stays opaque.
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }
}

/// Connection settings for the generative-language endpoint.
#[derive(Debug, Clone)]
pub struct GenAiSettings {
    pub base_url: String,
    pub api_key: Option<String>,
    pub text_model: String,
    pub image_model: String,
}

impl GenAiSettings {
    /// Read settings from the environment.
    ///
    /// `MEDICLOUD_GENAI_URL`, `MEDICLOUD_GENAI_API_KEY`,
    /// `MEDICLOUD_TEXT_MODEL`, `MEDICLOUD_IMAGE_MODEL`.
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("MEDICLOUD_GENAI_URL")
                .unwrap_or_else(|_| "https://generativelanguage.googleapis.com".to_string()),
            api_key: std::env::var("MEDICLOUD_GENAI_API_KEY").ok(),
            text_model: std::env::var("MEDICLOUD_TEXT_MODEL")
                .unwrap_or_else(|_| "gemini-2.5-flash".to_string()),
            image_model: std::env::var("MEDICLOUD_IMAGE_MODEL")
                .unwrap_or_else(|_| "gemini-2.5-flash-image".to_string()),
        }
    }
}

/// HTTP client for the generative-language endpoint
/// (`models/{model}:generateContent` shape).
pub struct GenAiClient {
    settings: GenAiSettings,
    connect_timeout_secs: u64,
}

impl GenAiClient {
    pub fn new(settings: GenAiSettings) -> Self {
        Self {
            settings,
            connect_timeout_secs: 10,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.settings.base_url
    }

    /// One request per call; connect timeout only — generation time is
    /// the model's business.
    fn http(&self) -> Result<reqwest::blocking::Client, GenAiError> {
        reqwest::blocking::Client::builder()
            .connect_timeout(std::time::Duration::from_secs(self.connect_timeout_secs))
            .build()
            .map_err(|e| GenAiError::HttpClient(e.to_string()))
    }

    fn generate(
        &self,
        model: &str,
        body: &GenerateContentRequest<'_>,
    ) -> Result<GenerateContentResponse, GenAiError> {
        let key = self
            .settings
            .api_key
            .as_deref()
            .ok_or(GenAiError::MissingApiKey)?;

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.settings.base_url.trim_end_matches('/'),
            model
        );

        let response = self
            .http()?
            .post(&url)
            .header("x-goog-api-key", key)
            .json(body)
            .send()
            .map_err(|e| {
                if e.is_connect() {
                    GenAiError::Connection(self.settings.base_url.clone())
                } else {
                    GenAiError::HttpClient(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(GenAiError::ApiStatus {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json()
            .map_err(|e| GenAiError::ResponseParsing(e.to_string()))
    }
}

impl GenerativeModel for GenAiClient {
    fn generate_text(&self, system: &str, prompt: &str) -> Result<String, GenAiError> {
        let body = GenerateContentRequest {
            system_instruction: Some(Content::text(system)),
            contents: vec![Content::text(prompt)],
            generation_config: None,
        };

        let parsed = self.generate(&self.settings.text_model, &body)?;
        let text = parsed.first_text().ok_or(GenAiError::EmptyOutput)?;
        if text.trim().is_empty() {
            return Err(GenAiError::EmptyOutput);
        }
        Ok(text)
    }

    fn generate_image(&self, prompt: &str) -> Result<GeneratedImage, GenAiError> {
        let body = GenerateContentRequest {
            system_instruction: None,
            contents: vec![Content::text(prompt)],
            generation_config: Some(GenerationConfig {
                response_modalities: &["TEXT", "IMAGE"],
            }),
        };

        let parsed = self.generate(&self.settings.image_model, &body)?;
        parsed.first_image().ok_or(GenAiError::EmptyOutput)
    }
}

// ---------------------------------------------------------------------------
// Wire types for generateContent
// ---------------------------------------------------------------------------

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    response_modalities: &'a [&'a str],
}

#[derive(Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

impl Content {
    fn text(text: &str) -> Self {
        Self {
            parts: vec![Part {
                text: Some(text.to_string()),
                inline_data: None,
            }],
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<Content>,
}

impl GenerateContentResponse {
    fn first_text(&self) -> Option<String> {
        self.candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .iter()
            .find_map(|p| p.text.clone())
    }

    fn first_image(&self) -> Option<GeneratedImage> {
        self.candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .iter()
            .find_map(|p| {
                p.inline_data.as_ref().map(|d| GeneratedImage {
                    mime_type: d.mime_type.clone(),
                    data: d.data.clone(),
                })
            })
    }
}

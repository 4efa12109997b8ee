//! Generative-AI pipeline: report drafting, patient-friendly
//! summarization, and the illustrative-image service.
//!
//! All three services share one model seam (`GenerativeModel`) so tests
//! run against scripted doubles. Drafting and summarization surface
//! failures as `GenAiError`; the illustration service never lets an
//! error cross its boundary (absence is a valid result there).

pub mod client;
pub mod drafting;
pub mod illustration;
pub mod prompt;
pub mod summarize;

pub use client::{GenAiClient, GenAiSettings, GeneratedImage, GenerativeModel};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenAiError {
    #[error("cannot reach generative endpoint at {0}")]
    Connection(String),

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("generative endpoint returned {status}: {body}")]
    ApiStatus { status: u16, body: String },

    #[error("failed to parse model response: {0}")]
    ResponseParsing(String),

    #[error("model returned no output")]
    EmptyOutput,

    #[error("generative API key not configured")]
    MissingApiKey,
}

//! AI summarization service — technical text to patient-friendly text.

use serde::{Deserialize, Serialize};

use super::client::GenerativeModel;
use super::prompt::{build_summary_prompt, SUMMARY_SYSTEM_PROMPT};
use super::GenAiError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryRequest {
    pub technical_details: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryResponse {
    pub patient_friendly_summary: String,
}

/// Rewrite clinical text for the patient.
///
/// Empty or whitespace-only input short-circuits to an empty summary
/// without touching the model — there is nothing to rewrite, and a
/// wasted call costs real money.
pub fn summarize(
    model: &dyn GenerativeModel,
    request: &SummaryRequest,
) -> Result<SummaryResponse, GenAiError> {
    if request.technical_details.trim().is_empty() {
        return Ok(SummaryResponse {
            patient_friendly_summary: String::new(),
        });
    }

    let prompt = build_summary_prompt(&request.technical_details);
    let patient_friendly_summary = model.generate_text(SUMMARY_SYSTEM_PROMPT, &prompt)?;
    Ok(SummaryResponse {
        patient_friendly_summary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::genai::client::GeneratedImage;

    struct CountingModel {
        calls: AtomicUsize,
    }

    impl CountingModel {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl GenerativeModel for CountingModel {
        fn generate_text(&self, _system: &str, _prompt: &str) -> Result<String, GenAiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok("Resumo simples.".to_string())
        }

        fn generate_image(&self, _prompt: &str) -> Result<GeneratedImage, GenAiError> {
            unreachable!("summarize never requests images")
        }
    }

    #[test]
    fn empty_input_short_circuits_without_model_call() {
        let model = CountingModel::new();
        for input in ["", "   ", "\n\t "] {
            let response = summarize(
                &model,
                &SummaryRequest {
                    technical_details: input.to_string(),
                },
            )
            .unwrap();
            assert_eq!(response.patient_friendly_summary, "");
        }
        assert_eq!(model.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn non_empty_input_calls_model_once() {
        let model = CountingModel::new();
        let response = summarize(
            &model,
            &SummaryRequest {
                technical_details: "fração de ejeção preservada (60%)".to_string(),
            },
        )
        .unwrap();
        assert_eq!(response.patient_friendly_summary, "Resumo simples.");
        assert_eq!(model.calls.load(Ordering::SeqCst), 1);
    }
}

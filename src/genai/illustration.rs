//! Illustrative-image service for exam-type reports.
//!
//! Absence is a valid result here, reached two ways: the report type is
//! not an exam we illustrate (the keyword gate), or the model call
//! failed. Callers see the same `image_url: None` for both; the two
//! causes stay distinguishable in the logs. Nothing this module does
//! may fail the surrounding report workflow.

use serde::{Deserialize, Serialize};

use super::client::GenerativeModel;
use super::prompt::build_illustration_prompt;
use super::GenAiError;

/// Exam types that get an illustrative image, matched case-insensitively
/// as substrings of the report type.
pub const ILLUSTRATABLE_KEYWORDS: &[&str] = &[
    "raio-x",
    "radiografia",
    "ressonância",
    "tomografia",
    "ultrassom",
    "ecocardiograma",
    "eletrocardiograma",
    "ecg",
    "eletroencefalograma",
    "eeg",
    "endoscopia",
    "dermatológico",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IllustrationRequest {
    pub report_type: String,
    pub notes: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IllustrationResponse {
    /// Data URI of the generated image, or None — absent is not an error.
    pub image_url: Option<String>,
}

/// Why no image was produced.
#[derive(Debug)]
enum Absent {
    NotIllustratable,
    Generation(GenAiError),
}

/// True if the report type names an exam on the keyword list.
pub fn is_illustratable(report_type: &str) -> bool {
    let lowered = report_type.to_lowercase();
    ILLUSTRATABLE_KEYWORDS.iter().any(|k| lowered.contains(k))
}

/// Generate an illustrative image, or degrade to absence.
///
/// This function never returns an error: the image is a presentational
/// enhancement, and a failed enhancement must not fail the report flow.
pub fn generate_illustration(
    model: &dyn GenerativeModel,
    request: &IllustrationRequest,
) -> IllustrationResponse {
    match try_generate(model, request) {
        Ok(image_url) => IllustrationResponse {
            image_url: Some(image_url),
        },
        Err(Absent::NotIllustratable) => {
            tracing::debug!(
                report_type = %request.report_type,
                "report type not illustratable, skipping image generation"
            );
            IllustrationResponse { image_url: None }
        }
        Err(Absent::Generation(e)) => {
            tracing::warn!(
                report_type = %request.report_type,
                error = %e,
                "illustrative image generation failed, continuing without image"
            );
            IllustrationResponse { image_url: None }
        }
    }
}

fn try_generate(
    model: &dyn GenerativeModel,
    request: &IllustrationRequest,
) -> Result<String, Absent> {
    if !is_illustratable(&request.report_type) {
        return Err(Absent::NotIllustratable);
    }

    let prompt = build_illustration_prompt(&request.report_type, &request.notes);
    let image = model
        .generate_image(&prompt)
        .map_err(Absent::Generation)?;
    Ok(image.to_data_uri())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::genai::client::GeneratedImage;

    struct ImageModel {
        calls: AtomicUsize,
        fail: bool,
    }

    impl ImageModel {
        fn new(fail: bool) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail,
            }
        }
    }

    impl GenerativeModel for ImageModel {
        fn generate_text(&self, _: &str, _: &str) -> Result<String, GenAiError> {
            unreachable!("illustration never requests plain text")
        }

        fn generate_image(&self, _prompt: &str) -> Result<GeneratedImage, GenAiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(GenAiError::ApiStatus {
                    status: 500,
                    body: "boom".to_string(),
                });
            }
            Ok(GeneratedImage {
                mime_type: "image/png".to_string(),
                data: "QUJD".to_string(),
            })
        }
    }

    fn request(report_type: &str) -> IllustrationRequest {
        IllustrationRequest {
            report_type: report_type.to_string(),
            notes: "achados normais".to_string(),
        }
    }

    #[test]
    fn keyword_gate_matches_case_insensitively() {
        assert!(is_illustratable("Raio-X de Tórax"));
        assert!(is_illustratable("RESSONÂNCIA magnética"));
        assert!(is_illustratable("exame dermatológico"));
        assert!(is_illustratable("ECG de esforço"));
        assert!(!is_illustratable("Exame Físico Anual"));
        assert!(!is_illustratable("Consulta de rotina"));
    }

    #[test]
    fn matching_type_issues_exactly_one_call() {
        let model = ImageModel::new(false);
        let response = generate_illustration(&model, &request("Raio-X de Tórax"));
        assert_eq!(
            response.image_url.as_deref(),
            Some("data:image/png;base64,QUJD")
        );
        assert_eq!(model.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn non_matching_type_makes_no_call() {
        let model = ImageModel::new(false);
        let response = generate_illustration(&model, &request("Exame Físico Anual"));
        assert!(response.image_url.is_none());
        assert_eq!(model.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn model_failure_degrades_to_absence() {
        let model = ImageModel::new(true);
        let response = generate_illustration(&model, &request("Tomografia de crânio"));
        assert!(response.image_url.is_none());
        assert_eq!(model.calls.load(Ordering::SeqCst), 1);
    }
}

//! AI drafting service — shorthand notes in, structured draft out.

use serde::{Deserialize, Serialize};

use super::client::GenerativeModel;
use super::prompt::{build_draft_prompt, DRAFTING_SYSTEM_PROMPT};
use super::GenAiError;

/// Form fields for draft generation. The caller validates that all
/// three are non-empty before invoking the service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftRequest {
    pub patient_name: String,
    pub report_type: String,
    pub notes: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftResponse {
    pub report_draft: String,
}

/// One model call, raw text passthrough. No retry.
pub fn generate_draft(
    model: &dyn GenerativeModel,
    request: &DraftRequest,
) -> Result<DraftResponse, GenAiError> {
    let prompt = build_draft_prompt(&request.patient_name, &request.report_type, &request.notes);
    let report_draft = model.generate_text(DRAFTING_SYSTEM_PROMPT, &prompt)?;
    Ok(DraftResponse { report_draft })
}

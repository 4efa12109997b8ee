//! Fixed prompt templates for the three AI services.
//!
//! Templates embed the caller's fields verbatim — no escaping, no
//! truncation. What the model returns is passed through unmodified.

pub const DRAFTING_SYSTEM_PROMPT: &str = r#"
You are a clinical documentation assistant drafting a formal medical report
for a physician to review. You expand the physician's shorthand notes into
a complete, professionally structured report.

RULES:
1. Use ONLY the information present in the notes. Never invent findings,
   measurements, or diagnoses that are not written there.
2. Write in the same language as the notes.
3. Structure the report with the customary sections for the given exam or
   consultation type (indication, technique/findings, impression).
4. Keep a formal clinical register. No advice addressed to the patient.
5. Output the report text only — no preamble, no markdown fences.
"#;

/// Build the drafting prompt from the report form fields.
pub fn build_draft_prompt(patient_name: &str, report_type: &str, notes: &str) -> String {
    format!(
        r#"Draft a medical report from the following form.

Patient: {patient_name}
Report type: {report_type}

Physician notes:
{notes}
"#
    )
}

pub const SUMMARY_SYSTEM_PROMPT: &str = r#"
You rewrite technical clinical text into language a patient with no medical
training can understand.

RULES:
1. Preserve every fact; simplify only the wording.
2. Never add reassurance, prognosis, or advice that is not in the text.
3. Write in the same language as the input text.
4. Output the rewritten text only.
"#;

/// Build the summarization prompt around the technical passage.
pub fn build_summary_prompt(technical_details: &str) -> String {
    format!(
        r#"Rewrite the following clinical text for the patient:

{technical_details}
"#
    )
}

/// Build the illustrative-image prompt for exam-type reports.
///
/// The image is presentational, not diagnostic — the style words keep
/// the model away from photorealistic clinical imagery.
pub fn build_illustration_prompt(report_type: &str, notes: &str) -> String {
    format!(
        r#"Create a clean, stylized medical illustration to accompany a clinic
report of type "{report_type}". Flat vector style, soft colors, no text,
no real patient imagery, suitable as a decorative header image.

Context from the physician notes (for subject matter only):
{notes}
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draft_prompt_embeds_fields_verbatim() {
        let prompt = build_draft_prompt("John Doe", "Cardiology Report", "chest pain, normal ECG");
        assert!(prompt.contains("Patient: John Doe"));
        assert!(prompt.contains("Report type: Cardiology Report"));
        assert!(prompt.contains("chest pain, normal ECG"));
    }

    #[test]
    fn summary_prompt_embeds_text_verbatim() {
        let prompt = build_summary_prompt("fração de ejeção 60%");
        assert!(prompt.contains("fração de ejeção 60%"));
    }

    #[test]
    fn illustration_prompt_embeds_type_and_notes() {
        let prompt = build_illustration_prompt("Raio-X de Tórax", "sem alterações");
        assert!(prompt.contains("\"Raio-X de Tórax\""));
        assert!(prompt.contains("sem alterações"));
        assert!(prompt.contains("no real patient imagery"));
    }
}

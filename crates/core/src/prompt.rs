//! Prompt Builder: renders a [`ClinicalInputRecord`] into prompt text.
//!
//! The output is a pure function of the record and the builder options.
//! Identical inputs always produce byte-identical prompts, so the builder can
//! be tested directly while the text-generation call is mocked.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AvsError;
use crate::record::ClinicalInputRecord;
use crate::status::{DiabetesStatus, LabStatus, NOT_PROVIDED, Sentinel};

const NARRATIVE_PREAMBLE: &str = "Generate a concise, coherent AVS summary for the following patient details in 1–2 paragraphs. Do not repeat broad category headings; instead, integrate recommendations, next steps, and patient education points naturally into a unified narrative.";

const NARRATIVE_CLOSING: &str = "Generate a concise, unified AVS summary in 1–2 paragraphs that integrates recommendations, next steps, and patient education points in a natural narrative.";

const PLAIN_LANGUAGE_PREAMBLE: &str = "You are a knowledgeable medical assistant. Based on the following patient data, generate a concise, plain language summary for the patient. Use 2-3 short paragraphs with bullet points highlighting key recommendations.";

const PLAIN_LANGUAGE_CLOSING: &str = "Generate a concise, plain language summary in 2-3 short paragraphs with bullet points for the key recommendations.";

/// Tone and structure requested from the model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PromptStyle {
    /// One unified narrative of 1–2 paragraphs
    #[default]
    Narrative,
    /// Short paragraphs with bullet points for recommendations
    PlainLanguage,
}

impl PromptStyle {
    fn preamble(&self) -> &'static str {
        match self {
            PromptStyle::Narrative => NARRATIVE_PREAMBLE,
            PromptStyle::PlainLanguage => PLAIN_LANGUAGE_PREAMBLE,
        }
    }

    fn closing(&self) -> &'static str {
        match self {
            PromptStyle::Narrative => NARRATIVE_CLOSING,
            PromptStyle::PlainLanguage => PLAIN_LANGUAGE_CLOSING,
        }
    }
}

/// Which condition decides whether diabetes details appear.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiabetesGate {
    /// Control status shown unless N/A; A1c shown only when Uncontrolled
    #[default]
    Status,
    /// Whole block shown only when an A1c value was entered
    A1cPresent,
}

/// Placeholder for an unset reading inside an included lab category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnsetLabLabel {
    #[default]
    NotProvided,
    NotReviewed,
}

impl UnsetLabLabel {
    fn as_str(&self) -> &'static str {
        match self {
            UnsetLabLabel::NotProvided => NOT_PROVIDED,
            UnsetLabLabel::NotReviewed => LabStatus::NotReviewed.as_str(),
        }
    }
}

macro_rules! option_from_str {
    ($name:ident { $($label:literal => $variant:ident),+ $(,)? }) => {
        impl FromStr for $name {
            type Err = AvsError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($label => Ok($name::$variant),)+
                    other => Err(AvsError::InvalidOption(format!(
                        "{} must be one of [{}], got '{}'",
                        stringify!($name),
                        [$($label),+].join(", "),
                        other
                    ))),
                }
            }
        }
    };
}

option_from_str!(PromptStyle {
    "narrative" => Narrative,
    "plain-language" => PlainLanguage,
});

option_from_str!(DiabetesGate {
    "status" => Status,
    "a1c" => A1cPresent,
    "a1c-present" => A1cPresent,
});

option_from_str!(UnsetLabLabel {
    "not-provided" => NotProvided,
    "not-reviewed" => NotReviewed,
});

/// Knobs that resolve the formatting choices left open between form variants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptOptions {
    #[serde(default)]
    pub style: PromptStyle,
    #[serde(default)]
    pub diabetes_gate: DiabetesGate,
    #[serde(default)]
    pub unset_lab_label: UnsetLabLabel,
}

/// Builds AVS prompts from clinical input records
#[derive(Debug, Clone, Default)]
pub struct PromptBuilder {
    options: PromptOptions,
}

impl PromptBuilder {
    pub fn new(options: PromptOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &PromptOptions {
        &self.options
    }

    /// Render the record into newline-joined prompt text.
    pub fn build(&self, record: &ClinicalInputRecord) -> String {
        let style = self.options.style;
        let mut lines: Vec<String> = vec![style.preamble().to_string(), String::new()];

        if style == PromptStyle::PlainLanguage {
            lines.push("Patient Data:".to_string());
        }

        lines.push(format!("- CKD Stage: {}", record.ckd_stage));
        lines.push(format!("- Kidney Function Trend: {}", record.kidney_trend));

        if !record.proteinuria_status.is_omitted() {
            lines.push(format!("- Proteinuria: {}", record.proteinuria_status));
        }

        if !record.bp_status.is_omitted() {
            lines.push(format!("- Blood Pressure Status: {}", record.bp_status));
            if record.bp_reading_gate() {
                lines.push(format!("- BP Reading: {}", record.bp_reading));
            }
        }

        self.push_diabetes(record, &mut lines);

        if !record.fluid_status.is_omitted() {
            lines.push(format!("- Fluid Status: {}", record.fluid_status));
        }

        self.push_labs(record, &mut lines);

        lines.push(format!("- Medication Change: {}", record.med_change));
        if record.med_changes_listed() {
            lines.push(format!(
                "  - Medication Changes: {}",
                record.med_change_types.join(", ")
            ));
        }

        if record.followup_provided() {
            lines.push(format!(
                "- Follow-up Appointment: {}",
                record.followup_appointment
            ));
        }
        if record.comments_provided() {
            lines.push(format!(
                "- Additional Clinical Comments: {}",
                record.additional_comments
            ));
        }

        lines.push(String::new());
        lines.push(style.closing().to_string());
        lines.join("\n")
    }

    fn push_diabetes(&self, record: &ClinicalInputRecord, lines: &mut Vec<String>) {
        match self.options.diabetes_gate {
            DiabetesGate::Status => {
                if record.diabetes_status.is_omitted() {
                    return;
                }
                lines.push(format!("- Diabetes Control: {}", record.diabetes_status));
                if record.diabetes_uncontrolled() && record.a1c_provided() {
                    lines.push(format!("- A1c Level: {}", record.a1c_level));
                }
            }
            DiabetesGate::A1cPresent => {
                if record.a1c_provided() {
                    // An unset status still reads as N/A here, never as "Not Provided"
                    let status = match record.diabetes_status {
                        DiabetesStatus::Unrecognized => DiabetesStatus::NotApplicable,
                        other => other,
                    };
                    lines.push(format!("- Diabetes Control: {status}"));
                    lines.push(format!("- A1c Level: {}", record.a1c_level));
                } else {
                    lines.push("- Diabetes: Not provided".to_string());
                }
            }
        }
    }

    fn push_labs(&self, record: &ClinicalInputRecord, lines: &mut Vec<String>) {
        let reading = |status: Option<LabStatus>| match status {
            Some(LabStatus::Unrecognized) | None => self.options.unset_lab_label.as_str(),
            Some(s) => s.as_str(),
        };

        let mut groups = Vec::new();
        if record.anemia_included {
            groups.push(format!(
                "  - Anemia: Hemoglobin {}, Iron {}",
                reading(record.hemoglobin_status),
                reading(record.iron_status)
            ));
        }
        if record.electrolyte_included {
            groups.push(format!(
                "  - Electrolyte: Potassium {}, Bicarbonate {}, Sodium {}",
                reading(record.potassium_status),
                reading(record.bicarbonate_status),
                reading(record.sodium_status)
            ));
        }
        if record.bone_included {
            groups.push(format!(
                "  - Bone Mineral Disease: PTH {}, Vitamin D {}, Calcium {}",
                reading(record.pth_status),
                reading(record.vitamin_d_status),
                reading(record.calcium_status)
            ));
        }

        if !groups.is_empty() {
            lines.push("Labs:".to_string());
            lines.extend(groups);
        }
    }
}

/// Build a prompt with default options.
pub fn build_prompt(record: &ClinicalInputRecord) -> String {
    PromptBuilder::default().build(record)
}

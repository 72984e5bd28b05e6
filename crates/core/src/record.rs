//! Structured clinical inputs collected for one summary request.

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

use crate::status::{
    BpStatus, CkdStage, DiabetesStatus, FluidStatus, KidneyTrend, LabStatus, MedChange,
    ProteinuriaStatus,
};

/// Medication changes offered by the multi-select, in form order.
pub const MEDICATION_VOCABULARY: &[&str] = &[
    "BP Medication",
    "Diabetes Medication",
    "Diuretic",
    "Potassium Binder",
    "Iron Supplement",
    "ESA Therapy",
    "Vitamin D Supplement",
    "Bicarbonate Supplement",
];

/// Flat record of the values selected on the form.
///
/// Built fresh for every generate action and never stored. Optional fields
/// default to their "not applicable" value so callers can send only what the
/// user filled in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClinicalInputRecord {
    pub ckd_stage: CkdStage,
    pub kidney_trend: KidneyTrend,

    #[serde(default, deserialize_with = "null_as_default")]
    pub proteinuria_status: ProteinuriaStatus,

    #[serde(default, deserialize_with = "null_as_default")]
    pub bp_status: BpStatus,
    /// Only meaningful when `bp_status` is Above Goal
    #[serde(default, deserialize_with = "free_text")]
    pub bp_reading: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub diabetes_status: DiabetesStatus,
    #[serde(default, deserialize_with = "free_text")]
    pub a1c_level: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub fluid_status: FluidStatus,

    // Anemia
    #[serde(default, deserialize_with = "null_as_default")]
    pub anemia_included: bool,
    #[serde(default)]
    pub hemoglobin_status: Option<LabStatus>,
    #[serde(default)]
    pub iron_status: Option<LabStatus>,

    // Electrolytes
    #[serde(default, deserialize_with = "null_as_default")]
    pub electrolyte_included: bool,
    #[serde(default)]
    pub potassium_status: Option<LabStatus>,
    #[serde(default)]
    pub bicarbonate_status: Option<LabStatus>,
    #[serde(default)]
    pub sodium_status: Option<LabStatus>,

    // Bone mineral disease
    #[serde(default, deserialize_with = "null_as_default")]
    pub bone_included: bool,
    #[serde(default)]
    pub pth_status: Option<LabStatus>,
    #[serde(default)]
    pub vitamin_d_status: Option<LabStatus>,
    #[serde(default)]
    pub calcium_status: Option<LabStatus>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub med_change: MedChange,
    /// Selection order is preserved; duplicates are the caller's concern
    #[serde(default, deserialize_with = "text_list")]
    pub med_change_types: Vec<String>,

    #[serde(default, deserialize_with = "free_text")]
    pub followup_appointment: String,
    #[serde(default, deserialize_with = "free_text")]
    pub additional_comments: String,
}

/// Free text as it may arrive from a form: a string, or a number typed into
/// a text box. Anything else carries no text.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawText {
    Text(String),
    Int(i64),
    Float(f64),
    Other(IgnoredAny),
}

impl RawText {
    fn into_text(self) -> Option<String> {
        match self {
            RawText::Text(text) => Some(text),
            RawText::Int(n) => Some(n.to_string()),
            RawText::Float(n) => Some(n.to_string()),
            RawText::Other(_) => None,
        }
    }
}

/// A multi-select sent either as a list or as a single value
#[derive(Deserialize)]
#[serde(untagged)]
enum RawList {
    Many(Vec<RawText>),
    One(RawText),
}

/// `null` reads as the field's default
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn free_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<RawText>::deserialize(deserializer)?
        .and_then(RawText::into_text)
        .unwrap_or_default())
}

/// Entries without text (null, objects) are dropped; order is kept.
fn text_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Ok(match Option::<RawList>::deserialize(deserializer)? {
        Some(RawList::Many(items)) => items.into_iter().filter_map(RawText::into_text).collect(),
        Some(RawList::One(item)) => item.into_text().into_iter().collect(),
        None => Vec::new(),
    })
}

impl ClinicalInputRecord {
    /// Create a record with every optional field at its default.
    pub fn new(ckd_stage: CkdStage, kidney_trend: KidneyTrend) -> Self {
        Self {
            ckd_stage,
            kidney_trend,
            proteinuria_status: ProteinuriaStatus::default(),
            bp_status: BpStatus::default(),
            bp_reading: String::new(),
            diabetes_status: DiabetesStatus::default(),
            a1c_level: String::new(),
            fluid_status: FluidStatus::default(),
            anemia_included: false,
            hemoglobin_status: None,
            iron_status: None,
            electrolyte_included: false,
            potassium_status: None,
            bicarbonate_status: None,
            sodium_status: None,
            bone_included: false,
            pth_status: None,
            vitamin_d_status: None,
            calcium_status: None,
            med_change: MedChange::default(),
            med_change_types: Vec::new(),
            followup_appointment: String::new(),
            additional_comments: String::new(),
        }
    }

    /// BP reading is shown only above goal and only when something was entered.
    pub fn bp_reading_gate(&self) -> bool {
        self.bp_status == BpStatus::AboveGoal && is_filled(&self.bp_reading)
    }

    pub fn diabetes_uncontrolled(&self) -> bool {
        self.diabetes_status == DiabetesStatus::Uncontrolled
    }

    /// A1c counts as provided when it is non-blank after trimming.
    pub fn a1c_provided(&self) -> bool {
        is_filled(&self.a1c_level)
    }

    pub fn followup_provided(&self) -> bool {
        is_filled(&self.followup_appointment)
    }

    pub fn comments_provided(&self) -> bool {
        is_filled(&self.additional_comments)
    }

    /// A change was made and at least one type was selected.
    pub fn med_changes_listed(&self) -> bool {
        self.med_change == MedChange::Yes && !self.med_change_types.is_empty()
    }

    /// Selections outside [`MEDICATION_VOCABULARY`], in input order.
    pub fn unknown_medications(&self) -> Vec<&str> {
        self.med_change_types
            .iter()
            .map(String::as_str)
            .filter(|m| !MEDICATION_VOCABULARY.contains(m))
            .collect()
    }
}

/// Emptiness check for free text. Trimming decides inclusion only.
pub(crate) fn is_filled(text: &str) -> bool {
    !text.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_json_fills_defaults() {
        let record: ClinicalInputRecord =
            serde_json::from_str(r#"{"ckd_stage": "IV", "kidney_trend": "Worsening"}"#).unwrap();

        assert_eq!(record, ClinicalInputRecord::new(CkdStage::IV, KidneyTrend::Worsening));
        assert_eq!(record.bp_status, BpStatus::NotApplicable);
        assert_eq!(record.med_change, MedChange::No);
        assert!(!record.anemia_included);
    }

    #[test]
    fn unknown_labels_fall_through() {
        let record: ClinicalInputRecord = serde_json::from_str(
            r#"{
                "ckd_stage": "VI",
                "kidney_trend": "Stable",
                "bp_status": "Sky High",
                "hemoglobin_status": "Iron Deficient"
            }"#,
        )
        .unwrap();

        assert_eq!(record.ckd_stage, CkdStage::Unrecognized);
        assert_eq!(record.bp_status, BpStatus::Unrecognized);
        assert_eq!(record.hemoglobin_status, Some(LabStatus::Unrecognized));
    }

    #[test]
    fn null_and_non_string_values_fall_through() {
        let record: ClinicalInputRecord = serde_json::from_str(
            r#"{
                "ckd_stage": 3,
                "kidney_trend": null,
                "bp_status": null,
                "diabetes_status": 7,
                "bp_reading": null,
                "a1c_level": null,
                "anemia_included": null,
                "med_change": null,
                "med_change_types": null,
                "followup_appointment": null
            }"#,
        )
        .unwrap();

        assert_eq!(record.ckd_stage, CkdStage::Unrecognized);
        assert_eq!(record.kidney_trend, KidneyTrend::Unrecognized);
        assert_eq!(record.bp_status, BpStatus::NotApplicable);
        assert_eq!(record.diabetes_status, DiabetesStatus::Unrecognized);
        assert_eq!(record.bp_reading, "");
        assert_eq!(record.a1c_level, "");
        assert!(!record.anemia_included);
        assert_eq!(record.med_change, MedChange::No);
        assert!(record.med_change_types.is_empty());
        assert!(!record.followup_provided());
    }

    #[test]
    fn numeric_free_text_is_kept() {
        let record: ClinicalInputRecord = serde_json::from_str(
            r#"{
                "ckd_stage": "IIIb",
                "kidney_trend": "Stable",
                "a1c_level": 8.2,
                "followup_appointment": 3,
                "med_change_types": ["Diuretic", null, "ESA Therapy"]
            }"#,
        )
        .unwrap();

        assert_eq!(record.a1c_level, "8.2");
        assert_eq!(record.followup_appointment, "3");
        assert_eq!(record.med_change_types, ["Diuretic", "ESA Therapy"]);

        let single: ClinicalInputRecord = serde_json::from_str(
            r#"{"ckd_stage": "I", "kidney_trend": "Stable", "med_change_types": "Diuretic"}"#,
        )
        .unwrap();
        assert_eq!(single.med_change_types, ["Diuretic"]);
    }

    #[test]
    fn missing_required_field_is_rejected() {
        let result = serde_json::from_str::<ClinicalInputRecord>(r#"{"ckd_stage": "I"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn gates() {
        let mut record = ClinicalInputRecord::new(CkdStage::II, KidneyTrend::Stable);
        record.bp_status = BpStatus::AboveGoal;
        record.bp_reading = "   ".to_string();
        assert!(!record.bp_reading_gate());

        record.bp_reading = " 150/90 ".to_string();
        assert!(record.bp_reading_gate());

        record.diabetes_status = DiabetesStatus::Controlled;
        record.a1c_level = "7.1".to_string();
        assert!(record.a1c_provided());
        assert!(!record.diabetes_uncontrolled());

        record.med_change = MedChange::Yes;
        assert!(!record.med_changes_listed());
        record.med_change_types.push("Diuretic".to_string());
        assert!(record.med_changes_listed());
    }

    #[test]
    fn unknown_medications_keep_order() {
        let mut record = ClinicalInputRecord::new(CkdStage::II, KidneyTrend::Stable);
        record.med_change_types = vec![
            "Statin".to_string(),
            "Diuretic".to_string(),
            "SGLT2 Inhibitor".to_string(),
        ];

        assert_eq!(record.unknown_medications(), ["Statin", "SGLT2 Inhibitor"]);
    }
}

use serde::Serialize;

use crate::record::MEDICATION_VOCABULARY;
use crate::status::{
    BpStatus, CkdStage, DiabetesStatus, FluidStatus, KidneyTrend, LabStatus, MedChange,
    ProteinuriaStatus,
};

/// Option labels for every selectable form field (simplified form schema)
#[derive(Debug, Clone, Serialize)]
pub struct FormCatalog {
    pub ckd_stage: Vec<&'static str>,
    pub kidney_trend: Vec<&'static str>,
    pub proteinuria_status: Vec<&'static str>,
    pub bp_status: Vec<&'static str>,
    pub diabetes_status: Vec<&'static str>,
    pub fluid_status: Vec<&'static str>,
    pub lab_status: Vec<&'static str>,
    pub lab_categories: Vec<LabCategory>,
    pub med_change: Vec<&'static str>,
    pub medications: Vec<&'static str>,
}

/// A lab group and the record fields it gates
#[derive(Debug, Clone, Serialize)]
pub struct LabCategory {
    pub name: &'static str,
    pub flag: &'static str,
    pub fields: Vec<&'static str>,
}

impl FormCatalog {
    /// Catalog for the current record layout
    pub fn current() -> Self {
        Self {
            ckd_stage: CkdStage::labels(),
            kidney_trend: KidneyTrend::labels(),
            proteinuria_status: ProteinuriaStatus::labels(),
            bp_status: BpStatus::labels(),
            diabetes_status: DiabetesStatus::labels(),
            fluid_status: FluidStatus::labels(),
            lab_status: LabStatus::labels(),
            lab_categories: vec![
                LabCategory {
                    name: "Anemia",
                    flag: "anemia_included",
                    fields: vec!["hemoglobin_status", "iron_status"],
                },
                LabCategory {
                    name: "Electrolyte",
                    flag: "electrolyte_included",
                    fields: vec!["potassium_status", "bicarbonate_status", "sodium_status"],
                },
                LabCategory {
                    name: "Bone Mineral Disease",
                    flag: "bone_included",
                    fields: vec!["pth_status", "vitamin_d_status", "calcium_status"],
                },
            ],
            med_change: MedChange::labels(),
            medications: MEDICATION_VOCABULARY.to_vec(),
        }
    }
}

impl Default for FormCatalog {
    fn default() -> Self {
        Self::current()
    }
}

//! Closed vocabularies for the selectable clinical fields.
//!
//! Labels are exact, case-sensitive strings. Deserialization is permissive:
//! an unknown label becomes `Unrecognized` instead of failing the request.
//! Strict parsing goes through `FromStr`.

use std::fmt;
use std::str::FromStr;

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::AvsError;

/// Label used for `N/A` selections.
pub const NOT_APPLICABLE: &str = "N/A";

/// Label rendered in place of a value the builder cannot interpret.
pub const NOT_PROVIDED: &str = "Not Provided";

/// Wire shape of a selectable field. Only a string can name a label; null,
/// numbers and containers are accepted and read as unrecognized.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawLabel {
    Label(String),
    Other(IgnoredAny),
}

macro_rules! status_enum {
    (
        $(#[$meta:meta])*
        $name:ident, field = $field:literal {
            $($variant:ident => $label:literal),+ $(,)?
        }
        $(aliases { $($alias:literal => $target:ident),+ $(,)? })?
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant,)+
            /// A label outside the vocabulary.
            Unrecognized,
        }

        impl $name {
            /// Every selectable variant, in form order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// The exact label for this variant.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                    $name::Unrecognized => NOT_PROVIDED,
                }
            }

            /// Option labels as shown to the user.
            pub fn labels() -> Vec<&'static str> {
                Self::ALL.iter().map(|v| v.as_str()).collect()
            }

            fn lookup(label: &str) -> Option<Self> {
                match label {
                    $($label => Some($name::$variant),)+
                    $($($alias => Some($name::$target),)+)?
                    _ => None,
                }
            }

            /// Permissive parse: unknown labels map to `Unrecognized`.
            pub fn from_label(label: &str) -> Self {
                Self::lookup(label).unwrap_or($name::Unrecognized)
            }
        }

        impl FromStr for $name {
            type Err = AvsError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::lookup(s).ok_or_else(|| AvsError::UnknownValue {
                    field: $field,
                    value: s.to_string(),
                })
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                Ok(match RawLabel::deserialize(deserializer)? {
                    RawLabel::Label(label) => Self::from_label(&label),
                    RawLabel::Other(_) => $name::Unrecognized,
                })
            }
        }
    };
}

status_enum! {
    /// Chronic kidney disease stage
    CkdStage, field = "ckd_stage" {
        I => "I",
        II => "II",
        IIIa => "IIIa",
        IIIb => "IIIb",
        IV => "IV",
        V => "V",
        NotApplicable => "N/A",
    }
}

status_enum! {
    /// Kidney function trend since the last visit
    KidneyTrend, field = "kidney_trend" {
        Stable => "Stable",
        Worsening => "Worsening",
        Improving => "Improving",
        NotApplicable => "N/A",
    }
}

status_enum! {
    ProteinuriaStatus, field = "proteinuria_status" {
        NotPresent => "Not Present",
        Improving => "Improving",
        Worsening => "Worsening",
        NotApplicable => "N/A",
    }
    aliases { "None" => NotApplicable }
}

status_enum! {
    /// Blood pressure relative to goal
    BpStatus, field = "bp_status" {
        AtGoal => "At Goal",
        AboveGoal => "Above Goal",
        NotApplicable => "N/A",
    }
    aliases { "None" => NotApplicable }
}

status_enum! {
    DiabetesStatus, field = "diabetes_status" {
        Controlled => "Controlled",
        Uncontrolled => "Uncontrolled",
        NotApplicable => "N/A",
    }
    aliases { "None" => NotApplicable }
}

status_enum! {
    /// Volume status
    FluidStatus, field = "fluid_status" {
        Normal => "Normal",
        Overloaded => "Overloaded",
        NotApplicable => "N/A",
    }
    aliases { "None" => NotApplicable }
}

status_enum! {
    /// Reading for a single lab value
    LabStatus, field = "lab_status" {
        Normal => "Normal",
        Low => "Low",
        High => "High",
        Elevated => "Elevated",
        NotReviewed => "Not Reviewed",
    }
}

status_enum! {
    /// Whether medications were changed at this visit
    MedChange, field = "med_change" {
        No => "No",
        Yes => "Yes",
        NotApplicable => "N/A",
    }
}

/// Implemented by vocabularies that carry an `N/A` style sentinel.
pub trait Sentinel {
    /// True when the value must be left out of the prompt entirely.
    fn is_omitted(&self) -> bool;
}

macro_rules! sentinel {
    ($($name:ident),+) => {
        $(impl Sentinel for $name {
            fn is_omitted(&self) -> bool {
                matches!(self, $name::NotApplicable | $name::Unrecognized)
            }
        })+
    };
}

sentinel!(ProteinuriaStatus, BpStatus, DiabetesStatus, FluidStatus);

impl Default for ProteinuriaStatus {
    fn default() -> Self {
        ProteinuriaStatus::NotApplicable
    }
}

impl Default for BpStatus {
    fn default() -> Self {
        BpStatus::NotApplicable
    }
}

impl Default for DiabetesStatus {
    fn default() -> Self {
        DiabetesStatus::NotApplicable
    }
}

impl Default for FluidStatus {
    fn default() -> Self {
        FluidStatus::NotApplicable
    }
}

impl Default for MedChange {
    fn default() -> Self {
        MedChange::No
    }
}

//! Closed code sets exchanged with catalog and directory services.
//!
//! Wire tags are upper-case (`TABLET`, `FAMILY_MEMBER`). Incoming tags are parsed
//! leniently: surrounding whitespace is ignored and matching is case-insensitive,
//! because catalog feeds are not consistent about either.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Normalise an incoming tag for matching.
fn normalise_tag(tag: &str) -> String {
    tag.trim().to_ascii_uppercase().replace(['-', ' '], "_")
}

// ============================================================================
// Gender
// ============================================================================

/// Patient gender as recorded by the directory service.
///
/// "Unknown" is not a variant: callers hold an `Option<Gender>` and `None` means
/// the directory had no usable value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_tag(self) -> &'static str {
        match self {
            Gender::Male => "MALE",
            Gender::Female => "FEMALE",
        }
    }

    /// Parse a gender tag. Only the canonical tags are accepted here; free-form
    /// directory codes (`M`, Arabic words) are handled by patient resolution.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match normalise_tag(tag).as_str() {
            "MALE" => Some(Gender::Male),
            "FEMALE" => Some(Gender::Female),
            _ => None,
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gender::Male => f.write_str("male"),
            Gender::Female => f.write_str("female"),
        }
    }
}

/// Gender rule attached to a medical specialization.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GenderRule {
    Male,
    Female,
    /// No gender constraint.
    All,
}

impl GenderRule {
    pub fn as_tag(self) -> &'static str {
        match self {
            GenderRule::Male => "MALE",
            GenderRule::Female => "FEMALE",
            GenderRule::All => "ALL",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match normalise_tag(tag).as_str() {
            "MALE" => Some(GenderRule::Male),
            "FEMALE" => Some(GenderRule::Female),
            "ALL" | "BOTH" | "ANY" => Some(GenderRule::All),
            _ => None,
        }
    }

    /// The single gender this rule requires, or `None` for [`GenderRule::All`].
    pub fn required(self) -> Option<Gender> {
        match self {
            GenderRule::Male => Some(Gender::Male),
            GenderRule::Female => Some(Gender::Female),
            GenderRule::All => None,
        }
    }
}

// ============================================================================
// Pharmaceutical form
// ============================================================================

/// Pharmaceutical form of a medicine; governs how dosage and quantity are read.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PharmaceuticalForm {
    Tablet,
    Capsule,
    Syrup,
    Liquid,
    Drops,
    Cream,
    Ointment,
    Injection,
}

impl PharmaceuticalForm {
    pub const ALL: [PharmaceuticalForm; 8] = [
        PharmaceuticalForm::Tablet,
        PharmaceuticalForm::Capsule,
        PharmaceuticalForm::Syrup,
        PharmaceuticalForm::Liquid,
        PharmaceuticalForm::Drops,
        PharmaceuticalForm::Cream,
        PharmaceuticalForm::Ointment,
        PharmaceuticalForm::Injection,
    ];

    pub fn as_tag(self) -> &'static str {
        match self {
            PharmaceuticalForm::Tablet => "TABLET",
            PharmaceuticalForm::Capsule => "CAPSULE",
            PharmaceuticalForm::Syrup => "SYRUP",
            PharmaceuticalForm::Liquid => "LIQUID",
            PharmaceuticalForm::Drops => "DROPS",
            PharmaceuticalForm::Cream => "CREAM",
            PharmaceuticalForm::Ointment => "OINTMENT",
            PharmaceuticalForm::Injection => "INJECTION",
        }
    }

    /// Parse a form tag from a catalog feed.
    ///
    /// Accepts the canonical tags plus the package aliases catalog feeds use
    /// (`LIQUID_PACKAGE`, `TABLETS`, `DROP`).
    pub fn from_tag(tag: &str) -> Option<Self> {
        match normalise_tag(tag).as_str() {
            "TABLET" | "TABLETS" => Some(PharmaceuticalForm::Tablet),
            "CAPSULE" | "CAPSULES" => Some(PharmaceuticalForm::Capsule),
            "SYRUP" => Some(PharmaceuticalForm::Syrup),
            "LIQUID" | "LIQUID_PACKAGE" => Some(PharmaceuticalForm::Liquid),
            "DROPS" | "DROP" => Some(PharmaceuticalForm::Drops),
            "CREAM" => Some(PharmaceuticalForm::Cream),
            "OINTMENT" => Some(PharmaceuticalForm::Ointment),
            "INJECTION" | "INJECTIONS" => Some(PharmaceuticalForm::Injection),
            _ => None,
        }
    }

    /// Syrups and liquid packages: dosage is a daily total in ml.
    pub fn is_liquid(self) -> bool {
        matches!(self, PharmaceuticalForm::Syrup | PharmaceuticalForm::Liquid)
    }
}

impl fmt::Display for PharmaceuticalForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

// ============================================================================
// Catalog / directory codes
// ============================================================================

/// What a catalog entry is. Only medicines carry a pharmaceutical form.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemKind {
    #[default]
    Medicine,
    LabTest,
    Radiology,
}

impl ItemKind {
    pub fn as_tag(self) -> &'static str {
        match self {
            ItemKind::Medicine => "MEDICINE",
            ItemKind::LabTest => "LAB_TEST",
            ItemKind::Radiology => "RADIOLOGY",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match normalise_tag(tag).as_str() {
            "MEDICINE" | "MEDICATION" | "DRUG" => Some(ItemKind::Medicine),
            "LAB_TEST" | "LAB" | "LABORATORY" => Some(ItemKind::LabTest),
            "RADIOLOGY" | "IMAGING" => Some(ItemKind::Radiology),
            _ => None,
        }
    }
}

/// Which directory record a patient was resolved from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MemberSource {
    /// The insured main member.
    #[default]
    MainMember,
    /// A dependent registered under the main member.
    FamilyMember,
}

impl MemberSource {
    pub fn as_tag(self) -> &'static str {
        match self {
            MemberSource::MainMember => "MAIN_MEMBER",
            MemberSource::FamilyMember => "FAMILY_MEMBER",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match normalise_tag(tag).as_str() {
            "MAIN_MEMBER" | "MAIN" => Some(MemberSource::MainMember),
            "FAMILY_MEMBER" | "FAMILY" | "DEPENDENT" => Some(MemberSource::FamilyMember),
            _ => None,
        }
    }
}

/// Presentation language for user-facing strings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Ar,
}

impl Language {
    pub fn as_tag(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Ar => "ar",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "en" | "english" => Some(Language::En),
            "ar" | "arabic" => Some(Language::Ar),
            _ => None,
        }
    }
}

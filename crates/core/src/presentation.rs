//! Dosage input presentation: labels, helper text and placeholders.
//!
//! Every function here is a pure function of the (possibly absent) form and the
//! medicine name. An absent form is first resolved from the name. The strings
//! are advisory only; the one semantic distinction they must carry is whether
//! the dosage is entered per dose or as a daily total.

use crate::form::resolve_form;
use rx_types::{Language, PharmaceuticalForm};
use serde::Serialize;

/// Unit a dosage value is entered in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum DosageUnit {
    Tablets,
    Millilitres,
    Injections,
    Grams,
    Drops,
    Generic,
}

impl DosageUnit {
    fn for_form(form: Option<PharmaceuticalForm>) -> Self {
        match form {
            Some(PharmaceuticalForm::Tablet) => DosageUnit::Tablets,
            Some(PharmaceuticalForm::Syrup | PharmaceuticalForm::Liquid) => DosageUnit::Millilitres,
            Some(PharmaceuticalForm::Injection) => DosageUnit::Injections,
            Some(PharmaceuticalForm::Cream) => DosageUnit::Grams,
            Some(PharmaceuticalForm::Drops) => DosageUnit::Drops,
            _ => DosageUnit::Generic,
        }
    }

    fn label(self, language: Language) -> &'static str {
        match (self, language) {
            (DosageUnit::Tablets, Language::En) => "How many tablets",
            (DosageUnit::Tablets, Language::Ar) => "عدد الحبات",
            (DosageUnit::Millilitres, Language::En) => "Dosage (ml)",
            (DosageUnit::Millilitres, Language::Ar) => "الجرعة (مل)",
            (DosageUnit::Injections, Language::En) => "How many injections",
            (DosageUnit::Injections, Language::Ar) => "عدد الحقن",
            (DosageUnit::Grams, Language::En) => "How many grams",
            (DosageUnit::Grams, Language::Ar) => "عدد الجرامات",
            (DosageUnit::Drops, Language::En) => "How many drops",
            (DosageUnit::Drops, Language::Ar) => "عدد النقاط",
            (DosageUnit::Generic, Language::En) => "Dosage",
            (DosageUnit::Generic, Language::Ar) => "الجرعة",
        }
    }

    fn helper(self, language: Language) -> &'static str {
        match (self, language) {
            (DosageUnit::Tablets, Language::En) => "Number of tablets per dose",
            (DosageUnit::Tablets, Language::Ar) => "عدد الحبات في كل جرعة",
            (DosageUnit::Millilitres, Language::En) => "Total ml per day",
            (DosageUnit::Millilitres, Language::Ar) => "إجمالي المليلترات في اليوم",
            (DosageUnit::Injections, Language::En) => "Number of injections per dose",
            (DosageUnit::Injections, Language::Ar) => "عدد الحقن في كل جرعة",
            (DosageUnit::Grams, Language::En) => "Grams per application",
            (DosageUnit::Grams, Language::Ar) => "عدد الجرامات في كل استخدام",
            (DosageUnit::Drops, Language::En) => "Number of drops per dose",
            (DosageUnit::Drops, Language::Ar) => "عدد النقاط في كل جرعة",
            (DosageUnit::Generic, Language::En) => "Amount per dose",
            (DosageUnit::Generic, Language::Ar) => "الكمية في كل جرعة",
        }
    }

    fn placeholder(self, language: Language) -> &'static str {
        match (self, language) {
            (DosageUnit::Millilitres, Language::En) => "e.g. 10 ml per day",
            (DosageUnit::Millilitres, Language::Ar) => "مثال: ١٠ مل في اليوم",
            (DosageUnit::Grams, Language::En) => "e.g. 2",
            (DosageUnit::Grams, Language::Ar) => "مثال: ٢",
            (DosageUnit::Drops, Language::En) => "e.g. 3",
            (DosageUnit::Drops, Language::Ar) => "مثال: ٣",
            (_, Language::En) => "e.g. 1",
            (_, Language::Ar) => "مثال: ١",
        }
    }
}

/// Label for the dosage input.
pub fn get_dosage_label(
    form: Option<PharmaceuticalForm>,
    name: Option<&str>,
    language: Language,
) -> &'static str {
    DosageUnit::for_form(resolve_form(form, name)).label(language)
}

/// Guidance shown under the dosage input.
pub fn get_dosage_helper_text(
    form: Option<PharmaceuticalForm>,
    name: Option<&str>,
    language: Language,
) -> &'static str {
    DosageUnit::for_form(resolve_form(form, name)).helper(language)
}

/// Placeholder for the empty dosage input.
pub fn get_dosage_placeholder(
    form: Option<PharmaceuticalForm>,
    name: Option<&str>,
    language: Language,
) -> &'static str {
    DosageUnit::for_form(resolve_form(form, name)).placeholder(language)
}

/// True when the entered dosage is a daily total rather than a per-dose amount.
pub fn is_dosage_per_day(form: Option<PharmaceuticalForm>) -> bool {
    form.is_some_and(PharmaceuticalForm::is_liquid)
}

/// True for syrups and liquid packages; switches the order to the duration path.
pub fn is_liquid_medicine(form: Option<PharmaceuticalForm>, name: Option<&str>) -> bool {
    is_dosage_per_day(resolve_form(form, name))
}

/// Everything the dosage input needs, computed in one pass.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DosagePresentation {
    pub form: Option<PharmaceuticalForm>,
    pub label: &'static str,
    pub helper_text: &'static str,
    pub placeholder: &'static str,
    pub per_day: bool,
}

impl DosagePresentation {
    pub fn new(form: Option<PharmaceuticalForm>, name: Option<&str>, language: Language) -> Self {
        let form = resolve_form(form, name);
        let unit = DosageUnit::for_form(form);
        Self {
            form,
            label: unit.label(language),
            helper_text: unit.helper(language),
            placeholder: unit.placeholder(language),
            per_day: is_dosage_per_day(form),
        }
    }
}

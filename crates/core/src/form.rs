//! Pharmaceutical form inference from catalog display names.
//!
//! Catalog entries do not always carry a form tag. When one is missing the form
//! is inferred from the item name by ordered keyword matching over English and
//! Arabic vocabulary. The first rule with a matching keyword wins, so rule order
//! is significant: "Cough Syrup Tablets" is a syrup.
//!
//! Latin keywords match whole words only (an optional plural `S` is allowed), so
//! "Droperidol" is not read as drops. Arabic keywords match anywhere in the name
//! because articles and prefixes attach to the word.
//!
//! An undetected form is `None`. Callers must treat it as unknown and never
//! substitute a guess that has numeric consequences.

use rx_types::PharmaceuticalForm;

/// One inference rule: any keyword matching selects `form`.
#[derive(Debug)]
pub struct FormRule {
    pub form: PharmaceuticalForm,
    pub keywords: &'static [&'static str],
}

/// Ordered inference rules. Keywords are matched against the upper-cased name.
/// Latin keywords are written in singular form.
pub const FORM_RULES: &[FormRule] = &[
    FormRule {
        form: PharmaceuticalForm::Syrup,
        keywords: &[
            "SYRUP", "SYP", "LIQUID", "SUSPENSION", "ELIXIR", "شراب", "سائل", "معلق",
        ],
    },
    FormRule {
        form: PharmaceuticalForm::Tablet,
        keywords: &["TABLET", "TAB", "أقراص", "قرص", "حبوب", "حبة"],
    },
    FormRule {
        form: PharmaceuticalForm::Cream,
        keywords: &["CREAM", "OINTMENT", "كريم", "مرهم"],
    },
    FormRule {
        form: PharmaceuticalForm::Drops,
        keywords: &["DROP", "قطرة", "نقط"],
    },
    FormRule {
        form: PharmaceuticalForm::Injection,
        keywords: &["INJECTION", "INJ", "AMPOULE", "VIAL", "حقنة", "حقن", "إبرة"],
    },
];

/// Infer a pharmaceutical form from an item display name.
pub fn detect_form_from_name(name: &str) -> Option<PharmaceuticalForm> {
    let upper = name.to_uppercase();
    if upper.trim().is_empty() {
        return None;
    }

    let words: Vec<&str> = upper
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();

    FORM_RULES
        .iter()
        .find(|rule| rule.keywords.iter().any(|kw| keyword_matches(kw, &upper, &words)))
        .map(|rule| rule.form)
}

fn keyword_matches(keyword: &str, upper: &str, words: &[&str]) -> bool {
    if !keyword.is_ascii() {
        return upper.contains(keyword);
    }
    words
        .iter()
        .any(|w| w.strip_prefix(keyword).is_some_and(|rest| rest.is_empty() || rest == "S"))
}

/// Resolve a form: the explicit tag when present, otherwise inference from `name`.
pub fn resolve_form(
    explicit: Option<PharmaceuticalForm>,
    name: Option<&str>,
) -> Option<PharmaceuticalForm> {
    if explicit.is_some() {
        return explicit;
    }

    let inferred = name.and_then(detect_form_from_name);
    if let Some(form) = inferred {
        tracing::debug!(form = %form, name = name.unwrap_or_default(), "inferred form from name");
    }
    inferred
}

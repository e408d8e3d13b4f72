//! Numeric normalisation for localised input.
//!
//! Directory records and free-text fields arrive with either Latin or
//! Arabic-Indic digits (`٠`–`٩`). Everything numeric the engine reads goes
//! through [`to_latin_digits`] first.

use chrono::NaiveDate;

/// Map each Arabic-Indic digit glyph to its Latin digit. Other characters pass
/// through unchanged; `None` yields an empty string.
pub fn to_latin_digits(input: Option<&str>) -> String {
    let Some(input) = input else {
        return String::new();
    };

    input
        .chars()
        .map(|c| match c {
            '\u{0660}'..='\u{0669}' => {
                char::from_digit(c as u32 - 0x0660, 10).unwrap_or(c)
            }
            _ => c,
        })
        .collect()
}

/// Extract an integer age from free-form text such as `"25 years"` or `"٢٥ سنة"`.
///
/// Takes the first run of digits and parses it as base 10. Returns `None` when
/// there are no digits or the run does not fit a `u32`.
pub fn extract_age_number(age_text: Option<&str>) -> Option<u32> {
    let normalised = to_latin_digits(age_text);

    let run: String = normalised
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();

    if run.is_empty() {
        return None;
    }
    run.parse().ok()
}

/// Completed years between `birth_date` and `today`.
///
/// Returns `None` for a birth date after `today`.
pub fn age_on(birth_date: NaiveDate, today: NaiveDate) -> Option<u32> {
    today.years_since(birth_date)
}

/// Parse a birth date in ISO (`YYYY-MM-DD`) or day-first (`DD/MM/YYYY`) form,
/// accepting Arabic-Indic digits.
pub fn parse_birth_date(text: &str) -> Option<NaiveDate> {
    let normalised = to_latin_digits(Some(text.trim()));
    // Directory exports sometimes carry a time component; keep the date part.
    let date_part = normalised
        .split(['T', ' '])
        .next()
        .unwrap_or(normalised.as_str());

    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(date_part, "%d/%m/%Y"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn converts_arabic_indic_digits() {
        assert_eq!(to_latin_digits(Some("٢٥")), "25");
        assert_eq!(to_latin_digits(Some("٠١٢٣٤٥٦٧٨٩")), "0123456789");
    }

    #[test]
    fn latin_and_other_characters_pass_through() {
        assert_eq!(to_latin_digits(Some("12")), "12");
        assert_eq!(to_latin_digits(Some("العمر ٣ سنوات")), "العمر 3 سنوات");
        assert_eq!(to_latin_digits(Some("")), "");
    }

    #[test]
    fn missing_input_yields_empty_string() {
        assert_eq!(to_latin_digits(None), "");
    }

    #[test]
    fn extracts_first_digit_run() {
        assert_eq!(extract_age_number(Some("25 years")), Some(25));
        assert_eq!(extract_age_number(Some("age: 7, weight 20kg")), Some(7));
        assert_eq!(extract_age_number(Some("٤٠ سنة")), Some(40));
        assert_eq!(extract_age_number(Some("007")), Some(7));
    }

    #[test]
    fn age_without_digits_is_unknown() {
        assert_eq!(extract_age_number(None), None);
        assert_eq!(extract_age_number(Some("")), None);
        assert_eq!(extract_age_number(Some("unknown")), None);
    }

    #[test]
    fn oversized_age_is_unknown() {
        assert_eq!(extract_age_number(Some("99999999999999999999")), None);
    }

    #[test]
    fn age_counts_completed_years() {
        let birth = date(2000, 6, 15);
        assert_eq!(age_on(birth, date(2020, 6, 14)), Some(19));
        assert_eq!(age_on(birth, date(2020, 6, 15)), Some(20));
        assert_eq!(age_on(birth, date(2000, 6, 15)), Some(0));
    }

    #[test]
    fn leap_day_birthdays_complete_on_first_of_march() {
        let birth = date(2016, 2, 29);
        assert_eq!(age_on(birth, date(2026, 2, 28)), Some(9));
        assert_eq!(age_on(birth, date(2026, 3, 1)), Some(10));
        assert_eq!(age_on(birth, date(2028, 2, 29)), Some(12));
    }

    #[test]
    fn future_birth_date_has_no_age() {
        assert_eq!(age_on(date(2030, 1, 1), date(2026, 1, 1)), None);
    }

    #[test]
    fn parses_birth_dates_in_supported_layouts() {
        assert_eq!(parse_birth_date("1990-03-20"), Some(date(1990, 3, 20)));
        assert_eq!(parse_birth_date("20/03/1990"), Some(date(1990, 3, 20)));
        assert_eq!(parse_birth_date("١٩٩٠-٠٣-٢٠"), Some(date(1990, 3, 20)));
        assert_eq!(parse_birth_date("1990-03-20T00:00:00Z"), Some(date(1990, 3, 20)));
        assert_eq!(parse_birth_date("March 1990"), None);
    }

    proptest! {
        #[test]
        fn normalisation_is_idempotent(s in "\\PC*") {
            let once = to_latin_digits(Some(&s));
            let twice = to_latin_digits(Some(&once));
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn normalisation_preserves_char_count(s in "\\PC*") {
            prop_assert_eq!(to_latin_digits(Some(&s)).chars().count(), s.chars().count());
        }

        #[test]
        fn extracted_age_matches_formatted_number(n in 0u32..1_000, suffix in "[a-z ]{0,8}") {
            let text = format!("{n}{suffix}");
            prop_assert_eq!(extract_age_number(Some(&text)), Some(n));
        }
    }
}

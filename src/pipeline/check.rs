//! Decision rules: is the claimed name in the text, and does the text name a
//! qualifying role?
//!
//! Both checks are exact, case-insensitive substring containment on the
//! lower-cased OCR output. There is no whitespace normalisation and no fuzzy
//! matching, so "Doe Jane" does not match "Jane Doe" and a keyword split across
//! two lines is missed.

use crate::error::ValidationError;
use tracing::debug;

/// Keywords that qualify a certificate for the dietitian / nutritionist role.
///
/// "diet" already covers "dietitian"; both are kept so the list reads the way
/// reviewers describe the role.
pub const DEFAULT_KEYWORDS: [&str; 4] = ["diet", "dietitian", "health coach", "nutritionist"];

/// Check extracted text for the claimed name, then for at least one keyword.
///
/// `keywords` are expected to be lower-case already. An empty claimed name
/// never matches.
pub fn check_text(
    text: &str,
    claimed_name: &str,
    keywords: &[String],
) -> Result<(), ValidationError> {
    let text_to_check = text.to_lowercase();

    let name = claimed_name.to_lowercase();
    if name.is_empty() || !text_to_check.contains(&name) {
        return Err(ValidationError::NameNotFound {
            name: claimed_name.to_string(),
        });
    }

    match keywords.iter().find(|k| text_to_check.contains(k.as_str())) {
        Some(keyword) => {
            debug!(keyword = %keyword, "Keyword matched");
            Ok(())
        }
        None => Err(ValidationError::KeywordNotFound),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> Vec<String> {
        DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect()
    }

    #[test]
    fn certificate_with_name_and_role_passes() {
        let text = "CERTIFICATE OF COMPLETION\nThis is awarded to Jane Doe\n\
                    Registered Dietitian Nutritionist";
        assert!(check_text(text, "Jane Doe", &defaults()).is_ok());
    }

    #[test]
    fn other_name_fails_with_claimed_name_in_reason() {
        let err = check_text(
            "Certificate awarded to John Smith, Nutritionist",
            "Jane Doe",
            &defaults(),
        )
        .expect_err("should fail");
        assert!(matches!(err, ValidationError::NameNotFound { .. }));
        assert!(err.to_string().contains("Jane Doe"));
    }

    #[test]
    fn name_without_keyword_fails() {
        let err = check_text(
            "Jane Doe has completed Advanced Yoga Training",
            "Jane Doe",
            &defaults(),
        )
        .expect_err("should fail");
        assert!(matches!(err, ValidationError::KeywordNotFound));
        assert!(err.to_string().contains("Required keywords"));
    }

    #[test]
    fn matching_ignores_case() {
        assert!(check_text("JANE DOE — HEALTH COACH", "Jane Doe", &defaults()).is_ok());
        assert!(check_text("jane doe, diet technician", "JANE DOE", &defaults()).is_ok());
    }

    #[test]
    fn name_order_and_spacing_must_match_exactly() {
        let kw = defaults();
        assert!(check_text("Doe Jane, Nutritionist", "Jane Doe", &kw).is_err());
        assert!(check_text("Jane  Doe, Nutritionist", "Jane Doe", &kw).is_err());
        assert!(check_text("Jane\nDoe, Nutritionist", "Jane Doe", &kw).is_err());
    }

    #[test]
    fn keyword_split_across_lines_is_missed() {
        let err = check_text("Jane Doe\nHealth\nCoach", "Jane Doe", &defaults())
            .expect_err("should fail");
        assert!(matches!(err, ValidationError::KeywordNotFound));
    }

    #[test]
    fn empty_name_never_matches() {
        let err = check_text("Jane Doe, Dietitian", "", &defaults()).expect_err("fail");
        assert!(matches!(err, ValidationError::NameNotFound { .. }));
        assert_eq!(err.to_string(), "Name '' not found.");
    }

    #[test]
    fn name_check_runs_before_keyword_check() {
        let err = check_text("Advanced Yoga Training", "Jane Doe", &defaults())
            .expect_err("fail");
        assert!(matches!(err, ValidationError::NameNotFound { .. }));
    }

    #[test]
    fn custom_keywords() {
        let kw = vec!["pharmacist".to_string()];
        assert!(check_text("Jane Doe, Licensed Pharmacist", "Jane Doe", &kw).is_ok());
        assert!(check_text("Jane Doe, Dietitian", "Jane Doe", &kw).is_err());
    }
}

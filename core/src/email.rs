use crate::i18n::{t, Locale};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

// Deliberately loose: anything of the shape `x@y.z` without whitespace or a
// second `@`. Tightening this would reject addresses the service already
// accepts.
static EMAIL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

/// What the UI should do after an email input change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailInputOutcome {
    /// Localized validation error, `None` when the field is empty or valid.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub submit_enabled: bool,
    /// Whether the address should be written to the preference store.
    pub persist: bool,
}

/// Reducer for the email field: empty input clears the error without
/// persisting, a valid address persists and enables submit when files are
/// selected, anything else shows the validation error and disables submit.
pub fn on_email_input(email: &str, has_files: bool, locale: Locale) -> EmailInputOutcome {
    let trimmed = email.trim();
    if trimmed.is_empty() {
        return EmailInputOutcome {
            error: None,
            submit_enabled: false,
            persist: false,
        };
    }

    if is_valid_email(trimmed) {
        EmailInputOutcome {
            error: None,
            submit_enabled: has_files,
            persist: true,
        }
    } else {
        EmailInputOutcome {
            error: Some(t(locale, "please_enter_valid_email")),
            submit_enabled: false,
            persist: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_minimal_structural_addresses() {
        assert!(is_valid_email("a@b.c"));
        assert!(is_valid_email("user.name+tag@example.co"));
        // The check is intentionally lax about TLD shape.
        assert!(is_valid_email("user@host.x"));
    }

    #[test]
    fn rejects_missing_parts_and_whitespace() {
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("plainaddress"));
        assert!(!is_valid_email("a b@c.d"));
        assert!(!is_valid_email("a@@b.c"));
        assert!(!is_valid_email("@b.c"));
    }

    #[test]
    fn empty_input_clears_without_persisting() {
        let outcome = on_email_input("", true, Locale::En);
        assert_eq!(outcome.error, None);
        assert!(!outcome.submit_enabled);
        assert!(!outcome.persist);
    }

    #[test]
    fn valid_input_enables_submit_only_with_files() {
        let with_files = on_email_input("user@example.com", true, Locale::En);
        assert!(with_files.persist);
        assert!(with_files.submit_enabled);

        let without_files = on_email_input("user@example.com", false, Locale::En);
        assert!(without_files.persist);
        assert!(!without_files.submit_enabled);
    }

    #[test]
    fn invalid_input_shows_localized_error() {
        let outcome = on_email_input("not-an-email", true, Locale::Fr);
        assert_eq!(
            outcome.error.as_deref(),
            Some("Veuillez saisir une adresse email valide")
        );
        assert!(!outcome.submit_enabled);
        assert!(!outcome.persist);
    }
}

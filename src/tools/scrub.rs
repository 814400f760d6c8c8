//! PII scrubbing for notification text.
//!
//! Summaries leave the process via the notification transport, so email
//! addresses, phone-number-shaped digit runs, and the visitor's name are
//! redacted before sending, regardless of what the model produced.

use std::sync::LazyLock;

use regex::Regex;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").expect("valid email pattern")
});

// Digit runs of seven or more characters allowing separators, with an
// optional leading +.
static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\+?\d[\d\s().\-]{5,}\d").expect("valid phone pattern")
});

const REDACTED: &str = "[redacted]";

/// Redact email addresses and phone numbers from `text`.
pub fn scrub_pii(text: &str) -> String {
    let text = EMAIL_RE.replace_all(text, REDACTED);
    PHONE_RE.replace_all(&text, REDACTED).into_owned()
}

/// Redact occurrences of a specific name, case-insensitively.
pub fn scrub_name(text: &str, name: &str) -> String {
    let pattern = format!(r"(?i){}", regex::escape(name.trim()));
    match Regex::new(&pattern) {
        Ok(re) => re.replace_all(text, REDACTED).into_owned(),
        Err(_) => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emails_are_redacted() {
        let out = scrub_pii("Reach me at jane.doe+work@example.co.uk please");
        assert_eq!(out, "Reach me at [redacted] please");
    }

    #[test]
    fn phone_numbers_are_redacted() {
        let out = scrub_pii("Call +48 123-456-789 tomorrow");
        assert!(!out.contains("123"));
        assert!(out.contains(REDACTED));
    }

    #[test]
    fn short_digit_runs_survive() {
        let out = scrub_pii("I have 10 years of experience since 2014");
        assert_eq!(out, "I have 10 years of experience since 2014");
    }

    #[test]
    fn names_are_redacted_case_insensitively() {
        let out = scrub_name("JANE DOE asked about Jane Doe's rates", "Jane Doe");
        assert!(!out.to_lowercase().contains("jane"));
    }

    #[test]
    fn clean_text_is_unchanged() {
        let text = "Visitor asked about career history and Rust experience.";
        assert_eq!(scrub_pii(text), text);
    }
}

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    static ref MOBILE_RE: Regex = Regex::new(r"^\+?[0-9(][0-9 ().-]{5,17}[0-9]$").unwrap();
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Plausibility check only: 7-15 digits, optional leading +, common separators.
pub(crate) fn is_valid_mobile(mobile: &str) -> bool {
    if !MOBILE_RE.is_match(mobile) {
        return false;
    }
    let digits = mobile.chars().filter(char::is_ascii_digit).count();
    (7..=15).contains(&digits)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_ordinary_emails() {
        assert!(is_valid_email("vasu@example.com"));
        assert!(is_valid_email("a.b+tag@mail.co.in"));
    }

    #[test]
    fn rejects_malformed_emails() {
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("two@@example.com"));
        assert!(!is_valid_email("spaces in@example.com"));
        assert!(!is_valid_email("nodot@example"));
    }

    #[test]
    fn accepts_plausible_mobiles() {
        assert!(is_valid_mobile("9876543210"));
        assert!(is_valid_mobile("+91 98765 43210"));
        assert!(is_valid_mobile("(020) 7946-0958"));
    }

    #[test]
    fn rejects_implausible_mobiles() {
        assert!(!is_valid_mobile("12345"));
        assert!(!is_valid_mobile("phone"));
        assert!(!is_valid_mobile("+12345678901234567890"));
        assert!(!is_valid_mobile(""));
    }
}

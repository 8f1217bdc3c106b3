use std::sync::LazyLock;

use regex::Regex;

/// Lowercase only, with a two to four letter top-level domain.
static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9._%+\-]+@[a-z0-9.\-]+\.[a-z]{2,4}$").expect("email pattern is valid")
});

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

//! Text normalization applied by entity save hooks.

/// Trim the ends and collapse internal whitespace runs to single spaces.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Trim only; inner formatting (line breaks in message bodies) is preserved.
pub fn trim(s: &str) -> String {
    s.trim().to_string()
}

/// Lowercased, trimmed email form used for uniqueness checks.
pub fn email(s: &str) -> String {
    s.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_runs_and_trims() {
        assert_eq!(collapse_whitespace("  leaky \t faucet\n repair "), "leaky faucet repair");
    }

    #[test]
    fn trim_preserves_inner_newlines() {
        assert_eq!(trim("  a\nb  "), "a\nb");
    }

    #[test]
    fn email_is_lowercased() {
        assert_eq!(email(" Bob@Example.COM "), "bob@example.com");
    }
}

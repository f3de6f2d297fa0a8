//! Website domain normalization.

use once_cell::sync::Lazy;
use regex::Regex;

/// Sites blocked during a session when nothing else is configured.
pub const DEFAULT_BLOCKLIST: &[&str] = &[
    "facebook.com",
    "twitter.com",
    "youtube.com",
    "instagram.com",
    "reddit.com",
    "tiktok.com",
];

static SCHEME_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-z][a-z0-9+.-]*://").unwrap_or_else(|e| panic!("Invalid scheme regex: {e}"))
});

/// Reduce user input like `HTTPS://www.YouTube.com/watch?v=x` to `youtube.com`.
///
/// Returns `None` for blank input or input containing whitespace.
#[must_use]
pub fn normalize_domain(input: &str) -> Option<String> {
    let lowered = input.trim().to_lowercase();
    let without_scheme = SCHEME_PATTERN.replace(&lowered, "");
    let without_www = without_scheme.strip_prefix("www.").unwrap_or(&without_scheme);

    let host = without_www
        .split(['/', '?', '#', ':'])
        .next()
        .unwrap_or_default()
        .trim_end_matches('.');

    if host.is_empty() || host.chars().any(char::is_whitespace) {
        return None;
    }
    Some(host.to_string())
}

/// Normalize a list of sites, dropping blanks and duplicates (first occurrence wins).
#[must_use]
pub fn normalize_websites<I, S>(websites: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for site in websites {
        if let Some(domain) = normalize_domain(site.as_ref()) {
            if !out.contains(&domain) {
                out.push(domain);
            }
        }
    }
    out
}

/// The default block list as owned strings.
#[must_use]
pub fn default_blocklist() -> Vec<String> {
    DEFAULT_BLOCKLIST.iter().map(ToString::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_scheme_and_www() {
        assert_eq!(normalize_domain("https://www.YouTube.com"), Some("youtube.com".to_string()));
        assert_eq!(normalize_domain("http://reddit.com/r/rust"), Some("reddit.com".to_string()));
        assert_eq!(normalize_domain("  Twitch.TV  "), Some("twitch.tv".to_string()));
        assert_eq!(normalize_domain("www.netflix.com:443"), Some("netflix.com".to_string()));
    }

    #[test]
    fn test_normalize_rejects_blank_and_spaces() {
        assert_eq!(normalize_domain(""), None);
        assert_eq!(normalize_domain("   "), None);
        assert_eq!(normalize_domain("https://"), None);
        assert_eq!(normalize_domain("face book.com"), None);
    }

    #[test]
    fn test_normalize_websites_dedupes() {
        let sites = normalize_websites(["facebook.com", "https://www.facebook.com", "", "x.com"]);
        assert_eq!(sites, vec!["facebook.com".to_string(), "x.com".to_string()]);
    }

    #[test]
    fn test_default_blocklist_is_normalized() {
        let defaults = default_blocklist();
        assert_eq!(normalize_websites(&defaults), defaults);
    }
}

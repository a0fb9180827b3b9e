//! Page URL → account domain.
//!
//! The registrable-domain rule is "last two labels", which is wrong for
//! multi-part public suffixes (`example.co.uk` becomes `co.uk`). Existing
//! derived passwords depend on it, so it stays.

/// Normalize a page URL (or bare host) to the domain used for derivation.
///
/// Strips a leading `scheme://` and a leading `www.` (case-insensitive),
/// keeps everything before the first `/`, then, unless `keep_subdomain` is
/// set, keeps only the last two dot-separated labels.
///
/// Total: malformed input yields a best-effort string, never an error.
#[must_use]
pub fn normalize_domain(raw_url: &str, keep_subdomain: bool) -> String {
    let rest = strip_scheme(raw_url.trim());
    let rest = strip_www(rest);
    let host = rest.split('/').next().unwrap_or_default();

    if keep_subdomain {
        return host.to_string();
    }

    let labels: Vec<&str> = host.split('.').collect();
    let keep_from = labels.len().saturating_sub(2);
    labels[keep_from..].join(".")
}

fn strip_scheme(url: &str) -> &str {
    match url.split_once("://") {
        Some((scheme, rest))
            if !scheme.is_empty()
                && scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')) =>
        {
            rest
        }
        _ => url,
    }
}

fn strip_www(host: &str) -> &str {
    match host.get(..4) {
        Some(prefix) if prefix.eq_ignore_ascii_case("www.") => &host[4..],
        _ => host,
    }
}

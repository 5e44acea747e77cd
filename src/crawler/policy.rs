use url::Url;

/// Checks whether the host of `url` is in scope.
///
/// An empty allowlist lets everything through. Otherwise the host must equal
/// one of the entries or be a subdomain of it (`docs.example.com` matches
/// `example.com`, `badexample.com` does not).
pub fn is_allowed(url: &Url, allowed_domains: &[String]) -> bool {
    if allowed_domains.is_empty() {
        return true;
    }

    let Some(host) = url.host_str() else {
        return false;
    };

    allowed_domains.iter().any(|domain| {
        host == domain
            || host
                .strip_suffix(domain.as_str())
                .is_some_and(|prefix| prefix.ends_with('.'))
    })
}

/// Lowercases entries and strips a leading dot, so `.Example.COM` and
/// `example.com` mean the same thing.
pub fn normalize_domains<I, S>(domains: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    domains
        .into_iter()
        .map(|d| d.as_ref().trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|d| !d.is_empty())
        .collect()
}

//! Joining backend base URLs with endpoint paths.

/// Strip trailing slashes and surrounding whitespace from a base URL.
///
/// ```
/// use lexi::utils::url::normalize_base_url;
///
/// assert_eq!(normalize_base_url("https://qa.example.test/"), "https://qa.example.test");
/// assert_eq!(normalize_base_url(" https://qa.example.test/v2// "), "https://qa.example.test/v2");
/// ```
pub fn normalize_base_url(base_url: &str) -> String {
    base_url.trim().trim_end_matches('/').to_string()
}

/// Build an endpoint URL with exactly one slash between base and path.
///
/// ```
/// use lexi::utils::url::construct_api_url;
///
/// assert_eq!(
///     construct_api_url("https://qa.example.test/v2/", "/query"),
///     "https://qa.example.test/v2/query"
/// );
/// ```
pub fn construct_api_url(base_url: &str, endpoint: &str) -> String {
    let base = normalize_base_url(base_url);
    let endpoint = endpoint.trim_start_matches('/');
    format!("{base}/{endpoint}")
}

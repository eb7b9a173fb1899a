//! Endpoint URL construction for provider base URLs.

/// Join a base URL and an endpoint path with exactly one slash between them.
///
/// # Examples
///
/// ```
/// use multichat::utils::url::construct_api_url;
///
/// assert_eq!(
///     construct_api_url("https://api.example.com/v1/", "/chat/completions"),
///     "https://api.example.com/v1/chat/completions"
/// );
/// ```
pub fn construct_api_url(base_url: &str, endpoint: &str) -> String {
    let base = base_url.trim_end_matches('/');
    let endpoint = endpoint.trim_start_matches('/');
    format!("{base}/{endpoint}")
}

/// Build a per-model action URL such as `models/gemini-1.5-pro:generateContent`.
pub fn construct_model_action_url(base_url: &str, model: &str, action: &str) -> String {
    construct_api_url(base_url, &format!("models/{model}:{action}"))
}

//! Text helpers shared by the loader and the query paths.

const INSECURE_SCHEME: &str = "http://";
const SECURE_SCHEME: &str = "https://";

/// Normalize free text for matching.
///
/// Lower-cases, keeps only ASCII letters, ASCII digits and whitespace,
/// then collapses whitespace runs into single spaces and trims the ends.
/// The result is only ever compared against, never displayed.
pub fn normalize(text: &str) -> String {
    let kept: String = text
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace())
        .collect();

    let mut out = String::with_capacity(kept.len());
    for word in kept.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
    out
}

/// Rewrite an `http://` thumbnail URL to `https://`.
///
/// Anything else, including a missing value, passes through unchanged.
pub fn secure_thumbnail(url: Option<&str>) -> Option<String> {
    url.map(|u| match u.strip_prefix(INSECURE_SCHEME) {
        Some(rest) => format!("{SECURE_SCHEME}{rest}"),
        None => u.to_string(),
    })
}

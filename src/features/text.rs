//! Body normalization shared by every feature.

/// Lower-case and drop `.`, `,` and `/`. Other punctuation is left in place.
pub fn normalize(body: &str) -> String {
    body.to_lowercase()
        .chars()
        .filter(|c| !matches!(c, '.' | ',' | '/'))
        .collect()
}

/// Whitespace-separated words of already normalized text.
pub fn words(normalized: &str) -> Vec<&str> {
    normalized.split_whitespace().collect()
}

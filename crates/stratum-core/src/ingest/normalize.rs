//! Type-name normalization for type-usage relationship sources.
//!
//! Qualifiers are removed textually: every `"const "` token, then every `&`
//! and `*`, then surrounding whitespace. Markers nested inside template
//! argument lists are stripped too, so `Future<const T*>` and `Future<T>`
//! normalize to the same node.

/// Strip `const`, reference and pointer markers from a type name.
#[must_use]
pub fn normalize_type(raw: &str) -> String {
    raw.replace("const ", "")
        .replace(['&', '*'], "")
        .trim()
        .to_string()
}

/// Return `true` if a normalized type should not become a graph node.
#[must_use]
pub fn is_excluded_type(normalized: &str) -> bool {
    normalized.is_empty() || normalized == "void"
}

/// Normalize `raw` and drop it when excluded.
#[must_use]
pub fn dependency_type(raw: &str) -> Option<String> {
    let normalized = normalize_type(raw);
    (!is_excluded_type(&normalized)).then_some(normalized)
}

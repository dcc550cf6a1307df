//! "Did you mean" hints for misspelled names.

/// Largest edit distance that still counts as a typo.
const MAX_DISTANCE: usize = 2;

/// Returns the candidate closest to `name`, if any lies within a couple of
/// edits. Comparison is case-insensitive; an exact match is not a suggestion.
#[must_use]
pub fn closest_name<'a>(
    name: &str,
    candidates: impl IntoIterator<Item = &'a str>,
) -> Option<&'a str> {
    let needle = name.to_ascii_lowercase();
    candidates
        .into_iter()
        .filter(|candidate| !candidate.eq_ignore_ascii_case(name))
        .map(|candidate| {
            let distance = levenshtein::levenshtein(&needle, &candidate.to_ascii_lowercase());
            (distance, candidate)
        })
        .filter(|(distance, _)| *distance <= MAX_DISTANCE)
        .min_by_key(|(distance, _)| *distance)
        .map(|(_, candidate)| candidate)
}

/// Formats an optional suggestion as a trailing error-message hint.
pub(crate) fn hint(suggestion: &Option<String>) -> String {
    suggestion
        .as_ref()
        .map(|name| format!(" (did you mean `{name}`?)"))
        .unwrap_or_default()
}

//! Pick the highest-resolution candidate out of an `<img srcset>` value.

/// Returns the URL of the last candidate in a srcset attribute.
///
/// Pin pages list srcset candidates smallest first, so the last one is the
/// largest. Descriptors (`736w`, `2x`) are ignored; empty candidates are
/// skipped.
pub fn highest_srcset_candidate(srcset: &str) -> Option<String> {
    srcset
        .split(',')
        .filter_map(|candidate| candidate.split_whitespace().next())
        .last()
        .map(str::to_string)
}

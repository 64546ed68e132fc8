pub mod follow_repository;
pub mod post_repository;
pub mod user_repository;

/// Builds a substring pattern for ILIKE, escaping the LIKE metacharacters
/// in user input so a search term is matched literally.
pub(crate) fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_terms_in_wildcards() {
        assert_eq!(like_pattern("sunset"), "%sunset%");
    }

    #[test]
    fn escapes_like_metacharacters() {
        assert_eq!(like_pattern("50%"), "%50\\%%");
        assert_eq!(like_pattern("a_b"), "%a\\_b%");
        assert_eq!(like_pattern("back\\slash"), "%back\\\\slash%");
    }
}

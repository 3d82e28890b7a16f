//! Title and heading text normalization.

/// Convert text to title case.
///
/// Every letter that follows a non-letter is uppercased, every other letter is
/// lowercased, so `"hello wORLD"` becomes `"Hello World"`.
///
/// # Examples
///
/// ```
/// use lightcms_document::title_case;
///
/// assert_eq!(title_case("my first post"), "My First Post");
/// assert_eq!(title_case("rust-lang"), "Rust-Lang");
/// ```
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_is_letter = false;
    for ch in text.chars() {
        if prev_is_letter {
            out.extend(ch.to_lowercase());
        } else {
            out.extend(ch.to_uppercase());
        }
        prev_is_letter = ch.is_alphabetic();
    }
    out
}

/// Normalize a title or heading.
///
/// A leading underscore marks the text as verbatim: the underscore is removed
/// and the rest is kept as written. Anything else is title-cased.
///
/// # Examples
///
/// ```
/// use lightcms_document::heading_text;
///
/// assert_eq!(heading_text("_iOS tips"), "iOS tips");
/// assert_eq!(heading_text("ios tips"), "Ios Tips");
/// ```
pub fn heading_text(raw: &str) -> String {
    match raw.strip_prefix('_') {
        Some(verbatim) => verbatim.to_owned(),
        None => title_case(raw),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_case_lowercases_inner_letters() {
        assert_eq!(title_case("hELLO wORLD"), "Hello World");
    }

    #[test]
    fn test_title_case_after_digit_and_apostrophe() {
        assert_eq!(title_case("1st post"), "1St Post");
        assert_eq!(title_case("it's"), "It'S");
    }

    #[test]
    fn test_title_case_empty() {
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn test_title_case_non_ascii() {
        assert_eq!(title_case("über café"), "Über Café");
    }

    #[test]
    fn test_heading_text_verbatim() {
        assert_eq!(heading_text("_my first post"), "my first post");
    }

    #[test]
    fn test_heading_text_only_first_underscore_stripped() {
        assert_eq!(heading_text("__private"), "_private");
    }
}

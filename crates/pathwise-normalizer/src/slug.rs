use once_cell::sync::Lazy;
use regex::Regex;

/// Lowercase, hyphen-separated form of a topic, used in record identifiers
pub fn slugify(input: &str) -> String {
    static RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9]+").unwrap());
    let lowercase = input.to_lowercase();
    let replaced = RE.replace_all(lowercase.trim(), "-");
    let slug = replaced.trim_matches('-');
    if slug.is_empty() {
        "topic".to_string()
    } else {
        slug.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Data Science & ML"), "data-science-ml");
        assert_eq!(slugify("  Rust  "), "rust");
        assert_eq!(slugify("C++"), "c");
        assert_eq!(slugify("!!!"), "topic");
    }
}

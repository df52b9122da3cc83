// file: src/query/wildcard.rs
// description: shell-style wildcard patterns translated to term regexes
// reference: https://docs.rs/regex

/// `*` matches any run of characters, `?` exactly one; everything else is
/// literal. The result is matched against whole indexed terms.
pub fn wildcard_to_regex(pattern: &str) -> String {
    let mut regex = String::with_capacity(pattern.len() * 2);
    let mut literal = String::new();

    for ch in pattern.chars() {
        match ch {
            '*' | '?' => {
                if !literal.is_empty() {
                    regex.push_str(&regex::escape(&literal));
                    literal.clear();
                }
                regex.push_str(if ch == '*' { ".*" } else { "." });
            }
            _ => literal.push(ch),
        }
    }

    if !literal.is_empty() {
        regex.push_str(&regex::escape(&literal));
    }

    regex
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translation() {
        assert_eq!(wildcard_to_regex("android*life"), "android.*life");
        assert_eq!(wildcard_to_regex("te?t"), "te.t");
        assert_eq!(wildcard_to_regex("c++*"), r"c\+\+.*");
        assert_eq!(wildcard_to_regex("plain"), "plain");
    }

    #[test]
    fn test_translated_pattern_matches_like_wildcard() {
        let re = regex::Regex::new(&format!("^{}$", wildcard_to_regex("ios*android"))).unwrap();
        assert!(re.is_match("iosandroid"));
        assert!(re.is_match("ios_vs_android"));
        assert!(!re.is_match("android"));

        let re = regex::Regex::new(&format!("^{}$", wildcard_to_regex("v1.?"))).unwrap();
        assert!(re.is_match("v1.2"));
        assert!(!re.is_match("v1x2"));
    }
}

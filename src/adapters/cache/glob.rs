//! Glob matching for cache key patterns.

/// Matches `pattern` against `text` with `*` (any run, including empty)
/// and `?` (exactly one character). Mirrors the pattern dialect Redis
/// applies to SCAN MATCH, minus character classes, so the in-memory cache
/// and the Redis cache agree on what a pattern clears.
pub(crate) fn glob_match(pattern: &str, text: &str) -> bool {
    let p: Vec<char> = pattern.chars().collect();
    let t: Vec<char> = text.chars().collect();
    let (mut pi, mut ti) = (0usize, 0usize);
    let mut star: Option<usize> = None;
    let mut star_ti = 0usize;

    while ti < t.len() {
        // The star arm must win over the literal arm, or a `*` in the
        // text would satisfy a `*` in the pattern as a plain character.
        if pi < p.len() && p[pi] == '*' {
            star = Some(pi);
            star_ti = ti;
            pi += 1;
        } else if pi < p.len() && (p[pi] == '?' || p[pi] == t[ti]) {
            pi += 1;
            ti += 1;
        } else if let Some(s) = star {
            // Backtrack: let the last star swallow one more character.
            pi = s + 1;
            star_ti += 1;
            ti = star_ti;
        } else {
            return false;
        }
    }
    while pi < p.len() && p[pi] == '*' {
        pi += 1;
    }
    pi == p.len()
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn literal_patterns_match_exactly() {
        assert!(glob_match("products:all", "products:all"));
        assert!(!glob_match("products:all", "products:al"));
        assert!(!glob_match("products:all", "products:alll"));
    }

    #[test]
    fn star_swallows_any_run() {
        assert!(glob_match("products:*", "products:all"));
        assert!(glob_match("products:*", "products:"));
        assert!(glob_match("*", ""));
        assert!(glob_match("*:all", "products:all"));
        assert!(glob_match("p*s:*l", "products:all"));
        assert!(!glob_match("products:*", "product:123"));
    }

    #[test]
    fn metacharacters_in_the_text_are_plain_characters() {
        assert!(glob_match("*", "*"));
        assert!(glob_match("*", "*x"));
        assert!(glob_match("user:*", "user:*x"));
        assert!(!glob_match("user:a", "user:*"));
    }

    #[test]
    fn question_mark_needs_exactly_one_character() {
        assert!(glob_match("user:?", "user:a"));
        assert!(!glob_match("user:?", "user:"));
        assert!(!glob_match("user:?", "user:ab"));
    }

    proptest! {
        #[test]
        fn star_matches_everything(text in ".*") {
            prop_assert!(glob_match("*", &text));
        }

        #[test]
        fn metachar_free_text_matches_itself(text in "[^*?]*") {
            prop_assert!(glob_match(&text, &text));
        }

        #[test]
        fn prefix_star_covers_any_suffix(suffix in "[a-z0-9:]*") {
            let key = format!("products:{}", suffix);
            prop_assert!(glob_match("products:*", &key));
        }
    }
}

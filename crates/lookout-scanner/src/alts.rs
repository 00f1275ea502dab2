//! Alternate username candidates for low-yield runs.

use std::collections::BTreeSet;

const SUFFIXES: [&str; 4] = ["1", "123", "_", "official"];
const PREFIXES: [&str; 2] = ["its", "real"];

/// Letter to digit table, applied to the lower-cased name.
const LEET_TABLE: [(char, char); 6] = [
    ('a', '4'),
    ('e', '3'),
    ('i', '1'),
    ('o', '0'),
    ('s', '5'),
    ('t', '7'),
];

/// Suffix and prefix variants of `username`.
#[must_use]
pub fn permutations(username: &str) -> Vec<String> {
    SUFFIXES
        .iter()
        .map(|suffix| format!("{username}{suffix}"))
        .chain(PREFIXES.iter().map(|prefix| format!("{prefix}{username}")))
        .collect()
}

/// Lower-case `username` and swap mapped letters for digits.
#[must_use]
pub fn leet(username: &str) -> String {
    username
        .to_lowercase()
        .chars()
        .map(|c| {
            LEET_TABLE
                .iter()
                .find(|(from, _)| *from == c)
                .map_or(c, |(_, to)| *to)
        })
        .collect()
}

/// The leet form plus its `_`-prefixed and `_`-suffixed variants.
#[must_use]
pub fn leetspeak(username: &str) -> Vec<String> {
    let leet = leet(username);
    vec![format!("_{leet}"), format!("{leet}_"), leet]
}

/// Deduplicated union of [`permutations`] and [`leetspeak`].
///
/// Returned in lexical order; callers should not rely on any particular order.
#[must_use]
pub fn generate(username: &str) -> Vec<String> {
    permutations(username)
        .into_iter()
        .chain(leetspeak(username))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_permutations() {
        assert_eq!(
            permutations("bob"),
            vec!["bob1", "bob123", "bob_", "bobofficial", "itsbob", "realbob"]
        );
    }

    #[test]
    fn test_leet_table() {
        assert_eq!(leet("hello"), "h3ll0");
        assert_eq!(leet("SaTIsfied"), "547151f13d");
        assert_eq!(leetspeak("bob"), vec!["_b0b", "b0b_", "b0b"]);
    }

    #[test]
    fn test_leet_is_idempotent() {
        for name in ["octocat", "Leetspeak", "xyz", "a.e-i_o", "b0b"] {
            let once = leet(name);
            assert_eq!(leet(&once), once, "not idempotent for {name}");
        }
    }

    #[test]
    fn test_generate_has_no_duplicates() {
        for name in ["xyz", "1", "bob", "_"] {
            let alts = generate(name);
            let unique: HashSet<_> = alts.iter().collect();
            assert_eq!(unique.len(), alts.len(), "duplicates for {name}");
        }

        // "__" comes from a permutation and both underscore variants
        assert_eq!(generate("_").iter().filter(|a| *a == "__").count(), 1);
    }

    #[test]
    fn test_generate_contains_both_families() {
        let alts = generate("tester");
        assert!(alts.contains(&"tester123".to_string()));
        assert!(alts.contains(&"73573r".to_string()));
        assert!(alts.contains(&"_73573r".to_string()));
    }
}

//! Text normalization primitives for skill ranking.
//!
//! Three building blocks: a tokenizer that keeps `+` and `#` (so "C++" and
//! "C#" survive), a small suffix-stripping stemmer for plural-tolerant
//! matching, and pg_trgm-style trigram similarity for fuzzy matching.

use std::collections::HashSet;

/// Split text into lowercase tokens. `+` and `#` are token characters
/// because the skill vocabulary contains names like "C++" and "F#".
#[must_use]
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    lowered
        .split(|c: char| !(c.is_alphanumeric() || c == '+' || c == '#'))
        .filter(|token| !token.is_empty())
        .map(|token| token.to_string())
        .collect()
}

/// Stem a lowercase token: plural and gerund suffixes only. Not a full
/// Porter stemmer; the vocabulary is short skill names, not prose.
#[must_use]
pub fn stem(token: &str) -> String {
    let t = token;
    if let Some(base) = t.strip_suffix("ies") {
        if base.len() >= 2 {
            return format!("{base}y");
        }
    }
    if t.ends_with("sses") {
        return t[..t.len() - 2].to_string();
    }
    if let Some(base) = t.strip_suffix("ing") {
        if base.len() >= 3 {
            return base.to_string();
        }
    }
    if let Some(base) = t.strip_suffix("ed") {
        if base.len() >= 3 {
            return base.to_string();
        }
    }
    if t.ends_with('s') && !t.ends_with("ss") && t.len() >= 3 {
        return t[..t.len() - 1].to_string();
    }
    t.to_string()
}

/// Tokenize and stem into a set, the searchable-text representation a name
/// is matched against (word-order independent).
#[must_use]
pub fn stemmed_tokens(text: &str) -> HashSet<String> {
    tokenize(text).iter().map(|t| stem(t)).collect()
}

/// Whether every stemmed query token occurs in the name's stemmed token set.
/// An empty query never matches.
#[must_use]
pub fn linguistic_match(query: &str, name: &str) -> bool {
    let query_tokens = stemmed_tokens(query);
    if query_tokens.is_empty() {
        return false;
    }
    let name_tokens = stemmed_tokens(name);
    query_tokens.iter().all(|t| name_tokens.contains(t))
}

/// Jaccard overlap of stemmed token sets, in [0, 1]. Used as the
/// linguistic relevance tie-break score.
#[must_use]
pub fn linguistic_relevance(query: &str, name: &str) -> f32 {
    let a = stemmed_tokens(query);
    let b = stemmed_tokens(name);
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let intersection = a.intersection(&b).count();
    let union = a.union(&b).count();
    intersection as f32 / union as f32
}

/// Trigram set of a string, pg_trgm style: each word is padded with two
/// leading and one trailing space before extraction.
fn trigrams(text: &str) -> HashSet<[char; 3]> {
    let mut set = HashSet::new();
    for word in tokenize(text) {
        let padded: Vec<char> = std::iter::repeat_n(' ', 2)
            .chain(word.chars())
            .chain(std::iter::once(' '))
            .collect();
        for window in padded.windows(3) {
            set.insert([window[0], window[1], window[2]]);
        }
    }
    set
}

/// Trigram similarity in [0, 1]: shared trigrams over total distinct
/// trigrams, matching Postgres `similarity()` semantics.
#[must_use]
pub fn trigram_similarity(a: &str, b: &str) -> f32 {
    let ta = trigrams(a);
    let tb = trigrams(b);
    if ta.is_empty() || tb.is_empty() {
        return 0.0;
    }
    let intersection = ta.intersection(&tb).count();
    let union = ta.union(&tb).count();
    intersection as f32 / union as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_keeps_symbol_skills() {
        assert_eq!(tokenize("C++ / C# Developer"), vec!["c++", "c#", "developer"]);
    }

    #[test]
    fn test_tokenize_single_letters_survive() {
        // "C" and "R" are real skills
        assert_eq!(tokenize("R"), vec!["r"]);
    }

    #[test]
    fn test_stem_plurals() {
        assert_eq!(stem("databases"), "database");
        assert_eq!(stem("queries"), "query");
        assert_eq!(stem("classes"), "class");
        // "ss" endings are not plurals
        assert_eq!(stem("css"), "css");
    }

    #[test]
    fn test_stem_short_tokens_untouched() {
        assert_eq!(stem("go"), "go");
        assert_eq!(stem("js"), "js");
    }

    #[test]
    fn test_stem_gerund_and_past() {
        assert_eq!(stem("testing"), "test");
        assert_eq!(stem("managed"), "manag");
    }

    #[test]
    fn test_linguistic_match_word_order() {
        assert!(linguistic_match("engineer software", "Software Engineer"));
        assert!(linguistic_match("database", "Relational Databases"));
        assert!(!linguistic_match("kotlin", "Java Developer"));
        assert!(!linguistic_match("", "Java"));
    }

    #[test]
    fn test_linguistic_relevance_ranges() {
        let exact = linguistic_relevance("java", "Java");
        let partial = linguistic_relevance("java", "Java Developer");
        let none = linguistic_relevance("java", "JavaScript");
        assert_eq!(exact, 1.0);
        assert!(partial > 0.0 && partial < 1.0);
        assert_eq!(none, 0.0);
    }

    #[test]
    fn test_trigram_similarity_identical() {
        assert!((trigram_similarity("java", "Java") - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_trigram_similarity_typo_above_floor() {
        // One-letter typo should stay above the 0.3 fuzzy floor
        assert!(trigram_similarity("pythn", "Python") > 0.3);
        assert!(trigram_similarity("javascrpt", "JavaScript") > 0.3);
    }

    #[test]
    fn test_trigram_similarity_unrelated_below_floor() {
        assert!(trigram_similarity("haskell", "Photoshop") < 0.3);
    }

    #[test]
    fn test_trigram_similarity_empty() {
        assert_eq!(trigram_similarity("", "java"), 0.0);
        assert_eq!(trigram_similarity("java", ""), 0.0);
    }
}
